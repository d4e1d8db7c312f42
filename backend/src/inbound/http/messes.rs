//! Mess directory API handlers.
//!
//! ```text
//! GET   /api/v1/areas
//! GET   /api/v1/messes?areaId=...
//! POST  /api/v1/messes {"name":"Annapurna","ownerId":"..."}
//! GET   /api/v1/messes/{id}
//! PATCH /api/v1/messes/{id}
//! PUT   /api/v1/messes/{id}/active {"active":false}
//! ```
//!
//! Browsing is public; edits require the mess's manager and creation a
//! super-admin.

use actix_web::{HttpResponse, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Area, Error, Mess, MessDraft, MessProfileChanges};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::require_actor;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, require};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AreaResponse {
    pub id: String,
    pub name: String,
}

impl From<Area> for AreaResponse {
    fn from(area: Area) -> Self {
        Self {
            id: area.id.to_string(),
            name: area.name,
        }
    }
}

/// Public profile of a mess.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessResponse {
    pub id: String,
    pub name: String,
    pub tagline: Option<String>,
    pub speciality: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub contact_number: Option<String>,
    pub owner_id: Option<String>,
    pub area_id: Option<String>,
    pub is_active: bool,
}

impl From<Mess> for MessResponse {
    fn from(mess: Mess) -> Self {
        Self {
            id: mess.id.to_string(),
            name: mess.name,
            tagline: mess.tagline,
            speciality: mess.speciality,
            address: mess.address,
            latitude: mess.latitude,
            longitude: mess.longitude,
            contact_number: mess.contact_number,
            owner_id: mess.owner_id.map(|id| id.to_string()),
            area_id: mess.area_id.map(|id| id.to_string()),
            is_active: mess.is_active,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct MessListQuery {
    /// Restrict to one area.
    pub area_id: Option<String>,
}

/// Profile edit; omitted fields stay unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMessBody {
    pub name: Option<String>,
    pub tagline: Option<String>,
    pub speciality: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub contact_number: Option<String>,
    pub area_id: Option<String>,
}

impl TryFrom<UpdateMessBody> for MessProfileChanges {
    type Error = Error;

    fn try_from(body: UpdateMessBody) -> Result<Self, Self::Error> {
        let area_id = body
            .area_id
            .as_deref()
            .map(|raw| parse_id(raw, FieldName::new("areaId")))
            .transpose()?;
        Ok(Self {
            name: body.name,
            tagline: body.tagline,
            speciality: body.speciality,
            address: body.address,
            latitude: body.latitude,
            longitude: body.longitude,
            contact_number: body.contact_number,
            area_id,
        })
    }
}

/// New mess, optionally linked to an owner without a mess.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessBody {
    pub name: Option<String>,
    pub area_id: Option<String>,
    pub owner_id: Option<String>,
    pub tagline: Option<String>,
    pub address: Option<String>,
}

impl TryFrom<CreateMessBody> for MessDraft {
    type Error = Error;

    fn try_from(body: CreateMessBody) -> Result<Self, Self::Error> {
        let name = require(body.name, FieldName::new("name"))?;
        let area_id = body
            .area_id
            .as_deref()
            .map(|raw| parse_id(raw, FieldName::new("areaId")))
            .transpose()?;
        let owner_id = body
            .owner_id
            .as_deref()
            .map(|raw| parse_id(raw, FieldName::new("ownerId")))
            .transpose()?;
        Ok(Self {
            name,
            area_id,
            owner_id,
            tagline: body.tagline,
            address: body.address,
        })
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SetActiveBody {
    pub active: Option<bool>,
}

/// Active areas.
#[utoipa::path(
    get,
    path = "/api/v1/areas",
    responses((status = 200, description = "Areas", body = [AreaResponse])),
    tags = ["messes"],
    operation_id = "listAreas",
    security([])
)]
#[get("/areas")]
pub async fn list_areas(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<AreaResponse>>> {
    let areas = state.messes.list_areas().await?;
    Ok(web::Json(areas.into_iter().map(AreaResponse::from).collect()))
}

/// Active messes, optionally within one area.
#[utoipa::path(
    get,
    path = "/api/v1/messes",
    params(MessListQuery),
    responses(
        (status = 200, description = "Messes", body = [MessResponse]),
        (status = 400, description = "Malformed area id", body = Error)
    ),
    tags = ["messes"],
    operation_id = "listMesses",
    security([])
)]
#[get("/messes")]
pub async fn list_messes(
    state: web::Data<HttpState>,
    query: web::Query<MessListQuery>,
) -> ApiResult<web::Json<Vec<MessResponse>>> {
    let area = query
        .area_id
        .as_deref()
        .map(|raw| parse_id(raw, FieldName::new("areaId")))
        .transpose()?;
    let messes = state.messes.list_messes(area).await?;
    Ok(web::Json(messes.into_iter().map(MessResponse::from).collect()))
}

/// Create a mess. Super-admin only.
#[utoipa::path(
    post,
    path = "/api/v1/messes",
    request_body = CreateMessBody,
    responses(
        (status = 201, description = "Mess created", body = MessResponse),
        (status = 400, description = "Blank name or owner already has a mess", body = Error),
        (status = 403, description = "Not a super-admin", body = Error)
    ),
    tags = ["messes"],
    operation_id = "createMess"
)]
#[post("/messes")]
pub async fn create_mess(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateMessBody>,
) -> ApiResult<HttpResponse> {
    let actor = require_actor(&state, &session).await?;
    let draft = MessDraft::try_from(payload.into_inner())?;
    let mess = state.messes.create_mess(&actor, draft).await?;
    Ok(HttpResponse::Created().json(MessResponse::from(mess)))
}

#[utoipa::path(
    get,
    path = "/api/v1/messes/{id}",
    params(("id" = String, Path, description = "Mess id")),
    responses(
        (status = 200, description = "Mess", body = MessResponse),
        (status = 404, description = "Unknown mess", body = Error)
    ),
    tags = ["messes"],
    operation_id = "getMess",
    security([])
)]
#[get("/messes/{id}")]
pub async fn get_mess(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessResponse>> {
    let mess = parse_id(&path.into_inner(), FieldName::new("id"))?;
    let mess = state.messes.get_mess(mess).await?;
    Ok(web::Json(MessResponse::from(mess)))
}

/// Edit a mess profile.
#[utoipa::path(
    patch,
    path = "/api/v1/messes/{id}",
    params(("id" = String, Path, description = "Mess id")),
    request_body = UpdateMessBody,
    responses(
        (status = 200, description = "Updated mess", body = MessResponse),
        (status = 400, description = "Blank name or bad coordinates", body = Error),
        (status = 403, description = "Not this mess's manager", body = Error)
    ),
    tags = ["messes"],
    operation_id = "updateMess"
)]
#[patch("/messes/{id}")]
pub async fn update_mess(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateMessBody>,
) -> ApiResult<web::Json<MessResponse>> {
    let actor = require_actor(&state, &session).await?;
    let mess = parse_id(&path.into_inner(), FieldName::new("id"))?;
    let changes = MessProfileChanges::try_from(payload.into_inner())?;
    let mess = state.messes.update_profile(&actor, mess, changes).await?;
    Ok(web::Json(MessResponse::from(mess)))
}

/// List or unlist a mess. Super-admin only.
#[utoipa::path(
    put,
    path = "/api/v1/messes/{id}/active",
    params(("id" = String, Path, description = "Mess id")),
    request_body = SetActiveBody,
    responses(
        (status = 200, description = "Updated mess", body = MessResponse),
        (status = 403, description = "Not a super-admin", body = Error)
    ),
    tags = ["messes"],
    operation_id = "setMessActive"
)]
#[put("/messes/{id}/active")]
pub async fn set_mess_active(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<SetActiveBody>,
) -> ApiResult<web::Json<MessResponse>> {
    let actor = require_actor(&state, &session).await?;
    let mess = parse_id(&path.into_inner(), FieldName::new("id"))?;
    let active = require(payload.into_inner().active, FieldName::new("active"))?;
    let mess = state.messes.set_active(&actor, mess, active).await?;
    Ok(web::Json(MessResponse::from(mess)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AreaId, MessId, UserId};
    use crate::inbound::http::test_utils::{TestPorts, login, owner_of, super_admin, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn mess(id: MessId) -> Mess {
        Mess {
            id,
            name: "Annapurna".into(),
            tagline: None,
            speciality: Some("Maharashtrian thali".into()),
            address: None,
            latitude: None,
            longitude: None,
            contact_number: None,
            owner_id: None,
            area_id: None,
            is_active: true,
        }
    }

    #[rstest]
    fn update_body_rejects_bad_area() {
        let error = MessProfileChanges::try_from(UpdateMessBody {
            area_id: Some("kothrud".into()),
            ..UpdateMessBody::default()
        })
        .expect_err("area must be a uuid");
        assert_eq!(error.details().expect("details")["code"], "invalid_uuid");
    }

    #[rstest]
    fn create_body_requires_name_and_valid_owner() {
        let missing = MessDraft::try_from(CreateMessBody::default()).expect_err("name");
        assert_eq!(missing.details().expect("details")["field"], "name");

        let bad_owner = MessDraft::try_from(CreateMessBody {
            name: Some("Annapurna".into()),
            owner_id: Some("meera".into()),
            ..CreateMessBody::default()
        })
        .expect_err("owner must be a uuid");
        assert_eq!(bad_owner.details().expect("details")["field"], "ownerId");
    }

    #[actix_web::test]
    async fn super_admin_creates_mess_for_owner() {
        let owner = UserId::random();
        let mut ports = TestPorts::signed_in_as(super_admin());
        ports
            .messes
            .expect_create_mess()
            .withf(move |_, draft| draft.name == "Annapurna" && draft.owner_id == Some(owner))
            .times(1)
            .return_once(move |_, draft| {
                let mut created = mess(MessId::random());
                created.owner_id = draft.owner_id;
                Ok(created)
            });
        let app = actix_test::init_service(test_app(ports)).await;
        let cookie = login(&app).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/messes")
            .cookie(cookie)
            .set_json(json!({ "name": "Annapurna", "ownerId": owner.to_string() }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["ownerId"], owner.to_string());
    }

    #[actix_web::test]
    async fn lists_messes_for_area_without_session() {
        let area = AreaId::random();
        let mut ports = TestPorts::default();
        ports
            .messes
            .expect_list_messes()
            .withf(move |filter| *filter == Some(area))
            .times(1)
            .return_once(|_| Ok(vec![mess(MessId::random())]));
        let app = actix_test::init_service(test_app(ports)).await;

        let request = actix_test::TestRequest::get()
            .uri(&format!("/api/v1/messes?areaId={area}"))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(body[0]["name"], "Annapurna");
    }

    #[actix_web::test]
    async fn owner_can_rename_mess() {
        let id = MessId::random();
        let mut ports = TestPorts::signed_in_as(owner_of(id));
        ports
            .messes
            .expect_update_profile()
            .withf(|_, _, changes| changes.name.as_deref() == Some("Annapurna Bhojanalay"))
            .times(1)
            .return_once(move |_, _, _| {
                let mut renamed = mess(id);
                renamed.name = "Annapurna Bhojanalay".into();
                Ok(renamed)
            });
        let app = actix_test::init_service(test_app(ports)).await;
        let cookie = login(&app).await;

        let request = actix_test::TestRequest::patch()
            .uri(&format!("/api/v1/messes/{id}"))
            .cookie(cookie)
            .set_json(json!({ "name": "Annapurna Bhojanalay" }))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(body["name"], "Annapurna Bhojanalay");
    }

    #[actix_web::test]
    async fn toggling_active_requires_session() {
        let app = actix_test::init_service(test_app(TestPorts::default())).await;
        let request = actix_test::TestRequest::put()
            .uri(&format!("/api/v1/messes/{}/active", MessId::random()))
            .set_json(json!({ "active": false }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
