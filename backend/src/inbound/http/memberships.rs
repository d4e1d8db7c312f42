//! Membership API handlers.
//!
//! ```text
//! GET  /api/v1/messes/{id}/memberships
//! POST /api/v1/messes/{id}/memberships
//! GET  /api/v1/messes/{id}/memberships/expiring?windowDays=5
//! POST /api/v1/memberships/{id}/renew {"endDate":"2025-04-30"}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::CreateMembershipRequest;
use crate::domain::{EXPIRING_SOON_DAYS, Error, MembershipStatus, MembershipView};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::require_actor;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_date, parse_id, parse_vocabulary, require,
};

/// A membership with its status derived for today.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MembershipResponse {
    pub id: String,
    pub user_id: String,
    pub mess_id: String,
    pub plan_type: String,
    pub meals_per_day: String,
    pub start_date: String,
    pub end_date: String,
    /// Flag as stored; may still read `active` after the end date passed.
    pub stored_status: String,
    /// `active`, `expiring_soon` or `expired`, derived from the dates.
    pub status: String,
    /// Days until the end date while expiring soon.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_left: Option<i64>,
}

impl From<MembershipView> for MembershipResponse {
    fn from(view: MembershipView) -> Self {
        let MembershipView { membership, status } = view;
        let (status, days_left) = match status {
            MembershipStatus::Active => ("active", None),
            MembershipStatus::ExpiringSoon { days_left } => ("expiring_soon", Some(days_left)),
            MembershipStatus::Expired => ("expired", None),
        };
        Self {
            id: membership.id.to_string(),
            user_id: membership.user_id.to_string(),
            mess_id: membership.mess_id.to_string(),
            plan_type: membership.plan_type.as_str().to_owned(),
            meals_per_day: membership.meals_per_day.as_str().to_owned(),
            start_date: membership.start_date.to_string(),
            end_date: membership.end_date.to_string(),
            stored_status: membership.stored_status.as_str().to_owned(),
            status: status.to_owned(),
            days_left,
        }
    }
}

/// Request body for opening a membership.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMembershipBody {
    pub user_id: Option<String>,
    /// `monthly`, `quarterly` or `custom`.
    pub plan_type: Option<String>,
    /// `lunch`, `dinner` or `both`.
    pub meals_per_day: Option<String>,
    /// First day, `YYYY-MM-DD`.
    pub start_date: Option<String>,
}

/// Request body for renewing a membership.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenewMembershipBody {
    pub end_date: Option<String>,
}

/// Query for the expiring list.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ExpiringQuery {
    /// Alert window in days, at most five; defaults to five.
    pub window_days: Option<i64>,
}

fn parse_create_body(
    mess: &str,
    body: CreateMembershipBody,
) -> Result<CreateMembershipRequest, Error> {
    let user_id = require(body.user_id, FieldName::new("userId"))?;
    let plan_type = require(body.plan_type, FieldName::new("planType"))?;
    let meals_per_day = require(body.meals_per_day, FieldName::new("mealsPerDay"))?;
    let start_date = require(body.start_date, FieldName::new("startDate"))?;
    Ok(CreateMembershipRequest {
        user_id: parse_id(&user_id, FieldName::new("userId"))?,
        mess_id: parse_id(mess, FieldName::new("id"))?,
        plan_type: parse_vocabulary(&plan_type, FieldName::new("planType"))?,
        meals_per_day: parse_vocabulary(&meals_per_day, FieldName::new("mealsPerDay"))?,
        start_date: parse_date(&start_date, FieldName::new("startDate"))?,
    })
}

/// Every membership of a mess, newest start first.
#[utoipa::path(
    get,
    path = "/api/v1/messes/{id}/memberships",
    params(("id" = String, Path, description = "Mess id")),
    responses(
        (status = 200, description = "Memberships", body = [MembershipResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not this mess's manager", body = Error)
    ),
    tags = ["memberships"],
    operation_id = "listMemberships"
)]
#[get("/messes/{id}/memberships")]
pub async fn list_memberships(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<MembershipResponse>>> {
    let actor = require_actor(&state, &session).await?;
    let mess = parse_id(&path.into_inner(), FieldName::new("id"))?;
    let views = state.memberships_query.list_for_mess(&actor, mess).await?;
    Ok(web::Json(views.into_iter().map(MembershipResponse::from).collect()))
}

/// Open a membership; the end date follows from the plan.
#[utoipa::path(
    post,
    path = "/api/v1/messes/{id}/memberships",
    params(("id" = String, Path, description = "Mess id")),
    request_body = CreateMembershipBody,
    responses(
        (status = 201, description = "Membership opened", body = MembershipResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Not this mess's manager", body = Error)
    ),
    tags = ["memberships"],
    operation_id = "createMembership"
)]
#[post("/messes/{id}/memberships")]
pub async fn create_membership(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CreateMembershipBody>,
) -> ApiResult<HttpResponse> {
    let actor = require_actor(&state, &session).await?;
    let request = parse_create_body(&path.into_inner(), payload.into_inner())?;
    let view = state.memberships.create(&actor, request).await?;
    Ok(HttpResponse::Created().json(MembershipResponse::from(view)))
}

/// Memberships ending within the window, soonest first.
#[utoipa::path(
    get,
    path = "/api/v1/messes/{id}/memberships/expiring",
    params(("id" = String, Path, description = "Mess id"), ExpiringQuery),
    responses(
        (status = 200, description = "Expiring memberships", body = [MembershipResponse]),
        (status = 400, description = "Window outside 0 to 5 days", body = Error),
        (status = 403, description = "Not this mess's manager", body = Error)
    ),
    tags = ["memberships"],
    operation_id = "listExpiringMemberships"
)]
#[get("/messes/{id}/memberships/expiring")]
pub async fn list_expiring_memberships(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<ExpiringQuery>,
) -> ApiResult<web::Json<Vec<MembershipResponse>>> {
    let actor = require_actor(&state, &session).await?;
    let mess = parse_id(&path.into_inner(), FieldName::new("id"))?;
    let window = query.window_days.unwrap_or(EXPIRING_SOON_DAYS);
    let views = state
        .memberships_query
        .list_expiring_within(&actor, mess, window)
        .await?;
    Ok(web::Json(views.into_iter().map(MembershipResponse::from).collect()))
}

/// Move the end date of a membership and reactivate it.
#[utoipa::path(
    post,
    path = "/api/v1/memberships/{id}/renew",
    params(("id" = String, Path, description = "Membership id")),
    request_body = RenewMembershipBody,
    responses(
        (status = 200, description = "Membership renewed", body = MembershipResponse),
        (status = 400, description = "Invalid end date", body = Error),
        (status = 403, description = "Not this mess's manager", body = Error),
        (status = 404, description = "Unknown membership", body = Error)
    ),
    tags = ["memberships"],
    operation_id = "renewMembership"
)]
#[post("/memberships/{id}/renew")]
pub async fn renew_membership(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<RenewMembershipBody>,
) -> ApiResult<web::Json<MembershipResponse>> {
    let actor = require_actor(&state, &session).await?;
    let membership = parse_id(&path.into_inner(), FieldName::new("id"))?;
    let raw_end = require(payload.into_inner().end_date, FieldName::new("endDate"))?;
    let end_date = parse_date(&raw_end, FieldName::new("endDate"))?;
    let view = state.memberships.renew(&actor, membership, end_date).await?;
    Ok(web::Json(MembershipResponse::from(view)))
}
