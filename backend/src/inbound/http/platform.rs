//! Super-admin overview handlers.
//!
//! ```text
//! GET /api/v1/admin/stats
//! GET /api/v1/admin/owners/unassigned
//! ```

use actix_web::{get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ports::PlatformStats;
use crate::domain::{Error, Profile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::require_actor;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Counts across every mess.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStatsResponse {
    pub total_messes: u64,
    pub total_owners: u64,
    pub total_members: u64,
    pub active_memberships: u64,
}

impl From<PlatformStats> for PlatformStatsResponse {
    fn from(stats: PlatformStats) -> Self {
        Self {
            total_messes: stats.total_messes,
            total_owners: stats.total_owners,
            total_members: stats.total_members,
            active_memberships: stats.active_memberships,
        }
    }
}

/// Owner account offered when creating a mess.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerResponse {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<Profile> for OwnerResponse {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id.to_string(),
            name: profile.name,
            email: profile.email,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/stats",
    responses(
        (status = 200, description = "Platform counts", body = PlatformStatsResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not a super-admin", body = Error)
    ),
    tags = ["admin"],
    operation_id = "platformStats"
)]
#[get("/admin/stats")]
pub async fn platform_stats(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<PlatformStatsResponse>> {
    let actor = require_actor(&state, &session).await?;
    let stats = state.platform.stats(&actor).await?;
    Ok(web::Json(PlatformStatsResponse::from(stats)))
}

/// Owners not yet linked to a mess.
#[utoipa::path(
    get,
    path = "/api/v1/admin/owners/unassigned",
    responses(
        (status = 200, description = "Owners", body = [OwnerResponse]),
        (status = 403, description = "Not a super-admin", body = Error)
    ),
    tags = ["admin"],
    operation_id = "listUnassignedOwners"
)]
#[get("/admin/owners/unassigned")]
pub async fn unassigned_owners(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<OwnerResponse>>> {
    let actor = require_actor(&state, &session).await?;
    let owners = state.platform.unassigned_owners(&actor).await?;
    Ok(web::Json(owners.into_iter().map(OwnerResponse::from).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessId, UserId};
    use crate::inbound::http::test_utils::{TestPorts, login, owner_of, super_admin, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use serde_json::Value;

    #[actix_web::test]
    async fn returns_camel_case_platform_stats() {
        let mut ports = TestPorts::signed_in_as(super_admin());
        ports.platform.expect_stats().times(1).return_once(|_| {
            Ok(PlatformStats {
                total_messes: 4,
                total_owners: 3,
                total_members: 40,
                active_memberships: 31,
            })
        });
        let app = actix_test::init_service(test_app(ports)).await;
        let cookie = login(&app).await;

        let request = actix_test::TestRequest::get()
            .uri("/api/v1/admin/stats")
            .cookie(cookie)
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(body["totalMesses"], 4);
        assert_eq!(body["activeMemberships"], 31);
    }

    #[actix_web::test]
    async fn owner_cannot_read_platform_stats() {
        let mut ports = TestPorts::signed_in_as(owner_of(MessId::random()));
        ports
            .platform
            .expect_stats()
            .return_once(|_| Err(Error::forbidden("super-admin role required")));
        let app = actix_test::init_service(test_app(ports)).await;
        let cookie = login(&app).await;

        let request = actix_test::TestRequest::get()
            .uri("/api/v1/admin/stats")
            .cookie(cookie)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn lists_unassigned_owners() {
        let id = UserId::random();
        let mut ports = TestPorts::signed_in_as(super_admin());
        ports
            .platform
            .expect_unassigned_owners()
            .times(1)
            .return_once(move |_| {
                Ok(vec![Profile {
                    id,
                    name: "Meera Joshi".into(),
                    email: "meera@example.com".into(),
                    phone: None,
                    has_temporary_password: true,
                }])
            });
        let app = actix_test::init_service(test_app(ports)).await;
        let cookie = login(&app).await;

        let request = actix_test::TestRequest::get()
            .uri("/api/v1/admin/owners/unassigned")
            .cookie(cookie)
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(body[0]["id"], id.to_string());
        assert_eq!(body[0]["email"], "meera@example.com");
    }
}
