//! Dashboard API handler.

use actix_web::{get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ports::DashboardStats;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::require_actor;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

/// Headline numbers for a mess today.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub active_members: u64,
    pub lunch_today: u64,
    pub dinner_today: u64,
    pub expiring_count: u64,
}

impl From<DashboardStats> for DashboardResponse {
    fn from(stats: DashboardStats) -> Self {
        Self {
            active_members: stats.active_members,
            lunch_today: stats.lunch_today,
            dinner_today: stats.dinner_today,
            expiring_count: stats.expiring_count,
        }
    }
}

/// Owner dashboard statistics.
#[utoipa::path(
    get,
    path = "/api/v1/messes/{id}/dashboard",
    params(("id" = String, Path, description = "Mess id")),
    responses(
        (status = 200, description = "Statistics", body = DashboardResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not this mess's manager", body = Error)
    ),
    tags = ["dashboard"],
    operation_id = "dashboard"
)]
#[get("/messes/{id}/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<DashboardResponse>> {
    let actor = require_actor(&state, &session).await?;
    let mess = parse_id(&path.into_inner(), FieldName::new("id"))?;
    let stats = state.dashboard.stats(&actor, mess).await?;
    Ok(web::Json(DashboardResponse::from(stats)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MessId;
    use crate::inbound::http::test_utils::{TestPorts, login, owner_of, test_app};
    use actix_web::test as actix_test;
    use serde_json::Value;

    #[actix_web::test]
    async fn returns_camel_case_stats() {
        let mess = MessId::random();
        let mut ports = TestPorts::signed_in_as(owner_of(mess));
        ports
            .dashboard
            .expect_stats()
            .withf(move |_, id| *id == mess)
            .times(1)
            .return_once(|_, _| {
                Ok(DashboardStats {
                    active_members: 12,
                    lunch_today: 9,
                    dinner_today: 7,
                    expiring_count: 2,
                })
            });
        let app = actix_test::init_service(test_app(ports)).await;
        let cookie = login(&app).await;

        let request = actix_test::TestRequest::get()
            .uri(&format!("/api/v1/messes/{mess}/dashboard"))
            .cookie(cookie)
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(body["activeMembers"], 12);
        assert_eq!(body["expiringCount"], 2);
    }
}
