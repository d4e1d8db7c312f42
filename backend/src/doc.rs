//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every handler annotated with `#[utoipa::path]` plus the
//! request and response schemas they reference. The document is served by
//! Swagger UI in debug builds and printed by the `openapi-dump` binary.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::{
    accounts, attendance, dashboard, health, memberships, menus, messes, platform, polls,
};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Mess backend API",
        description = "Memberships, attendance, menus and polls for meal-subscription messes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        accounts::login,
        accounts::logout,
        accounts::me,
        accounts::change_password,
        accounts::my_membership,
        messes::list_areas,
        messes::list_messes,
        messes::create_mess,
        messes::get_mess,
        messes::update_mess,
        messes::set_mess_active,
        memberships::list_memberships,
        memberships::create_membership,
        memberships::list_expiring_memberships,
        memberships::renew_membership,
        attendance::attendance_history,
        attendance::mark_attendance,
        attendance::toggle_attendance,
        attendance::mess_attendance,
        menus::list_menu_posts,
        menus::publish_menu_post,
        menus::menu_history,
        menus::feed,
        polls::list_polls,
        polls::create_poll,
        polls::cast_vote,
        polls::close_poll,
        dashboard::dashboard,
        platform::platform_stats,
        platform::unassigned_owners,
        health::ready,
        health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        accounts::LoginRequest,
        accounts::ChangePasswordRequest,
        accounts::AccountResponse,
        messes::AreaResponse,
        messes::MessResponse,
        messes::CreateMessBody,
        messes::UpdateMessBody,
        messes::SetActiveBody,
        memberships::MembershipResponse,
        memberships::CreateMembershipBody,
        memberships::RenewMembershipBody,
        attendance::AttendanceResponse,
        attendance::RosterEntryResponse,
        attendance::RosterResponse,
        attendance::SlotBody,
        menus::MenuPostResponse,
        menus::FeedEntryResponse,
        menus::MenuHistoryEntryResponse,
        menus::PublishMenuBody,
        polls::PollResponse,
        polls::VoteResponse,
        polls::CreatePollBody,
        polls::VoteBody,
        dashboard::DashboardResponse,
        platform::PlatformStatsResponse,
        platform::OwnerResponse,
    )),
    tags(
        (name = "accounts", description = "Sign-in and the caller's own account"),
        (name = "messes", description = "Areas and mess profiles"),
        (name = "memberships", description = "Subscriptions to a mess"),
        (name = "attendance", description = "Per-meal attendance marks"),
        (name = "menus", description = "Published menus and the public feed"),
        (name = "polls", description = "Meal polls and voting"),
        (name = "dashboard", description = "Owner statistics"),
        (name = "admin", description = "Super-admin overview across messes"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
