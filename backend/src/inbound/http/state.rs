//! Shared HTTP adapter state.
//!
//! Handlers receive this state via `actix_web::web::Data` so they depend on
//! driving ports only and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, AccountQuery, AttendanceCommand, AttendanceQuery, DashboardQuery,
    MembershipCommand, MembershipQuery, MenuCommand, MenuQuery, MessDirectory, PlatformQuery,
    PollCommand, PollQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub accounts_query: Arc<dyn AccountQuery>,
    pub messes: Arc<dyn MessDirectory>,
    pub memberships: Arc<dyn MembershipCommand>,
    pub memberships_query: Arc<dyn MembershipQuery>,
    pub attendance: Arc<dyn AttendanceCommand>,
    pub attendance_query: Arc<dyn AttendanceQuery>,
    pub menus: Arc<dyn MenuCommand>,
    pub menus_query: Arc<dyn MenuQuery>,
    pub polls: Arc<dyn PollCommand>,
    pub polls_query: Arc<dyn PollQuery>,
    pub dashboard: Arc<dyn DashboardQuery>,
    pub platform: Arc<dyn PlatformQuery>,
}
