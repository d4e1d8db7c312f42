//! HTTP inbound adapter exposing REST endpoints.
//!
//! Every API route is registered by [`configure`] relative to the `/api/v1`
//! scope; the health checks are mounted at the application root.

pub mod accounts;
pub mod attendance;
pub(crate) mod auth;
pub mod dashboard;
pub mod error;
pub mod health;
pub mod memberships;
pub mod menus;
pub mod messes;
pub mod platform;
pub mod polls;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every API handler on `cfg`.
///
/// # Examples
/// ```no_run
/// use actix_web::{App, web};
///
/// let app = App::new().service(web::scope("/api/v1").configure(mess_backend::inbound::http::configure));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(accounts::login)
        .service(accounts::logout)
        .service(accounts::me)
        .service(accounts::change_password)
        .service(accounts::my_membership)
        .service(messes::list_areas)
        .service(messes::list_messes)
        .service(messes::create_mess)
        .service(memberships::list_expiring_memberships)
        .service(memberships::list_memberships)
        .service(memberships::create_membership)
        .service(memberships::renew_membership)
        .service(attendance::attendance_history)
        .service(attendance::toggle_attendance)
        .service(attendance::mark_attendance)
        .service(attendance::mess_attendance)
        .service(menus::menu_history)
        .service(menus::list_menu_posts)
        .service(menus::publish_menu_post)
        .service(menus::feed)
        .service(polls::list_polls)
        .service(polls::create_poll)
        .service(polls::cast_vote)
        .service(polls::close_poll)
        .service(dashboard::dashboard)
        .service(platform::platform_stats)
        .service(platform::unassigned_owners)
        .service(messes::get_mess)
        .service(messes::update_mess)
        .service(messes::set_mess_active);
}
