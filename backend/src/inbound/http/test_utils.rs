//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::{App, test as actix_test, web};
use serde_json::json;

use crate::domain::ports::{
    MockAccountCommand, MockAccountQuery, MockAttendanceCommand, MockAttendanceQuery,
    MockDashboardQuery, MockMembershipCommand, MockMembershipQuery, MockMenuCommand,
    MockMenuQuery, MockMessDirectory, MockPlatformQuery, MockPollCommand, MockPollQuery,
};
use crate::domain::{AccountView, Actor, MessId, Profile, Role, UserId};

use super::state::HttpState;

/// Build a session middleware configured for tests.
///
/// Generates a fresh key per invocation, names the cookie `session` and
/// disables the `Secure` flag for plain HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// One automock per driving port; unset expectations panic when called.
#[derive(Default)]
pub struct TestPorts {
    pub accounts: MockAccountCommand,
    pub accounts_query: MockAccountQuery,
    pub messes: MockMessDirectory,
    pub memberships: MockMembershipCommand,
    pub memberships_query: MockMembershipQuery,
    pub attendance: MockAttendanceCommand,
    pub attendance_query: MockAttendanceQuery,
    pub menus: MockMenuCommand,
    pub menus_query: MockMenuQuery,
    pub polls: MockPollCommand,
    pub polls_query: MockPollQuery,
    pub dashboard: MockDashboardQuery,
    pub platform: MockPlatformQuery,
}

impl TestPorts {
    /// Ports whose sign-in and actor resolution always yield `actor`.
    pub fn signed_in_as(actor: Actor) -> Self {
        let mut ports = Self::default();
        let user = actor.user_id();
        ports.accounts.expect_sign_in().returning(move |_| Ok(user));
        ports
            .accounts_query
            .expect_resolve_actor()
            .returning(move |_| Ok(actor));
        ports
            .accounts_query
            .expect_current_account()
            .returning(|actor| Ok(account_view(actor)));
        ports
    }

    pub fn into_state(self) -> HttpState {
        HttpState {
            accounts: Arc::new(self.accounts),
            accounts_query: Arc::new(self.accounts_query),
            messes: Arc::new(self.messes),
            memberships: Arc::new(self.memberships),
            memberships_query: Arc::new(self.memberships_query),
            attendance: Arc::new(self.attendance),
            attendance_query: Arc::new(self.attendance_query),
            menus: Arc::new(self.menus),
            menus_query: Arc::new(self.menus_query),
            polls: Arc::new(self.polls),
            polls_query: Arc::new(self.polls_query),
            dashboard: Arc::new(self.dashboard),
            platform: Arc::new(self.platform),
        }
    }
}

pub fn owner_of(mess: MessId) -> Actor {
    Actor::new(UserId::random(), Role::Owner, Some(mess))
}

pub fn super_admin() -> Actor {
    Actor::new(UserId::random(), Role::SuperAdmin, None)
}

pub fn member() -> Actor {
    Actor::new(UserId::random(), Role::Member, None)
}

pub fn account_view(actor: &Actor) -> AccountView {
    AccountView {
        profile: Profile {
            id: actor.user_id(),
            name: "Asha Rao".into(),
            email: "asha@example.com".into(),
            phone: None,
            has_temporary_password: false,
        },
        role: actor.role(),
        mess_id: actor.mess_id(),
    }
}

/// Application with every API route mounted under `/api/v1`.
pub fn test_app(
    ports: TestPorts,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(ports.into_state()))
        .wrap(test_session_middleware())
        .service(web::scope("/api/v1").configure(super::configure))
}

/// Sign in through `POST /api/v1/login` and return the session cookie.
pub async fn login(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
) -> Cookie<'static> {
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "email": "asha@example.com", "password": "secret1" }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success(), "login should succeed");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}
