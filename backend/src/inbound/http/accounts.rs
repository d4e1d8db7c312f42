//! Account API handlers.
//!
//! ```text
//! POST /api/v1/login {"email":"owner@example.com","password":"secret"}
//! POST /api/v1/logout
//! GET  /api/v1/me
//! PUT  /api/v1/me/password {"password":"new-secret"}
//! GET  /api/v1/me/membership?messId=...
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{AccountView, Credentials, CredentialsValidationError, Error, NewPassword};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::require_actor;
use crate::inbound::http::memberships::MembershipResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `PUT /api/v1/me/password`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub password: String,
}

/// The signed-in account.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// `super_admin`, `owner` or `member`.
    pub role: String,
    pub mess_id: Option<String>,
    /// Set while the account still uses the password it was issued with.
    pub must_change_password: bool,
}

impl From<AccountView> for AccountResponse {
    fn from(view: AccountView) -> Self {
        Self {
            id: view.profile.id.to_string(),
            name: view.profile.name,
            email: view.profile.email,
            phone: view.profile.phone,
            role: view.role.as_str().to_owned(),
            mess_id: view.mess_id.map(|id| id.to_string()),
            must_change_password: view.profile.has_temporary_password,
        }
    }
}

/// Query for `GET /api/v1/me/membership`.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct CurrentMembershipQuery {
    /// Restrict to one mess.
    pub mess_id: Option<String>,
}

fn map_credentials_error(error: CredentialsValidationError) -> Error {
    let (field, code) = match error {
        CredentialsValidationError::EmptyEmail => ("email", "empty_email"),
        CredentialsValidationError::EmptyPassword => ("password", "empty_password"),
        CredentialsValidationError::PasswordTooShort => ("password", "password_too_short"),
    };
    Error::invalid_request(error.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Sign in with email and password and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AccountResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 403, description = "Account has no role", body = Error),
        (status = 503, description = "Identity provider unavailable", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<AccountResponse>> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials = Credentials::new(&email, &password).map_err(map_credentials_error)?;
    let user = state.accounts.sign_in(credentials).await?;
    let actor = state.accounts_query.resolve_actor(user).await?;
    let account = state.accounts_query.current_account(&actor).await?;
    session.persist_user(user)?;
    Ok(web::Json(AccountResponse::from(account)))
}

/// End the session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Signed out")),
    tags = ["accounts"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

/// The signed-in account with its role.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Current account", body = AccountResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Profile missing", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "currentAccount"
)]
#[get("/me")]
pub async fn me(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<AccountResponse>> {
    let actor = require_actor(&state, &session).await?;
    let account = state.accounts_query.current_account(&actor).await?;
    Ok(web::Json(AccountResponse::from(account)))
}

/// Replace the caller's password.
#[utoipa::path(
    put,
    path = "/api/v1/me/password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Password too short", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "changePassword"
)]
#[put("/me/password")]
pub async fn change_password(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ChangePasswordRequest>,
) -> ApiResult<HttpResponse> {
    let actor = require_actor(&state, &session).await?;
    let password = NewPassword::new(payload.into_inner().password).map_err(map_credentials_error)?;
    state.accounts.change_password(&actor, password).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// The caller's latest membership with its derived status.
#[utoipa::path(
    get,
    path = "/api/v1/me/membership",
    params(CurrentMembershipQuery),
    responses(
        (status = 200, description = "Latest membership", body = MembershipResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No membership", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "currentMembership"
)]
#[get("/me/membership")]
pub async fn my_membership(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<CurrentMembershipQuery>,
) -> ApiResult<web::Json<MembershipResponse>> {
    let actor = require_actor(&state, &session).await?;
    let mess = query
        .mess_id
        .as_deref()
        .map(|raw| parse_id(raw, FieldName::new("messId")))
        .transpose()?;
    let view = state.memberships_query.current_for_user(&actor, mess).await?;
    Ok(web::Json(MembershipResponse::from(view)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::inbound::http::test_utils::{TestPorts, login, member, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::Value;

    #[rstest]
    #[case("  ", "secret1", "email", "empty_email")]
    #[case("asha@example.com", "", "password", "empty_password")]
    #[actix_web::test]
    async fn login_rejects_blank_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let app = actix_test::init_service(test_app(TestPorts::default())).await;
        let request = actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(LoginRequest {
                email: email.into(),
                password: password.into(),
            })
            .to_request();

        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["details"]["field"], field);
        assert_eq!(body["details"]["code"], code);
    }

    #[actix_web::test]
    async fn login_maps_rejected_credentials_to_401() {
        let mut ports = TestPorts::default();
        ports
            .accounts
            .expect_sign_in()
            .times(1)
            .return_once(|_| Err(Error::unauthorized("invalid email or password")));
        let app = actix_test::init_service(test_app(ports)).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(LoginRequest {
                email: "asha@example.com".into(),
                password: "wrong-password".into(),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn me_returns_role_after_login() {
        let actor = member();
        let app = actix_test::init_service(test_app(TestPorts::signed_in_as(actor))).await;
        let cookie = login(&app).await;

        let request = actix_test::TestRequest::get()
            .uri("/api/v1/me")
            .cookie(cookie)
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(body["role"], "member");
        assert_eq!(body["id"], actor.user_id().to_string());
        assert_eq!(body["mustChangePassword"], false);
    }

    #[actix_web::test]
    async fn me_without_session_is_unauthorised() {
        let app = actix_test::init_service(test_app(TestPorts::default())).await;
        let request = actix_test::TestRequest::get().uri("/api/v1/me").to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn short_password_is_rejected_before_the_provider() {
        let app = actix_test::init_service(test_app(TestPorts::signed_in_as(member()))).await;
        let cookie = login(&app).await;

        let request = actix_test::TestRequest::put()
            .uri("/api/v1/me/password")
            .cookie(cookie)
            .set_json(ChangePasswordRequest {
                password: "abc".into(),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["details"]["code"], "password_too_short");
    }

    #[actix_web::test]
    async fn change_password_delegates_to_port() {
        let mut ports = TestPorts::signed_in_as(member());
        ports
            .accounts
            .expect_change_password()
            .withf(|_, password| password.expose() == "brand-new")
            .times(1)
            .return_once(|_, _| Ok(()));
        let app = actix_test::init_service(test_app(ports)).await;
        let cookie = login(&app).await;

        let request = actix_test::TestRequest::put()
            .uri("/api/v1/me/password")
            .cookie(cookie)
            .set_json(ChangePasswordRequest {
                password: "brand-new".into(),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn missing_membership_is_not_found() {
        let mut ports = TestPorts::signed_in_as(member());
        ports
            .memberships_query
            .expect_current_for_user()
            .withf(|_, mess| mess.is_none())
            .return_once(|_, _| Err(Error::not_found("no membership found")));
        let app = actix_test::init_service(test_app(ports)).await;
        let cookie = login(&app).await;

        let request = actix_test::TestRequest::get()
            .uri("/api/v1/me/membership")
            .cookie(cookie)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["code"], serde_json::to_value(ErrorCode::NotFound).expect("code"));
    }

    #[actix_web::test]
    async fn logout_clears_session() {
        let app = actix_test::init_service(test_app(TestPorts::signed_in_as(member()))).await;
        let cookie = login(&app).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/logout")
            .cookie(cookie)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let cleared = response
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("removal cookie");
        assert_eq!(cleared.value(), "");
    }
}
