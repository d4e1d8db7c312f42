//! Reqwest-backed identity provider adapter.
//!
//! Sign-in uses the password grant of the token endpoint with the public
//! key. Password updates go through the admin users endpoint with the
//! service key, so the adapter never holds a user's session.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::dto::{PasswordGrantDto, PasswordUpdateDto, TokenResponseDto};
use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{Credentials, NewPassword, UserId};

/// API keys presented to the auth service.
#[derive(Clone)]
pub struct IdentityKeys {
    /// Public key sent as `apikey` on every request.
    pub public_key: String,
    /// Privileged key used for admin password updates.
    pub service_key: String,
}

/// Identity provider speaking the GoTrue REST dialect.
pub struct HttpIdentityProvider {
    client: Client,
    base_url: Url,
    keys: IdentityKeys,
}

impl HttpIdentityProvider {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, keys: IdentityKeys, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            keys,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, IdentityProviderError> {
        self.base_url
            .join(path)
            .map_err(|error| IdentityProviderError::transport(format!("invalid auth url: {error}")))
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn sign_in(&self, credentials: &Credentials) -> Result<UserId, IdentityProviderError> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");
        let response = self
            .client
            .post(url)
            .header("apikey", self.keys.public_key.as_str())
            .json(&PasswordGrantDto {
                email: credentials.email(),
                password: credentials.password(),
            })
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            debug!(status = status.as_u16(), "password grant refused");
            return Err(map_sign_in_status(status, body.as_ref()));
        }
        parse_user_id(body.as_ref())
    }

    async fn update_password(
        &self,
        user: UserId,
        password: &NewPassword,
    ) -> Result<(), IdentityProviderError> {
        let url = self.endpoint(&format!("auth/v1/admin/users/{user}"))?;
        let response = self
            .client
            .put(url)
            .header("apikey", self.keys.service_key.as_str())
            .bearer_auth(self.keys.service_key.as_str())
            .json(&PasswordUpdateDto {
                password: password.expose(),
            })
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        Err(map_status_error(status, body.as_ref()))
    }
}

fn parse_user_id(body: &[u8]) -> Result<UserId, IdentityProviderError> {
    let decoded: TokenResponseDto = serde_json::from_slice(body).map_err(|error| {
        IdentityProviderError::decode(format!("invalid token payload: {error}"))
    })?;
    Ok(UserId::from_uuid(decoded.user.id))
}

fn map_transport_error(error: reqwest::Error) -> IdentityProviderError {
    IdentityProviderError::transport(error.to_string())
}

fn map_sign_in_status(status: StatusCode, body: &[u8]) -> IdentityProviderError {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
            IdentityProviderError::InvalidCredentials
        }
        _ => map_status_error(status, body),
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> IdentityProviderError {
    if status.is_server_error() {
        return IdentityProviderError::transport(format!("status {}", status.as_u16()));
    }
    IdentityProviderError::rejected(status.as_u16(), body_preview(body))
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 120;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    compact.chars().take(PREVIEW_CHAR_LIMIT).collect()
}
