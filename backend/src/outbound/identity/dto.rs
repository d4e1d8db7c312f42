//! Wire shapes of the auth service's token and admin endpoints.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub(super) struct PasswordGrantDto<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct PasswordUpdateDto<'a> {
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct TokenResponseDto {
    pub user: AuthUserDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct AuthUserDto {
    pub id: Uuid,
}
