//! Driving port for account mutations.

use async_trait::async_trait;

use crate::domain::{Actor, Credentials, Error, NewPassword, UserId};

/// Domain use-case port for signing in and changing passwords.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Verify credentials with the identity provider.
    async fn sign_in(&self, credentials: Credentials) -> Result<UserId, Error>;

    /// Replace the caller's password and clear the temporary-password marker.
    async fn change_password(&self, actor: &Actor, password: NewPassword) -> Result<(), Error>;
}
