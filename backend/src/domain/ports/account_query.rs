//! Driving port for account reads.

use async_trait::async_trait;

use crate::domain::{AccountView, Actor, Error, UserId};

/// Domain use-case port for resolving callers and reading their account.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountQuery: Send + Sync {
    /// Build the [`Actor`] for an authenticated account.
    async fn resolve_actor(&self, user: UserId) -> Result<Actor, Error>;

    /// Profile and role of the caller.
    async fn current_account(&self, actor: &Actor) -> Result<AccountView, Error>;
}
