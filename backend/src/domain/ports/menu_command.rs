//! Driving port for menu publication.

use async_trait::async_trait;

use crate::domain::{Actor, Error, MenuDraft, MenuPost};

/// Domain use-case port for publishing menus.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MenuCommand: Send + Sync {
    /// Validate and publish a menu post visible from now until its expiry.
    async fn publish(&self, actor: &Actor, draft: MenuDraft) -> Result<MenuPost, Error>;
}
