//! Driving port for menu reads.

use async_trait::async_trait;

use crate::domain::{Actor, Error, FeedEntry, FeedFilter, MenuPost, MenuPostView, MessId};

/// Domain use-case port for live menus, the public feed and history.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MenuQuery: Send + Sync {
    /// Live posts of one mess, newest first.
    async fn list_live(&self, mess: MessId) -> Result<Vec<MenuPost>, Error>;

    /// Live posts across messes, newest first, filtered.
    async fn list_live_feed(&self, filter: FeedFilter) -> Result<Vec<FeedEntry>, Error>;

    /// Every post of a mess with its liveness, newest first.
    async fn history(&self, actor: &Actor, mess: MessId) -> Result<Vec<MenuPostView>, Error>;
}
