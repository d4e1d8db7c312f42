//! Port for menu post persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{FeedEntry, MealType, MenuPost, MessId};

use super::StoreError;

/// Storage for menu posts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MenuPostRepository: Send + Sync {
    /// Persist a new post.
    async fn insert(&self, post: &MenuPost) -> Result<(), StoreError>;

    /// Posts of a mess with expiry after `now`, newest first.
    async fn list_live_for_mess(
        &self,
        mess: MessId,
        now: DateTime<Utc>,
    ) -> Result<Vec<MenuPost>, StoreError>;

    /// Live posts across all messes joined with mess and area names, newest
    /// first, at most `limit` rows.
    async fn list_live_feed(
        &self,
        meal: Option<MealType>,
        veg_only: bool,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<FeedEntry>, StoreError>;

    /// Every post of a mess, newest first.
    async fn list_for_mess(&self, mess: MessId) -> Result<Vec<MenuPost>, StoreError>;
}
