//! Menu domain service.
//!
//! Posts are immutable once published; liveness is purely a function of the
//! expiry time and the clock.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{MenuCommand, MenuPostRepository, MenuQuery};
use crate::domain::{
    Actor, Error, FEED_LIMIT, FeedEntry, FeedFilter, MenuDraft, MenuPost, MenuPostId,
    MenuPostView, MenuValidationError, MessId,
};

fn map_validation_error(error: MenuValidationError) -> Error {
    Error::invalid_request(error.to_string())
        .with_details(json!({ "field": error.field(), "code": error.code() }))
}

fn newest_first(posts: &mut [MenuPost]) {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
}

/// Menu service implementing the menu driving ports.
#[derive(Clone)]
pub struct MenuService<R> {
    posts: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> MenuService<R> {
    /// Create a new service over the menu post repository.
    pub fn new(posts: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { posts, clock }
    }
}

#[async_trait]
impl<R> MenuCommand for MenuService<R>
where
    R: MenuPostRepository,
{
    async fn publish(&self, actor: &Actor, draft: MenuDraft) -> Result<MenuPost, Error> {
        actor.ensure_manages(draft.mess_id)?;
        let post = draft
            .into_post(MenuPostId::random(), self.clock.utc())
            .map_err(map_validation_error)?;
        self.posts.insert(&post).await?;
        info!(
            post_id = %post.id,
            mess_id = %post.mess_id,
            meal = %post.meal_type,
            expiry = %post.expiry_time,
            "menu published"
        );
        Ok(post)
    }
}

#[async_trait]
impl<R> MenuQuery for MenuService<R>
where
    R: MenuPostRepository,
{
    async fn list_live(&self, mess: MessId) -> Result<Vec<MenuPost>, Error> {
        let now = self.clock.utc();
        let mut posts: Vec<MenuPost> = self
            .posts
            .list_live_for_mess(mess, now)
            .await?
            .into_iter()
            .filter(|post| post.is_live(now))
            .collect();
        newest_first(&mut posts);
        Ok(posts)
    }

    async fn list_live_feed(&self, filter: FeedFilter) -> Result<Vec<FeedEntry>, Error> {
        let now = self.clock.utc();
        let entries = self
            .posts
            .list_live_feed(filter.meal_type, filter.veg_only, now, FEED_LIMIT)
            .await?;
        let area = filter
            .area
            .as_deref()
            .map(str::trim)
            .filter(|area| !area.is_empty());
        Ok(entries
            .into_iter()
            .filter(|entry| entry.post.is_live(now))
            .filter(|entry| match area {
                Some(wanted) => entry.area_name.as_deref() == Some(wanted),
                None => true,
            })
            .collect())
    }

    async fn history(&self, actor: &Actor, mess: MessId) -> Result<Vec<MenuPostView>, Error> {
        actor.ensure_manages(mess)?;
        let now = self.clock.utc();
        let mut posts = self.posts.list_for_mess(mess).await?;
        newest_first(&mut posts);
        Ok(posts
            .into_iter()
            .map(|post| {
                let live = post.is_live(now);
                MenuPostView { post, live }
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "menu_service_tests.rs"]
mod tests;
