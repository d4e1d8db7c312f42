//! PostgreSQL-backed `MenuPostRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{MenuPostRepository, StoreError};
use crate::domain::{FeedEntry, MealType, MenuPost, MessId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::MenuPostRow;
use super::pool::DbPool;
use super::schema::{areas, menu_posts, messes};

/// Diesel-backed implementation of the menu post repository port.
#[derive(Clone)]
pub struct DieselMenuPostRepository {
    pool: DbPool,
}

impl DieselMenuPostRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn rows_to_posts(rows: Vec<MenuPostRow>) -> Result<Vec<MenuPost>, StoreError> {
    rows.into_iter().map(MenuPost::try_from).collect()
}

#[async_trait]
impl MenuPostRepository for DieselMenuPostRepository {
    async fn insert(&self, post: &MenuPost) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(menu_posts::table)
            .values(MenuPostRow::from(post))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_live_for_mess(
        &self,
        mess: MessId,
        now: DateTime<Utc>,
    ) -> Result<Vec<MenuPost>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<MenuPostRow> = menu_posts::table
            .filter(menu_posts::mess_id.eq(mess.as_uuid()))
            .filter(menu_posts::expiry_time.gt(now))
            .order(menu_posts::created_at.desc())
            .select(MenuPostRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_posts(rows)
    }

    async fn list_live_feed(
        &self,
        meal: Option<MealType>,
        veg_only: bool,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<FeedEntry>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = menu_posts::table
            .inner_join(messes::table.left_join(areas::table))
            .filter(menu_posts::expiry_time.gt(now))
            .filter(messes::is_active.eq(true))
            .into_boxed();
        if let Some(meal) = meal {
            query = query.filter(menu_posts::meal_type.eq(meal.as_str()));
        }
        if veg_only {
            query = query.filter(menu_posts::is_veg.eq(true));
        }
        let rows: Vec<(MenuPostRow, String, Option<String>)> = query
            .order(menu_posts::created_at.desc())
            .limit(limit)
            .select((
                MenuPostRow::as_select(),
                messes::name,
                areas::name.nullable(),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(row, mess_name, area_name)| {
                Ok(FeedEntry {
                    post: MenuPost::try_from(row)?,
                    mess_name,
                    area_name,
                })
            })
            .collect()
    }

    async fn list_for_mess(&self, mess: MessId) -> Result<Vec<MenuPost>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<MenuPostRow> = menu_posts::table
            .filter(menu_posts::mess_id.eq(mess.as_uuid()))
            .order(menu_posts::created_at.desc())
            .select(MenuPostRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_posts(rows)
    }
}
