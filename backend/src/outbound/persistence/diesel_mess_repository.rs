//! PostgreSQL-backed `MessRepository` implementation using Diesel ORM.
//!
//! Creating a mess and linking its owner's role happen in one transaction;
//! the role update only matches an owner without a mess, and a miss rolls the
//! insert back.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{MessRepository, StoreError};
use crate::domain::{Area, AreaId, Mess, MessId, Role};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error, to_count};
use super::models::{AreaRow, MessRow};
use super::pool::DbPool;
use super::schema::{areas, messes, user_roles};

/// Diesel-backed implementation of the mess repository port.
#[derive(Clone)]
pub struct DieselMessRepository {
    pool: DbPool,
}

impl DieselMessRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn ensure_updated(updated: usize, id: MessId) -> Result<(), StoreError> {
    if updated == 0 {
        Err(StoreError::query(format!("mess {id} vanished during update")))
    } else {
        Ok(())
    }
}

#[async_trait]
impl MessRepository for DieselMessRepository {
    async fn list_areas(&self) -> Result<Vec<Area>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AreaRow> = areas::table
            .filter(areas::is_active.eq(true))
            .order(areas::name.asc())
            .select(AreaRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Area::from).collect())
    }

    async fn list_messes(&self, area: Option<AreaId>) -> Result<Vec<Mess>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = messes::table
            .filter(messes::is_active.eq(true))
            .into_boxed();
        if let Some(area) = area {
            query = query.filter(messes::area_id.eq(*area.as_uuid()));
        }
        let rows: Vec<MessRow> = query
            .order(messes::name.asc())
            .select(MessRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Mess::from).collect())
    }

    async fn find_by_id(&self, id: MessId) -> Result<Option<Mess>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = messes::table
            .filter(messes::id.eq(id.as_uuid()))
            .select(MessRow::as_select())
            .first::<MessRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Mess::from))
    }

    async fn insert(&self, mess: &Mess) -> Result<(), StoreError> {
        let row = MessRow::from(mess);
        let mess_id = row.id;
        let owner = row.owner_id;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction::<_, DieselError, _>(|conn| {
            async move {
                diesel::insert_into(messes::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                let Some(owner) = owner else {
                    return Ok(());
                };
                let linked = diesel::update(
                    user_roles::table
                        .filter(user_roles::user_id.eq(owner))
                        .filter(user_roles::role.eq(Role::Owner.as_str()))
                        .filter(user_roles::mess_id.is_null()),
                )
                .set(user_roles::mess_id.eq(mess_id))
                .execute(conn)
                .await?;
                if linked == 0 {
                    return Err(DieselError::RollbackTransaction);
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|error| match error {
            DieselError::RollbackTransaction => {
                StoreError::conflict(format!("owner {owner:?} is not an unassigned owner"))
            }
            other => map_diesel_error(other),
        })
    }

    async fn count_messes(&self) -> Result<u64, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = messes::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_count(count)
    }

    async fn update_profile(&self, mess: &Mess) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = MessRow::from(mess);
        let updated = diesel::update(messes::table.filter(messes::id.eq(mess.id.as_uuid())))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        ensure_updated(updated, mess.id)
    }

    async fn set_active(&self, id: MessId, active: bool) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(messes::table.filter(messes::id.eq(id.as_uuid())))
            .set(messes::is_active.eq(active))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        ensure_updated(updated, id)
    }
}
