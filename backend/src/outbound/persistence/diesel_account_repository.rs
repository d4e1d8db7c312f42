//! PostgreSQL-backed `AccountRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AccountRepository, StoreError};
use crate::domain::{Profile, Role, RoleAssignment, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error, to_count};
use super::models::{ProfileRow, UserRoleRow};
use super::pool::DbPool;
use super::schema::{profiles, user_roles};

/// Diesel-backed implementation of the account repository port.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn find_profile(&self, user: UserId) -> Result<Option<Profile>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = profiles::table
            .filter(profiles::id.eq(user.as_uuid()))
            .select(ProfileRow::as_select())
            .first::<ProfileRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Profile::from))
    }

    async fn find_role(&self, user: UserId) -> Result<Option<RoleAssignment>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = user_roles::table
            .filter(user_roles::user_id.eq(user.as_uuid()))
            .select(UserRoleRow::as_select())
            .first::<UserRoleRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(RoleAssignment::try_from).transpose()
    }

    async fn clear_temporary_password(&self, user: UserId) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(profiles::table.filter(profiles::id.eq(user.as_uuid())))
            .set(profiles::temp_password.eq(None::<String>))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_unassigned_owners(&self) -> Result<Vec<Profile>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ProfileRow> = profiles::table
            .inner_join(user_roles::table.on(user_roles::user_id.eq(profiles::id)))
            .filter(user_roles::role.eq(Role::Owner.as_str()))
            .filter(user_roles::mess_id.is_null())
            .order((profiles::name.asc(), profiles::id.asc()))
            .select(ProfileRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Profile::from).collect())
    }

    async fn count_with_role(&self, role: Role) -> Result<u64, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = user_roles::table
            .filter(user_roles::role.eq(role.as_str()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_count(count)
    }
}
