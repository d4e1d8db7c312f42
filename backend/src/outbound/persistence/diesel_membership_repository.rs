//! PostgreSQL-backed `MembershipRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{MembershipRepository, StoreError};
use crate::domain::{Membership, MembershipId, MessId, StoredMembershipStatus, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::MembershipRow;
use super::pool::DbPool;
use super::schema::memberships;

/// Diesel-backed implementation of the membership repository port.
#[derive(Clone)]
pub struct DieselMembershipRepository {
    pool: DbPool,
}

impl DieselMembershipRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn rows_to_memberships(rows: Vec<MembershipRow>) -> Result<Vec<Membership>, StoreError> {
    rows.into_iter().map(Membership::try_from).collect()
}

#[async_trait]
impl MembershipRepository for DieselMembershipRepository {
    async fn insert(&self, membership: &Membership) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(memberships::table)
            .values(MembershipRow::from(membership))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: MembershipId) -> Result<Option<Membership>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = memberships::table
            .filter(memberships::id.eq(id.as_uuid()))
            .select(MembershipRow::as_select())
            .first::<MembershipRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Membership::try_from).transpose()
    }

    async fn find_latest_for_user(
        &self,
        user: UserId,
        mess: Option<MessId>,
    ) -> Result<Option<Membership>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = memberships::table
            .filter(memberships::user_id.eq(user.as_uuid()))
            .into_boxed();
        if let Some(mess) = mess {
            query = query.filter(memberships::mess_id.eq(*mess.as_uuid()));
        }
        let row = query
            .order((memberships::start_date.desc(), memberships::created_at.desc()))
            .select(MembershipRow::as_select())
            .first::<MembershipRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Membership::try_from).transpose()
    }

    async fn list_for_mess(&self, mess: MessId) -> Result<Vec<Membership>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<MembershipRow> = memberships::table
            .filter(memberships::mess_id.eq(mess.as_uuid()))
            .order((memberships::start_date.desc(), memberships::id.asc()))
            .select(MembershipRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_memberships(rows)
    }

    async fn list_ending_between(
        &self,
        mess: MessId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Membership>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<MembershipRow> = memberships::table
            .filter(memberships::mess_id.eq(mess.as_uuid()))
            .filter(memberships::end_date.between(from, to))
            .filter(memberships::status.ne(StoredMembershipStatus::Expired.as_str()))
            .order((memberships::end_date.asc(), memberships::id.asc()))
            .select(MembershipRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_memberships(rows)
    }

    async fn list_ending_from(&self, from: NaiveDate) -> Result<Vec<Membership>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<MembershipRow> = memberships::table
            .filter(memberships::end_date.ge(from))
            .filter(memberships::status.ne(StoredMembershipStatus::Expired.as_str()))
            .select(MembershipRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_memberships(rows)
    }

    async fn update_term(
        &self,
        id: MembershipId,
        end_date: NaiveDate,
        status: StoredMembershipStatus,
    ) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(memberships::table.filter(memberships::id.eq(id.as_uuid())))
            .set((
                memberships::end_date.eq(end_date),
                memberships::status.eq(status.as_str()),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(StoreError::query(format!("membership {id} vanished during update")));
        }
        Ok(())
    }
}
