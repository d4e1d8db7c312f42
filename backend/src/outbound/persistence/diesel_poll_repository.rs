//! PostgreSQL-backed `PollRepository` implementation using Diesel ORM.
//!
//! Closing is a conditional update on `status = 'active'`, so only the first
//! of several concurrent closes writes a winner. Duplicate votes are rejected
//! by the `(poll_id, user_id)` unique constraint.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PollRepository, StoreError};
use crate::domain::{MessId, Poll, PollId, PollStatus, PollVote, UserId};

use super::diesel_error_mapping::{from_index, map_diesel_error, map_pool_error, to_count};
use super::models::{PollRow, PollVoteRow};
use super::pool::DbPool;
use super::schema::{poll_votes, polls};

/// Diesel-backed implementation of the poll repository port.
#[derive(Clone)]
pub struct DieselPollRepository {
    pool: DbPool,
}

impl DieselPollRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PollRepository for DieselPollRepository {
    async fn insert(&self, poll: &Poll) -> Result<(), StoreError> {
        let row = PollRow::try_from(poll)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(polls::table)
            .values(row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: PollId) -> Result<Option<Poll>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = polls::table
            .filter(polls::id.eq(id.as_uuid()))
            .select(PollRow::as_select())
            .first::<PollRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Poll::try_from).transpose()
    }

    async fn list_for_mess(&self, mess: MessId) -> Result<Vec<Poll>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PollRow> = polls::table
            .filter(polls::mess_id.eq(mess.as_uuid()))
            .order((polls::created_at.desc(), polls::id.asc()))
            .select(PollRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(Poll::try_from).collect()
    }

    async fn close(&self, id: PollId, winning_option: Option<usize>) -> Result<bool, StoreError> {
        let winner = winning_option
            .map(|index| from_index(index, "winning_option"))
            .transpose()?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(
            polls::table
                .filter(polls::id.eq(id.as_uuid()))
                .filter(polls::status.eq(PollStatus::Active.as_str())),
        )
        .set((
            polls::status.eq(PollStatus::Closed.as_str()),
            polls::winning_option.eq(winner),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn find_vote(&self, poll: PollId, user: UserId) -> Result<Option<PollVote>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = poll_votes::table
            .filter(poll_votes::poll_id.eq(poll.as_uuid()))
            .filter(poll_votes::user_id.eq(user.as_uuid()))
            .select(PollVoteRow::as_select())
            .first::<PollVoteRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(PollVote::try_from).transpose()
    }

    async fn insert_vote(&self, vote: &PollVote) -> Result<(), StoreError> {
        let row = PollVoteRow::try_from(vote)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(poll_votes::table)
            .values(row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_votes(&self, poll: PollId) -> Result<Vec<PollVote>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PollVoteRow> = poll_votes::table
            .filter(poll_votes::poll_id.eq(poll.as_uuid()))
            .order(poll_votes::created_at.asc())
            .select(PollVoteRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(PollVote::try_from).collect()
    }

    async fn count_votes(&self, poll: PollId) -> Result<u64, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = poll_votes::table
            .filter(poll_votes::poll_id.eq(poll.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_count(count)
    }
}
