//! Port for poll and vote persistence.

use async_trait::async_trait;

use crate::domain::{MessId, Poll, PollId, PollVote, UserId};

use super::StoreError;

/// Storage for polls and their votes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PollRepository: Send + Sync {
    /// Persist a new poll.
    async fn insert(&self, poll: &Poll) -> Result<(), StoreError>;

    /// Find a poll by id.
    async fn find_by_id(&self, id: PollId) -> Result<Option<Poll>, StoreError>;

    /// Polls of a mess, newest first.
    async fn list_for_mess(&self, mess: MessId) -> Result<Vec<Poll>, StoreError>;

    /// Mark a poll closed with its winner, only if it is still stored as
    /// active. Returns whether this call performed the transition.
    async fn close(&self, id: PollId, winning_option: Option<usize>) -> Result<bool, StoreError>;

    /// Vote cast by `user` in a poll, if any.
    async fn find_vote(&self, poll: PollId, user: UserId) -> Result<Option<PollVote>, StoreError>;

    /// Persist a vote.
    ///
    /// Fails with [`StoreError::Conflict`] when the user already voted.
    async fn insert_vote(&self, vote: &PollVote) -> Result<(), StoreError>;

    /// Every vote cast in a poll.
    async fn list_votes(&self, poll: PollId) -> Result<Vec<PollVote>, StoreError>;

    /// Number of votes cast in a poll.
    async fn count_votes(&self, poll: PollId) -> Result<u64, StoreError>;
}
