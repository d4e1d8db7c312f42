//! Driving port for poll mutations.

use async_trait::async_trait;

use crate::domain::{Actor, Error, Poll, PollDraft, PollId, PollSummary};

/// Outcome of a successful vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteReceipt {
    /// Poll voted in.
    pub poll_id: PollId,
    /// Option chosen.
    pub option_index: usize,
    /// Votes cast including this one.
    pub vote_count: u64,
}

/// Domain use-case port for creating, voting in and closing polls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PollCommand: Send + Sync {
    /// Open a poll.
    async fn create(&self, actor: &Actor, draft: PollDraft) -> Result<Poll, Error>;

    /// Cast the caller's single vote.
    async fn cast_vote(
        &self,
        actor: &Actor,
        poll: PollId,
        option_index: usize,
    ) -> Result<VoteReceipt, Error>;

    /// Close a poll and record its winner. Closing twice is harmless.
    async fn close(&self, actor: &Actor, poll: PollId) -> Result<PollSummary, Error>;
}
