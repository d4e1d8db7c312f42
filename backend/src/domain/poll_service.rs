//! Poll domain service.
//!
//! A poll is closed once its stored status is closed or the clock passes its
//! deadline. Reads persist the winner of any poll that has lapsed but is still
//! stored as active, so the outcome survives later vote churn.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    MembershipRepository, PollCommand, PollQuery, PollRepository, StoreError, VoteReceipt,
};
use crate::domain::{
    Actor, Error, LocalCalendar, MessId, Poll, PollDraft, PollId, PollStatus, PollSummary, PollValidationError,
    PollVote, VoteId, compute_winner,
};

fn map_validation_error(error: PollValidationError) -> Error {
    Error::invalid_request(error.to_string())
        .with_details(json!({ "field": error.field(), "code": error.code() }))
}

fn map_vote_insert_error(error: StoreError) -> Error {
    match error {
        StoreError::Conflict { .. } => Error::already_voted("you have already voted in this poll"),
        other => other.into(),
    }
}

/// Poll service implementing the poll driving ports.
#[derive(Clone)]
pub struct PollService<P, M> {
    polls: Arc<P>,
    memberships: Arc<M>,
    clock: Arc<dyn Clock>,
    calendar: LocalCalendar,
}

impl<P, M> PollService<P, M> {
    /// Create a new service over the poll and membership repositories.
    pub fn new(polls: Arc<P>, memberships: Arc<M>, clock: Arc<dyn Clock>) -> Self {
        Self {
            polls,
            memberships,
            clock,
            calendar: LocalCalendar::default(),
        }
    }

    /// Judge "today" on `calendar` instead of the UTC day.
    #[must_use]
    pub fn with_calendar(mut self, calendar: LocalCalendar) -> Self {
        self.calendar = calendar;
        self
    }
}

impl<P, M> PollService<P, M>
where
    P: PollRepository,
    M: MembershipRepository,
{
    async fn load(&self, id: PollId) -> Result<Poll, Error> {
        self.polls
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("poll {id} not found")))
    }

    /// Store the closed status and winner unless already stored as closed.
    async fn settle(&self, mut poll: Poll) -> Result<Poll, Error> {
        if poll.status == PollStatus::Closed {
            return Ok(poll);
        }
        let votes = self.polls.list_votes(poll.id).await?;
        let winner = compute_winner(
            poll.options.len(),
            votes.iter().map(|vote| vote.option_index),
        );
        let changed = self.polls.close(poll.id, winner).await?;
        if changed {
            info!(poll_id = %poll.id, winner = ?winner, votes = votes.len(), "poll closed");
            poll.status = PollStatus::Closed;
            poll.winning_option = winner;
            return Ok(poll);
        }
        // Another request closed it first; report what was stored.
        self.load(poll.id).await
    }

    async fn summarize(
        &self,
        poll: Poll,
        viewer: &Actor,
        now: DateTime<Utc>,
    ) -> Result<PollSummary, Error> {
        let vote_count = self.polls.count_votes(poll.id).await?;
        let viewer_vote = self
            .polls
            .find_vote(poll.id, viewer.user_id())
            .await?
            .map(|vote| vote.option_index);
        let closed = poll.is_closed(now);
        Ok(PollSummary {
            poll,
            vote_count,
            closed,
            viewer_vote,
        })
    }

    async fn ensure_can_view(&self, actor: &Actor, mess: MessId) -> Result<(), Error> {
        if actor.manages(mess) {
            return Ok(());
        }
        let membership = self
            .memberships
            .find_latest_for_user(actor.user_id(), Some(mess))
            .await?;
        if membership.is_some() {
            Ok(())
        } else {
            Err(Error::forbidden("not a member of this mess"))
        }
    }
}

#[async_trait]
impl<P, M> PollCommand for PollService<P, M>
where
    P: PollRepository,
    M: MembershipRepository,
{
    async fn create(&self, actor: &Actor, draft: PollDraft) -> Result<Poll, Error> {
        actor.ensure_manages(draft.mess_id)?;
        let poll = draft
            .into_poll(PollId::random(), self.clock.utc())
            .map_err(map_validation_error)?;
        self.polls.insert(&poll).await?;
        info!(
            poll_id = %poll.id,
            mess_id = %poll.mess_id,
            options = poll.options.len(),
            deadline = %poll.deadline,
            "poll created"
        );
        Ok(poll)
    }

    async fn cast_vote(
        &self,
        actor: &Actor,
        poll: PollId,
        option_index: usize,
    ) -> Result<VoteReceipt, Error> {
        let now = self.clock.utc();
        let poll = self.load(poll).await?;
        if poll.is_closed(now) {
            return Err(Error::poll_closed("voting has closed for this poll"));
        }
        if !poll.has_option(option_index) {
            return Err(Error::invalid_request(format!(
                "option {option_index} does not exist"
            ))
            .with_details(json!({ "field": "optionIndex", "code": "out_of_range" })));
        }
        if self
            .polls
            .find_vote(poll.id, actor.user_id())
            .await?
            .is_some()
        {
            return Err(Error::already_voted("you have already voted in this poll"));
        }
        let today = self.calendar.today(now);
        let eligible = self
            .memberships
            .find_latest_for_user(actor.user_id(), Some(poll.mess_id))
            .await?
            .is_some_and(|membership| membership.status_on(today).is_active());
        if !eligible {
            return Err(Error::ineligible_voter(
                "an active membership is required to vote",
            ));
        }

        let vote = PollVote {
            id: VoteId::random(),
            poll_id: poll.id,
            user_id: actor.user_id(),
            option_index,
            created_at: now,
        };
        self.polls
            .insert_vote(&vote)
            .await
            .map_err(map_vote_insert_error)?;
        let vote_count = self.polls.count_votes(poll.id).await?;
        info!(poll_id = %poll.id, option_index, vote_count, "vote cast");
        Ok(VoteReceipt {
            poll_id: poll.id,
            option_index,
            vote_count,
        })
    }

    async fn close(&self, actor: &Actor, poll: PollId) -> Result<PollSummary, Error> {
        let poll = self.load(poll).await?;
        actor.ensure_manages(poll.mess_id)?;
        let settled = self.settle(poll).await?;
        self.summarize(settled, actor, self.clock.utc()).await
    }
}

#[async_trait]
impl<P, M> PollQuery for PollService<P, M>
where
    P: PollRepository,
    M: MembershipRepository,
{
    async fn list_for_mess(&self, actor: &Actor, mess: MessId) -> Result<Vec<PollSummary>, Error> {
        self.ensure_can_view(actor, mess).await?;
        let now = self.clock.utc();
        let mut polls = self.polls.list_for_mess(mess).await?;
        polls.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));

        let mut summaries = Vec::with_capacity(polls.len());
        for poll in polls {
            let poll = if poll.status == PollStatus::Active && poll.is_closed(now) {
                match self.settle(poll.clone()).await {
                    Ok(settled) => settled,
                    Err(error) => {
                        warn!(poll_id = %poll.id, %error, "failed to close lapsed poll");
                        poll
                    }
                }
            } else {
                poll
            };
            summaries.push(self.summarize(poll, actor, now).await?);
        }
        Ok(summaries)
    }
}

#[cfg(test)]
#[path = "poll_service_tests.rs"]
mod tests;
