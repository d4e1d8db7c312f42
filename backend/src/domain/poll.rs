//! Single-choice polls with a voting deadline.

use chrono::{DateTime, TimeDelta, Utc};

use super::{MealType, MessId, PollId, UserId, VoteId};

/// Fewest options a poll may offer.
pub const MIN_POLL_OPTIONS: usize = 2;
/// Most options a poll may offer.
pub const MAX_POLL_OPTIONS: usize = 5;
/// Voting window applied when the owner does not choose one.
pub const DEFAULT_POLL_DEADLINE_HOURS: i64 = 24;

vocabulary!(
    /// Status persisted alongside the poll.
    PollStatus, "poll status" {
        /// Accepting votes until the deadline.
        Active => "active",
        /// Closed with the winner recorded.
        Closed => "closed",
    }
);

/// A poll published by a mess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poll {
    /// Record identifier.
    pub id: PollId,
    /// Publishing mess.
    pub mess_id: MessId,
    /// Meal the poll is about.
    pub target_meal: MealType,
    /// Question.
    pub title: String,
    /// Choices, indexed from zero.
    pub options: Vec<String>,
    /// Instant voting ends.
    pub deadline: DateTime<Utc>,
    /// Cached status; see [`Poll::is_closed`].
    pub status: PollStatus,
    /// Winning option once closed.
    pub winning_option: Option<usize>,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
}

impl Poll {
    /// Whether the poll no longer accepts votes at `now`.
    pub fn is_closed(&self, now: DateTime<Utc>) -> bool {
        self.status == PollStatus::Closed || now >= self.deadline
    }

    /// Whether `index` names one of the options.
    pub fn has_option(&self, index: usize) -> bool {
        index < self.options.len()
    }
}

/// One user's choice in a poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollVote {
    /// Record identifier.
    pub id: VoteId,
    /// Poll voted in.
    pub poll_id: PollId,
    /// Voter.
    pub user_id: UserId,
    /// Chosen option.
    pub option_index: usize,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
}

/// Tally `votes` and pick the option with the strictly highest count.
///
/// Ties go to the lowest option index. Without any vote there is no winner.
/// Votes naming an option the poll does not offer are ignored.
///
/// # Examples
/// ```
/// use mess_backend::domain::compute_winner;
///
/// assert_eq!(compute_winner(3, [0, 0, 1]), Some(0));
/// assert_eq!(compute_winner(3, [2, 1]), Some(1));
/// assert_eq!(compute_winner(3, Vec::new()), None);
/// ```
pub fn compute_winner(option_count: usize, votes: impl IntoIterator<Item = usize>) -> Option<usize> {
    let mut tally = vec![0_u64; option_count];
    for index in votes {
        if let Some(count) = tally.get_mut(index) {
            *count += 1;
        }
    }
    let mut winner: Option<(usize, u64)> = None;
    for (index, count) in tally.into_iter().enumerate() {
        if count == 0 {
            continue;
        }
        match winner {
            Some((_, best)) if best >= count => {}
            _ => winner = Some((index, count)),
        }
    }
    winner.map(|(index, _)| index)
}

/// Validation failures raised by [`PollDraft::into_poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PollValidationError {
    /// Title empty once trimmed.
    #[error("title must not be blank")]
    BlankTitle,
    /// Fewer than two or more than five non-blank options.
    #[error("a poll needs between 2 and 5 options")]
    OptionCount,
    /// Voting window not positive.
    #[error("deadlineHours must be positive")]
    NonPositiveDeadline,
}

impl PollValidationError {
    /// Request field the failure refers to.
    pub const fn field(self) -> &'static str {
        match self {
            Self::BlankTitle => "title",
            Self::OptionCount => "options",
            Self::NonPositiveDeadline => "deadlineHours",
        }
    }

    /// Machine-readable failure code.
    pub const fn code(self) -> &'static str {
        match self {
            Self::BlankTitle => "blank_title",
            Self::OptionCount => "option_count",
            Self::NonPositiveDeadline => "non_positive_deadline",
        }
    }
}

/// Owner input for a new poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollDraft {
    /// Publishing mess.
    pub mess_id: MessId,
    /// Meal the poll is about.
    pub target_meal: MealType,
    /// Question.
    pub title: String,
    /// Choices; blank entries are dropped.
    pub options: Vec<String>,
    /// Hours until voting closes.
    pub deadline_hours: i64,
}

impl PollDraft {
    /// Validate the draft and open the poll at `now`.
    pub fn into_poll(self, id: PollId, now: DateTime<Utc>) -> Result<Poll, PollValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(PollValidationError::BlankTitle);
        }
        let options: Vec<String> = self
            .options
            .iter()
            .map(|option| option.trim())
            .filter(|option| !option.is_empty())
            .map(str::to_owned)
            .collect();
        if !(MIN_POLL_OPTIONS..=MAX_POLL_OPTIONS).contains(&options.len()) {
            return Err(PollValidationError::OptionCount);
        }
        if self.deadline_hours <= 0 {
            return Err(PollValidationError::NonPositiveDeadline);
        }
        let deadline = TimeDelta::try_hours(self.deadline_hours)
            .and_then(|window| now.checked_add_signed(window))
            .ok_or(PollValidationError::NonPositiveDeadline)?;

        Ok(Poll {
            id,
            mess_id: self.mess_id,
            target_meal: self.target_meal,
            title: title.to_owned(),
            options,
            deadline,
            status: PollStatus::Active,
            winning_option: None,
            created_at: now,
        })
    }
}

/// A poll as seen by one viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSummary {
    /// The poll, with any lazily persisted closure applied.
    pub poll: Poll,
    /// Votes cast so far.
    pub vote_count: u64,
    /// Whether the poll is closed at read time.
    pub closed: bool,
    /// Option the viewer chose, if they voted.
    pub viewer_vote: Option<usize>,
}
