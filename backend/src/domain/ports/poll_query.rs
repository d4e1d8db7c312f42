//! Driving port for poll reads.

use async_trait::async_trait;

use crate::domain::{Actor, Error, MessId, PollSummary};

/// Domain use-case port for listing polls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PollQuery: Send + Sync {
    /// Polls of a mess, newest first, as seen by `actor`.
    async fn list_for_mess(&self, actor: &Actor, mess: MessId) -> Result<Vec<PollSummary>, Error>;
}
