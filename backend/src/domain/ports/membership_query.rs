//! Driving port for membership reads.

use async_trait::async_trait;

use crate::domain::{Actor, Error, MembershipView, MessId};

/// Domain use-case port for listing memberships with derived status.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipQuery: Send + Sync {
    /// Every membership of a mess, newest start first.
    async fn list_for_mess(&self, actor: &Actor, mess: MessId)
    -> Result<Vec<MembershipView>, Error>;

    /// Memberships with between zero and `window_days` days left, soonest
    /// first.
    async fn list_expiring_within(
        &self,
        actor: &Actor,
        mess: MessId,
        window_days: i64,
    ) -> Result<Vec<MembershipView>, Error>;

    /// The caller's latest membership, optionally at one mess.
    async fn current_for_user(
        &self,
        actor: &Actor,
        mess: Option<MessId>,
    ) -> Result<MembershipView, Error>;
}
