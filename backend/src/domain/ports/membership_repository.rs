//! Port for membership persistence.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{Membership, MembershipId, MessId, StoredMembershipStatus, UserId};

use super::StoreError;

/// Storage for membership records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Persist a new membership.
    ///
    /// Fails with [`StoreError::MissingReference`] when the user or mess does
    /// not exist.
    async fn insert(&self, membership: &Membership) -> Result<(), StoreError>;

    /// Find a membership by id.
    async fn find_by_id(&self, id: MembershipId) -> Result<Option<Membership>, StoreError>;

    /// Latest membership (by start date) held by `user`, optionally restricted
    /// to one mess.
    async fn find_latest_for_user(
        &self,
        user: UserId,
        mess: Option<MessId>,
    ) -> Result<Option<Membership>, StoreError>;

    /// Every membership of a mess, newest start first.
    async fn list_for_mess(&self, mess: MessId) -> Result<Vec<Membership>, StoreError>;

    /// Memberships of a mess not stored as expired whose end date falls in
    /// `from..=to`, ordered by end date then id.
    async fn list_ending_between(
        &self,
        mess: MessId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Membership>, StoreError>;

    /// Memberships across every mess not stored as expired whose end date is
    /// on or after `from`.
    async fn list_ending_from(&self, from: NaiveDate) -> Result<Vec<Membership>, StoreError>;

    /// Overwrite the end date and stored status of a membership.
    async fn update_term(
        &self,
        id: MembershipId,
        end_date: NaiveDate,
        status: StoredMembershipStatus,
    ) -> Result<(), StoreError>;
}
