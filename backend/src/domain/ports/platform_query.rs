//! Driving port for the super-admin platform overview.

use async_trait::async_trait;

use crate::domain::{Actor, Error, Profile};

/// Platform-wide counts shown to super-admins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlatformStats {
    /// Messes, listed or not.
    pub total_messes: u64,
    /// Accounts with the owner role.
    pub total_owners: u64,
    /// Accounts with the member role.
    pub total_members: u64,
    /// Memberships whose derived status is active or expiring soon today.
    pub active_memberships: u64,
}

/// Domain use-case port for platform administration reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlatformQuery: Send + Sync {
    /// Counts across every mess.
    async fn stats(&self, actor: &Actor) -> Result<PlatformStats, Error>;

    /// Owners not yet linked to a mess, for assigning new messes.
    async fn unassigned_owners(&self, actor: &Actor) -> Result<Vec<Profile>, Error>;
}
