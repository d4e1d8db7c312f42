//! Super-admin overview across every mess.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{
    AccountRepository, MembershipRepository, MessRepository, PlatformQuery, PlatformStats,
};
use crate::domain::{Actor, Error, LocalCalendar, Profile, Role};

/// Platform service implementing [`PlatformQuery`].
#[derive(Clone)]
pub struct PlatformService<A, R, M> {
    accounts: Arc<A>,
    messes: Arc<R>,
    memberships: Arc<M>,
    clock: Arc<dyn Clock>,
    calendar: LocalCalendar,
}

impl<A, R, M> PlatformService<A, R, M> {
    /// Create a new service over the account, mess and membership stores.
    pub fn new(
        accounts: Arc<A>,
        messes: Arc<R>,
        memberships: Arc<M>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            accounts,
            messes,
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

#[async_trait]
impl<A, R, M> PlatformQuery for PlatformService<A, R, M>
where
    A: AccountRepository,
    R: MessRepository,
    M: MembershipRepository,
{
    async fn stats(&self, actor: &Actor) -> Result<PlatformStats, Error> {
        actor.ensure_super_admin()?;
        let today = self.calendar.today(self.clock.utc());
        let total_messes = self.messes.count_messes().await?;
        let total_owners = self.accounts.count_with_role(Role::Owner).await?;
        let total_members = self.accounts.count_with_role(Role::Member).await?;
        // The store only narrows by end date; the status is derived here.
        let active = self
            .memberships
            .list_ending_from(today)
            .await?
            .iter()
            .filter(|membership| membership.status_on(today).is_active())
            .count();

        let stats = PlatformStats {
            total_messes,
            total_owners,
            total_members,
            active_memberships: u64::try_from(active).unwrap_or(u64::MAX),
        };
        debug!(?stats, "platform stats computed");
        Ok(stats)
    }

    async fn unassigned_owners(&self, actor: &Actor) -> Result<Vec<Profile>, Error> {
        actor.ensure_super_admin()?;
        Ok(self.accounts.list_unassigned_owners().await?)
    }
}
