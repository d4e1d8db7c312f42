//! Owner dashboard figures computed from memberships and today's attendance.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{
    AttendanceRepository, DashboardQuery, DashboardStats, MembershipRepository,
};
use crate::domain::{
    Actor, EXPIRING_SOON_DAYS, Error, LocalCalendar, MealType, MessId, count_present,
};

/// Dashboard service implementing [`DashboardQuery`].
#[derive(Clone)]
pub struct DashboardService<M, A> {
    memberships: Arc<M>,
    attendance: Arc<A>,
    clock: Arc<dyn Clock>,
    calendar: LocalCalendar,
    expiring_window_days: i64,
}

impl<M, A> DashboardService<M, A> {
    /// Create a new service with the default expiring-alert window.
    pub fn new(memberships: Arc<M>, attendance: Arc<A>, clock: Arc<dyn Clock>) -> Self {
        Self {
            memberships,
            attendance,
            clock,
            calendar: LocalCalendar::default(),
            expiring_window_days: EXPIRING_SOON_DAYS,
        }
    }

    /// Narrow the number of days counted as "expiring", clamped to
    /// `0..=EXPIRING_SOON_DAYS`.
    #[must_use]
    pub fn with_expiring_window(mut self, days: i64) -> Self {
        self.expiring_window_days = days.clamp(0, EXPIRING_SOON_DAYS);
        self
    }

    /// Judge "today" on `calendar` instead of the UTC day.
    #[must_use]
    pub fn with_calendar(mut self, calendar: LocalCalendar) -> Self {
        self.calendar = calendar;
        self
    }
}

fn to_count(value: usize) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

#[async_trait]
impl<M, A> DashboardQuery for DashboardService<M, A>
where
    M: MembershipRepository,
    A: AttendanceRepository,
{
    async fn stats(&self, actor: &Actor, mess: MessId) -> Result<DashboardStats, Error> {
        actor.ensure_manages(mess)?;
        let today = self.calendar.today(self.clock.utc());
        let memberships = self.memberships.list_for_mess(mess).await?;
        let lunch = self
            .attendance
            .list_for_mess_slot(mess, today, MealType::Lunch)
            .await?;
        let dinner = self
            .attendance
            .list_for_mess_slot(mess, today, MealType::Dinner)
            .await?;

        let active_members = memberships
            .iter()
            .filter(|membership| membership.status_on(today).is_active())
            .count();
        let expiring = memberships
            .iter()
            .filter(|membership| {
                membership
                    .status_on(today)
                    .is_expiring_within(self.expiring_window_days)
            })
            .count();

        let stats = DashboardStats {
            active_members: to_count(active_members),
            lunch_today: count_present(&lunch, &memberships, today, MealType::Lunch),
            dinner_today: count_present(&dinner, &memberships, today, MealType::Dinner),
            expiring_count: to_count(expiring),
        };
        debug!(%mess, ?stats, "dashboard computed");
        Ok(stats)
    }
}
