//! Driving port for attendance reads.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{
    Actor, AttendanceRecord, Error, MealType, MembershipId, MessId, RosterEntry,
};

/// Domain use-case port for attendance history, sheets and headcounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendanceQuery: Send + Sync {
    /// Records of one membership between two dates, newest first.
    async fn history(
        &self,
        actor: &Actor,
        membership: MembershipId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, Error>;

    /// Eligible memberships of a mess with their presence for one slot.
    async fn roster(
        &self,
        actor: &Actor,
        mess: MessId,
        date: NaiveDate,
        meal: MealType,
    ) -> Result<Vec<RosterEntry>, Error>;

    /// Present members of a mess for one slot.
    async fn count_present(
        &self,
        actor: &Actor,
        mess: MessId,
        date: NaiveDate,
        meal: MealType,
    ) -> Result<u64, Error>;
}
