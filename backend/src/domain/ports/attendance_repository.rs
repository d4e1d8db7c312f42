//! Port for attendance persistence.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{AttendanceRecord, AttendanceSlot, MealType, MembershipId, MessId};

use super::StoreError;

/// Storage for attendance records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    /// Record stored for a slot, if any.
    async fn find_slot(&self, slot: AttendanceSlot) -> Result<Option<AttendanceRecord>, StoreError>;

    /// Write the record for its slot, replacing presence and attribution of
    /// any record already stored there. Returns the stored record.
    async fn upsert(&self, record: &AttendanceRecord) -> Result<AttendanceRecord, StoreError>;

    /// Records of a membership with dates in `from..=to`, newest first.
    async fn list_for_membership(
        &self,
        membership: MembershipId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, StoreError>;

    /// Every record stored for a mess on one date and meal.
    async fn list_for_mess_slot(
        &self,
        mess: MessId,
        date: NaiveDate,
        meal: MealType,
    ) -> Result<Vec<AttendanceRecord>, StoreError>;
}
