//! Driving port for attendance mutations.

use async_trait::async_trait;

use crate::domain::{Actor, AttendanceRecord, AttendanceSlot, Error};

/// Domain use-case port for marking attendance.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendanceCommand: Send + Sync {
    /// Record the member as present for a slot.
    async fn mark_present(
        &self,
        actor: &Actor,
        slot: AttendanceSlot,
    ) -> Result<AttendanceRecord, Error>;

    /// Flip presence for a slot on the owner's sheet.
    async fn toggle(&self, actor: &Actor, slot: AttendanceSlot) -> Result<AttendanceRecord, Error>;
}
