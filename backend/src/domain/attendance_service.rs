//! Attendance domain service.
//!
//! Marks presence per (membership, date, meal) slot. Members may only move
//! today's slot from not-marked to present; owners can flip any slot either
//! way.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{
    AttendanceCommand, AttendanceQuery, AttendanceRepository, MembershipRepository,
};
use crate::domain::{
    Actor, AttendanceId, AttendanceRecord, AttendanceSlot, Error, LocalCalendar, MarkedBy, MealType, Membership,
    MembershipId, MembershipStatus, MessId, Role, RosterEntry, count_present, counts_towards,
};

/// Attendance service implementing the attendance driving ports.
#[derive(Clone)]
pub struct AttendanceService<A, M> {
    attendance: Arc<A>,
    memberships: Arc<M>,
    clock: Arc<dyn Clock>,
    calendar: LocalCalendar,
}

impl<A, M> AttendanceService<A, M> {
    /// Create a new service over the attendance and membership repositories.
    pub fn new(attendance: Arc<A>, memberships: Arc<M>, clock: Arc<dyn Clock>) -> Self {
        Self {
            attendance,
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

impl<A, M> AttendanceService<A, M>
where
    A: AttendanceRepository,
    M: MembershipRepository,
{
    async fn load_membership(&self, id: MembershipId) -> Result<Membership, Error> {
        self.memberships
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("membership {id} not found")))
    }

    /// Members act on their own membership; everyone else must manage its mess.
    fn authorize(actor: &Actor, membership: &Membership) -> Result<(), Error> {
        if actor.role() == Role::Member {
            if membership.user_id == actor.user_id() {
                return Ok(());
            }
            return Err(Error::forbidden("membership belongs to another member"));
        }
        actor.ensure_manages(membership.mess_id)
    }

    fn ensure_meal_covered(membership: &Membership, meal: MealType) -> Result<(), Error> {
        if membership.is_eligible_for(meal) {
            Ok(())
        } else {
            Err(Error::ineligible_meal(format!(
                "{} plan does not include {meal}",
                membership.meals_per_day
            )))
        }
    }

    /// Number of present, eligible, non-expired records for a slot.
    pub async fn count_present_at(
        &self,
        mess: MessId,
        date: NaiveDate,
        meal: MealType,
    ) -> Result<u64, Error> {
        let records = self
            .attendance
            .list_for_mess_slot(mess, date, meal)
            .await?;
        let memberships = self.memberships.list_for_mess(mess).await?;
        Ok(count_present(&records, &memberships, date, meal))
    }
}

#[async_trait]
impl<A, M> AttendanceCommand for AttendanceService<A, M>
where
    A: AttendanceRepository,
    M: MembershipRepository,
{
    async fn mark_present(
        &self,
        actor: &Actor,
        slot: AttendanceSlot,
    ) -> Result<AttendanceRecord, Error> {
        let membership = self.load_membership(slot.membership_id).await?;
        Self::authorize(actor, &membership)?;
        if actor.role() == Role::Member {
            let today = self.calendar.today(self.clock.utc());
            if slot.date != today {
                return Err(Error::invalid_request(format!(
                    "members can only mark attendance for {today}"
                )));
            }
        }
        Self::ensure_meal_covered(&membership, slot.meal_type)?;
        if membership.status_on(slot.date) == MembershipStatus::Expired {
            return Err(Error::not_eligible("membership is not active"));
        }

        let existing = self.attendance.find_slot(slot).await?;
        let marked_by = actor.marked_by();
        if let Some(record) = &existing
            && record.is_present
        {
            if marked_by == MarkedBy::Member {
                return Err(Error::already_marked(format!(
                    "attendance already marked for {} {}",
                    slot.date, slot.meal_type
                )));
            }
            debug!(attendance_id = %record.id, "slot already present");
            return Ok(record.clone());
        }

        let record = AttendanceRecord {
            id: existing.map_or_else(AttendanceId::random, |record| record.id),
            membership_id: slot.membership_id,
            date: slot.date,
            meal_type: slot.meal_type,
            is_present: true,
            marked_by,
        };
        let stored = self.attendance.upsert(&record).await?;
        info!(
            membership_id = %stored.membership_id,
            date = %stored.date,
            meal = %stored.meal_type,
            marked_by = %stored.marked_by,
            "attendance marked"
        );
        Ok(stored)
    }

    async fn toggle(&self, actor: &Actor, slot: AttendanceSlot) -> Result<AttendanceRecord, Error> {
        let membership = self.load_membership(slot.membership_id).await?;
        actor.ensure_manages(membership.mess_id)?;
        Self::ensure_meal_covered(&membership, slot.meal_type)?;

        let record = match self.attendance.find_slot(slot).await? {
            Some(existing) => AttendanceRecord {
                is_present: !existing.is_present,
                marked_by: MarkedBy::Owner,
                ..existing
            },
            None => AttendanceRecord {
                id: AttendanceId::random(),
                membership_id: slot.membership_id,
                date: slot.date,
                meal_type: slot.meal_type,
                is_present: true,
                marked_by: MarkedBy::Owner,
            },
        };
        let stored = self.attendance.upsert(&record).await?;
        info!(
            membership_id = %stored.membership_id,
            date = %stored.date,
            meal = %stored.meal_type,
            present = stored.is_present,
            "attendance toggled"
        );
        Ok(stored)
    }
}

#[async_trait]
impl<A, M> AttendanceQuery for AttendanceService<A, M>
where
    A: AttendanceRepository,
    M: MembershipRepository,
{
    async fn history(
        &self,
        actor: &Actor,
        membership: MembershipId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, Error> {
        if from > to {
            return Err(Error::invalid_request("from must not be after to"));
        }
        let record = self.load_membership(membership).await?;
        Self::authorize(actor, &record)?;
        let mut history = self
            .attendance
            .list_for_membership(membership, from, to)
            .await?;
        history.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| a.meal_type.as_str().cmp(b.meal_type.as_str()))
        });
        Ok(history)
    }

    async fn roster(
        &self,
        actor: &Actor,
        mess: MessId,
        date: NaiveDate,
        meal: MealType,
    ) -> Result<Vec<RosterEntry>, Error> {
        actor.ensure_manages(mess)?;
        let memberships = self.memberships.list_for_mess(mess).await?;
        let records = self
            .attendance
            .list_for_mess_slot(mess, date, meal)
            .await?;
        let present: HashMap<MembershipId, bool> = records
            .into_iter()
            .map(|record| (record.membership_id, record.is_present))
            .collect();

        Ok(memberships
            .into_iter()
            .filter(|membership| counts_towards(membership, date, meal))
            .map(|membership| {
                let is_present = present.get(&membership.id).copied().unwrap_or(false);
                let status = membership.status_on(date);
                RosterEntry {
                    membership,
                    status,
                    is_present,
                }
            })
            .collect())
    }

    async fn count_present(
        &self,
        actor: &Actor,
        mess: MessId,
        date: NaiveDate,
        meal: MealType,
    ) -> Result<u64, Error> {
        actor.ensure_manages(mess)?;
        let count = self.count_present_at(mess, date, meal).await?;
        debug!(%mess, %date, %meal, count, "counted attendance");
        Ok(count)
    }
}

#[cfg(test)]
#[path = "attendance_service_tests.rs"]
mod tests;
