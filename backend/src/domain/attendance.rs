//! Per-day, per-meal attendance records.

use std::collections::HashMap;

use chrono::NaiveDate;

use super::{AttendanceId, MealType, Membership, MembershipId, MembershipStatus};

vocabulary!(
    /// Who recorded an attendance entry.
    MarkedBy, "marked by" {
        /// The member marked themselves.
        Member => "member",
        /// The mess owner (or a super-admin) marked the member.
        Owner => "owner",
    }
);

/// A single (membership, date, meal) slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttendanceSlot {
    /// Membership the slot belongs to.
    pub membership_id: MembershipId,
    /// Calendar day.
    pub date: NaiveDate,
    /// Meal within the day.
    pub meal_type: MealType,
}

/// Stored presence for one slot. At most one exists per slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRecord {
    /// Record identifier.
    pub id: AttendanceId,
    /// Membership the record belongs to.
    pub membership_id: MembershipId,
    /// Calendar day.
    pub date: NaiveDate,
    /// Meal within the day.
    pub meal_type: MealType,
    /// Whether the member attended.
    pub is_present: bool,
    /// Who last changed the record.
    pub marked_by: MarkedBy,
}

impl AttendanceRecord {
    /// Slot this record occupies.
    pub const fn slot(&self) -> AttendanceSlot {
        AttendanceSlot {
            membership_id: self.membership_id,
            date: self.date,
            meal_type: self.meal_type,
        }
    }
}

/// Whether `membership` is included in the headcount for `meal` on `date`.
pub fn counts_towards(membership: &Membership, date: NaiveDate, meal: MealType) -> bool {
    membership.is_eligible_for(meal) && membership.status_on(date) != MembershipStatus::Expired
}

/// Count present records for a slot whose membership is eligible for the meal
/// and not expired on that date.
///
/// Records whose membership is missing from `memberships` are ignored.
pub fn count_present(
    records: &[AttendanceRecord],
    memberships: &[Membership],
    date: NaiveDate,
    meal: MealType,
) -> u64 {
    let by_id: HashMap<MembershipId, &Membership> =
        memberships.iter().map(|m| (m.id, m)).collect();
    let count = records
        .iter()
        .filter(|record| record.is_present && record.date == date && record.meal_type == meal)
        .filter(|record| {
            by_id
                .get(&record.membership_id)
                .is_some_and(|membership| counts_towards(membership, date, meal))
        })
        .count();
    u64::try_from(count).unwrap_or(u64::MAX)
}

/// One line of the owner's attendance sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    /// Eligible membership.
    pub membership: Membership,
    /// Status on the roster date.
    pub status: MembershipStatus,
    /// Whether a present record exists for the slot.
    pub is_present: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MealsPerDay, MessId, PlanType, StoredMembershipStatus, UserId};
    use rstest::{fixture, rstest};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[fixture]
    fn day() -> NaiveDate {
        date(2025, 3, 10)
    }

    fn membership(meals: MealsPerDay, end_date: NaiveDate) -> Membership {
        Membership {
            id: MembershipId::random(),
            user_id: UserId::random(),
            mess_id: MessId::random(),
            plan_type: PlanType::Monthly,
            meals_per_day: meals,
            start_date: date(2025, 2, 1),
            end_date,
            stored_status: StoredMembershipStatus::Active,
        }
    }

    fn present(membership: &Membership, day: NaiveDate, meal: MealType) -> AttendanceRecord {
        AttendanceRecord {
            id: AttendanceId::random(),
            membership_id: membership.id,
            date: day,
            meal_type: meal,
            is_present: true,
            marked_by: MarkedBy::Member,
        }
    }

    #[rstest]
    fn counts_only_eligible_unexpired_memberships(day: NaiveDate) {
        let lunch = membership(MealsPerDay::Lunch, date(2025, 4, 1));
        let both = membership(MealsPerDay::Both, date(2025, 4, 1));
        let dinner_only = membership(MealsPerDay::Dinner, date(2025, 4, 1));
        let expired = membership(MealsPerDay::Both, date(2025, 3, 9));
        let records = vec![
            present(&lunch, day, MealType::Lunch),
            present(&both, day, MealType::Lunch),
            present(&dinner_only, day, MealType::Lunch),
            present(&expired, day, MealType::Lunch),
        ];
        let memberships = vec![lunch, both, dinner_only, expired];

        assert_eq!(
            count_present(&records, &memberships, day, MealType::Lunch),
            2
        );
    }

    #[rstest]
    fn absent_records_are_not_counted(day: NaiveDate) {
        let member = membership(MealsPerDay::Both, date(2025, 4, 1));
        let mut record = present(&member, day, MealType::Dinner);
        record.is_present = false;

        assert_eq!(
            count_present(&[record], &[member], day, MealType::Dinner),
            0
        );
    }

    #[rstest]
    fn expiry_is_judged_on_the_queried_date() {
        let member = membership(MealsPerDay::Both, date(2025, 3, 10));
        let earlier = date(2025, 3, 10);
        let record = present(&member, earlier, MealType::Lunch);

        assert_eq!(
            count_present(&[record], &[member], earlier, MealType::Lunch),
            1
        );
    }
}
