//! Membership records and their date-derived lifecycle.
//!
//! The stored status is only a cache. Whether a membership is active is
//! decided by comparing its `end_date` with the current day; every
//! eligibility check and every response goes through [`Membership::status_on`].

use chrono::{Days, Months, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

use super::{MealType, MealsPerDay, MembershipId, MessId, PlanType, UserId};

/// Days before the end date during which a membership counts as expiring.
pub const EXPIRING_SOON_DAYS: i64 = 5;

vocabulary!(
    /// Status persisted alongside the membership.
    StoredMembershipStatus, "membership status" {
        /// Not yet marked expired.
        Active => "active",
        /// Explicitly marked expired.
        Expired => "expired",
    }
);

/// Lifecycle state derived from the membership dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MembershipStatus {
    /// More than [`EXPIRING_SOON_DAYS`] days remain.
    Active,
    /// Between zero and [`EXPIRING_SOON_DAYS`] days remain.
    ExpiringSoon {
        /// Whole days until the end date.
        #[serde(rename = "daysLeft")]
        days_left: i64,
    },
    /// The end date has passed or the record is stored as expired.
    Expired,
}

impl MembershipStatus {
    /// Whether the member may still use the mess.
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Expired)
    }

    /// Whether the membership is expiring with at most `window_days` left.
    ///
    /// Only [`MembershipStatus::ExpiringSoon`] qualifies, so a window wider
    /// than [`EXPIRING_SOON_DAYS`] never admits an `Active` membership.
    pub const fn is_expiring_within(self, window_days: i64) -> bool {
        matches!(self, Self::ExpiringSoon { days_left } if days_left <= window_days)
    }
}

/// A member's subscription period at one mess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    /// Record identifier.
    pub id: MembershipId,
    /// Subscribed account.
    pub user_id: UserId,
    /// Mess subscribed to.
    pub mess_id: MessId,
    /// Billing period.
    pub plan_type: PlanType,
    /// Meals covered by the plan.
    pub meals_per_day: MealsPerDay,
    /// First day of the subscription.
    pub start_date: NaiveDate,
    /// Last day of the subscription.
    pub end_date: NaiveDate,
    /// Cached status; see [`Membership::status_on`].
    pub stored_status: StoredMembershipStatus,
}

impl Membership {
    /// Whole days from `today` until the end date; negative once past.
    pub fn days_left(&self, today: NaiveDate) -> i64 {
        (self.end_date - today).num_days()
    }

    /// Derive the lifecycle state on a given calendar day.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use mess_backend::domain::{
    ///     MealsPerDay, Membership, MembershipId, MembershipStatus, MessId, PlanType,
    ///     StoredMembershipStatus, UserId,
    /// };
    ///
    /// let today = NaiveDate::from_ymd_opt(2025, 3, 10).expect("date");
    /// let membership = Membership {
    ///     id: MembershipId::random(),
    ///     user_id: UserId::random(),
    ///     mess_id: MessId::random(),
    ///     plan_type: PlanType::Monthly,
    ///     meals_per_day: MealsPerDay::Both,
    ///     start_date: NaiveDate::from_ymd_opt(2025, 2, 12).expect("date"),
    ///     end_date: NaiveDate::from_ymd_opt(2025, 3, 12).expect("date"),
    ///     stored_status: StoredMembershipStatus::Active,
    /// };
    /// assert_eq!(
    ///     membership.status_on(today),
    ///     MembershipStatus::ExpiringSoon { days_left: 2 }
    /// );
    /// ```
    pub fn status_on(&self, today: NaiveDate) -> MembershipStatus {
        if self.stored_status == StoredMembershipStatus::Expired {
            return MembershipStatus::Expired;
        }
        let days_left = self.days_left(today);
        if days_left < 0 {
            MembershipStatus::Expired
        } else if days_left <= EXPIRING_SOON_DAYS {
            MembershipStatus::ExpiringSoon { days_left }
        } else {
            MembershipStatus::Active
        }
    }

    /// Whether the plan includes `meal`.
    pub const fn is_eligible_for(&self, meal: MealType) -> bool {
        self.meals_per_day.covers(meal)
    }
}

/// Compute the end date implied by a plan starting on `start`.
///
/// Calendar months clamp to the last day of shorter months, so a monthly plan
/// starting on 31 January ends on the last day of February.
///
/// Returns `None` only when the result would overflow the calendar.
pub fn end_date_for(plan: PlanType, start: NaiveDate) -> Option<NaiveDate> {
    match plan {
        PlanType::Monthly => start.checked_add_months(Months::new(1)),
        PlanType::Quarterly => start.checked_add_months(Months::new(3)),
        PlanType::Custom => start.checked_add_days(Days::new(30)),
    }
}

/// A membership paired with its derived status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipView {
    /// Stored record.
    pub membership: Membership,
    /// Status derived from the record's dates.
    pub status: MembershipStatus,
}

impl MembershipView {
    /// Pair `membership` with its status on `today`.
    pub fn on(membership: Membership, today: NaiveDate) -> Self {
        let status = membership.status_on(today);
        Self { membership, status }
    }
}
