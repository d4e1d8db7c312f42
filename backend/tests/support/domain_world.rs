//! Shared helpers for behaviour suites that drive domain services over the
//! in-memory ports.

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use mess_backend::domain::{
    Actor, Error, ErrorCode, MealsPerDay, Membership, MembershipId, MessId, PlanType, Role,
    StoredMembershipStatus, UserId,
};
use mess_backend::test_support::MutableClock;
use tokio::runtime::Runtime;

/// Runtime shared by the synchronous step functions.
#[derive(Clone)]
pub struct RuntimeHandle(pub Arc<Runtime>);

impl RuntimeHandle {
    pub fn new() -> Self {
        Self(Arc::new(Runtime::new().expect("create runtime")))
    }

    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.0.block_on(future)
    }
}

pub fn parse_date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").expect("feature dates use YYYY-MM-DD")
}

/// Clock pinned to noon UTC on `date`.
pub fn clock_on(date: NaiveDate) -> Arc<MutableClock> {
    let noon = date.and_hms_opt(12, 0, 0).expect("noon exists");
    Arc::new(MutableClock::new(Utc.from_utc_datetime(&noon)))
}

pub fn set_clock(clock: &MutableClock, date: NaiveDate) {
    let noon = date.and_hms_opt(12, 0, 0).expect("noon exists");
    clock.set(Utc.from_utc_datetime(&noon));
}

pub fn membership(
    mess: MessId,
    meals: MealsPerDay,
    start: NaiveDate,
    end: NaiveDate,
) -> Membership {
    Membership {
        id: MembershipId::random(),
        user_id: UserId::random(),
        mess_id: mess,
        plan_type: PlanType::Monthly,
        meals_per_day: meals,
        start_date: start,
        end_date: end,
        stored_status: StoredMembershipStatus::Active,
    }
}

pub fn member_of(membership: &Membership) -> Actor {
    Actor::new(membership.user_id, Role::Member, None)
}

pub fn owner_of(mess: MessId) -> Actor {
    Actor::new(UserId::random(), Role::Owner, Some(mess))
}

/// Assert `result` failed with the snake_case error `code`.
pub fn assert_refused<T: std::fmt::Debug>(result: Option<Result<T, Error>>, code: &str) {
    let expected: ErrorCode = serde_json::from_value(serde_json::Value::String(code.to_owned()))
        .expect("known error code");
    match result.expect("an operation should have run") {
        Ok(value) => panic!("expected {code}, got {value:?}"),
        Err(error) => assert_eq!(error.code(), expected, "{}", error.message()),
    }
}
