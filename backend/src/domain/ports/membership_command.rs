//! Driving port for membership mutations.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{
    Actor, Error, MealsPerDay, MembershipId, MembershipView, MessId, PlanType, UserId,
};

/// Input for opening a membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateMembershipRequest {
    /// Subscribing account.
    pub user_id: UserId,
    /// Mess subscribed to.
    pub mess_id: MessId,
    /// Billing period; decides the end date.
    pub plan_type: PlanType,
    /// Meals covered.
    pub meals_per_day: MealsPerDay,
    /// First day of the subscription.
    pub start_date: NaiveDate,
}

/// Domain use-case port for opening and renewing memberships.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipCommand: Send + Sync {
    /// Open a membership whose end date follows from its plan.
    async fn create(
        &self,
        actor: &Actor,
        request: CreateMembershipRequest,
    ) -> Result<MembershipView, Error>;

    /// Move the end date of a membership and mark it active again.
    async fn renew(
        &self,
        actor: &Actor,
        membership: MembershipId,
        new_end_date: NaiveDate,
    ) -> Result<MembershipView, Error>;
}
