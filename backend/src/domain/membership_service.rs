//! Membership domain service.
//!
//! Implements the membership driving ports. Status is always re-derived from
//! the record's dates against the injected clock; the stored status is only
//! consulted for records explicitly marked expired.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    CreateMembershipRequest, MembershipCommand, MembershipQuery, MembershipRepository, StoreError,
};
use crate::domain::{
    Actor, EXPIRING_SOON_DAYS, Error, LocalCalendar, Membership, MembershipId, MembershipStatus, MembershipView, MessId,
    StoredMembershipStatus, end_date_for,
};

/// Membership service implementing the command and query driving ports.
#[derive(Clone)]
pub struct MembershipService<R> {
    memberships: Arc<R>,
    clock: Arc<dyn Clock>,
    calendar: LocalCalendar,
}

impl<R> MembershipService<R> {
    /// Create a new service over the membership repository.
    pub fn new(memberships: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
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

    fn today(&self) -> NaiveDate {
        self.calendar.today(self.clock.utc())
    }
}

impl<R> MembershipService<R>
where
    R: MembershipRepository,
{
    async fn load(&self, id: MembershipId) -> Result<Membership, Error> {
        self.memberships
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("membership {id} not found")))
    }

    /// Expiring memberships of `mess` with at most `window_days` days left on
    /// `today`, soonest end date first, ties broken by id.
    ///
    /// The window must lie within `0..=EXPIRING_SOON_DAYS`. The store narrows
    /// the candidates by end date; each one is then re-derived here so only
    /// [`MembershipStatus::ExpiringSoon`] entries appear.
    pub async fn expiring_within(
        &self,
        mess: MessId,
        window_days: i64,
        today: NaiveDate,
    ) -> Result<Vec<MembershipView>, Error> {
        if !(0..=EXPIRING_SOON_DAYS).contains(&window_days) {
            return Err(Error::invalid_request(format!(
                "windowDays must be between 0 and {EXPIRING_SOON_DAYS}"
            ))
            .with_details(json!({ "field": "windowDays", "code": "window_out_of_range" })));
        }
        let window = window_days.unsigned_abs();
        let until = today
            .checked_add_days(Days::new(window))
            .ok_or_else(|| Error::invalid_request("windowDays is too large"))?;

        let candidates = self
            .memberships
            .list_ending_between(mess, today, until)
            .await?;
        let mut expiring: Vec<MembershipView> = candidates
            .into_iter()
            .map(|membership| MembershipView::on(membership, today))
            .filter(|view| view.status.is_expiring_within(window_days))
            .collect();
        expiring.sort_by(|a, b| {
            a.membership
                .end_date
                .cmp(&b.membership.end_date)
                .then_with(|| a.membership.id.cmp(&b.membership.id))
        });
        Ok(expiring)
    }
}

fn map_insert_error(error: StoreError) -> Error {
    match error {
        StoreError::MissingReference { .. } => {
            Error::invalid_request("user or mess does not exist")
                .with_details(json!({ "code": "unknown_reference" }))
        }
        other => other.into(),
    }
}

#[async_trait]
impl<R> MembershipCommand for MembershipService<R>
where
    R: MembershipRepository,
{
    async fn create(
        &self,
        actor: &Actor,
        request: CreateMembershipRequest,
    ) -> Result<MembershipView, Error> {
        actor.ensure_manages(request.mess_id)?;
        let end_date = end_date_for(request.plan_type, request.start_date).ok_or_else(|| {
            Error::invalid_request("startDate is out of range")
                .with_details(json!({ "field": "startDate", "code": "out_of_range" }))
        })?;

        let membership = Membership {
            id: MembershipId::random(),
            user_id: request.user_id,
            mess_id: request.mess_id,
            plan_type: request.plan_type,
            meals_per_day: request.meals_per_day,
            start_date: request.start_date,
            end_date,
            stored_status: StoredMembershipStatus::Active,
        };
        self.memberships
            .insert(&membership)
            .await
            .map_err(map_insert_error)?;

        info!(
            membership_id = %membership.id,
            mess_id = %membership.mess_id,
            plan = %membership.plan_type,
            %end_date,
            "membership created"
        );
        Ok(MembershipView::on(membership, self.today()))
    }

    async fn renew(
        &self,
        actor: &Actor,
        membership: MembershipId,
        new_end_date: NaiveDate,
    ) -> Result<MembershipView, Error> {
        let mut record = self.load(membership).await?;
        actor.ensure_manages(record.mess_id)?;
        if new_end_date < record.start_date {
            return Err(
                Error::invalid_request("endDate must not precede the start date")
                    .with_details(json!({ "field": "endDate", "code": "before_start" })),
            );
        }

        self.memberships
            .update_term(record.id, new_end_date, StoredMembershipStatus::Active)
            .await?;
        record.end_date = new_end_date;
        record.stored_status = StoredMembershipStatus::Active;

        info!(membership_id = %record.id, end_date = %new_end_date, "membership renewed");
        Ok(MembershipView::on(record, self.today()))
    }
}

#[async_trait]
impl<R> MembershipQuery for MembershipService<R>
where
    R: MembershipRepository,
{
    async fn list_for_mess(
        &self,
        actor: &Actor,
        mess: MessId,
    ) -> Result<Vec<MembershipView>, Error> {
        actor.ensure_manages(mess)?;
        let today = self.today();
        let memberships = self.memberships.list_for_mess(mess).await?;
        Ok(memberships
            .into_iter()
            .map(|membership| MembershipView::on(membership, today))
            .collect())
    }

    async fn list_expiring_within(
        &self,
        actor: &Actor,
        mess: MessId,
        window_days: i64,
    ) -> Result<Vec<MembershipView>, Error> {
        actor.ensure_manages(mess)?;
        self.expiring_within(mess, window_days, self.today())
            .await
    }

    async fn current_for_user(
        &self,
        actor: &Actor,
        mess: Option<MessId>,
    ) -> Result<MembershipView, Error> {
        let membership = self
            .memberships
            .find_latest_for_user(actor.user_id(), mess)
            .await?
            .ok_or_else(|| Error::not_found("no membership found"))?;
        let view = MembershipView::on(membership, self.today());
        if view.status == MembershipStatus::Expired {
            info!(membership_id = %view.membership.id, "current membership has expired");
        }
        Ok(view)
    }
}

#[cfg(test)]
#[path = "membership_service_tests.rs"]
mod tests;
