//! PostgreSQL-backed `AttendanceRepository` implementation using Diesel ORM.
//!
//! Writes go through `INSERT ... ON CONFLICT (membership_id, date, meal_type)
//! DO UPDATE`, so racing writers to one slot converge on a single row.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AttendanceRepository, StoreError};
use crate::domain::{AttendanceRecord, AttendanceSlot, MealType, MembershipId, MessId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{AttendanceRow, AttendanceUpdate};
use super::pool::DbPool;
use super::schema::{attendance, memberships};

/// Diesel-backed implementation of the attendance repository port.
#[derive(Clone)]
pub struct DieselAttendanceRepository {
    pool: DbPool,
}

impl DieselAttendanceRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn rows_to_records(rows: Vec<AttendanceRow>) -> Result<Vec<AttendanceRecord>, StoreError> {
    rows.into_iter().map(AttendanceRecord::try_from).collect()
}

#[async_trait]
impl AttendanceRepository for DieselAttendanceRepository {
    async fn find_slot(&self, slot: AttendanceSlot) -> Result<Option<AttendanceRecord>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = attendance::table
            .filter(attendance::membership_id.eq(slot.membership_id.as_uuid()))
            .filter(attendance::date.eq(slot.date))
            .filter(attendance::meal_type.eq(slot.meal_type.as_str()))
            .select(AttendanceRow::as_select())
            .first::<AttendanceRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(AttendanceRecord::try_from).transpose()
    }

    async fn upsert(&self, record: &AttendanceRecord) -> Result<AttendanceRecord, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = AttendanceRow::from(record);
        let update = AttendanceUpdate {
            is_present: record.is_present,
            marked_by: record.marked_by.as_str(),
        };
        let stored = diesel::insert_into(attendance::table)
            .values(&row)
            .on_conflict((
                attendance::membership_id,
                attendance::date,
                attendance::meal_type,
            ))
            .do_update()
            .set(&update)
            .returning(AttendanceRow::as_returning())
            .get_result::<AttendanceRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        AttendanceRecord::try_from(stored)
    }

    async fn list_for_membership(
        &self,
        membership: MembershipId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AttendanceRow> = attendance::table
            .filter(attendance::membership_id.eq(membership.as_uuid()))
            .filter(attendance::date.between(from, to))
            .order((attendance::date.desc(), attendance::meal_type.asc()))
            .select(AttendanceRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_records(rows)
    }

    async fn list_for_mess_slot(
        &self,
        mess: MessId,
        date: NaiveDate,
        meal: MealType,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AttendanceRow> = attendance::table
            .inner_join(memberships::table)
            .filter(memberships::mess_id.eq(mess.as_uuid()))
            .filter(attendance::date.eq(date))
            .filter(attendance::meal_type.eq(meal.as_str()))
            .select(AttendanceRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_records(rows)
    }
}
