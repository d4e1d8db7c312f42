//! Attendance API handlers.
//!
//! ```text
//! GET  /api/v1/memberships/{id}/attendance?from=2025-03-01&to=2025-03-31
//! POST /api/v1/memberships/{id}/attendance {"date":"2025-03-10","mealType":"lunch"}
//! POST /api/v1/memberships/{id}/attendance/toggle {"date":"2025-03-10","mealType":"dinner"}
//! GET  /api/v1/messes/{id}/attendance?date=2025-03-10&mealType=lunch
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    AttendanceRecord, AttendanceSlot, Error, MembershipId, MembershipView, RosterEntry,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::require_actor;
use crate::inbound::http::memberships::MembershipResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_date, parse_id, parse_vocabulary, require,
};

const DATE: FieldName = FieldName::new("date");
const MEAL_TYPE: FieldName = FieldName::new("mealType");

/// One attendance record.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceResponse {
    pub id: String,
    pub membership_id: String,
    pub date: String,
    pub meal_type: String,
    pub is_present: bool,
    /// `member` or `owner`.
    pub marked_by: String,
}

impl From<AttendanceRecord> for AttendanceResponse {
    fn from(record: AttendanceRecord) -> Self {
        Self {
            id: record.id.to_string(),
            membership_id: record.membership_id.to_string(),
            date: record.date.to_string(),
            meal_type: record.meal_type.as_str().to_owned(),
            is_present: record.is_present,
            marked_by: record.marked_by.as_str().to_owned(),
        }
    }
}

/// A row of the owner's attendance sheet.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntryResponse {
    pub membership: MembershipResponse,
    pub is_present: bool,
}

impl From<RosterEntry> for RosterEntryResponse {
    fn from(entry: RosterEntry) -> Self {
        Self {
            membership: MembershipResponse::from(MembershipView {
                membership: entry.membership,
                status: entry.status,
            }),
            is_present: entry.is_present,
        }
    }
}

/// Attendance sheet for one mess and slot.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RosterResponse {
    pub date: String,
    pub meal_type: String,
    pub present_count: u64,
    pub entries: Vec<RosterEntryResponse>,
}

/// Body naming the slot to mark.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlotBody {
    /// `YYYY-MM-DD`.
    pub date: Option<String>,
    /// `lunch` or `dinner`.
    pub meal_type: Option<String>,
}

/// Date range for the history endpoint.
#[derive(Debug, Deserialize, IntoParams)]
pub struct HistoryQuery {
    pub from: String,
    pub to: String,
}

/// Slot for the mess sheet.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct SheetQuery {
    pub date: String,
    pub meal_type: String,
}

fn parse_slot(membership: MembershipId, body: SlotBody) -> Result<AttendanceSlot, Error> {
    let date = require(body.date, DATE)?;
    let meal = require(body.meal_type, MEAL_TYPE)?;
    Ok(AttendanceSlot {
        membership_id: membership,
        date: parse_date(&date, DATE)?,
        meal_type: parse_vocabulary(&meal, MEAL_TYPE)?,
    })
}

/// Attendance records of a membership, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/memberships/{id}/attendance",
    params(("id" = String, Path, description = "Membership id"), HistoryQuery),
    responses(
        (status = 200, description = "Records", body = [AttendanceResponse]),
        (status = 400, description = "Invalid range", body = Error),
        (status = 403, description = "Not permitted", body = Error),
        (status = 404, description = "Unknown membership", body = Error)
    ),
    tags = ["attendance"],
    operation_id = "attendanceHistory"
)]
#[get("/memberships/{id}/attendance")]
pub async fn attendance_history(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<HistoryQuery>,
) -> ApiResult<web::Json<Vec<AttendanceResponse>>> {
    let actor = require_actor(&state, &session).await?;
    let membership = parse_id(&path.into_inner(), FieldName::new("id"))?;
    let from = parse_date(&query.from, FieldName::new("from"))?;
    let to = parse_date(&query.to, FieldName::new("to"))?;
    let records = state
        .attendance_query
        .history(&actor, membership, from, to)
        .await?;
    Ok(web::Json(records.into_iter().map(AttendanceResponse::from).collect()))
}

/// Mark the membership present for a meal.
#[utoipa::path(
    post,
    path = "/api/v1/memberships/{id}/attendance",
    params(("id" = String, Path, description = "Membership id")),
    request_body = SlotBody,
    responses(
        (status = 200, description = "Marked present", body = AttendanceResponse),
        (status = 400, description = "Invalid slot", body = Error),
        (status = 403, description = "Not permitted", body = Error),
        (status = 409, description = "Already marked", body = Error),
        (status = 422, description = "Meal not in plan or membership expired", body = Error)
    ),
    tags = ["attendance"],
    operation_id = "markAttendance"
)]
#[post("/memberships/{id}/attendance")]
pub async fn mark_attendance(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<SlotBody>,
) -> ApiResult<web::Json<AttendanceResponse>> {
    let actor = require_actor(&state, &session).await?;
    let membership = parse_id(&path.into_inner(), FieldName::new("id"))?;
    let slot = parse_slot(membership, payload.into_inner())?;
    let record = state.attendance.mark_present(&actor, slot).await?;
    Ok(web::Json(AttendanceResponse::from(record)))
}

/// Flip presence for a slot on the owner's sheet.
#[utoipa::path(
    post,
    path = "/api/v1/memberships/{id}/attendance/toggle",
    params(("id" = String, Path, description = "Membership id")),
    request_body = SlotBody,
    responses(
        (status = 200, description = "Presence flipped", body = AttendanceResponse),
        (status = 403, description = "Not this mess's manager", body = Error),
        (status = 422, description = "Meal not in plan", body = Error)
    ),
    tags = ["attendance"],
    operation_id = "toggleAttendance"
)]
#[post("/memberships/{id}/attendance/toggle")]
pub async fn toggle_attendance(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<SlotBody>,
) -> ApiResult<web::Json<AttendanceResponse>> {
    let actor = require_actor(&state, &session).await?;
    let membership = parse_id(&path.into_inner(), FieldName::new("id"))?;
    let slot = parse_slot(membership, payload.into_inner())?;
    let record = state.attendance.toggle(&actor, slot).await?;
    Ok(web::Json(AttendanceResponse::from(record)))
}

/// Attendance sheet and headcount for one slot of a mess.
#[utoipa::path(
    get,
    path = "/api/v1/messes/{id}/attendance",
    params(("id" = String, Path, description = "Mess id"), SheetQuery),
    responses(
        (status = 200, description = "Sheet", body = RosterResponse),
        (status = 403, description = "Not this mess's manager", body = Error)
    ),
    tags = ["attendance"],
    operation_id = "messAttendance"
)]
#[get("/messes/{id}/attendance")]
pub async fn mess_attendance(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<SheetQuery>,
) -> ApiResult<web::Json<RosterResponse>> {
    let actor = require_actor(&state, &session).await?;
    let mess = parse_id(&path.into_inner(), FieldName::new("id"))?;
    let date = parse_date(&query.date, DATE)?;
    let meal = parse_vocabulary(&query.meal_type, MEAL_TYPE)?;
    let entries = state
        .attendance_query
        .roster(&actor, mess, date, meal)
        .await?;
    let present_count = state
        .attendance_query
        .count_present(&actor, mess, date, meal)
        .await?;
    Ok(web::Json(RosterResponse {
        date: date.to_string(),
        meal_type: meal.as_str().to_owned(),
        present_count,
        entries: entries.into_iter().map(RosterEntryResponse::from).collect(),
    }))
}
