//! Internal Diesel row structs and their domain conversions.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Vocabulary columns arrive as text and are
//! parsed on the way out; a value outside the vocabulary surfaces as a
//! [`StoreError::Query`].

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::ports::StoreError;
use crate::domain::{
    Area, AttendanceRecord, Membership, MenuPost, Mess, Poll, PollVote, Profile, RoleAssignment,
};

use super::diesel_error_mapping::{from_index, parse_column, to_index};
use super::schema::{
    areas, attendance, memberships, menu_posts, messes, poll_votes, polls, profiles, user_roles,
};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = areas)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AreaRow {
    pub id: Uuid,
    pub name: String,
    pub is_active: bool,
}

impl From<AreaRow> for Area {
    fn from(row: AreaRow) -> Self {
        Self {
            id: row.id.into(),
            name: row.name,
            is_active: row.is_active,
        }
    }
}

/// Mess profile columns; also the insert row and the changeset for profile
/// updates, which leave the owner and listing flag alone.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = messes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct MessRow {
    pub id: Uuid,
    pub name: String,
    pub tagline: Option<String>,
    pub speciality: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub contact_number: Option<String>,
    #[diesel(skip_update)]
    pub owner_id: Option<Uuid>,
    pub area_id: Option<Uuid>,
    #[diesel(skip_update)]
    pub is_active: bool,
}

impl From<MessRow> for Mess {
    fn from(row: MessRow) -> Self {
        Self {
            id: row.id.into(),
            name: row.name,
            tagline: row.tagline,
            speciality: row.speciality,
            address: row.address,
            latitude: row.latitude,
            longitude: row.longitude,
            contact_number: row.contact_number,
            owner_id: row.owner_id.map(Into::into),
            area_id: row.area_id.map(Into::into),
            is_active: row.is_active,
        }
    }
}

impl From<&Mess> for MessRow {
    fn from(mess: &Mess) -> Self {
        Self {
            id: *mess.id.as_uuid(),
            name: mess.name.clone(),
            tagline: mess.tagline.clone(),
            speciality: mess.speciality.clone(),
            address: mess.address.clone(),
            latitude: mess.latitude,
            longitude: mess.longitude,
            contact_number: mess.contact_number.clone(),
            owner_id: mess.owner_id.map(|id| *id.as_uuid()),
            area_id: mess.area_id.map(|id| *id.as_uuid()),
            is_active: mess.is_active,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProfileRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub temp_password: Option<String>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: row.id.into(),
            name: row.name,
            email: row.email,
            phone: row.phone,
            has_temporary_password: row.temp_password.is_some(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_roles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRoleRow {
    pub user_id: Uuid,
    pub role: String,
    pub mess_id: Option<Uuid>,
}

impl TryFrom<UserRoleRow> for RoleAssignment {
    type Error = StoreError;

    fn try_from(row: UserRoleRow) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: row.user_id.into(),
            role: parse_column(&row.role)?,
            mess_id: row.mess_id.map(Into::into),
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = memberships)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MembershipRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mess_id: Uuid,
    pub plan_type: String,
    pub meals_per_day: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
}

impl TryFrom<MembershipRow> for Membership {
    type Error = StoreError;

    fn try_from(row: MembershipRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.into(),
            user_id: row.user_id.into(),
            mess_id: row.mess_id.into(),
            plan_type: parse_column(&row.plan_type)?,
            meals_per_day: parse_column(&row.meals_per_day)?,
            start_date: row.start_date,
            end_date: row.end_date,
            stored_status: parse_column(&row.status)?,
        })
    }
}

impl From<&Membership> for MembershipRow {
    fn from(membership: &Membership) -> Self {
        Self {
            id: *membership.id.as_uuid(),
            user_id: *membership.user_id.as_uuid(),
            mess_id: *membership.mess_id.as_uuid(),
            plan_type: membership.plan_type.as_str().to_owned(),
            meals_per_day: membership.meals_per_day.as_str().to_owned(),
            start_date: membership.start_date,
            end_date: membership.end_date,
            status: membership.stored_status.as_str().to_owned(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = attendance)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AttendanceRow {
    pub id: Uuid,
    pub membership_id: Uuid,
    pub date: NaiveDate,
    pub meal_type: String,
    pub is_present: bool,
    pub marked_by: String,
}

impl TryFrom<AttendanceRow> for AttendanceRecord {
    type Error = StoreError;

    fn try_from(row: AttendanceRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.into(),
            membership_id: row.membership_id.into(),
            date: row.date,
            meal_type: parse_column(&row.meal_type)?,
            is_present: row.is_present,
            marked_by: parse_column(&row.marked_by)?,
        })
    }
}

impl From<&AttendanceRecord> for AttendanceRow {
    fn from(record: &AttendanceRecord) -> Self {
        Self {
            id: *record.id.as_uuid(),
            membership_id: *record.membership_id.as_uuid(),
            date: record.date,
            meal_type: record.meal_type.as_str().to_owned(),
            is_present: record.is_present,
            marked_by: record.marked_by.as_str().to_owned(),
        }
    }
}

/// Changeset applied when an attendance insert hits the slot constraint.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = attendance)]
pub(crate) struct AttendanceUpdate<'a> {
    pub is_present: bool,
    pub marked_by: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = menu_posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MenuPostRow {
    pub id: Uuid,
    pub mess_id: Uuid,
    pub meal_type: String,
    pub title: String,
    pub items: Vec<String>,
    pub is_veg: bool,
    pub price: Option<f64>,
    pub visible_from: DateTime<Utc>,
    pub expiry_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<MenuPostRow> for MenuPost {
    type Error = StoreError;

    fn try_from(row: MenuPostRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.into(),
            mess_id: row.mess_id.into(),
            meal_type: parse_column(&row.meal_type)?,
            title: row.title,
            items: row.items,
            is_veg: row.is_veg,
            price: row.price,
            visible_from: row.visible_from,
            expiry_time: row.expiry_time,
            created_at: row.created_at,
        })
    }
}

impl From<&MenuPost> for MenuPostRow {
    fn from(post: &MenuPost) -> Self {
        Self {
            id: *post.id.as_uuid(),
            mess_id: *post.mess_id.as_uuid(),
            meal_type: post.meal_type.as_str().to_owned(),
            title: post.title.clone(),
            items: post.items.clone(),
            is_veg: post.is_veg,
            price: post.price,
            visible_from: post.visible_from,
            expiry_time: post.expiry_time,
            created_at: post.created_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = polls)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PollRow {
    pub id: Uuid,
    pub mess_id: Uuid,
    pub target_meal: String,
    pub title: String,
    pub options: Vec<String>,
    pub deadline: DateTime<Utc>,
    pub status: String,
    pub winning_option: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<PollRow> for Poll {
    type Error = StoreError;

    fn try_from(row: PollRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.into(),
            mess_id: row.mess_id.into(),
            target_meal: parse_column(&row.target_meal)?,
            title: row.title,
            options: row.options,
            deadline: row.deadline,
            status: parse_column(&row.status)?,
            winning_option: row
                .winning_option
                .map(|index| to_index(index, "winning_option"))
                .transpose()?,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<&Poll> for PollRow {
    type Error = StoreError;

    fn try_from(poll: &Poll) -> Result<Self, Self::Error> {
        Ok(Self {
            id: *poll.id.as_uuid(),
            mess_id: *poll.mess_id.as_uuid(),
            target_meal: poll.target_meal.as_str().to_owned(),
            title: poll.title.clone(),
            options: poll.options.clone(),
            deadline: poll.deadline,
            status: poll.status.as_str().to_owned(),
            winning_option: poll
                .winning_option
                .map(|index| from_index(index, "winning_option"))
                .transpose()?,
            created_at: poll.created_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = poll_votes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PollVoteRow {
    pub id: Uuid,
    pub poll_id: Uuid,
    pub user_id: Uuid,
    pub option_index: i32,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<PollVoteRow> for PollVote {
    type Error = StoreError;

    fn try_from(row: PollVoteRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.into(),
            poll_id: row.poll_id.into(),
            user_id: row.user_id.into(),
            option_index: to_index(row.option_index, "option_index")?,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<&PollVote> for PollVoteRow {
    type Error = StoreError;

    fn try_from(vote: &PollVote) -> Result<Self, Self::Error> {
        Ok(Self {
            id: *vote.id.as_uuid(),
            poll_id: *vote.poll_id.as_uuid(),
            user_id: *vote.user_id.as_uuid(),
            option_index: from_index(vote.option_index, "option_index")?,
            created_at: vote.created_at,
        })
    }
}
