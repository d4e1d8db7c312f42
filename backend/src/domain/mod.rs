//! Domain entities, services and ports.
//!
//! Purpose: hold the mess subscription rules independent of HTTP and storage.
//! Entities keep stored fields separate from derived state (membership status,
//! poll closure, menu liveness); the services compute the derived state from
//! the clock on every read.
//!
//! Public surface:
//! - Entities: [`Membership`], [`AttendanceRecord`], [`MenuPost`], [`Poll`],
//!   [`Mess`], [`Profile`].
//! - Services: one per area, each implementing the matching driving ports in
//!   [`ports`]; [`PlatformService`] serves the super-admin overview.
//! - [`Error`] and [`ErrorCode`], the transport-agnostic failure taxonomy.

#[macro_use]
mod vocabulary;

pub mod account;
pub mod account_service;
pub mod actor;
pub mod attendance;
pub mod attendance_service;
pub mod calendar;
pub mod dashboard_service;
pub mod error;
pub mod ids;
pub mod meal;
pub mod membership;
pub mod membership_service;
pub mod menu;
pub mod menu_service;
pub mod mess;
pub mod mess_directory_service;
pub mod platform_service;
pub mod poll;
pub mod poll_service;
pub mod ports;
pub mod trace_id;

pub use self::account::{
    AccountView, Credentials, CredentialsValidationError, MIN_PASSWORD_LENGTH, NewPassword,
    Profile, RoleAssignment,
};
pub use self::account_service::AccountService;
pub use self::actor::{Actor, Role};
pub use self::attendance::{
    AttendanceRecord, AttendanceSlot, MarkedBy, RosterEntry, count_present, counts_towards,
};
pub use self::attendance_service::AttendanceService;
pub use self::calendar::LocalCalendar;
pub use self::dashboard_service::DashboardService;
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::ids::{
    AreaId, AttendanceId, MembershipId, MenuPostId, MessId, PollId, UserId, VoteId,
};
pub use self::meal::{MealType, MealsPerDay, PlanType};
pub use self::membership::{
    EXPIRING_SOON_DAYS, Membership, MembershipStatus, MembershipView, StoredMembershipStatus,
    end_date_for,
};
pub use self::membership_service::MembershipService;
pub use self::menu::{
    DEFAULT_MENU_TTL_HOURS, FEED_LIMIT, FeedEntry, FeedFilter, MenuDraft, MenuPost, MenuPostView,
    MenuValidationError,
};
pub use self::menu_service::MenuService;
pub use self::mess::{Area, Mess, MessDraft, MessProfileChanges, MessProfileError};
pub use self::mess_directory_service::MessDirectoryService;
pub use self::platform_service::PlatformService;
pub use self::poll::{
    DEFAULT_POLL_DEADLINE_HOURS, MAX_POLL_OPTIONS, MIN_POLL_OPTIONS, Poll, PollDraft, PollStatus,
    PollSummary, PollValidationError, PollVote, compute_winner,
};
pub use self::poll_service::PollService;
pub use self::trace_id::TraceId;
pub use self::vocabulary::ParseVariantError;
