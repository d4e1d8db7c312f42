//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`*Command`, `*Query`, [`MessDirectory`]) are implemented by
//! the domain services and called by inbound adapters. Driven ports
//! (`*Repository`, [`IdentityProvider`]) are implemented by outbound adapters
//! and called by the services.

mod account_command;
mod account_query;
mod account_repository;
mod attendance_command;
mod attendance_query;
mod attendance_repository;
mod dashboard_query;
mod identity_provider;
mod membership_command;
mod membership_query;
mod membership_repository;
mod menu_command;
mod menu_post_repository;
mod menu_query;
mod mess_directory;
mod mess_repository;
mod platform_query;
mod poll_command;
mod poll_query;
mod poll_repository;
mod store_error;

pub use account_command::AccountCommand;
#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_query::AccountQuery;
#[cfg(test)]
pub use account_query::MockAccountQuery;
pub use account_repository::AccountRepository;
#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use attendance_command::AttendanceCommand;
#[cfg(test)]
pub use attendance_command::MockAttendanceCommand;
pub use attendance_query::AttendanceQuery;
#[cfg(test)]
pub use attendance_query::MockAttendanceQuery;
pub use attendance_repository::AttendanceRepository;
#[cfg(test)]
pub use attendance_repository::MockAttendanceRepository;
pub use dashboard_query::{DashboardQuery, DashboardStats};
#[cfg(test)]
pub use dashboard_query::MockDashboardQuery;
pub use identity_provider::{IdentityProvider, IdentityProviderError};
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use membership_command::{CreateMembershipRequest, MembershipCommand};
#[cfg(test)]
pub use membership_command::MockMembershipCommand;
#[cfg(test)]
pub use membership_query::MockMembershipQuery;
pub use membership_query::MembershipQuery;
pub use membership_repository::MembershipRepository;
#[cfg(test)]
pub use membership_repository::MockMembershipRepository;
pub use menu_command::MenuCommand;
#[cfg(test)]
pub use menu_command::MockMenuCommand;
pub use menu_post_repository::MenuPostRepository;
#[cfg(test)]
pub use menu_post_repository::MockMenuPostRepository;
pub use menu_query::MenuQuery;
#[cfg(test)]
pub use menu_query::MockMenuQuery;
pub use mess_directory::MessDirectory;
#[cfg(test)]
pub use mess_directory::MockMessDirectory;
pub use mess_repository::MessRepository;
#[cfg(test)]
pub use mess_repository::MockMessRepository;
#[cfg(test)]
pub use platform_query::MockPlatformQuery;
pub use platform_query::{PlatformQuery, PlatformStats};
#[cfg(test)]
pub use poll_command::MockPollCommand;
pub use poll_command::{PollCommand, VoteReceipt};
#[cfg(test)]
pub use poll_query::MockPollQuery;
pub use poll_query::PollQuery;
#[cfg(test)]
pub use poll_repository::MockPollRepository;
pub use poll_repository::PollRepository;
pub use store_error::StoreError;
