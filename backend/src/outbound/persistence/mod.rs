//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Each repository implements one driven port from
//! [`crate::domain::ports`] on top of a shared `bb8` pool of `diesel-async`
//! connections. Row structs and the table DSL stay private to this module;
//! repositories only translate between rows and domain values.
//!
//! # Example
//!
//! ```ignore
//! use mess_backend::outbound::persistence::{DbPool, DieselPollRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/mess")).await?;
//! let polls = DieselPollRepository::new(pool);
//! ```

mod diesel_account_repository;
mod diesel_attendance_repository;
mod diesel_error_mapping;
mod diesel_membership_repository;
mod diesel_menu_post_repository;
mod diesel_mess_repository;
mod diesel_poll_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_attendance_repository::DieselAttendanceRepository;
pub use diesel_membership_repository::DieselMembershipRepository;
pub use diesel_menu_post_repository::DieselMenuPostRepository;
pub use diesel_mess_repository::DieselMessRepository;
pub use diesel_poll_repository::DieselPollRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
