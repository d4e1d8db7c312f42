//! Outbound adapters implementing driven ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **identity**: the hosted auth service that owns passwords
//!
//! Adapters translate between domain types and infrastructure
//! representations and contain no business logic.

pub mod identity;
pub mod persistence;
