//! Driving port for the owner dashboard.

use async_trait::async_trait;

use crate::domain::{Actor, Error, MessId};

/// Headline numbers for one mess today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardStats {
    /// Memberships whose derived status is active or expiring soon.
    pub active_members: u64,
    /// Members present at lunch today.
    pub lunch_today: u64,
    /// Members present at dinner today.
    pub dinner_today: u64,
    /// Memberships ending within the alert window.
    pub expiring_count: u64,
}

/// Domain use-case port for dashboard statistics.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardQuery: Send + Sync {
    /// Statistics for a mess as of now.
    async fn stats(&self, actor: &Actor, mess: MessId) -> Result<DashboardStats, Error>;
}
