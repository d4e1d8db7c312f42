//! Port for profile and role assignment storage.

use async_trait::async_trait;

use crate::domain::{Profile, Role, RoleAssignment, UserId};

use super::StoreError;

/// Storage for profiles and role assignments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Profile of an account.
    async fn find_profile(&self, user: UserId) -> Result<Option<Profile>, StoreError>;

    /// Role assignment of an account.
    async fn find_role(&self, user: UserId) -> Result<Option<RoleAssignment>, StoreError>;

    /// Clear the temporary-password marker once the holder chose a password.
    async fn clear_temporary_password(&self, user: UserId) -> Result<(), StoreError>;

    /// Profiles holding the owner role without an assigned mess, by name.
    async fn list_unassigned_owners(&self) -> Result<Vec<Profile>, StoreError>;

    /// Number of accounts granted `role`.
    async fn count_with_role(&self, role: Role) -> Result<u64, StoreError>;
}
