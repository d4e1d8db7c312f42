//! Port for mess and area reads and profile writes.

use async_trait::async_trait;

use crate::domain::{Area, AreaId, Mess, MessId};

use super::StoreError;

/// Storage for messes and areas.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessRepository: Send + Sync {
    /// Active areas sorted by name.
    async fn list_areas(&self) -> Result<Vec<Area>, StoreError>;

    /// Active messes sorted by name, optionally within one area.
    async fn list_messes(&self, area: Option<AreaId>) -> Result<Vec<Mess>, StoreError>;

    /// Find a mess by id, whether active or not.
    async fn find_by_id(&self, id: MessId) -> Result<Option<Mess>, StoreError>;

    /// Persist a new mess. When it names an owner, that owner's role is
    /// linked to the mess in the same transaction.
    ///
    /// Fails with [`StoreError::Conflict`] when the owner is not an owner
    /// without a mess, and [`StoreError::MissingReference`] when the area or
    /// owner does not exist.
    async fn insert(&self, mess: &Mess) -> Result<(), StoreError>;

    /// Number of messes, listed or not.
    async fn count_messes(&self) -> Result<u64, StoreError>;

    /// Overwrite the editable profile fields of a mess.
    async fn update_profile(&self, mess: &Mess) -> Result<(), StoreError>;

    /// Set the listing flag of a mess.
    async fn set_active(&self, id: MessId, active: bool) -> Result<(), StoreError>;
}
