//! Driving port for the mess directory.

use async_trait::async_trait;

use crate::domain::{Actor, Area, AreaId, Error, Mess, MessDraft, MessId, MessProfileChanges};

/// Domain use-case port for browsing and administering messes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessDirectory: Send + Sync {
    /// Active areas sorted by name.
    async fn list_areas(&self) -> Result<Vec<Area>, Error>;

    /// Active messes sorted by name, optionally within one area.
    async fn list_messes(&self, area: Option<AreaId>) -> Result<Vec<Mess>, Error>;

    /// One mess.
    async fn get_mess(&self, mess: MessId) -> Result<Mess, Error>;

    /// Edit the public profile of a mess.
    async fn update_profile(
        &self,
        actor: &Actor,
        mess: MessId,
        changes: MessProfileChanges,
    ) -> Result<Mess, Error>;

    /// Create a listed mess, linking the named owner to it.
    ///
    /// Super-admin only. The owner must hold the owner role and no mess yet.
    async fn create_mess(&self, actor: &Actor, draft: MessDraft) -> Result<Mess, Error>;

    /// List or unlist a mess.
    async fn set_active(&self, actor: &Actor, mess: MessId, active: bool) -> Result<Mess, Error>;
}
