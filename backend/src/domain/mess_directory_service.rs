//! Mess and area directory service.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{MessDirectory, MessRepository, StoreError};
use crate::domain::{
    Actor, Area, AreaId, Error, Mess, MessDraft, MessId, MessProfileChanges, MessProfileError,
};

fn map_profile_error(error: MessProfileError) -> Error {
    let field = match error {
        MessProfileError::BlankName => "name",
        MessProfileError::InvalidCoordinates => "coordinates",
    };
    Error::invalid_request(error.to_string()).with_details(json!({ "field": field }))
}

fn map_insert_error(error: StoreError) -> Error {
    match error {
        StoreError::Conflict { .. } => {
            Error::invalid_request("owner is not an owner without a mess")
                .with_details(json!({ "field": "ownerId", "code": "owner_unavailable" }))
        }
        StoreError::MissingReference { .. } => {
            Error::invalid_request("area or owner does not exist")
                .with_details(json!({ "code": "unknown_reference" }))
        }
        other => other.into(),
    }
}

/// Directory service implementing [`MessDirectory`].
#[derive(Clone)]
pub struct MessDirectoryService<R> {
    messes: Arc<R>,
}

impl<R> MessDirectoryService<R> {
    /// Create a new service over the mess repository.
    pub fn new(messes: Arc<R>) -> Self {
        Self { messes }
    }
}

#[async_trait]
impl<R> MessDirectory for MessDirectoryService<R>
where
    R: MessRepository,
{
    async fn list_areas(&self) -> Result<Vec<Area>, Error> {
        let mut areas: Vec<Area> = self
            .messes
            .list_areas()
            .await?
            .into_iter()
            .filter(|area| area.is_active)
            .collect();
        areas.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(areas)
    }

    async fn list_messes(&self, area: Option<AreaId>) -> Result<Vec<Mess>, Error> {
        let mut messes: Vec<Mess> = self
            .messes
            .list_messes(area)
            .await?
            .into_iter()
            .filter(|mess| mess.is_active)
            .filter(|mess| area.is_none() || mess.area_id == area)
            .collect();
        messes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(messes)
    }

    async fn get_mess(&self, mess: MessId) -> Result<Mess, Error> {
        self.messes
            .find_by_id(mess)
            .await?
            .ok_or_else(|| Error::not_found(format!("mess {mess} not found")))
    }

    async fn update_profile(
        &self,
        actor: &Actor,
        mess: MessId,
        changes: MessProfileChanges,
    ) -> Result<Mess, Error> {
        actor.ensure_manages(mess)?;
        let mut record = self.get_mess(mess).await?;
        record.apply(changes).map_err(map_profile_error)?;
        self.messes.update_profile(&record).await?;
        info!(mess_id = %record.id, "mess profile updated");
        Ok(record)
    }

    async fn create_mess(&self, actor: &Actor, draft: MessDraft) -> Result<Mess, Error> {
        actor.ensure_super_admin()?;
        let mess = draft
            .into_mess(MessId::random())
            .map_err(map_profile_error)?;
        self.messes.insert(&mess).await.map_err(map_insert_error)?;
        info!(
            mess_id = %mess.id,
            owner_id = ?mess.owner_id,
            area_id = ?mess.area_id,
            "mess created"
        );
        Ok(mess)
    }

    async fn set_active(&self, actor: &Actor, mess: MessId, active: bool) -> Result<Mess, Error> {
        actor.ensure_super_admin()?;
        let mut record = self.get_mess(mess).await?;
        self.messes.set_active(mess, active).await?;
        record.is_active = active;
        info!(mess_id = %mess, active, "mess activation changed");
        Ok(record)
    }
}
