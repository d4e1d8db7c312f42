//! Messes and the areas they are listed under.

use super::{AreaId, MessId, UserId};

/// Neighbourhood used to group messes for guests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Area {
    /// Record identifier.
    pub id: AreaId,
    /// Display name.
    pub name: String,
    /// Whether the area is offered to guests.
    pub is_active: bool,
}

/// A meal-subscription business.
#[derive(Debug, Clone, PartialEq)]
pub struct Mess {
    /// Record identifier.
    pub id: MessId,
    /// Display name.
    pub name: String,
    /// Short marketing line.
    pub tagline: Option<String>,
    /// Cuisine the mess is known for.
    pub speciality: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Latitude in decimal degrees.
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees.
    pub longitude: Option<f64>,
    /// Phone number shown to guests.
    pub contact_number: Option<String>,
    /// Assigned owner account.
    pub owner_id: Option<UserId>,
    /// Area the mess is listed under.
    pub area_id: Option<AreaId>,
    /// Whether the mess is listed.
    pub is_active: bool,
}

/// Partial profile update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessProfileChanges {
    /// New display name; must not be blank.
    pub name: Option<String>,
    /// New tagline.
    pub tagline: Option<String>,
    /// New speciality.
    pub speciality: Option<String>,
    /// New address.
    pub address: Option<String>,
    /// New latitude.
    pub latitude: Option<f64>,
    /// New longitude.
    pub longitude: Option<f64>,
    /// New phone number.
    pub contact_number: Option<String>,
    /// New area.
    pub area_id: Option<AreaId>,
}

/// Failure raised by [`Mess::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MessProfileError {
    /// Name empty once trimmed.
    #[error("name must not be blank")]
    BlankName,
    /// Coordinate outside the valid range.
    #[error("coordinates must be valid latitude and longitude values")]
    InvalidCoordinates,
}

/// A new mess as submitted by a super-admin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessDraft {
    /// Display name; must not be blank.
    pub name: String,
    /// Area to list the mess under.
    pub area_id: Option<AreaId>,
    /// Owner account to link; must be an owner without a mess.
    pub owner_id: Option<UserId>,
    /// Short marketing line.
    pub tagline: Option<String>,
    /// Street address.
    pub address: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

impl MessDraft {
    /// Validate the draft into a listed mess with the given id.
    pub fn into_mess(self, id: MessId) -> Result<Mess, MessProfileError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(MessProfileError::BlankName);
        }
        Ok(Mess {
            id,
            name: name.to_owned(),
            tagline: non_blank(self.tagline),
            speciality: None,
            address: non_blank(self.address),
            latitude: None,
            longitude: None,
            contact_number: None,
            owner_id: self.owner_id,
            area_id: self.area_id,
            is_active: true,
        })
    }
}

impl Mess {
    /// Apply `changes` in place.
    pub fn apply(&mut self, changes: MessProfileChanges) -> Result<(), MessProfileError> {
        if let Some(name) = changes.name {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                return Err(MessProfileError::BlankName);
            }
            self.name = trimmed.to_owned();
        }
        if changes
            .latitude
            .is_some_and(|lat| !lat.is_finite() || !(-90.0..=90.0).contains(&lat))
            || changes
                .longitude
                .is_some_and(|lng| !lng.is_finite() || !(-180.0..=180.0).contains(&lng))
        {
            return Err(MessProfileError::InvalidCoordinates);
        }
        if changes.tagline.is_some() {
            self.tagline = changes.tagline;
        }
        if changes.speciality.is_some() {
            self.speciality = changes.speciality;
        }
        if changes.address.is_some() {
            self.address = changes.address;
        }
        if changes.latitude.is_some() {
            self.latitude = changes.latitude;
        }
        if changes.longitude.is_some() {
            self.longitude = changes.longitude;
        }
        if changes.contact_number.is_some() {
            self.contact_number = changes.contact_number;
        }
        if changes.area_id.is_some() {
            self.area_id = changes.area_id;
        }
        Ok(())
    }
}
