use chrono::Local;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::station::{NewStation, UpdateStation};
use crate::forms::{NAME_MAX_LEN, optional_inline, sanitize_inline_text};

/// Result type returned by the station form helpers.
pub type StationFormResult<T> = Result<T, StationFormError>;

/// Errors that can occur while processing station forms.
#[derive(Debug, Error)]
pub enum StationFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("station name cannot be empty")]
    EmptyName,
}

/// Payload of the "Add station" form.
#[derive(Debug, Deserialize, Validate)]
pub struct AddStationForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    pub address: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    #[validate(length(max = NAME_MAX_LEN))]
    pub manager_name: Option<String>,
}

impl AddStationForm {
    pub fn into_new_station(self, hub_id: i32) -> StationFormResult<NewStation> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(StationFormError::EmptyName);
        }

        let mut station = NewStation::new(hub_id, name);
        if let Some(address) = optional_inline(self.address.as_deref()) {
            station = station.with_address(address);
        }
        if let Some(phone) = optional_inline(self.phone.as_deref()) {
            station = station.with_phone(phone);
        }
        if let Some(manager_name) = optional_inline(self.manager_name.as_deref()) {
            station = station.with_manager_name(manager_name);
        }

        Ok(station)
    }
}

/// Payload of the "Edit station" form. Blank optional fields clear the value.
#[derive(Debug, Deserialize, Validate)]
pub struct EditStationForm {
    pub station_id: i32,
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    pub address: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    #[validate(length(max = NAME_MAX_LEN))]
    pub manager_name: Option<String>,
    /// Unchecked checkboxes are not submitted at all.
    #[serde(default)]
    pub is_active: bool,
}

impl EditStationForm {
    pub fn into_update_station(self) -> StationFormResult<UpdateStation> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(StationFormError::EmptyName);
        }

        Ok(UpdateStation {
            name,
            address: optional_inline(self.address.as_deref()),
            phone: optional_inline(self.phone.as_deref()),
            manager_name: optional_inline(self.manager_name.as_deref()),
            is_active: self.is_active,
            updated_at: Local::now().naive_utc(),
        })
    }
}
