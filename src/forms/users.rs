use chrono::Local;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::permission::RoleTemplate;
use crate::domain::user::{NewUser, UpdateUser};
use crate::forms::{NAME_MAX_LEN, blank_as_none, optional_inline, sanitize_inline_text};

/// Result type returned by the user form helpers.
pub type UserFormResult<T> = Result<T, UserFormError>;

/// Errors that can occur while processing user profile forms.
#[derive(Debug, Error)]
pub enum UserFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("user name cannot be empty")]
    EmptyName,
    #[error("unknown role `{0}`")]
    UnknownRole(String),
}

fn parse_role(value: &str) -> UserFormResult<RoleTemplate> {
    RoleTemplate::parse(value).ok_or_else(|| UserFormError::UnknownRole(value.trim().to_string()))
}

/// Payload of the "Add user" form.
#[derive(Debug, Deserialize, Validate)]
pub struct AddUserForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    pub role: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub station_id: Option<i32>,
}

impl AddUserForm {
    pub fn into_new_user(self, hub_id: i32) -> UserFormResult<NewUser> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(UserFormError::EmptyName);
        }
        let role = parse_role(&self.role)?;

        let mut user = NewUser::new(hub_id, name, self.email).with_role(role);
        if let Some(phone) = optional_inline(self.phone.as_deref()) {
            user = user.with_phone(phone);
        }
        if let Some(station_id) = self.station_id {
            user = user.with_station_id(station_id);
        }

        Ok(user)
    }
}

/// Payload of the "Edit user" form.
#[derive(Debug, Deserialize, Validate)]
pub struct EditUserForm {
    pub user_id: i32,
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    pub role: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub station_id: Option<i32>,
    #[serde(default)]
    pub is_active: bool,
}

impl EditUserForm {
    pub fn into_update_user(self) -> UserFormResult<UpdateUser> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(UserFormError::EmptyName);
        }

        Ok(UpdateUser {
            name,
            phone: optional_inline(self.phone.as_deref()),
            role: parse_role(&self.role)?,
            station_id: self.station_id,
            is_active: self.is_active,
            updated_at: Local::now().naive_utc(),
        })
    }
}
