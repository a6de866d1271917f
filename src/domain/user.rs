use chrono::NaiveDateTime;
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

use crate::domain::permission::{PermissionMatrix, RoleTemplate};

/// Back-office profile of a person signing in through the auth service.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    /// Lowercased email; matches the email claim of the auth token.
    pub email: String,
    pub phone: Option<String>,
    pub role: RoleTemplate,
    /// Home station of the user, if any.
    pub station_id: Option<i32>,
    /// Detailed permissions saved through the permission editor.
    pub permissions: Option<PermissionMatrix>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl User {
    /// Permissions in force for the profile.
    ///
    /// Saved permissions win over the role template; inactive profiles get
    /// nothing.
    pub fn effective_permissions(&self) -> PermissionMatrix {
        if !self.is_active {
            return PermissionMatrix::empty();
        }

        match &self.permissions {
            Some(matrix) => matrix.normalized(),
            None => self.role.matrix(),
        }
    }

    /// Whether the permission editor has overridden the role template.
    pub fn has_custom_permissions(&self) -> bool {
        self.permissions.is_some()
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewUser {
    pub hub_id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: RoleTemplate,
    pub station_id: Option<i32>,
}

impl NewUser {
    #[must_use]
    pub fn new(hub_id: i32, name: String, email: String) -> Self {
        Self {
            hub_id,
            name,
            email: email.trim().to_lowercase(),
            phone: None,
            role: RoleTemplate::default(),
            station_id: None,
        }
    }

    #[must_use]
    pub fn with_role(mut self, role: RoleTemplate) -> Self {
        self.role = role;
        self
    }

    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    #[must_use]
    pub fn with_station_id(mut self, station_id: i32) -> Self {
        self.station_id = Some(station_id);
        self
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateUser {
    pub name: String,
    pub phone: Option<String>,
    pub role: RoleTemplate,
    pub station_id: Option<i32>,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

impl From<&AuthenticatedUser> for NewUser {
    fn from(value: &AuthenticatedUser) -> Self {
        NewUser::new(value.hub_id, value.name.clone(), value.email.clone())
    }
}

/// Query definition used to list user profiles for a hub.
#[derive(Debug, Clone)]
pub struct UserListQuery {
    pub hub_id: i32,
    /// Optional substring search over name and email.
    pub search: Option<String>,
    pub station_id: Option<i32>,
    pub pagination: Option<Pagination>,
}

impl UserListQuery {
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            search: None,
            station_id: None,
            pagination: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn station(mut self, station_id: i32) -> Self {
        self.station_id = Some(station_id);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
