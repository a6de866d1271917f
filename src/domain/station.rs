use chrono::NaiveDateTime;
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

/// Physical gas station operated by a hub.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Station {
    /// Unique identifier of the station.
    pub id: i32,
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Display name, e.g. "Main St #4".
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    /// Name of the manager on duty for the location.
    pub manager_name: Option<String>,
    /// Inactive stations are hidden from entry forms but keep their history.
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new station for a hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStation {
    pub hub_id: i32,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub manager_name: Option<String>,
}

impl NewStation {
    /// Construct a new station payload with a trimmed name.
    pub fn new(hub_id: i32, name: impl Into<String>) -> Self {
        Self {
            hub_id,
            name: name.into().trim().to_string(),
            address: None,
            phone: None,
            manager_name: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_manager_name(mut self, manager_name: impl Into<String>) -> Self {
        self.manager_name = Some(manager_name.into());
        self
    }
}

/// Patch data applied when updating an existing station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStation {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub manager_name: Option<String>,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

/// Query definition used to list stations for a hub.
#[derive(Debug, Clone)]
pub struct StationListQuery {
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Optional substring search over name and address.
    pub search: Option<String>,
    /// Restrict the list to active stations.
    pub active_only: bool,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl StationListQuery {
    /// Construct a query that targets all stations belonging to `hub_id`.
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            search: None,
            active_only: false,
            pagination: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn active_only(mut self) -> Self {
        self.active_only = true;
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
