use chrono::{NaiveDate, NaiveDateTime};
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

/// Staff member working at one of the hub's stations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Employee {
    pub id: i32,
    pub hub_id: i32,
    /// Station the employee is assigned to.
    pub station_id: Option<i32>,
    pub first_name: String,
    pub last_name: String,
    /// Job title such as "Cashier" or "Shift lead".
    pub position: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub hire_date: NaiveDate,
    /// Hourly pay rate in cents.
    pub hourly_rate_cents: i32,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Payload required to insert a new employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub hub_id: i32,
    pub station_id: Option<i32>,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub hire_date: NaiveDate,
    pub hourly_rate_cents: i32,
}

/// Full replacement of the editable employee fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateEmployee {
    pub station_id: Option<i32>,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub hire_date: NaiveDate,
    pub hourly_rate_cents: i32,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

/// Query definition used to list employees for a hub.
#[derive(Debug, Clone)]
pub struct EmployeeListQuery {
    pub hub_id: i32,
    pub station_id: Option<i32>,
    /// Optional substring search over first name, last name and position.
    pub search: Option<String>,
    pub active_only: bool,
    pub pagination: Option<Pagination>,
}

impl EmployeeListQuery {
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            station_id: None,
            search: None,
            active_only: false,
            pagination: None,
        }
    }

    pub fn station(mut self, station_id: i32) -> Self {
        self.station_id = Some(station_id);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn active_only(mut self) -> Self {
        self.active_only = true;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
