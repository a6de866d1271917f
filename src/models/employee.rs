use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::employee::{
    Employee as DomainEmployee, NewEmployee as DomainNewEmployee,
    UpdateEmployee as DomainUpdateEmployee,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::employees)]
pub struct Employee {
    pub id: i32,
    pub hub_id: i32,
    pub station_id: Option<i32>,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub hire_date: NaiveDate,
    pub hourly_rate_cents: i32,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::employees)]
pub struct NewEmployee<'a> {
    pub hub_id: i32,
    pub station_id: Option<i32>,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub position: &'a str,
    pub phone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub hire_date: NaiveDate,
    pub hourly_rate_cents: i32,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::employees, treat_none_as_null = true)]
pub struct UpdateEmployee<'a> {
    pub station_id: Option<i32>,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub position: &'a str,
    pub phone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub hire_date: NaiveDate,
    pub hourly_rate_cents: i32,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

impl From<Employee> for DomainEmployee {
    fn from(value: Employee) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            station_id: value.station_id,
            first_name: value.first_name,
            last_name: value.last_name,
            position: value.position,
            phone: value.phone,
            email: value.email,
            hire_date: value.hire_date,
            hourly_rate_cents: value.hourly_rate_cents,
            is_active: value.is_active,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewEmployee> for NewEmployee<'a> {
    fn from(value: &'a DomainNewEmployee) -> Self {
        Self {
            hub_id: value.hub_id,
            station_id: value.station_id,
            first_name: value.first_name.as_str(),
            last_name: value.last_name.as_str(),
            position: value.position.as_str(),
            phone: value.phone.as_deref(),
            email: value.email.as_deref(),
            hire_date: value.hire_date,
            hourly_rate_cents: value.hourly_rate_cents,
        }
    }
}

impl<'a> From<&'a DomainUpdateEmployee> for UpdateEmployee<'a> {
    fn from(value: &'a DomainUpdateEmployee) -> Self {
        Self {
            station_id: value.station_id,
            first_name: value.first_name.as_str(),
            last_name: value.last_name.as_str(),
            position: value.position.as_str(),
            phone: value.phone.as_deref(),
            email: value.email.as_deref(),
            hire_date: value.hire_date,
            hourly_rate_cents: value.hourly_rate_cents,
            is_active: value.is_active,
            updated_at: value.updated_at,
        }
    }
}
