use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::station::{
    NewStation as DomainNewStation, Station as DomainStation, UpdateStation as DomainUpdateStation,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::stations)]
pub struct Station {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub manager_name: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::stations)]
pub struct NewStation<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub address: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub manager_name: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::stations, treat_none_as_null = true)]
pub struct UpdateStation<'a> {
    pub name: &'a str,
    pub address: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub manager_name: Option<&'a str>,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

impl From<Station> for DomainStation {
    fn from(value: Station) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            name: value.name,
            address: value.address,
            phone: value.phone,
            manager_name: value.manager_name,
            is_active: value.is_active,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewStation> for NewStation<'a> {
    fn from(value: &'a DomainNewStation) -> Self {
        Self {
            hub_id: value.hub_id,
            name: value.name.as_str(),
            address: value.address.as_deref(),
            phone: value.phone.as_deref(),
            manager_name: value.manager_name.as_deref(),
        }
    }
}

impl<'a> From<&'a DomainUpdateStation> for UpdateStation<'a> {
    fn from(value: &'a DomainUpdateStation) -> Self {
        Self {
            name: value.name.as_str(),
            address: value.address.as_deref(),
            phone: value.phone.as_deref(),
            manager_name: value.manager_name.as_deref(),
            is_active: value.is_active,
            updated_at: value.updated_at,
        }
    }
}
