use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::license::{
    License as DomainLicense, NewLicense as DomainNewLicense, UpdateLicense as DomainUpdateLicense,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::licenses)]
pub struct License {
    pub id: i32,
    pub hub_id: i32,
    pub station_id: Option<i32>,
    pub name: String,
    pub license_number: Option<String>,
    pub authority: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub expiry_date: NaiveDate,
    pub document_path: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::licenses)]
pub struct NewLicense<'a> {
    pub hub_id: i32,
    pub station_id: Option<i32>,
    pub name: &'a str,
    pub license_number: Option<&'a str>,
    pub authority: Option<&'a str>,
    pub issue_date: Option<NaiveDate>,
    pub expiry_date: NaiveDate,
    pub notes: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::licenses, treat_none_as_null = true)]
pub struct UpdateLicense<'a> {
    pub station_id: Option<i32>,
    pub name: &'a str,
    pub license_number: Option<&'a str>,
    pub authority: Option<&'a str>,
    pub issue_date: Option<NaiveDate>,
    pub expiry_date: NaiveDate,
    pub notes: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl From<License> for DomainLicense {
    fn from(value: License) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            station_id: value.station_id,
            name: value.name,
            license_number: value.license_number,
            authority: value.authority,
            issue_date: value.issue_date,
            expiry_date: value.expiry_date,
            document_path: value.document_path,
            notes: value.notes,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewLicense> for NewLicense<'a> {
    fn from(value: &'a DomainNewLicense) -> Self {
        Self {
            hub_id: value.hub_id,
            station_id: value.station_id,
            name: value.name.as_str(),
            license_number: value.license_number.as_deref(),
            authority: value.authority.as_deref(),
            issue_date: value.issue_date,
            expiry_date: value.expiry_date,
            notes: value.notes.as_deref(),
        }
    }
}

impl<'a> From<&'a DomainUpdateLicense> for UpdateLicense<'a> {
    fn from(value: &'a DomainUpdateLicense) -> Self {
        Self {
            station_id: value.station_id,
            name: value.name.as_str(),
            license_number: value.license_number.as_deref(),
            authority: value.authority.as_deref(),
            issue_date: value.issue_date,
            expiry_date: value.expiry_date,
            notes: value.notes.as_deref(),
            updated_at: value.updated_at,
        }
    }
}
