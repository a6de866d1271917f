use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::permission::{PermissionMatrix, RoleTemplate};
use crate::domain::user::{
    NewUser as DomainNewUser, UpdateUser as DomainUpdateUser, User as DomainUser,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::users)]
pub struct User {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: String,
    pub station_id: Option<i32>,
    pub permissions: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub role: &'a str,
    pub station_id: Option<i32>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::users, treat_none_as_null = true)]
pub struct UpdateUser<'a> {
    pub name: &'a str,
    pub phone: Option<&'a str>,
    pub role: &'a str,
    pub station_id: Option<i32>,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

impl From<User> for DomainUser {
    fn from(value: User) -> Self {
        let permissions = value.permissions.as_deref().and_then(|json| {
            match PermissionMatrix::from_json(json) {
                Ok(matrix) => Some(matrix),
                Err(err) => {
                    log::warn!(
                        "Ignoring unreadable permissions of user {}: {err}",
                        value.id
                    );
                    None
                }
            }
        });

        Self {
            id: value.id,
            hub_id: value.hub_id,
            name: value.name,
            email: value.email,
            phone: value.phone,
            role: RoleTemplate::from(value.role.as_str()),
            station_id: value.station_id,
            permissions,
            is_active: value.is_active,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewUser> for NewUser<'a> {
    fn from(value: &'a DomainNewUser) -> Self {
        Self {
            hub_id: value.hub_id,
            name: value.name.as_str(),
            email: value.email.as_str(),
            phone: value.phone.as_deref(),
            role: value.role.as_str(),
            station_id: value.station_id,
        }
    }
}

impl<'a> From<&'a DomainUpdateUser> for UpdateUser<'a> {
    fn from(value: &'a DomainUpdateUser) -> Self {
        Self {
            name: value.name.as_str(),
            phone: value.phone.as_deref(),
            role: value.role.as_str(),
            station_id: value.station_id,
            is_active: value.is_active,
            updated_at: value.updated_at,
        }
    }
}
