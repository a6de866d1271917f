use chrono::{NaiveDate, NaiveDateTime};
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::audit::{AuditEntry, NewAuditEntry};
use crate::domain::permission::RoleTemplate;
use crate::domain::station::Station;
use crate::domain::user::User;

pub const HUB_ID: i32 = 7;

pub fn fixed_datetime() -> NaiveDateTime {
    match NaiveDate::from_ymd_opt(2024, 1, 1) {
        Some(date) => date.and_hms_opt(0, 0, 0).unwrap_or_default(),
        None => NaiveDateTime::default(),
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn user_with_roles(email: &str, roles: &[&str]) -> AuthenticatedUser {
    AuthenticatedUser {
        sub: "user-1".to_string(),
        email: email.to_string(),
        hub_id: HUB_ID,
        name: "Tester".to_string(),
        roles: roles.iter().map(|role| (*role).to_string()).collect(),
        exp: 0,
    }
}

/// Signed-in user holding the hub admin role.
pub fn admin() -> AuthenticatedUser {
    user_with_roles("owner@example.com", &[SERVICE_ACCESS_ROLE])
}

/// Signed-in user without the admin role; access comes from the profile.
pub fn member() -> AuthenticatedUser {
    user_with_roles("clerk@example.com", &[])
}

/// Active profile of [`member`] with the given role template.
pub fn profile(role: RoleTemplate) -> User {
    User {
        id: 21,
        hub_id: HUB_ID,
        name: "Casey Clerk".to_string(),
        email: "clerk@example.com".to_string(),
        phone: None,
        role,
        station_id: Some(1),
        permissions: None,
        is_active: true,
        created_at: fixed_datetime(),
        updated_at: fixed_datetime(),
    }
}

pub fn station(id: i32, name: &str) -> Station {
    Station {
        id,
        hub_id: HUB_ID,
        name: name.to_string(),
        address: None,
        phone: None,
        manager_name: None,
        is_active: true,
        created_at: fixed_datetime(),
        updated_at: fixed_datetime(),
    }
}

/// What the repository hands back after storing `entry`.
pub fn audit_entry(entry: &NewAuditEntry) -> AuditEntry {
    AuditEntry {
        id: 1,
        hub_id: entry.hub_id,
        actor_email: entry.actor_email.clone(),
        action: entry.action.as_str().to_string(),
        entity: entry.entity.clone(),
        entity_id: entry.entity_id,
        details: entry.details.clone(),
        created_at: fixed_datetime(),
    }
}
