use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::audit::{AuditEntry as DomainAuditEntry, NewAuditEntry as DomainNewAuditEntry};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::audit_logs)]
pub struct AuditEntry {
    pub id: i32,
    pub hub_id: i32,
    pub actor_email: String,
    pub action: String,
    pub entity: String,
    pub entity_id: Option<i32>,
    pub details: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::audit_logs)]
pub struct NewAuditEntry<'a> {
    pub hub_id: i32,
    pub actor_email: &'a str,
    pub action: &'a str,
    pub entity: &'a str,
    pub entity_id: Option<i32>,
    pub details: Option<&'a str>,
}

impl From<AuditEntry> for DomainAuditEntry {
    fn from(value: AuditEntry) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            actor_email: value.actor_email,
            action: value.action,
            entity: value.entity,
            entity_id: value.entity_id,
            details: value.details,
            created_at: value.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewAuditEntry> for NewAuditEntry<'a> {
    fn from(value: &'a DomainNewAuditEntry) -> Self {
        Self {
            hub_id: value.hub_id,
            actor_email: value.actor_email.as_str(),
            action: value.action.as_str(),
            entity: value.entity.as_str(),
            entity_id: value.entity_id,
            details: value.details.as_deref(),
        }
    }
}
