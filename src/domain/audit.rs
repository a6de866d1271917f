use chrono::NaiveDateTime;
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

/// Kind of change recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Import,
    Upload,
    ApplyTemplate,
    BulkUpdate,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
            AuditAction::Import => "import",
            AuditAction::Upload => "upload",
            AuditAction::ApplyTemplate => "apply_template",
            AuditAction::BulkUpdate => "bulk_update",
        }
    }
}

/// Recorded administrative change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditEntry {
    pub id: i32,
    pub hub_id: i32,
    pub actor_email: String,
    pub action: String,
    /// Affected table or area, e.g. `stations` or `permissions`.
    pub entity: String,
    pub entity_id: Option<i32>,
    pub details: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Entry appended to the audit trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuditEntry {
    pub hub_id: i32,
    pub actor_email: String,
    pub action: AuditAction,
    pub entity: String,
    pub entity_id: Option<i32>,
    pub details: Option<String>,
}

impl NewAuditEntry {
    pub fn new(
        hub_id: i32,
        actor_email: impl Into<String>,
        action: AuditAction,
        entity: impl Into<String>,
    ) -> Self {
        Self {
            hub_id,
            actor_email: actor_email.into(),
            action,
            entity: entity.into(),
            entity_id: None,
            details: None,
        }
    }

    pub fn with_entity_id(mut self, entity_id: i32) -> Self {
        self.entity_id = Some(entity_id);
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Query definition used to list audit entries for a hub.
#[derive(Debug, Clone)]
pub struct AuditListQuery {
    pub hub_id: i32,
    pub entity: Option<String>,
    pub pagination: Option<Pagination>,
}

impl AuditListQuery {
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            entity: None,
            pagination: None,
        }
    }

    pub fn entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
