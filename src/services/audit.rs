use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use serde::Deserialize;

use crate::domain::audit::{AuditAction, AuditEntry, AuditListQuery, NewAuditEntry};
use crate::domain::permission::{PermissionAction, pages};
use crate::repository::{AuditReader, AuditWriter, UserReader};
use crate::services::access::authorize;
use crate::services::{ServiceError, ServiceResult, total_pages};

/// Append an entry to the audit trail.
///
/// Failures are logged and swallowed so the audited operation still succeeds.
pub fn record<R>(
    repo: &R,
    user: &AuthenticatedUser,
    action: AuditAction,
    entity: &str,
    entity_id: Option<i32>,
    details: Option<String>,
) where
    R: AuditWriter + ?Sized,
{
    let mut entry = NewAuditEntry::new(user.hub_id, &user.email, action, entity);
    if let Some(entity_id) = entity_id {
        entry = entry.with_entity_id(entity_id);
    }
    if let Some(details) = details {
        entry = entry.with_details(details);
    }

    if let Err(err) = repo.record_audit_entry(&entry) {
        log::warn!(
            "Failed to write audit entry {} {entity} for {}: {err}",
            action.as_str(),
            user.email
        );
    }
}

/// Query parameters accepted by the audit log page.
#[derive(Debug, Default, Deserialize)]
pub struct AuditQuery {
    pub entity: Option<String>,
    pub page: Option<usize>,
}

pub struct AuditPageData {
    pub entries: Paginated<AuditEntry>,
    pub entity: Option<String>,
}

pub fn load_audit_log<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: AuditQuery,
) -> ServiceResult<AuditPageData>
where
    R: AuditReader + UserReader + ?Sized,
{
    authorize(repo, user, pages::AUDIT, PermissionAction::View)?;

    let page = query.page.unwrap_or(1);
    let entity = query
        .entity
        .map(|entity| entity.trim().to_string())
        .filter(|entity| !entity.is_empty());

    let mut list_query = AuditListQuery::new(user.hub_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(entity) = entity.as_ref() {
        list_query = list_query.entity(entity);
    }

    let (total, entries) = repo
        .list_audit_entries(list_query)
        .map_err(ServiceError::from)?;

    Ok(AuditPageData {
        entries: Paginated::new(entries, page, total_pages(total)),
        entity,
    })
}

#[cfg(test)]
mod tests {
    use pushkind_common::repository::errors::RepositoryError;

    use super::*;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{HUB_ID, admin, fixed_datetime};

    #[test]
    fn record_swallows_repository_errors() {
        let mut repo = MockRepository::new();
        repo.expect_record_audit_entry()
            .times(1)
            .withf(|entry| {
                entry.hub_id == HUB_ID
                    && entry.actor_email == "owner@example.com"
                    && entry.action == AuditAction::Delete
                    && entry.entity == "stations"
                    && entry.entity_id == Some(4)
            })
            .returning(|_| Err(RepositoryError::NotFound));

        record(&repo, &admin(), AuditAction::Delete, "stations", Some(4), None);
    }

    #[test]
    fn load_audit_log_filters_by_entity() {
        let mut repo = MockRepository::new();
        repo.expect_list_audit_entries()
            .times(1)
            .withf(|query| {
                query.hub_id == HUB_ID
                    && query.entity.as_deref() == Some("permissions")
                    && query.pagination.as_ref().map(|p| p.page) == Some(3)
            })
            .returning(|_| {
                Ok((
                    1,
                    vec![AuditEntry {
                        id: 1,
                        hub_id: HUB_ID,
                        actor_email: "owner@example.com".to_string(),
                        action: "update".to_string(),
                        entity: "permissions".to_string(),
                        entity_id: Some(21),
                        details: None,
                        created_at: fixed_datetime(),
                    }],
                ))
            });

        let data = load_audit_log(
            &repo,
            &admin(),
            AuditQuery {
                entity: Some(" permissions ".to_string()),
                page: Some(3),
            },
        )
        .expect("audit page");

        assert_eq!(data.entity.as_deref(), Some("permissions"));
    }
}
