//! Permission editor: per-profile matrices, role templates and bulk changes.

use pushkind_common::domain::auth::AuthenticatedUser;
use serde::{Deserialize, Serialize};

use crate::domain::audit::AuditAction;
use crate::domain::permission::{
    PageGroup, PagePermissions, PermissionAction, PermissionMatrix, RoleTemplate, pages,
    pages_in_group,
};
use crate::domain::user::{User, UserListQuery};
use crate::forms::permissions::{ApplyTemplateForm, BulkGroupForm, SavePermissionsForm};
use crate::repository::{AuditWriter, UserReader, UserWriter};
use crate::services::access::{authorize, effective_permissions};
use crate::services::{ServiceError, ServiceResult, audit};

#[derive(Debug, Default, Deserialize)]
pub struct PermissionsQuery {
    pub user_id: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct PageRow {
    pub key: &'static str,
    pub label: &'static str,
    pub permissions: PagePermissions,
}

/// Registry pages of one group, with the flags of a matrix.
#[derive(Debug, Serialize)]
pub struct GroupRows {
    pub key: &'static str,
    pub label: &'static str,
    pub pages: Vec<PageRow>,
}

#[derive(Debug, Serialize)]
pub struct TemplateOption {
    pub key: &'static str,
    pub label: &'static str,
}

/// Matrix of the profile being edited.
#[derive(Debug, Serialize)]
pub struct ProfilePermissions {
    pub profile: User,
    pub groups: Vec<GroupRows>,
    pub has_custom: bool,
}

pub struct PermissionEditorData {
    pub profiles: Vec<User>,
    pub selected: Option<ProfilePermissions>,
    pub actions: Vec<&'static str>,
    pub templates: Vec<TemplateOption>,
}

/// Role templates as offered in selects.
pub fn template_options() -> Vec<TemplateOption> {
    RoleTemplate::ALL
        .into_iter()
        .map(|template| TemplateOption {
            key: template.as_str(),
            label: template.label(),
        })
        .collect()
}

/// Registry grouped for display, flags taken from `matrix`.
pub fn group_rows(matrix: &PermissionMatrix) -> Vec<GroupRows> {
    PageGroup::ALL
        .into_iter()
        .map(|group| GroupRows {
            key: group.as_str(),
            label: group.label(),
            pages: pages_in_group(group)
                .map(|page| PageRow {
                    key: page.key,
                    label: page.label,
                    permissions: matrix.page(page.key),
                })
                .collect(),
        })
        .collect()
}

/// Every registry page, grouped, with nothing granted.
pub fn permission_registry() -> Vec<GroupRows> {
    group_rows(&PermissionMatrix::empty())
}

fn profile_in_hub<R>(repo: &R, user: &AuthenticatedUser, user_id: i32) -> ServiceResult<User>
where
    R: UserReader + ?Sized,
{
    repo.get_user_by_id(user_id, user.hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)
}

pub fn load_permission_editor<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: PermissionsQuery,
) -> ServiceResult<PermissionEditorData>
where
    R: UserReader + ?Sized,
{
    authorize(repo, user, pages::PERMISSIONS, PermissionAction::View)?;

    let (_, profiles) = repo
        .list_users(UserListQuery::new(user.hub_id))
        .map_err(ServiceError::from)?;

    let selected = match query.user_id {
        Some(user_id) => {
            let profile = profile_in_hub(repo, user, user_id)?;
            Some(ProfilePermissions {
                groups: group_rows(&profile.effective_permissions()),
                has_custom: profile.has_custom_permissions(),
                profile,
            })
        }
        None => None,
    };

    Ok(PermissionEditorData {
        profiles,
        selected,
        actions: PermissionAction::ALL
            .into_iter()
            .map(PermissionAction::as_str)
            .collect(),
        templates: template_options(),
    })
}

fn store_matrix<R>(
    repo: &R,
    user: &AuthenticatedUser,
    profile: &User,
    matrix: Option<&PermissionMatrix>,
    action: AuditAction,
    details: Option<String>,
) -> ServiceResult<User>
where
    R: UserWriter + AuditWriter + ?Sized,
{
    let updated = repo
        .save_user_permissions(profile.id, user.hub_id, matrix)
        .map_err(ServiceError::from)?;

    audit::record(
        repo,
        user,
        action,
        pages::PERMISSIONS,
        Some(profile.id),
        details.or_else(|| Some(profile.email.clone())),
    );
    Ok(updated)
}

/// Save the checkbox matrix of the editor.
pub fn save_permissions<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: SavePermissionsForm,
) -> ServiceResult<User>
where
    R: UserReader + UserWriter + AuditWriter + ?Sized,
{
    authorize(repo, user, pages::PERMISSIONS, PermissionAction::Edit)?;

    let profile = profile_in_hub(repo, user, form.user_id)?;
    let matrix = form.to_matrix();

    store_matrix(repo, user, &profile, Some(&matrix), AuditAction::Update, None)
}

/// Overwrite the profile's matrix with a template preset.
pub fn apply_template<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: ApplyTemplateForm,
) -> ServiceResult<User>
where
    R: UserReader + UserWriter + AuditWriter + ?Sized,
{
    authorize(repo, user, pages::PERMISSIONS, PermissionAction::Edit)?;

    let template = form
        .template()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    let profile = profile_in_hub(repo, user, form.user_id)?;

    store_matrix(
        repo,
        user,
        &profile,
        Some(&template.matrix()),
        AuditAction::ApplyTemplate,
        Some(format!("{}: {}", profile.email, template.as_str())),
    )
}

/// Grant or revoke every action on the pages of a group.
pub fn bulk_update_group<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: BulkGroupForm,
) -> ServiceResult<User>
where
    R: UserReader + UserWriter + AuditWriter + ?Sized,
{
    authorize(repo, user, pages::PERMISSIONS, PermissionAction::Edit)?;

    let group = form
        .group()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    let profile = profile_in_hub(repo, user, form.user_id)?;

    let mut matrix = profile.effective_permissions();
    matrix.set_group(group, form.grant);

    let verb = if form.grant { "grant" } else { "revoke" };
    store_matrix(
        repo,
        user,
        &profile,
        Some(&matrix),
        AuditAction::BulkUpdate,
        Some(format!("{}: {verb} {}", profile.email, group.as_str())),
    )
}

/// Drop the saved matrix so the role template applies again.
pub fn reset_permissions<R>(repo: &R, user: &AuthenticatedUser, user_id: i32) -> ServiceResult<User>
where
    R: UserReader + UserWriter + AuditWriter + ?Sized,
{
    authorize(repo, user, pages::PERMISSIONS, PermissionAction::Edit)?;

    let profile = profile_in_hub(repo, user, user_id)?;
    store_matrix(repo, user, &profile, None, AuditAction::Update, None)
}

/// Effective matrix of the signed-in user.
pub fn my_permissions<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<PermissionMatrix>
where
    R: UserReader + ?Sized,
{
    effective_permissions(repo, user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::permission::PAGE_REGISTRY;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{HUB_ID, admin, audit_entry, member, profile};

    fn with_matrix(mut user: User, matrix: Option<&PermissionMatrix>) -> User {
        user.permissions = matrix.cloned();
        user
    }

    #[test]
    fn registry_groups_cover_every_page() {
        let groups = permission_registry();

        let pages: usize = groups.iter().map(|group| group.pages.len()).sum();
        assert_eq!(groups.len(), 4);
        assert_eq!(pages, PAGE_REGISTRY.len());
        assert!(
            groups
                .iter()
                .flat_map(|group| &group.pages)
                .all(|page| !page.permissions.any())
        );
    }

    #[test]
    fn editor_shows_profile_matrix() {
        let mut repo = MockRepository::new();
        repo.expect_list_users()
            .returning(|_| Ok((1, vec![profile(RoleTemplate::Employee)])));
        repo.expect_get_user_by_id()
            .withf(|id, hub| *id == 21 && *hub == HUB_ID)
            .returning(|_, _| Ok(Some(profile(RoleTemplate::Employee))));

        let data = load_permission_editor(
            &repo,
            &admin(),
            PermissionsQuery { user_id: Some(21) },
        )
        .expect("editor");

        let selected = data.selected.expect("selected profile");
        assert!(!selected.has_custom);
        let sales = selected
            .groups
            .iter()
            .flat_map(|group| &group.pages)
            .find(|page| page.key == pages::SALES)
            .expect("sales row");
        assert!(sales.permissions.view && sales.permissions.create);
        assert!(!sales.permissions.delete);
        assert_eq!(data.actions.len(), 6);
        assert_eq!(data.templates.len(), 4);
    }

    #[test]
    fn save_stores_checked_boxes_and_audits() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_id()
            .returning(|_, _| Ok(Some(profile(RoleTemplate::Employee))));
        repo.expect_save_user_permissions()
            .withf(|id, hub, matrix| {
                *id == 21
                    && *hub == HUB_ID
                    && matrix.is_some_and(|matrix| {
                        matrix.allows(pages::AUDIT, PermissionAction::View)
                            && !matrix.allows(pages::SALES, PermissionAction::View)
                    })
            })
            .times(1)
            .returning(|_, _, matrix| Ok(with_matrix(profile(RoleTemplate::Employee), matrix)));
        repo.expect_record_audit_entry()
            .withf(|entry| entry.action == AuditAction::Update && entry.entity == pages::PERMISSIONS)
            .times(1)
            .returning(|entry| Ok(audit_entry(entry)));

        let form = SavePermissionsForm {
            user_id: 21,
            grants: vec!["audit:view".to_string()],
        };
        let updated = save_permissions(&repo, &admin(), form).expect("saved");

        assert!(updated.has_custom_permissions());
    }

    #[test]
    fn template_overwrites_custom_matrix() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_id().returning(|_, _| {
            let mut custom = PermissionMatrix::empty();
            custom.set(pages::USERS, PermissionAction::Delete, true);
            Ok(Some(with_matrix(profile(RoleTemplate::Employee), Some(&custom))))
        });
        repo.expect_save_user_permissions()
            .withf(|_, _, matrix| matrix == &Some(&RoleTemplate::ReadOnly.matrix()))
            .times(1)
            .returning(|_, _, matrix| Ok(with_matrix(profile(RoleTemplate::Employee), matrix)));
        repo.expect_record_audit_entry()
            .withf(|entry| {
                entry.action == AuditAction::ApplyTemplate
                    && entry.details.as_deref() == Some("clerk@example.com: read_only")
            })
            .times(1)
            .returning(|entry| Ok(audit_entry(entry)));

        let form = ApplyTemplateForm {
            user_id: 21,
            template: "read-only".to_string(),
        };
        let updated = apply_template(&repo, &admin(), form).expect("applied");

        assert!(!updated.effective_permissions().allows(pages::USERS, PermissionAction::Delete));
    }

    #[test]
    fn bulk_grant_starts_from_effective_matrix() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_id()
            .returning(|_, _| Ok(Some(profile(RoleTemplate::Employee))));
        repo.expect_save_user_permissions()
            .withf(|_, _, matrix| {
                matrix.is_some_and(|matrix| {
                    matrix.allows(pages::LICENSES, PermissionAction::Delete)
                        && matrix.allows(pages::SMS, PermissionAction::Print)
                        && matrix.allows(pages::SALES, PermissionAction::Create)
                        && !matrix.allows(pages::USERS, PermissionAction::View)
                })
            })
            .times(1)
            .returning(|_, _, matrix| Ok(with_matrix(profile(RoleTemplate::Employee), matrix)));
        repo.expect_record_audit_entry()
            .returning(|entry| Ok(audit_entry(entry)));

        let form = BulkGroupForm {
            user_id: 21,
            group: "compliance".to_string(),
            grant: true,
        };

        assert!(bulk_update_group(&repo, &admin(), form).is_ok());
    }

    #[test]
    fn unknown_template_is_a_form_error() {
        let repo = MockRepository::new();
        let form = ApplyTemplateForm {
            user_id: 21,
            template: "owner".to_string(),
        };

        assert!(matches!(
            apply_template(&repo, &admin(), form),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn employee_cannot_edit_permissions() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_email()
            .returning(|_, _| Ok(Some(profile(RoleTemplate::Employee))));
        repo.expect_save_user_permissions().never();

        let form = SavePermissionsForm {
            user_id: 21,
            grants: vec![],
        };

        assert!(matches!(
            save_permissions(&repo, &member(), form),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn reset_clears_saved_matrix() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_id()
            .returning(|_, _| Ok(Some(profile(RoleTemplate::Manager))));
        repo.expect_save_user_permissions()
            .withf(|_, _, matrix| matrix.is_none())
            .times(1)
            .returning(|_, _, _| Ok(profile(RoleTemplate::Manager)));
        repo.expect_record_audit_entry()
            .returning(|entry| Ok(audit_entry(entry)));

        let updated = reset_permissions(&repo, &admin(), 21).expect("reset");

        assert!(!updated.has_custom_permissions());
    }

    #[test]
    fn member_reads_own_matrix() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_email()
            .withf(|email, hub| email == "clerk@example.com" && *hub == HUB_ID)
            .returning(|_, _| Ok(Some(profile(RoleTemplate::ReadOnly))));

        let matrix = my_permissions(&repo, &member()).expect("matrix");

        assert_eq!(matrix, RoleTemplate::ReadOnly.matrix());
    }
}
