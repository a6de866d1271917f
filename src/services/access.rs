//! Page/action authorization against the detailed permission matrix.

use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::check_role;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::permission::{PermissionAction, PermissionMatrix, RoleTemplate};
use crate::repository::UserReader;
use crate::services::{ServiceError, ServiceResult};

/// Permissions in force for the signed-in user.
///
/// Holders of the hub admin role get the administrator preset. Everyone else
/// gets the effective matrix of their profile, or nothing without one.
pub fn effective_permissions<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<PermissionMatrix>
where
    R: UserReader + ?Sized,
{
    if check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Ok(RoleTemplate::Administrator.matrix());
    }

    let profile = repo
        .get_user_by_email(&user.email, user.hub_id)
        .map_err(ServiceError::from)?;

    Ok(profile
        .map(|profile| profile.effective_permissions())
        .unwrap_or_else(PermissionMatrix::empty))
}

/// Fail with `Unauthorized` unless `user` may perform `action` on `page`.
pub fn authorize<R>(
    repo: &R,
    user: &AuthenticatedUser,
    page: &str,
    action: PermissionAction,
) -> ServiceResult<()>
where
    R: UserReader + ?Sized,
{
    if check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Ok(());
    }

    let profile = repo
        .get_user_by_email(&user.email, user.hub_id)
        .map_err(ServiceError::from)?;

    match profile {
        Some(profile) if profile.effective_permissions().allows(page, action) => Ok(()),
        Some(_) => {
            log::debug!(
                "{} lacks {}:{} in hub {}",
                user.email,
                page,
                action.as_str(),
                user.hub_id
            );
            Err(ServiceError::Unauthorized)
        }
        None => Err(ServiceError::Unauthorized),
    }
}
