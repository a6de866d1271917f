use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use serde::Deserialize;

use crate::domain::audit::AuditAction;
use crate::domain::permission::{PermissionAction, pages};
use crate::domain::station::Station;
use crate::domain::user::{User, UserListQuery};
use crate::forms::users::{AddUserForm, EditUserForm};
use crate::repository::{AuditWriter, StationReader, UserReader, UserWriter};
use crate::services::access::authorize;
use crate::services::permissions::{TemplateOption, template_options};
use crate::services::stations::all_stations;
use crate::services::{ServiceError, ServiceResult, audit, total_pages};

/// Query parameters accepted by the users index page.
#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    pub search: Option<String>,
    pub page: Option<usize>,
}

pub struct UsersPageData {
    pub users: Paginated<User>,
    pub search: Option<String>,
    /// Stations offered as home station.
    pub stations: Vec<Station>,
    pub roles: Vec<TemplateOption>,
}

pub fn load_users<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: UserQuery,
) -> ServiceResult<UsersPageData>
where
    R: UserReader + StationReader + ?Sized,
{
    authorize(repo, user, pages::USERS, PermissionAction::View)?;

    let UserQuery { search, page } = query;
    let page = page.unwrap_or(1);

    let mut list_query = UserListQuery::new(user.hub_id);
    if let Some(term) = search.as_ref() {
        list_query = list_query.search(term);
    }
    list_query = list_query.paginate(page, DEFAULT_ITEMS_PER_PAGE);

    let (total, users) = repo.list_users(list_query).map_err(ServiceError::from)?;
    let stations = all_stations(repo, user.hub_id)?;

    Ok(UsersPageData {
        users: Paginated::new(users, page, total_pages(total)),
        search,
        stations,
        roles: template_options(),
    })
}

/// Create a profile; a duplicate email inside the hub is a conflict.
pub fn create_user<R>(repo: &R, user: &AuthenticatedUser, form: AddUserForm) -> ServiceResult<User>
where
    R: UserReader + UserWriter + ?Sized,
{
    authorize(repo, user, pages::USERS, PermissionAction::Create)?;

    let new_user = form
        .into_new_user(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    if repo
        .get_user_by_email(&new_user.email, user.hub_id)
        .map_err(ServiceError::from)?
        .is_some()
    {
        return Err(ServiceError::Conflict);
    }

    repo.create_user(&new_user).map_err(ServiceError::from)
}

pub fn modify_user<R>(repo: &R, user: &AuthenticatedUser, form: EditUserForm) -> ServiceResult<User>
where
    R: UserReader + UserWriter + ?Sized,
{
    authorize(repo, user, pages::USERS, PermissionAction::Edit)?;

    let user_id = form.user_id;
    let updates = form
        .into_update_user()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.update_user(user_id, user.hub_id, &updates)
        .map_err(ServiceError::from)
}

/// Delete a profile other than the caller's own.
pub fn remove_user<R>(repo: &R, user: &AuthenticatedUser, user_id: i32) -> ServiceResult<()>
where
    R: UserReader + UserWriter + AuditWriter + ?Sized,
{
    authorize(repo, user, pages::USERS, PermissionAction::Delete)?;

    let target = repo
        .get_user_by_id(user_id, user.hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    if target.email.eq_ignore_ascii_case(&user.email) {
        return Err(ServiceError::Form(
            "You cannot delete your own profile.".to_string(),
        ));
    }

    repo.delete_user(user_id, user.hub_id)
        .map_err(ServiceError::from)?;

    audit::record(
        repo,
        user,
        AuditAction::Delete,
        pages::USERS,
        Some(user_id),
        Some(target.email),
    );
    Ok(())
}
