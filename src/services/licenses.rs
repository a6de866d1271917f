use std::path::PathBuf;

use chrono::NaiveDate;
use pushkind_common::domain::auth::AuthenticatedUser;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::audit::AuditAction;
use crate::domain::license::{License, LicenseListQuery, LicenseStatus, LicenseView};
use crate::domain::permission::{PermissionAction, pages};
use crate::domain::station::Station;
use crate::forms::blank_as_none;
use crate::forms::licenses::{AddLicenseForm, EditLicenseForm, UploadLicenseDocumentForm};
use crate::repository::{AuditWriter, LicenseReader, LicenseWriter, StationReader, UserReader};
use crate::services::access::authorize;
use crate::services::stations::all_stations;
use crate::services::{ServiceError, ServiceResult, audit, shift_date};
use crate::storage::{DocumentStore, StorageError};

/// Errors raised while storing or serving license documents.
#[derive(Debug, Error)]
pub enum LicenseDocumentError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("the license has no document attached")]
    Missing,
}

#[derive(Debug, Default, Deserialize)]
pub struct LicenseQuery {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub station_id: Option<i32>,
    /// Limit the list to expired and expiring licenses.
    #[serde(default)]
    pub expiring_only: bool,
}

pub struct LicensesPageData {
    pub licenses: Vec<LicenseView>,
    pub stations: Vec<Station>,
    pub station_id: Option<i32>,
    pub expiring_only: bool,
    pub expiring_count: usize,
    pub expired_count: usize,
}

/// Licenses ordered by expiry, each with its status as of `today`.
pub fn load_licenses<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: LicenseQuery,
    today: NaiveDate,
    warning_days: i64,
) -> ServiceResult<LicensesPageData>
where
    R: LicenseReader + StationReader + UserReader + ?Sized,
{
    authorize(repo, user, pages::LICENSES, PermissionAction::View)?;

    let mut list_query = LicenseListQuery::new(user.hub_id);
    if let Some(station_id) = query.station_id {
        list_query = list_query.station(station_id);
    }
    if query.expiring_only {
        list_query = list_query.expiring_before(shift_date(today, warning_days)?);
    }

    let licenses: Vec<LicenseView> = repo
        .list_licenses(list_query)
        .map_err(ServiceError::from)?
        .into_iter()
        .map(|license| LicenseView::new(license, today, warning_days))
        .collect();
    let stations = all_stations(repo, user.hub_id)?;

    let count = |status: LicenseStatus| {
        licenses
            .iter()
            .filter(|license| license.status == status)
            .count()
    };

    Ok(LicensesPageData {
        expiring_count: count(LicenseStatus::ExpiringSoon),
        expired_count: count(LicenseStatus::Expired),
        licenses,
        stations,
        station_id: query.station_id,
        expiring_only: query.expiring_only,
    })
}

pub fn create_license<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddLicenseForm,
) -> ServiceResult<License>
where
    R: LicenseWriter + UserReader + ?Sized,
{
    authorize(repo, user, pages::LICENSES, PermissionAction::Create)?;

    let new_license = form
        .into_new_license(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_license(&new_license).map_err(ServiceError::from)
}

pub fn modify_license<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: EditLicenseForm,
) -> ServiceResult<License>
where
    R: LicenseWriter + UserReader + ?Sized,
{
    authorize(repo, user, pages::LICENSES, PermissionAction::Edit)?;

    let license_id = form.license_id;
    let updates = form
        .into_update_license()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.update_license(license_id, user.hub_id, &updates)
        .map_err(ServiceError::from)
}

/// Delete the license together with its stored document.
pub fn remove_license<R>(
    repo: &R,
    user: &AuthenticatedUser,
    store: &DocumentStore,
    license_id: i32,
) -> ServiceResult<()>
where
    R: LicenseReader + LicenseWriter + AuditWriter + UserReader + ?Sized,
{
    authorize(repo, user, pages::LICENSES, PermissionAction::Delete)?;

    let license = repo
        .get_license_by_id(license_id, user.hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    repo.delete_license(license.id, user.hub_id)
        .map_err(ServiceError::from)?;

    if let Some(path) = license.document_path.as_deref()
        && let Err(err) = store.remove(path)
    {
        log::warn!("Failed to remove document of license {}: {err}", license.id);
    }

    audit::record(
        repo,
        user,
        AuditAction::Delete,
        pages::LICENSES,
        Some(license.id),
        Some(license.name),
    );
    Ok(())
}

/// Store the uploaded scan and link it to the license.
pub fn attach_document<R>(
    repo: &R,
    user: &AuthenticatedUser,
    store: &DocumentStore,
    form: &mut UploadLicenseDocumentForm,
) -> Result<License, LicenseDocumentError>
where
    R: LicenseReader + LicenseWriter + AuditWriter + UserReader + ?Sized,
{
    authorize(repo, user, pages::LICENSES, PermissionAction::Edit)?;

    let license_id = form.license_id.0;
    let license = repo
        .get_license_by_id(license_id, user.hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let file_name = form.document.file_name.clone();
    let relative = store.save_license_document(
        user.hub_id,
        license.id,
        file_name.as_deref(),
        form.document.file.as_file_mut(),
    )?;

    let updated = match repo.set_license_document(license.id, user.hub_id, Some(&relative)) {
        Ok(updated) => updated,
        Err(err) => {
            if license.document_path.as_deref() != Some(relative.as_str())
                && let Err(remove_err) = store.remove(&relative)
            {
                log::warn!("Failed to remove unlinked document {relative}: {remove_err}");
            }
            return Err(ServiceError::from(err).into());
        }
    };

    if let Some(previous) = license.document_path.as_deref()
        && previous != relative
        && let Err(err) = store.remove(previous)
    {
        log::warn!("Failed to remove replaced document {previous}: {err}");
    }

    audit::record(
        repo,
        user,
        AuditAction::Upload,
        pages::LICENSES,
        Some(license.id),
        file_name,
    );
    Ok(updated)
}

/// Location on disk of the license's document.
pub fn document_path<R>(
    repo: &R,
    user: &AuthenticatedUser,
    store: &DocumentStore,
    license_id: i32,
) -> Result<PathBuf, LicenseDocumentError>
where
    R: LicenseReader + UserReader + ?Sized,
{
    authorize(repo, user, pages::LICENSES, PermissionAction::View)?;

    let license = repo
        .get_license_by_id(license_id, user.hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let relative = license
        .document_path
        .ok_or(LicenseDocumentError::Missing)?;
    Ok(store.resolve(&relative)?)
}
