use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use serde::Deserialize;

use crate::domain::audit::AuditAction;
use crate::domain::permission::{PermissionAction, pages};
use crate::domain::station::{Station, StationListQuery};
use crate::forms::stations::{AddStationForm, EditStationForm};
use crate::repository::{AuditWriter, StationReader, StationWriter, UserReader};
use crate::services::access::authorize;
use crate::services::{ServiceError, ServiceResult, audit, total_pages};

/// Query parameters accepted by the stations index page.
#[derive(Debug, Default, Deserialize)]
pub struct StationQuery {
    /// Optional case-insensitive search over name, address and manager.
    pub search: Option<String>,
    /// Page number requested by the UI (1-based).
    pub page: Option<usize>,
}

/// Data required to render the stations index template.
pub struct StationsPageData {
    pub stations: Paginated<Station>,
    pub search: Option<String>,
}

pub fn load_stations<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: StationQuery,
) -> ServiceResult<StationsPageData>
where
    R: StationReader + UserReader + ?Sized,
{
    authorize(repo, user, pages::STATIONS, PermissionAction::View)?;

    let StationQuery { search, page } = query;
    let page = page.unwrap_or(1);

    let mut list_query = StationListQuery::new(user.hub_id);
    if let Some(term) = search.as_ref() {
        list_query = list_query.search(term);
    }
    list_query = list_query.paginate(page, DEFAULT_ITEMS_PER_PAGE);

    let (total, stations) = repo.list_stations(list_query).map_err(ServiceError::from)?;

    Ok(StationsPageData {
        stations: Paginated::new(stations, page, total_pages(total)),
        search,
    })
}

/// Active stations of the hub, for the station pickers of entry forms.
pub fn active_stations<R>(repo: &R, hub_id: i32) -> ServiceResult<Vec<Station>>
where
    R: StationReader + ?Sized,
{
    let (_, stations) = repo
        .list_stations(StationListQuery::new(hub_id).active_only())
        .map_err(ServiceError::from)?;
    Ok(stations)
}

/// Name of a station looked up in an already fetched list.
pub(crate) fn station_name(stations: &[Station], station_id: i32) -> Option<String> {
    stations
        .iter()
        .find(|station| station.id == station_id)
        .map(|station| station.name.clone())
}

/// Every station of the hub, active or not, for labelling historic rows.
pub(crate) fn all_stations<R>(repo: &R, hub_id: i32) -> ServiceResult<Vec<Station>>
where
    R: StationReader + ?Sized,
{
    let (_, stations) = repo
        .list_stations(StationListQuery::new(hub_id))
        .map_err(ServiceError::from)?;
    Ok(stations)
}

pub fn create_station<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddStationForm,
) -> ServiceResult<Station>
where
    R: StationWriter + UserReader + ?Sized,
{
    authorize(repo, user, pages::STATIONS, PermissionAction::Create)?;

    let new_station = form
        .into_new_station(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_station(&new_station).map_err(ServiceError::from)
}

pub fn modify_station<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: EditStationForm,
) -> ServiceResult<Station>
where
    R: StationWriter + UserReader + ?Sized,
{
    authorize(repo, user, pages::STATIONS, PermissionAction::Edit)?;

    let station_id = form.station_id;
    let updates = form
        .into_update_station()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.update_station(station_id, user.hub_id, &updates)
        .map_err(ServiceError::from)
}

/// Delete a station and record the deletion in the audit trail.
pub fn remove_station<R>(repo: &R, user: &AuthenticatedUser, station_id: i32) -> ServiceResult<()>
where
    R: StationWriter + AuditWriter + UserReader + ?Sized,
{
    authorize(repo, user, pages::STATIONS, PermissionAction::Delete)?;

    repo.delete_station(station_id, user.hub_id)
        .map_err(ServiceError::from)?;

    audit::record(
        repo,
        user,
        AuditAction::Delete,
        pages::STATIONS,
        Some(station_id),
        None,
    );
    Ok(())
}
