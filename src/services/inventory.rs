use pushkind_common::domain::auth::AuthenticatedUser;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::audit::AuditAction;
use crate::domain::fuel::FuelGrade;
use crate::domain::inventory::{InventoryLevel, InventoryListQuery};
use crate::domain::permission::{PermissionAction, pages};
use crate::domain::station::Station;
use crate::forms::blank_as_none;
use crate::forms::inventory::{RecordReadingForm, SaveTankForm, check_volume};
use crate::repository::{AuditWriter, InventoryReader, InventoryWriter, StationReader, UserReader};
use crate::services::access::authorize;
use crate::services::stations::{all_stations, station_name};
use crate::services::{ServiceError, ServiceResult, audit};

#[derive(Debug, Default, Deserialize)]
pub struct InventoryQuery {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub station_id: Option<i32>,
}

/// Tank row with its derived fill figures.
#[derive(Debug, Clone, Serialize)]
pub struct TankView {
    #[serde(flatten)]
    pub tank: InventoryLevel,
    pub station_name: Option<String>,
    pub grade_label: &'static str,
    pub fill_percent: f64,
    pub ullage_gallons: f64,
    pub is_low: bool,
}

impl TankView {
    pub(crate) fn new(tank: InventoryLevel, stations: &[Station]) -> Self {
        Self {
            station_name: station_name(stations, tank.station_id),
            grade_label: tank.grade.label(),
            fill_percent: tank.fill_percent(),
            ullage_gallons: tank.ullage_gallons(),
            is_low: tank.is_low(),
            tank,
        }
    }
}

pub struct InventoryPageData {
    pub tanks: Vec<TankView>,
    pub stations: Vec<Station>,
    pub station_id: Option<i32>,
    pub grades: Vec<FuelGrade>,
    pub low_count: usize,
}

pub fn load_inventory<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: InventoryQuery,
) -> ServiceResult<InventoryPageData>
where
    R: InventoryReader + StationReader + UserReader + ?Sized,
{
    authorize(repo, user, pages::INVENTORY, PermissionAction::View)?;

    let mut list_query = InventoryListQuery::new(user.hub_id);
    if let Some(station_id) = query.station_id {
        list_query = list_query.station(station_id);
    }

    let tanks = repo.list_inventory(list_query).map_err(ServiceError::from)?;
    let stations = all_stations(repo, user.hub_id)?;

    let tanks: Vec<TankView> = tanks
        .into_iter()
        .map(|tank| TankView::new(tank, &stations))
        .collect();
    let low_count = tanks.iter().filter(|tank| tank.is_low).count();

    Ok(InventoryPageData {
        tanks,
        stations,
        station_id: query.station_id,
        grades: FuelGrade::ALL.to_vec(),
        low_count,
    })
}

/// Insert or replace the tank of a station and grade.
pub fn save_tank<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: SaveTankForm,
) -> ServiceResult<InventoryLevel>
where
    R: InventoryWriter + UserReader + ?Sized,
{
    authorize(repo, user, pages::INVENTORY, PermissionAction::Edit)?;

    let level = form
        .into_new_inventory_level(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.upsert_inventory(&level).map_err(ServiceError::from)
}

/// Store a manual stick reading; it must fit into the tank.
pub fn record_reading<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: RecordReadingForm,
) -> ServiceResult<InventoryLevel>
where
    R: InventoryReader + InventoryWriter + UserReader + ?Sized,
{
    authorize(repo, user, pages::INVENTORY, PermissionAction::Create)?;

    form.validate()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let tank = repo
        .get_inventory_by_id(form.inventory_id, user.hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    check_volume(form.volume_gallons, tank.capacity_gallons)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let updated = repo
        .record_inventory_reading(tank.id, user.hub_id, form.volume_gallons)
        .map_err(ServiceError::from)?;

    if updated.is_low() {
        log::info!(
            "{} tank of station {} is low: {:.0} gal",
            updated.grade.label(),
            updated.station_id,
            updated.volume_gallons
        );
    }
    Ok(updated)
}

pub fn remove_tank<R>(repo: &R, user: &AuthenticatedUser, inventory_id: i32) -> ServiceResult<()>
where
    R: InventoryWriter + AuditWriter + UserReader + ?Sized,
{
    authorize(repo, user, pages::INVENTORY, PermissionAction::Delete)?;

    repo.delete_inventory(inventory_id, user.hub_id)
        .map_err(ServiceError::from)?;

    audit::record(
        repo,
        user,
        AuditAction::Delete,
        pages::INVENTORY,
        Some(inventory_id),
        None,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{HUB_ID, admin, fixed_datetime, station};

    fn tank(id: i32, volume: f64) -> InventoryLevel {
        InventoryLevel {
            id,
            hub_id: HUB_ID,
            station_id: 1,
            grade: FuelGrade::Premium,
            capacity_gallons: 8_000.0,
            volume_gallons: volume,
            low_level_gallons: 1_000.0,
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    #[test]
    fn load_inventory_counts_low_tanks() {
        let mut repo = MockRepository::new();
        repo.expect_list_inventory()
            .withf(|query| query.hub_id == HUB_ID && query.station_id == Some(1))
            .returning(|_| Ok(vec![tank(1, 900.0), tank(2, 6_000.0)]));
        repo.expect_list_stations()
            .returning(|_| Ok((1, vec![station(1, "Main St #4")])));

        let data = load_inventory(
            &repo,
            &admin(),
            InventoryQuery {
                station_id: Some(1),
            },
        )
        .expect("inventory page");

        assert_eq!(data.low_count, 1);
        assert_eq!(data.tanks[1].fill_percent, 75.0);
        assert_eq!(data.tanks[0].station_name.as_deref(), Some("Main St #4"));
    }

    #[test]
    fn reading_above_capacity_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_get_inventory_by_id()
            .returning(|id, _| Ok(Some(tank(id, 2_000.0))));
        repo.expect_record_inventory_reading().never();

        let result = record_reading(
            &repo,
            &admin(),
            RecordReadingForm {
                inventory_id: 1,
                volume_gallons: 8_000.5,
            },
        );

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn reading_of_unknown_tank_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_inventory_by_id().returning(|_, _| Ok(None));

        let result = record_reading(
            &repo,
            &admin(),
            RecordReadingForm {
                inventory_id: 5,
                volume_gallons: 10.0,
            },
        );

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn reading_is_stored() {
        let mut repo = MockRepository::new();
        repo.expect_get_inventory_by_id()
            .returning(|id, _| Ok(Some(tank(id, 2_000.0))));
        repo.expect_record_inventory_reading()
            .withf(|id, hub, volume| *id == 1 && *hub == HUB_ID && *volume == 7_500.0)
            .times(1)
            .returning(|id, _, volume| Ok(tank(id, volume)));

        let updated = record_reading(
            &repo,
            &admin(),
            RecordReadingForm {
                inventory_id: 1,
                volume_gallons: 7_500.0,
            },
        )
        .expect("stored");

        assert_eq!(updated.volume_gallons, 7_500.0);
    }
}
