use chrono::Local;
use diesel::prelude::*;
use diesel::upsert::excluded;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::domain::inventory::{
    InventoryLevel as DomainInventoryLevel, InventoryListQuery,
    NewInventoryLevel as DomainNewInventoryLevel,
};
use crate::models::inventory::{
    InventoryLevel as DbInventoryLevel, NewInventoryLevel as DbNewInventoryLevel,
};
use crate::repository::{
    DieselRepository, InventoryReader, InventoryWriter, ensure_station_in_hub,
};
use crate::schema::fuel_inventory;

impl InventoryReader for DieselRepository {
    fn get_inventory_by_id(
        &self,
        id: i32,
        hub_id: i32,
    ) -> RepositoryResult<Option<DomainInventoryLevel>> {
        let mut conn = self.conn()?;

        let level = fuel_inventory::table
            .filter(fuel_inventory::id.eq(id))
            .filter(fuel_inventory::hub_id.eq(hub_id))
            .first::<DbInventoryLevel>(&mut conn)
            .optional()?;

        Ok(level.and_then(DbInventoryLevel::into_domain))
    }

    fn list_inventory(
        &self,
        query: InventoryListQuery,
    ) -> RepositoryResult<Vec<DomainInventoryLevel>> {
        let mut conn = self.conn()?;

        let mut items = fuel_inventory::table
            .filter(fuel_inventory::hub_id.eq(query.hub_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(station_id) = query.station_id {
            items = items.filter(fuel_inventory::station_id.eq(station_id));
        }

        if query.low_only {
            items = items.filter(fuel_inventory::volume_gallons.le(fuel_inventory::low_level_gallons));
        }

        let levels = items
            .order((fuel_inventory::station_id.asc(), fuel_inventory::grade.asc()))
            .load::<DbInventoryLevel>(&mut conn)?;

        Ok(levels
            .into_iter()
            .filter_map(DbInventoryLevel::into_domain)
            .collect())
    }
}

impl InventoryWriter for DieselRepository {
    fn upsert_inventory(
        &self,
        level: &DomainNewInventoryLevel,
    ) -> RepositoryResult<DomainInventoryLevel> {
        let mut conn = self.conn()?;

        ensure_station_in_hub(&mut conn, level.hub_id, level.station_id)?;

        let insertable = DbNewInventoryLevel::from(level);

        let saved = diesel::insert_into(fuel_inventory::table)
            .values(&insertable)
            .on_conflict((fuel_inventory::station_id, fuel_inventory::grade))
            .do_update()
            .set((
                fuel_inventory::capacity_gallons.eq(excluded(fuel_inventory::capacity_gallons)),
                fuel_inventory::volume_gallons.eq(excluded(fuel_inventory::volume_gallons)),
                fuel_inventory::low_level_gallons.eq(excluded(fuel_inventory::low_level_gallons)),
                fuel_inventory::updated_at.eq(Local::now().naive_utc()),
            ))
            .get_result::<DbInventoryLevel>(&mut conn)?;

        saved.into_domain().ok_or(RepositoryError::NotFound)
    }

    fn record_inventory_reading(
        &self,
        inventory_id: i32,
        hub_id: i32,
        volume_gallons: f64,
    ) -> RepositoryResult<DomainInventoryLevel> {
        let mut conn = self.conn()?;

        let target = fuel_inventory::table
            .filter(fuel_inventory::id.eq(inventory_id))
            .filter(fuel_inventory::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set((
                fuel_inventory::volume_gallons.eq(volume_gallons),
                fuel_inventory::updated_at.eq(Local::now().naive_utc()),
            ))
            .get_result::<DbInventoryLevel>(&mut conn)?;

        updated.into_domain().ok_or(RepositoryError::NotFound)
    }

    fn delete_inventory(&self, inventory_id: i32, hub_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(
            fuel_inventory::table
                .filter(fuel_inventory::id.eq(inventory_id))
                .filter(fuel_inventory::hub_id.eq(hub_id)),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
