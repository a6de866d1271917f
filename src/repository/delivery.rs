use chrono::Local;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::domain::delivery::{
    Delivery as DomainDelivery, DeliveryListQuery, NewDelivery as DomainNewDelivery,
};
use crate::domain::fuel::FuelGrade;
use crate::models::delivery::{Delivery as DbDelivery, NewDelivery as DbNewDelivery};
use crate::repository::{
    DeliveryReader, DeliveryWriter, DieselRepository, ensure_station_in_hub, page_bounds,
};
use crate::schema::{deliveries, fuel_inventory};

fn filtered(query: &DeliveryListQuery) -> deliveries::BoxedQuery<'static, Sqlite> {
    let mut items = deliveries::table
        .filter(deliveries::hub_id.eq(query.hub_id))
        .into_boxed::<Sqlite>();

    if let Some(station_id) = query.station_id {
        items = items.filter(deliveries::station_id.eq(station_id));
    }

    if let Some(since) = query.since {
        items = items.filter(deliveries::delivery_date.ge(since));
    }

    items
}

impl DeliveryReader for DieselRepository {
    fn get_delivery_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<DomainDelivery>> {
        let mut conn = self.conn()?;

        let delivery = deliveries::table
            .filter(deliveries::id.eq(id))
            .filter(deliveries::hub_id.eq(hub_id))
            .first::<DbDelivery>(&mut conn)
            .optional()?;

        Ok(delivery.map(Into::into))
    }

    fn list_deliveries(
        &self,
        query: DeliveryListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainDelivery>)> {
        let mut conn = self.conn()?;

        let total = filtered(&query).count().get_result::<i64>(&mut conn)? as usize;

        let mut items =
            filtered(&query).order((deliveries::delivery_date.desc(), deliveries::id.desc()));

        if let Some(pagination) = &query.pagination {
            let (offset, limit) = page_bounds(pagination.page, pagination.per_page);
            items = items.offset(offset).limit(limit);
        }

        let rows = items.load::<DbDelivery>(&mut conn)?;

        Ok((total, rows.into_iter().map(Into::into).collect()))
    }
}

impl DeliveryWriter for DieselRepository {
    fn create_delivery(&self, new_delivery: &DomainNewDelivery) -> RepositoryResult<DomainDelivery> {
        let mut conn = self.conn()?;

        conn.transaction::<DomainDelivery, RepositoryError, _>(|conn| {
            ensure_station_in_hub(conn, new_delivery.hub_id, new_delivery.station_id)?;

            let insertable = DbNewDelivery::from(new_delivery);
            let created = diesel::insert_into(deliveries::table)
                .values(&insertable)
                .get_result::<DbDelivery>(conn)?;

            let now = Local::now().naive_utc();

            for grade in FuelGrade::ALL {
                let reading = new_delivery.readings.get(grade);
                if !reading.is_recorded() {
                    continue;
                }

                let tank = fuel_inventory::table
                    .filter(fuel_inventory::hub_id.eq(new_delivery.hub_id))
                    .filter(fuel_inventory::station_id.eq(new_delivery.station_id))
                    .filter(fuel_inventory::grade.eq(grade.as_str()))
                    .select((fuel_inventory::id, fuel_inventory::capacity_gallons))
                    .first::<(i32, f64)>(conn)
                    .optional()?;

                let Some((tank_id, capacity)) = tank else {
                    log::debug!(
                        "Station {} has no {} tank to update after delivery {}",
                        new_delivery.station_id,
                        grade,
                        created.id
                    );
                    continue;
                };

                // The delivery keeps the recorded reading; the tank never exceeds capacity.
                let volume = if reading.after > capacity {
                    log::warn!(
                        "Delivery {} reports {:.1} gal of {} at station {}, tank holds {:.1}; capping",
                        created.id,
                        reading.after,
                        grade,
                        new_delivery.station_id,
                        capacity
                    );
                    capacity
                } else {
                    reading.after
                };

                diesel::update(fuel_inventory::table.find(tank_id))
                    .set((
                        fuel_inventory::volume_gallons.eq(volume),
                        fuel_inventory::updated_at.eq(now),
                    ))
                    .execute(conn)?;
            }

            Ok(created.into())
        })
    }

    fn delete_delivery(&self, delivery_id: i32, hub_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(
            deliveries::table
                .filter(deliveries::id.eq(delivery_id))
                .filter(deliveries::hub_id.eq(hub_id)),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
