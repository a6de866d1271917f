use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::domain::station::{
    NewStation as DomainNewStation, Station as DomainStation, StationListQuery,
    UpdateStation as DomainUpdateStation,
};
use crate::models::station::{
    NewStation as DbNewStation, Station as DbStation, UpdateStation as DbUpdateStation,
};
use crate::repository::{DieselRepository, StationReader, StationWriter, page_bounds};
use crate::schema::stations;

fn filtered(query: &StationListQuery) -> stations::BoxedQuery<'static, Sqlite> {
    let mut items = stations::table
        .filter(stations::hub_id.eq(query.hub_id))
        .into_boxed::<Sqlite>();

    if query.active_only {
        items = items.filter(stations::is_active.eq(true));
    }

    if let Some(term) = query.search.as_ref() {
        let pattern = format!("%{}%", term);
        items = items.filter(
            stations::name
                .like(pattern.clone())
                .or(stations::address.like(pattern.clone()))
                .or(stations::manager_name.like(pattern)),
        );
    }

    items
}

impl StationReader for DieselRepository {
    fn get_station_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<DomainStation>> {
        let mut conn = self.conn()?;

        let station = stations::table
            .filter(stations::id.eq(id))
            .filter(stations::hub_id.eq(hub_id))
            .first::<DbStation>(&mut conn)
            .optional()?;

        Ok(station.map(Into::into))
    }

    fn list_stations(
        &self,
        query: StationListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainStation>)> {
        let mut conn = self.conn()?;

        let total = filtered(&query).count().get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered(&query).order(stations::name.asc());

        if let Some(pagination) = &query.pagination {
            let (offset, limit) = page_bounds(pagination.page, pagination.per_page);
            items = items.offset(offset).limit(limit);
        }

        let stations = items.load::<DbStation>(&mut conn)?;

        Ok((total, stations.into_iter().map(Into::into).collect()))
    }
}

impl StationWriter for DieselRepository {
    fn create_station(&self, new_station: &DomainNewStation) -> RepositoryResult<DomainStation> {
        let mut conn = self.conn()?;
        let insertable = DbNewStation::from(new_station);

        let created = diesel::insert_into(stations::table)
            .values(&insertable)
            .get_result::<DbStation>(&mut conn)?;

        Ok(created.into())
    }

    fn update_station(
        &self,
        station_id: i32,
        hub_id: i32,
        updates: &DomainUpdateStation,
    ) -> RepositoryResult<DomainStation> {
        let mut conn = self.conn()?;
        let db_updates = DbUpdateStation::from(updates);

        let target = stations::table
            .filter(stations::id.eq(station_id))
            .filter(stations::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbStation>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_station(&self, station_id: i32, hub_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(
            stations::table
                .filter(stations::id.eq(station_id))
                .filter(stations::hub_id.eq(hub_id)),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
