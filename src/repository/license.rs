use chrono::Local;
use diesel::prelude::*;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::domain::license::{
    License as DomainLicense, LicenseListQuery, NewLicense as DomainNewLicense,
    UpdateLicense as DomainUpdateLicense,
};
use crate::models::license::{
    License as DbLicense, NewLicense as DbNewLicense, UpdateLicense as DbUpdateLicense,
};
use crate::repository::{DieselRepository, LicenseReader, LicenseWriter};
use crate::schema::licenses;

impl LicenseReader for DieselRepository {
    fn get_license_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<DomainLicense>> {
        let mut conn = self.conn()?;

        let license = licenses::table
            .filter(licenses::id.eq(id))
            .filter(licenses::hub_id.eq(hub_id))
            .first::<DbLicense>(&mut conn)
            .optional()?;

        Ok(license.map(Into::into))
    }

    fn list_licenses(&self, query: LicenseListQuery) -> RepositoryResult<Vec<DomainLicense>> {
        let mut conn = self.conn()?;

        let mut items = licenses::table
            .filter(licenses::hub_id.eq(query.hub_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(station_id) = query.station_id {
            items = items.filter(licenses::station_id.eq(station_id));
        }

        if let Some(date) = query.expiring_before {
            items = items.filter(licenses::expiry_date.le(date));
        }

        let rows = items
            .order((licenses::expiry_date.asc(), licenses::name.asc()))
            .load::<DbLicense>(&mut conn)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

impl LicenseWriter for DieselRepository {
    fn create_license(&self, new_license: &DomainNewLicense) -> RepositoryResult<DomainLicense> {
        let mut conn = self.conn()?;
        let insertable = DbNewLicense::from(new_license);

        let created = diesel::insert_into(licenses::table)
            .values(&insertable)
            .get_result::<DbLicense>(&mut conn)?;

        Ok(created.into())
    }

    fn update_license(
        &self,
        license_id: i32,
        hub_id: i32,
        updates: &DomainUpdateLicense,
    ) -> RepositoryResult<DomainLicense> {
        let mut conn = self.conn()?;
        let db_updates = DbUpdateLicense::from(updates);

        let target = licenses::table
            .filter(licenses::id.eq(license_id))
            .filter(licenses::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbLicense>(&mut conn)?;

        Ok(updated.into())
    }

    fn set_license_document(
        &self,
        license_id: i32,
        hub_id: i32,
        document_path: Option<&str>,
    ) -> RepositoryResult<DomainLicense> {
        let mut conn = self.conn()?;

        let target = licenses::table
            .filter(licenses::id.eq(license_id))
            .filter(licenses::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set((
                licenses::document_path.eq(document_path),
                licenses::updated_at.eq(Local::now().naive_utc()),
            ))
            .get_result::<DbLicense>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_license(&self, license_id: i32, hub_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(
            licenses::table
                .filter(licenses::id.eq(license_id))
                .filter(licenses::hub_id.eq(hub_id)),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
