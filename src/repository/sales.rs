use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::domain::sales::{
    NewSalesReport as DomainNewSalesReport, SalesReport as DomainSalesReport,
    SalesReportListQuery, UpdateSalesReport as DomainUpdateSalesReport,
};
use crate::models::sales::{
    NewSalesReport as DbNewSalesReport, SalesReport as DbSalesReport,
    UpdateSalesReport as DbUpdateSalesReport,
};
use crate::repository::{
    DieselRepository, SalesReportReader, SalesReportWriter, ensure_station_in_hub, page_bounds,
};
use crate::schema::sales_reports;

fn filtered(query: &SalesReportListQuery) -> sales_reports::BoxedQuery<'static, Sqlite> {
    let mut items = sales_reports::table
        .filter(sales_reports::hub_id.eq(query.hub_id))
        .into_boxed::<Sqlite>();

    if let Some(station_id) = query.station_id {
        items = items.filter(sales_reports::station_id.eq(station_id));
    }

    if let Some(from) = query.from {
        items = items.filter(sales_reports::report_date.ge(from));
    }

    if let Some(to) = query.to {
        items = items.filter(sales_reports::report_date.le(to));
    }

    items
}

impl SalesReportReader for DieselRepository {
    fn get_sales_report_by_id(
        &self,
        id: i32,
        hub_id: i32,
    ) -> RepositoryResult<Option<DomainSalesReport>> {
        let mut conn = self.conn()?;

        let report = sales_reports::table
            .filter(sales_reports::id.eq(id))
            .filter(sales_reports::hub_id.eq(hub_id))
            .first::<DbSalesReport>(&mut conn)
            .optional()?;

        Ok(report.map(Into::into))
    }

    fn list_sales_reports(
        &self,
        query: SalesReportListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainSalesReport>)> {
        let mut conn = self.conn()?;

        let total = filtered(&query).count().get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered(&query).order((
            sales_reports::report_date.desc(),
            sales_reports::station_id.asc(),
        ));

        if let Some(pagination) = &query.pagination {
            let (offset, limit) = page_bounds(pagination.page, pagination.per_page);
            items = items.offset(offset).limit(limit);
        }

        let reports = items.load::<DbSalesReport>(&mut conn)?;

        Ok((total, reports.into_iter().map(Into::into).collect()))
    }
}

impl SalesReportWriter for DieselRepository {
    fn create_sales_report(
        &self,
        new_report: &DomainNewSalesReport,
    ) -> RepositoryResult<DomainSalesReport> {
        let mut conn = self.conn()?;
        ensure_station_in_hub(&mut conn, new_report.hub_id, new_report.station_id)?;
        let insertable = DbNewSalesReport::from(new_report);

        let created = diesel::insert_into(sales_reports::table)
            .values(&insertable)
            .get_result::<DbSalesReport>(&mut conn)?;

        Ok(created.into())
    }

    fn create_sales_reports(&self, new_reports: &[DomainNewSalesReport]) -> RepositoryResult<usize> {
        if new_reports.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn()?;

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            let mut inserted = 0;
            for report in new_reports {
                ensure_station_in_hub(conn, report.hub_id, report.station_id)?;
                let insertable = DbNewSalesReport::from(report);
                inserted += diesel::insert_into(sales_reports::table)
                    .values(&insertable)
                    .execute(conn)?;
            }
            Ok(inserted)
        })
    }

    fn update_sales_report(
        &self,
        report_id: i32,
        hub_id: i32,
        updates: &DomainUpdateSalesReport,
    ) -> RepositoryResult<DomainSalesReport> {
        let mut conn = self.conn()?;
        let db_updates = DbUpdateSalesReport::from(updates);

        let target = sales_reports::table
            .filter(sales_reports::id.eq(report_id))
            .filter(sales_reports::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbSalesReport>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_sales_report(&self, report_id: i32, hub_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(
            sales_reports::table
                .filter(sales_reports::id.eq(report_id))
                .filter(sales_reports::hub_id.eq(hub_id)),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
