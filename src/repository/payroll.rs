use diesel::dsl::{exists, select};
use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::domain::payroll::{
    NewPayrollRecord as DomainNewPayrollRecord, PayrollListQuery,
    PayrollRecord as DomainPayrollRecord,
};
use crate::models::payroll::{
    NewPayrollRecord as DbNewPayrollRecord, PayrollRecord as DbPayrollRecord,
};
use crate::repository::{DieselRepository, PayrollReader, PayrollWriter, page_bounds};
use crate::schema::payroll_records;

fn filtered(query: &PayrollListQuery) -> payroll_records::BoxedQuery<'static, Sqlite> {
    let mut items = payroll_records::table
        .filter(payroll_records::hub_id.eq(query.hub_id))
        .into_boxed::<Sqlite>();

    if let Some(employee_id) = query.employee_id {
        items = items.filter(payroll_records::employee_id.eq(employee_id));
    }

    items
}

impl PayrollReader for DieselRepository {
    fn list_payroll_records(
        &self,
        query: PayrollListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainPayrollRecord>)> {
        let mut conn = self.conn()?;

        let total = filtered(&query).count().get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered(&query).order((
            payroll_records::period_end.desc(),
            payroll_records::id.desc(),
        ));

        if let Some(pagination) = &query.pagination {
            let (offset, limit) = page_bounds(pagination.page, pagination.per_page);
            items = items.offset(offset).limit(limit);
        }

        let records = items.load::<DbPayrollRecord>(&mut conn)?;

        Ok((total, records.into_iter().map(Into::into).collect()))
    }
}

impl PayrollWriter for DieselRepository {
    fn create_payroll_record(
        &self,
        new_record: &DomainNewPayrollRecord,
    ) -> RepositoryResult<DomainPayrollRecord> {
        let mut conn = self.conn()?;

        ensure_employee_in_hub(&mut conn, new_record.hub_id, new_record.employee_id)?;

        let insertable = DbNewPayrollRecord::from(new_record);

        let created = diesel::insert_into(payroll_records::table)
            .values(&insertable)
            .get_result::<DbPayrollRecord>(&mut conn)?;

        Ok(created.into())
    }

    fn delete_payroll_record(&self, record_id: i32, hub_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(
            payroll_records::table
                .filter(payroll_records::id.eq(record_id))
                .filter(payroll_records::hub_id.eq(hub_id)),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

fn ensure_employee_in_hub(
    conn: &mut SqliteConnection,
    hub_id: i32,
    employee_id: i32,
) -> RepositoryResult<()> {
    use crate::schema::employees;

    let exists = select(exists(
        employees::table
            .filter(employees::id.eq(employee_id))
            .filter(employees::hub_id.eq(hub_id)),
    ))
    .get_result(conn)?;

    if exists {
        Ok(())
    } else {
        Err(RepositoryError::NotFound)
    }
}
