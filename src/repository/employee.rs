use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::domain::employee::{
    Employee as DomainEmployee, EmployeeListQuery, NewEmployee as DomainNewEmployee,
    UpdateEmployee as DomainUpdateEmployee,
};
use crate::models::employee::{
    Employee as DbEmployee, NewEmployee as DbNewEmployee, UpdateEmployee as DbUpdateEmployee,
};
use crate::repository::{DieselRepository, EmployeeReader, EmployeeWriter, page_bounds};
use crate::schema::employees;

fn filtered(query: &EmployeeListQuery) -> employees::BoxedQuery<'static, Sqlite> {
    let mut items = employees::table
        .filter(employees::hub_id.eq(query.hub_id))
        .into_boxed::<Sqlite>();

    if let Some(station_id) = query.station_id {
        items = items.filter(employees::station_id.eq(station_id));
    }

    if query.active_only {
        items = items.filter(employees::is_active.eq(true));
    }

    if let Some(term) = query.search.as_ref() {
        let pattern = format!("%{}%", term);
        items = items.filter(
            employees::first_name
                .like(pattern.clone())
                .or(employees::last_name.like(pattern.clone()))
                .or(employees::position.like(pattern)),
        );
    }

    items
}

impl EmployeeReader for DieselRepository {
    fn get_employee_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<DomainEmployee>> {
        let mut conn = self.conn()?;

        let employee = employees::table
            .filter(employees::id.eq(id))
            .filter(employees::hub_id.eq(hub_id))
            .first::<DbEmployee>(&mut conn)
            .optional()?;

        Ok(employee.map(Into::into))
    }

    fn list_employees(
        &self,
        query: EmployeeListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainEmployee>)> {
        let mut conn = self.conn()?;

        let total = filtered(&query).count().get_result::<i64>(&mut conn)? as usize;

        let mut items =
            filtered(&query).order((employees::last_name.asc(), employees::first_name.asc()));

        if let Some(pagination) = &query.pagination {
            let (offset, limit) = page_bounds(pagination.page, pagination.per_page);
            items = items.offset(offset).limit(limit);
        }

        let employees = items.load::<DbEmployee>(&mut conn)?;

        Ok((total, employees.into_iter().map(Into::into).collect()))
    }
}

impl EmployeeWriter for DieselRepository {
    fn create_employee(&self, new_employee: &DomainNewEmployee) -> RepositoryResult<DomainEmployee> {
        let mut conn = self.conn()?;
        let insertable = DbNewEmployee::from(new_employee);

        let created = diesel::insert_into(employees::table)
            .values(&insertable)
            .get_result::<DbEmployee>(&mut conn)?;

        Ok(created.into())
    }

    fn update_employee(
        &self,
        employee_id: i32,
        hub_id: i32,
        updates: &DomainUpdateEmployee,
    ) -> RepositoryResult<DomainEmployee> {
        let mut conn = self.conn()?;
        let db_updates = DbUpdateEmployee::from(updates);

        let target = employees::table
            .filter(employees::id.eq(employee_id))
            .filter(employees::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbEmployee>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_employee(&self, employee_id: i32, hub_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(
            employees::table
                .filter(employees::id.eq(employee_id))
                .filter(employees::hub_id.eq(hub_id)),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
