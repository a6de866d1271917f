use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use serde::{Deserialize, Serialize};

use crate::domain::audit::AuditAction;
use crate::domain::employee::{Employee, EmployeeListQuery};
use crate::domain::permission::{PermissionAction, pages};
use crate::domain::station::Station;
use crate::forms::blank_as_none;
use crate::forms::employees::{AddEmployeeForm, EditEmployeeForm};
use crate::repository::{AuditWriter, EmployeeReader, EmployeeWriter, StationReader, UserReader};
use crate::services::access::authorize;
use crate::services::stations::{all_stations, station_name};
use crate::services::{ServiceError, ServiceResult, audit, total_pages};

/// Query parameters accepted by the employees index page.
#[derive(Debug, Default, Deserialize)]
pub struct EmployeeQuery {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub station_id: Option<i32>,
    pub search: Option<String>,
    pub page: Option<usize>,
}

/// Employee row with the name of its station.
#[derive(Debug, Serialize)]
pub struct EmployeeView {
    #[serde(flatten)]
    pub employee: Employee,
    pub full_name: String,
    pub station_name: Option<String>,
}

pub struct EmployeesPageData {
    pub employees: Paginated<EmployeeView>,
    pub stations: Vec<Station>,
    pub station_id: Option<i32>,
    pub search: Option<String>,
}

pub fn load_employees<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: EmployeeQuery,
) -> ServiceResult<EmployeesPageData>
where
    R: EmployeeReader + StationReader + UserReader + ?Sized,
{
    authorize(repo, user, pages::EMPLOYEES, PermissionAction::View)?;

    let EmployeeQuery {
        station_id,
        search,
        page,
    } = query;
    let page = page.unwrap_or(1);

    let mut list_query = EmployeeListQuery::new(user.hub_id);
    if let Some(station_id) = station_id {
        list_query = list_query.station(station_id);
    }
    if let Some(term) = search.as_ref() {
        list_query = list_query.search(term);
    }
    list_query = list_query.paginate(page, DEFAULT_ITEMS_PER_PAGE);

    let (total, employees) = repo
        .list_employees(list_query)
        .map_err(ServiceError::from)?;
    let stations = all_stations(repo, user.hub_id)?;

    let employees = employees
        .into_iter()
        .map(|employee| EmployeeView {
            full_name: employee.full_name(),
            station_name: employee
                .station_id
                .and_then(|id| station_name(&stations, id)),
            employee,
        })
        .collect();

    Ok(EmployeesPageData {
        employees: Paginated::new(employees, page, total_pages(total)),
        stations,
        station_id,
        search,
    })
}

pub fn create_employee<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddEmployeeForm,
) -> ServiceResult<Employee>
where
    R: EmployeeWriter + UserReader + ?Sized,
{
    authorize(repo, user, pages::EMPLOYEES, PermissionAction::Create)?;

    let new_employee = form
        .into_new_employee(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_employee(&new_employee)
        .map_err(ServiceError::from)
}

pub fn modify_employee<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: EditEmployeeForm,
) -> ServiceResult<Employee>
where
    R: EmployeeWriter + UserReader + ?Sized,
{
    authorize(repo, user, pages::EMPLOYEES, PermissionAction::Edit)?;

    let employee_id = form.employee_id;
    let updates = form
        .into_update_employee()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.update_employee(employee_id, user.hub_id, &updates)
        .map_err(ServiceError::from)
}

pub fn remove_employee<R>(repo: &R, user: &AuthenticatedUser, employee_id: i32) -> ServiceResult<()>
where
    R: EmployeeWriter + AuditWriter + UserReader + ?Sized,
{
    authorize(repo, user, pages::EMPLOYEES, PermissionAction::Delete)?;

    repo.delete_employee(employee_id, user.hub_id)
        .map_err(ServiceError::from)?;

    audit::record(
        repo,
        user,
        AuditAction::Delete,
        pages::EMPLOYEES,
        Some(employee_id),
        None,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{HUB_ID, admin, date, fixed_datetime, station};

    fn employee(id: i32, station_id: Option<i32>) -> Employee {
        Employee {
            id,
            hub_id: HUB_ID,
            station_id,
            first_name: "Riley".to_string(),
            last_name: "Park".to_string(),
            position: "Cashier".to_string(),
            phone: None,
            email: None,
            hire_date: date(2023, 4, 1),
            hourly_rate_cents: 1650,
            is_active: true,
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    #[test]
    fn load_employees_labels_stations() {
        let mut repo = MockRepository::new();
        repo.expect_list_employees()
            .times(1)
            .withf(|query| query.station_id == Some(2) && query.hub_id == HUB_ID)
            .returning(|_| Ok((2, vec![employee(1, Some(2)), employee(2, None)])));
        repo.expect_list_stations()
            .returning(|_| Ok((1, vec![station(2, "Harbor Rd")])));

        let data = load_employees(
            &repo,
            &admin(),
            EmployeeQuery {
                station_id: Some(2),
                search: None,
                page: None,
            },
        )
        .expect("employees page");

        let rows = serde_json::to_value(&data.employees).expect("serializes");
        assert_eq!(rows["items"][0]["station_name"], "Harbor Rd");
        assert_eq!(rows["items"][0]["full_name"], "Riley Park");
        assert!(rows["items"][1]["station_name"].is_null());
    }

    #[test]
    fn create_employee_stores_rate_in_cents() {
        let mut repo = MockRepository::new();
        repo.expect_create_employee()
            .times(1)
            .withf(|new_employee| new_employee.hourly_rate_cents == 1575)
            .returning(|_| Ok(employee(9, None)));

        let form = AddEmployeeForm {
            station_id: None,
            first_name: "Riley".to_string(),
            last_name: "Park".to_string(),
            position: "Cashier".to_string(),
            phone: None,
            email: None,
            hire_date: NaiveDate::from_ymd_opt(2024, 2, 1).expect("date"),
            hourly_rate: "$15.75".to_string(),
        };

        assert!(create_employee(&repo, &admin(), form).is_ok());
    }

    #[test]
    fn invalid_rate_is_a_form_error() {
        let repo = MockRepository::new();
        let form = AddEmployeeForm {
            station_id: None,
            first_name: "Riley".to_string(),
            last_name: "Park".to_string(),
            position: "Cashier".to_string(),
            phone: None,
            email: None,
            hire_date: NaiveDate::from_ymd_opt(2024, 2, 1).expect("date"),
            hourly_rate: "fifteen".to_string(),
        };

        assert!(matches!(
            create_employee(&repo, &admin(), form),
            Err(ServiceError::Form(_))
        ));
    }
}
