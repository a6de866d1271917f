use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use serde::{Deserialize, Serialize};

use crate::domain::audit::AuditAction;
use crate::domain::employee::{Employee, EmployeeListQuery};
use crate::domain::payroll::{PayrollListQuery, PayrollRecord};
use crate::domain::permission::{PermissionAction, pages};
use crate::forms::blank_as_none;
use crate::forms::payroll::AddPayrollRecordForm;
use crate::repository::{AuditWriter, EmployeeReader, PayrollReader, PayrollWriter, UserReader};
use crate::services::access::authorize;
use crate::services::{ServiceError, ServiceResult, audit, total_pages};

/// Query parameters accepted by the payroll page.
#[derive(Debug, Default, Deserialize)]
pub struct PayrollQuery {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub employee_id: Option<i32>,
    pub page: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct PayrollRecordView {
    #[serde(flatten)]
    pub record: PayrollRecord,
    pub employee_name: Option<String>,
    pub total_hours: f64,
}

pub struct PayrollPageData {
    pub records: Paginated<PayrollRecordView>,
    /// Employees offered in the filter and the entry form.
    pub employees: Vec<Employee>,
    pub employee_id: Option<i32>,
}

pub fn load_payroll<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: PayrollQuery,
) -> ServiceResult<PayrollPageData>
where
    R: PayrollReader + EmployeeReader + UserReader + ?Sized,
{
    authorize(repo, user, pages::PAYROLL, PermissionAction::View)?;

    let page = query.page.unwrap_or(1);
    let mut list_query = PayrollListQuery::new(user.hub_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(employee_id) = query.employee_id {
        list_query = list_query.employee(employee_id);
    }

    let (total, records) = repo
        .list_payroll_records(list_query)
        .map_err(ServiceError::from)?;
    let (_, employees) = repo
        .list_employees(EmployeeListQuery::new(user.hub_id))
        .map_err(ServiceError::from)?;

    let records = records
        .into_iter()
        .map(|record| PayrollRecordView {
            employee_name: employees
                .iter()
                .find(|employee| employee.id == record.employee_id)
                .map(Employee::full_name),
            total_hours: record.total_hours(),
            record,
        })
        .collect();

    Ok(PayrollPageData {
        records: Paginated::new(records, page, total_pages(total)),
        employees,
        employee_id: query.employee_id,
    })
}

/// Record a pay period, defaulting the rate to the employee's current rate.
pub fn create_payroll_record<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddPayrollRecordForm,
) -> ServiceResult<PayrollRecord>
where
    R: PayrollWriter + EmployeeReader + UserReader + ?Sized,
{
    authorize(repo, user, pages::PAYROLL, PermissionAction::Create)?;

    let employee = repo
        .get_employee_by_id(form.employee_id, user.hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let new_record = form
        .into_new_payroll_record(user.hub_id, employee.hourly_rate_cents)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_payroll_record(&new_record)
        .map_err(ServiceError::from)
}

pub fn remove_payroll_record<R>(
    repo: &R,
    user: &AuthenticatedUser,
    record_id: i32,
) -> ServiceResult<()>
where
    R: PayrollWriter + AuditWriter + UserReader + ?Sized,
{
    authorize(repo, user, pages::PAYROLL, PermissionAction::Delete)?;

    repo.delete_payroll_record(record_id, user.hub_id)
        .map_err(ServiceError::from)?;

    audit::record(
        repo,
        user,
        AuditAction::Delete,
        pages::PAYROLL,
        Some(record_id),
        None,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{HUB_ID, admin, date, fixed_datetime};

    fn employee(rate_cents: i32) -> Employee {
        Employee {
            id: 4,
            hub_id: HUB_ID,
            station_id: Some(1),
            first_name: "Sam".to_string(),
            last_name: "Ortiz".to_string(),
            position: "Shift lead".to_string(),
            phone: None,
            email: None,
            hire_date: date(2022, 1, 10),
            hourly_rate_cents: rate_cents,
            is_active: true,
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    fn form(hourly_rate: Option<&str>) -> AddPayrollRecordForm {
        AddPayrollRecordForm {
            employee_id: 4,
            period_start: date(2024, 3, 1),
            period_end: date(2024, 3, 14),
            regular_hours: 80.0,
            overtime_hours: 4.0,
            hourly_rate: hourly_rate.map(str::to_string),
            notes: None,
        }
    }

    fn stored(new_record: &crate::domain::payroll::NewPayrollRecord) -> PayrollRecord {
        PayrollRecord {
            id: 1,
            hub_id: new_record.hub_id,
            employee_id: new_record.employee_id,
            period_start: new_record.period_start,
            period_end: new_record.period_end,
            regular_hours: new_record.regular_hours,
            overtime_hours: new_record.overtime_hours,
            hourly_rate_cents: new_record.hourly_rate_cents,
            gross_pay_cents: new_record.gross_pay_cents,
            notes: None,
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    #[test]
    fn record_uses_employee_rate_by_default() {
        let mut repo = MockRepository::new();
        repo.expect_get_employee_by_id()
            .withf(|id, hub| *id == 4 && *hub == HUB_ID)
            .returning(|_, _| Ok(Some(employee(2000))));
        repo.expect_create_payroll_record()
            .times(1)
            .returning(|new_record| Ok(stored(new_record)));

        let record = create_payroll_record(&repo, &admin(), form(None)).expect("record");

        assert_eq!(record.hourly_rate_cents, 2000);
        // 80h * $20 + 4h * $30
        assert_eq!(record.gross_pay_cents, 160_000 + 12_000);
    }

    #[test]
    fn rate_override_wins() {
        let mut repo = MockRepository::new();
        repo.expect_get_employee_by_id()
            .returning(|_, _| Ok(Some(employee(2000))));
        repo.expect_create_payroll_record()
            .returning(|new_record| Ok(stored(new_record)));

        let record =
            create_payroll_record(&repo, &admin(), form(Some("18.00"))).expect("record");

        assert_eq!(record.hourly_rate_cents, 1800);
    }

    #[test]
    fn unknown_employee_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_employee_by_id().returning(|_, _| Ok(None));
        repo.expect_create_payroll_record().never();

        assert!(matches!(
            create_payroll_record(&repo, &admin(), form(None)),
            Err(ServiceError::NotFound)
        ));
    }
}
