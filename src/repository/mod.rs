use diesel::dsl::{exists, select};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use pushkind_common::db::{DbConnection, DbPool};
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::domain::audit::{AuditEntry, AuditListQuery, NewAuditEntry};
use crate::domain::delivery::{Delivery, DeliveryListQuery, NewDelivery};
use crate::domain::employee::{Employee, EmployeeListQuery, NewEmployee, UpdateEmployee};
use crate::domain::inventory::{InventoryLevel, InventoryListQuery, NewInventoryLevel};
use crate::domain::license::{License, LicenseListQuery, NewLicense, UpdateLicense};
use crate::domain::payroll::{NewPayrollRecord, PayrollListQuery, PayrollRecord};
use crate::domain::permission::PermissionMatrix;
use crate::domain::sales::{NewSalesReport, SalesReport, SalesReportListQuery, UpdateSalesReport};
use crate::domain::sms::{NewSmsConfig, NewSmsMessage, SmsConfig, SmsMessage, SmsMessageListQuery};
use crate::domain::station::{NewStation, Station, StationListQuery, UpdateStation};
use crate::domain::user::{NewUser, UpdateUser, User, UserListQuery};

pub mod audit;
pub mod delivery;
pub mod employee;
pub mod inventory;
pub mod license;
pub mod payroll;
pub mod sales;
pub mod sms;
pub mod station;
pub mod user;

#[cfg(test)]
pub mod mock;

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Offset and limit for a 1-based page.
pub(crate) fn page_bounds(page: usize, per_page: usize) -> (i64, i64) {
    let offset = (page.max(1) - 1).saturating_mul(per_page);
    (
        i64::try_from(offset).unwrap_or(i64::MAX),
        i64::try_from(per_page).unwrap_or(i64::MAX),
    )
}

/// Fail with `NotFound` unless the station exists inside the hub.
pub(crate) fn ensure_station_in_hub(
    conn: &mut SqliteConnection,
    hub_id: i32,
    station_id: i32,
) -> RepositoryResult<()> {
    use crate::schema::stations;

    let exists = select(exists(
        stations::table
            .filter(stations::id.eq(station_id))
            .filter(stations::hub_id.eq(hub_id)),
    ))
    .get_result(conn)?;

    if exists {
        Ok(())
    } else {
        Err(RepositoryError::NotFound)
    }
}

/// Read-only operations over station records.
pub trait StationReader {
    fn get_station_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Station>>;
    fn list_stations(&self, query: StationListQuery) -> RepositoryResult<(usize, Vec<Station>)>;
}

/// Write operations over station records.
pub trait StationWriter {
    fn create_station(&self, new_station: &NewStation) -> RepositoryResult<Station>;
    fn update_station(
        &self,
        station_id: i32,
        hub_id: i32,
        updates: &UpdateStation,
    ) -> RepositoryResult<Station>;
    fn delete_station(&self, station_id: i32, hub_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over user profiles.
pub trait UserReader {
    fn get_user_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<User>>;
    fn get_user_by_email(&self, email: &str, hub_id: i32) -> RepositoryResult<Option<User>>;
    fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)>;
}

/// Write operations over user profiles.
pub trait UserWriter {
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    fn update_user(&self, user_id: i32, hub_id: i32, updates: &UpdateUser)
    -> RepositoryResult<User>;
    /// Store detailed permissions as JSON; `None` reverts to the role template.
    fn save_user_permissions(
        &self,
        user_id: i32,
        hub_id: i32,
        permissions: Option<&PermissionMatrix>,
    ) -> RepositoryResult<User>;
    fn delete_user(&self, user_id: i32, hub_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over employees.
pub trait EmployeeReader {
    fn get_employee_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Employee>>;
    fn list_employees(&self, query: EmployeeListQuery)
    -> RepositoryResult<(usize, Vec<Employee>)>;
}

/// Write operations over employees.
pub trait EmployeeWriter {
    fn create_employee(&self, new_employee: &NewEmployee) -> RepositoryResult<Employee>;
    fn update_employee(
        &self,
        employee_id: i32,
        hub_id: i32,
        updates: &UpdateEmployee,
    ) -> RepositoryResult<Employee>;
    fn delete_employee(&self, employee_id: i32, hub_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over payroll records.
pub trait PayrollReader {
    fn list_payroll_records(
        &self,
        query: PayrollListQuery,
    ) -> RepositoryResult<(usize, Vec<PayrollRecord>)>;
}

/// Write operations over payroll records.
pub trait PayrollWriter {
    fn create_payroll_record(&self, new_record: &NewPayrollRecord)
    -> RepositoryResult<PayrollRecord>;
    fn delete_payroll_record(&self, record_id: i32, hub_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over daily sales reports.
pub trait SalesReportReader {
    fn get_sales_report_by_id(&self, id: i32, hub_id: i32)
    -> RepositoryResult<Option<SalesReport>>;
    fn list_sales_reports(
        &self,
        query: SalesReportListQuery,
    ) -> RepositoryResult<(usize, Vec<SalesReport>)>;
}

/// Write operations over daily sales reports.
pub trait SalesReportWriter {
    fn create_sales_report(&self, new_report: &NewSalesReport) -> RepositoryResult<SalesReport>;
    /// Insert every report in one transaction.
    fn create_sales_reports(&self, new_reports: &[NewSalesReport]) -> RepositoryResult<usize>;
    fn update_sales_report(
        &self,
        report_id: i32,
        hub_id: i32,
        updates: &UpdateSalesReport,
    ) -> RepositoryResult<SalesReport>;
    fn delete_sales_report(&self, report_id: i32, hub_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over tank levels.
pub trait InventoryReader {
    fn get_inventory_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<InventoryLevel>>;
    fn list_inventory(&self, query: InventoryListQuery) -> RepositoryResult<Vec<InventoryLevel>>;
}

/// Write operations over tank levels.
pub trait InventoryWriter {
    /// Insert a tank or replace the tank of the same station and grade.
    fn upsert_inventory(&self, level: &NewInventoryLevel) -> RepositoryResult<InventoryLevel>;
    fn record_inventory_reading(
        &self,
        inventory_id: i32,
        hub_id: i32,
        volume_gallons: f64,
    ) -> RepositoryResult<InventoryLevel>;
    fn delete_inventory(&self, inventory_id: i32, hub_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over fuel deliveries.
pub trait DeliveryReader {
    fn get_delivery_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Delivery>>;
    fn list_deliveries(&self, query: DeliveryListQuery)
    -> RepositoryResult<(usize, Vec<Delivery>)>;
}

/// Write operations over fuel deliveries.
pub trait DeliveryWriter {
    /// Record a delivery and move the station's tanks to the `after` readings.
    fn create_delivery(&self, new_delivery: &NewDelivery) -> RepositoryResult<Delivery>;
    fn delete_delivery(&self, delivery_id: i32, hub_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over licenses.
pub trait LicenseReader {
    fn get_license_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<License>>;
    fn list_licenses(&self, query: LicenseListQuery) -> RepositoryResult<Vec<License>>;
}

/// Write operations over licenses.
pub trait LicenseWriter {
    fn create_license(&self, new_license: &NewLicense) -> RepositoryResult<License>;
    fn update_license(
        &self,
        license_id: i32,
        hub_id: i32,
        updates: &UpdateLicense,
    ) -> RepositoryResult<License>;
    fn set_license_document(
        &self,
        license_id: i32,
        hub_id: i32,
        document_path: Option<&str>,
    ) -> RepositoryResult<License>;
    fn delete_license(&self, license_id: i32, hub_id: i32) -> RepositoryResult<()>;
}

/// Access to the SMS provider configuration of a hub.
pub trait SmsConfigReader {
    fn get_sms_config(&self, hub_id: i32) -> RepositoryResult<Option<SmsConfig>>;
}

/// Persist the SMS provider configuration of a hub.
pub trait SmsConfigWriter {
    fn save_sms_config(&self, config: &NewSmsConfig) -> RepositoryResult<SmsConfig>;
}

/// Read the log of SMS send attempts.
pub trait SmsLogReader {
    fn list_sms_messages(
        &self,
        query: SmsMessageListQuery,
    ) -> RepositoryResult<(usize, Vec<SmsMessage>)>;
}

/// Append to the log of SMS send attempts.
pub trait SmsLogWriter {
    fn record_sms_message(&self, message: &NewSmsMessage) -> RepositoryResult<SmsMessage>;
}

/// Read the audit trail.
pub trait AuditReader {
    fn list_audit_entries(&self, query: AuditListQuery)
    -> RepositoryResult<(usize, Vec<AuditEntry>)>;
}

/// Append to the audit trail.
pub trait AuditWriter {
    fn record_audit_entry(&self, entry: &NewAuditEntry) -> RepositoryResult<AuditEntry>;
}
