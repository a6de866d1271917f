use mockall::mock;

use super::{
    AuditReader, AuditWriter, DeliveryReader, DeliveryWriter, EmployeeReader, EmployeeWriter,
    InventoryReader, InventoryWriter, LicenseReader, LicenseWriter, PayrollReader, PayrollWriter,
    SalesReportReader, SalesReportWriter, SmsConfigReader, SmsConfigWriter, SmsLogReader,
    SmsLogWriter, StationReader, StationWriter, UserReader, UserWriter,
};
use crate::domain::{
    audit::{AuditEntry, AuditListQuery, NewAuditEntry},
    delivery::{Delivery, DeliveryListQuery, NewDelivery},
    employee::{Employee, EmployeeListQuery, NewEmployee, UpdateEmployee},
    inventory::{InventoryLevel, InventoryListQuery, NewInventoryLevel},
    license::{License, LicenseListQuery, NewLicense, UpdateLicense},
    payroll::{NewPayrollRecord, PayrollListQuery, PayrollRecord},
    permission::PermissionMatrix,
    sales::{NewSalesReport, SalesReport, SalesReportListQuery, UpdateSalesReport},
    sms::{NewSmsConfig, NewSmsMessage, SmsConfig, SmsMessage, SmsMessageListQuery},
    station::{NewStation, Station, StationListQuery, UpdateStation},
    user::{NewUser, UpdateUser, User, UserListQuery},
};
use pushkind_common::repository::errors::RepositoryResult;

mock! {
    pub Repository {}

    impl StationReader for Repository {
        fn get_station_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Station>>;
        fn list_stations(&self, query: StationListQuery) -> RepositoryResult<(usize, Vec<Station>)>;
    }

    impl StationWriter for Repository {
        fn create_station(&self, new_station: &NewStation) -> RepositoryResult<Station>;
        fn update_station(&self, station_id: i32, hub_id: i32, updates: &UpdateStation) -> RepositoryResult<Station>;
        fn delete_station(&self, station_id: i32, hub_id: i32) -> RepositoryResult<()>;
    }

    impl UserReader for Repository {
        fn get_user_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<User>>;
        fn get_user_by_email(&self, email: &str, hub_id: i32) -> RepositoryResult<Option<User>>;
        fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)>;
    }

    impl UserWriter for Repository {
        fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
        fn update_user(&self, user_id: i32, hub_id: i32, updates: &UpdateUser) -> RepositoryResult<User>;
        fn save_user_permissions<'a>(&self, user_id: i32, hub_id: i32, permissions: Option<&'a PermissionMatrix>) -> RepositoryResult<User>;
        fn delete_user(&self, user_id: i32, hub_id: i32) -> RepositoryResult<()>;
    }

    impl EmployeeReader for Repository {
        fn get_employee_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Employee>>;
        fn list_employees(&self, query: EmployeeListQuery) -> RepositoryResult<(usize, Vec<Employee>)>;
    }

    impl EmployeeWriter for Repository {
        fn create_employee(&self, new_employee: &NewEmployee) -> RepositoryResult<Employee>;
        fn update_employee(&self, employee_id: i32, hub_id: i32, updates: &UpdateEmployee) -> RepositoryResult<Employee>;
        fn delete_employee(&self, employee_id: i32, hub_id: i32) -> RepositoryResult<()>;
    }

    impl PayrollReader for Repository {
        fn list_payroll_records(&self, query: PayrollListQuery) -> RepositoryResult<(usize, Vec<PayrollRecord>)>;
    }

    impl PayrollWriter for Repository {
        fn create_payroll_record(&self, new_record: &NewPayrollRecord) -> RepositoryResult<PayrollRecord>;
        fn delete_payroll_record(&self, record_id: i32, hub_id: i32) -> RepositoryResult<()>;
    }

    impl SalesReportReader for Repository {
        fn get_sales_report_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<SalesReport>>;
        fn list_sales_reports(&self, query: SalesReportListQuery) -> RepositoryResult<(usize, Vec<SalesReport>)>;
    }

    impl SalesReportWriter for Repository {
        fn create_sales_report(&self, new_report: &NewSalesReport) -> RepositoryResult<SalesReport>;
        fn create_sales_reports(&self, new_reports: &[NewSalesReport]) -> RepositoryResult<usize>;
        fn update_sales_report(&self, report_id: i32, hub_id: i32, updates: &UpdateSalesReport) -> RepositoryResult<SalesReport>;
        fn delete_sales_report(&self, report_id: i32, hub_id: i32) -> RepositoryResult<()>;
    }

    impl InventoryReader for Repository {
        fn get_inventory_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<InventoryLevel>>;
        fn list_inventory(&self, query: InventoryListQuery) -> RepositoryResult<Vec<InventoryLevel>>;
    }

    impl InventoryWriter for Repository {
        fn upsert_inventory(&self, level: &NewInventoryLevel) -> RepositoryResult<InventoryLevel>;
        fn record_inventory_reading(&self, inventory_id: i32, hub_id: i32, volume_gallons: f64) -> RepositoryResult<InventoryLevel>;
        fn delete_inventory(&self, inventory_id: i32, hub_id: i32) -> RepositoryResult<()>;
    }

    impl DeliveryReader for Repository {
        fn get_delivery_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Delivery>>;
        fn list_deliveries(&self, query: DeliveryListQuery) -> RepositoryResult<(usize, Vec<Delivery>)>;
    }

    impl DeliveryWriter for Repository {
        fn create_delivery(&self, new_delivery: &NewDelivery) -> RepositoryResult<Delivery>;
        fn delete_delivery(&self, delivery_id: i32, hub_id: i32) -> RepositoryResult<()>;
    }

    impl LicenseReader for Repository {
        fn get_license_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<License>>;
        fn list_licenses(&self, query: LicenseListQuery) -> RepositoryResult<Vec<License>>;
    }

    impl LicenseWriter for Repository {
        fn create_license(&self, new_license: &NewLicense) -> RepositoryResult<License>;
        fn update_license(&self, license_id: i32, hub_id: i32, updates: &UpdateLicense) -> RepositoryResult<License>;
        fn set_license_document<'a>(&self, license_id: i32, hub_id: i32, document_path: Option<&'a str>) -> RepositoryResult<License>;
        fn delete_license(&self, license_id: i32, hub_id: i32) -> RepositoryResult<()>;
    }

    impl SmsConfigReader for Repository {
        fn get_sms_config(&self, hub_id: i32) -> RepositoryResult<Option<SmsConfig>>;
    }

    impl SmsConfigWriter for Repository {
        fn save_sms_config(&self, config: &NewSmsConfig) -> RepositoryResult<SmsConfig>;
    }

    impl SmsLogReader for Repository {
        fn list_sms_messages(&self, query: SmsMessageListQuery) -> RepositoryResult<(usize, Vec<SmsMessage>)>;
    }

    impl SmsLogWriter for Repository {
        fn record_sms_message(&self, message: &NewSmsMessage) -> RepositoryResult<SmsMessage>;
    }

    impl AuditReader for Repository {
        fn list_audit_entries(&self, query: AuditListQuery) -> RepositoryResult<(usize, Vec<AuditEntry>)>;
    }

    impl AuditWriter for Repository {
        fn record_audit_entry(&self, entry: &NewAuditEntry) -> RepositoryResult<AuditEntry>;
    }
}
