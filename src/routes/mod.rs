pub mod api;
pub mod audit;
pub mod deliveries;
pub mod employees;
pub mod inventory;
pub mod licenses;
pub mod main;
pub mod payroll;
pub mod permissions;
pub mod sales;
pub mod sms;
pub mod stations;
pub mod users;
