pub mod audit;
pub mod delivery;
pub mod employee;
pub mod fuel;
pub mod inventory;
pub mod license;
pub mod payroll;
pub mod permission;
pub mod sales;
pub mod sms;
pub mod station;
pub mod user;
