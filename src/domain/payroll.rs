use chrono::{NaiveDate, NaiveDateTime};
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

/// Pay multiplier applied to overtime hours.
pub const OVERTIME_MULTIPLIER: f64 = 1.5;

/// Gross pay in cents for the given rate and hours, rounded to the nearest cent.
///
/// `None` when the amount does not fit the stored cents column.
pub fn gross_pay_cents(
    hourly_rate_cents: i32,
    regular_hours: f64,
    overtime_hours: f64,
) -> Option<i32> {
    let rate = f64::from(hourly_rate_cents);
    let gross = (rate * regular_hours + rate * OVERTIME_MULTIPLIER * overtime_hours).round();
    if !gross.is_finite() {
        return None;
    }
    // `as` saturates, so anything past i32 is caught by the conversion.
    i32::try_from(gross as i64).ok()
}

/// Hours and pay for one employee over one pay period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayrollRecord {
    pub id: i32,
    pub hub_id: i32,
    pub employee_id: i32,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub regular_hours: f64,
    pub overtime_hours: f64,
    /// Rate in force for the period, copied from the employee at entry time.
    pub hourly_rate_cents: i32,
    pub gross_pay_cents: i32,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl PayrollRecord {
    pub fn total_hours(&self) -> f64 {
        self.regular_hours + self.overtime_hours
    }
}

/// Payload required to insert a payroll record.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayrollRecord {
    pub hub_id: i32,
    pub employee_id: i32,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub regular_hours: f64,
    pub overtime_hours: f64,
    pub hourly_rate_cents: i32,
    pub gross_pay_cents: i32,
    pub notes: Option<String>,
}

impl NewPayrollRecord {
    /// Build a record and compute its gross pay; `None` when the pay overflows.
    pub fn new(
        hub_id: i32,
        employee_id: i32,
        period: (NaiveDate, NaiveDate),
        regular_hours: f64,
        overtime_hours: f64,
        hourly_rate_cents: i32,
    ) -> Option<Self> {
        Some(Self {
            hub_id,
            employee_id,
            period_start: period.0,
            period_end: period.1,
            regular_hours,
            overtime_hours,
            hourly_rate_cents,
            gross_pay_cents: gross_pay_cents(hourly_rate_cents, regular_hours, overtime_hours)?,
            notes: None,
        })
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Query definition used to list payroll records for a hub.
#[derive(Debug, Clone)]
pub struct PayrollListQuery {
    pub hub_id: i32,
    pub employee_id: Option<i32>,
    pub pagination: Option<Pagination>,
}

impl PayrollListQuery {
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            employee_id: None,
            pagination: None,
        }
    }

    pub fn employee(mut self, employee_id: i32) -> Self {
        self.employee_id = Some(employee_id);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
