use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::payroll::NewPayrollRecord;
use crate::forms::{MoneyError, optional_multiline, parse_money_cents};

/// Result type returned by the payroll form helpers.
pub type PayrollFormResult<T> = Result<T, PayrollFormError>;

/// Errors that can occur while processing payroll forms.
#[derive(Debug, Error)]
pub enum PayrollFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("pay period cannot end before it starts")]
    PeriodEndsBeforeStart,
    #[error("hourly rate: {0}")]
    HourlyRate(#[from] MoneyError),
    #[error("gross pay is too large to record")]
    GrossPayTooLarge,
}

/// Payload of the "Add payroll record" form.
#[derive(Debug, Deserialize, Validate)]
pub struct AddPayrollRecordForm {
    pub employee_id: i32,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    #[validate(range(min = 0.0, max = 744.0))]
    pub regular_hours: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 744.0))]
    pub overtime_hours: f64,
    /// Overrides the employee's hourly rate when present.
    pub hourly_rate: Option<String>,
    pub notes: Option<String>,
}

impl AddPayrollRecordForm {
    /// Build the record, falling back to `default_rate_cents` from the employee.
    pub fn into_new_payroll_record(
        self,
        hub_id: i32,
        default_rate_cents: i32,
    ) -> PayrollFormResult<NewPayrollRecord> {
        self.validate()?;

        if self.period_end < self.period_start {
            return Err(PayrollFormError::PeriodEndsBeforeStart);
        }

        let rate_cents = match self.hourly_rate.as_deref().map(str::trim) {
            Some(rate) if !rate.is_empty() => parse_money_cents(rate)?,
            _ => default_rate_cents,
        };

        let mut record = NewPayrollRecord::new(
            hub_id,
            self.employee_id,
            (self.period_start, self.period_end),
            self.regular_hours,
            self.overtime_hours,
            rate_cents,
        )
        .ok_or(PayrollFormError::GrossPayTooLarge)?;
        if let Some(notes) = optional_multiline(self.notes.as_deref()) {
            record = record.with_notes(notes);
        }

        Ok(record)
    }
}
