use chrono::{Local, NaiveDate};
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::employee::{NewEmployee, UpdateEmployee};
use crate::forms::{
    MoneyError, NAME_MAX_LEN, blank_as_none, optional_inline, parse_money_cents,
    sanitize_inline_text,
};

/// Result type returned by the employee form helpers.
pub type EmployeeFormResult<T> = Result<T, EmployeeFormError>;

/// Errors that can occur while processing employee forms.
#[derive(Debug, Error)]
pub enum EmployeeFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("first and last name are required")]
    EmptyName,
    #[error("position cannot be empty")]
    EmptyPosition,
    #[error("hourly rate: {0}")]
    HourlyRate(#[from] MoneyError),
}

struct EmployeeFields {
    first_name: String,
    last_name: String,
    position: String,
    phone: Option<String>,
    email: Option<String>,
    hourly_rate_cents: i32,
}

fn sanitize_fields(
    first_name: &str,
    last_name: &str,
    position: &str,
    phone: Option<&str>,
    email: Option<&str>,
    hourly_rate: &str,
) -> EmployeeFormResult<EmployeeFields> {
    let first_name = sanitize_inline_text(first_name);
    let last_name = sanitize_inline_text(last_name);
    if first_name.is_empty() || last_name.is_empty() {
        return Err(EmployeeFormError::EmptyName);
    }

    let position = sanitize_inline_text(position);
    if position.is_empty() {
        return Err(EmployeeFormError::EmptyPosition);
    }

    Ok(EmployeeFields {
        first_name,
        last_name,
        position,
        phone: optional_inline(phone),
        email: optional_inline(email).map(|value| value.to_lowercase()),
        hourly_rate_cents: parse_money_cents(hourly_rate)?,
    })
}

/// Payload of the "Add employee" form.
#[derive(Debug, Deserialize, Validate)]
pub struct AddEmployeeForm {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub station_id: Option<i32>,
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub first_name: String,
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub last_name: String,
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub position: String,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(email)]
    pub email: Option<String>,
    pub hire_date: NaiveDate,
    /// Dollar amount, e.g. `15.75`.
    pub hourly_rate: String,
}

impl AddEmployeeForm {
    pub fn into_new_employee(self, hub_id: i32) -> EmployeeFormResult<NewEmployee> {
        self.validate()?;

        let fields = sanitize_fields(
            &self.first_name,
            &self.last_name,
            &self.position,
            self.phone.as_deref(),
            self.email.as_deref(),
            &self.hourly_rate,
        )?;

        Ok(NewEmployee {
            hub_id,
            station_id: self.station_id,
            first_name: fields.first_name,
            last_name: fields.last_name,
            position: fields.position,
            phone: fields.phone,
            email: fields.email,
            hire_date: self.hire_date,
            hourly_rate_cents: fields.hourly_rate_cents,
        })
    }
}

/// Payload of the "Edit employee" form.
#[derive(Debug, Deserialize, Validate)]
pub struct EditEmployeeForm {
    pub employee_id: i32,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub station_id: Option<i32>,
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub first_name: String,
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub last_name: String,
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub position: String,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(email)]
    pub email: Option<String>,
    pub hire_date: NaiveDate,
    pub hourly_rate: String,
    #[serde(default)]
    pub is_active: bool,
}

impl EditEmployeeForm {
    pub fn into_update_employee(self) -> EmployeeFormResult<UpdateEmployee> {
        self.validate()?;

        let fields = sanitize_fields(
            &self.first_name,
            &self.last_name,
            &self.position,
            self.phone.as_deref(),
            self.email.as_deref(),
            &self.hourly_rate,
        )?;

        Ok(UpdateEmployee {
            station_id: self.station_id,
            first_name: fields.first_name,
            last_name: fields.last_name,
            position: fields.position,
            phone: fields.phone,
            email: fields.email,
            hire_date: self.hire_date,
            hourly_rate_cents: fields.hourly_rate_cents,
            is_active: self.is_active,
            updated_at: Local::now().naive_utc(),
        })
    }
}
