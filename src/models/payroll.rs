use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::payroll::{
    NewPayrollRecord as DomainNewPayrollRecord, PayrollRecord as DomainPayrollRecord,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::payroll_records)]
pub struct PayrollRecord {
    pub id: i32,
    pub hub_id: i32,
    pub employee_id: i32,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub regular_hours: f64,
    pub overtime_hours: f64,
    pub hourly_rate_cents: i32,
    pub gross_pay_cents: i32,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::payroll_records)]
pub struct NewPayrollRecord<'a> {
    pub hub_id: i32,
    pub employee_id: i32,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub regular_hours: f64,
    pub overtime_hours: f64,
    pub hourly_rate_cents: i32,
    pub gross_pay_cents: i32,
    pub notes: Option<&'a str>,
}

impl From<PayrollRecord> for DomainPayrollRecord {
    fn from(value: PayrollRecord) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            employee_id: value.employee_id,
            period_start: value.period_start,
            period_end: value.period_end,
            regular_hours: value.regular_hours,
            overtime_hours: value.overtime_hours,
            hourly_rate_cents: value.hourly_rate_cents,
            gross_pay_cents: value.gross_pay_cents,
            notes: value.notes,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewPayrollRecord> for NewPayrollRecord<'a> {
    fn from(value: &'a DomainNewPayrollRecord) -> Self {
        Self {
            hub_id: value.hub_id,
            employee_id: value.employee_id,
            period_start: value.period_start,
            period_end: value.period_end,
            regular_hours: value.regular_hours,
            overtime_hours: value.overtime_hours,
            hourly_rate_cents: value.hourly_rate_cents,
            gross_pay_cents: value.gross_pay_cents,
            notes: value.notes.as_deref(),
        }
    }
}
