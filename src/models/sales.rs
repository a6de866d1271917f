use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::sales::{
    GradeGallons, NewSalesReport as DomainNewSalesReport, SalesReport as DomainSalesReport,
    UpdateSalesReport as DomainUpdateSalesReport,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::sales_reports)]
pub struct SalesReport {
    pub id: i32,
    pub hub_id: i32,
    pub station_id: i32,
    pub report_date: NaiveDate,
    pub regular_gallons: f64,
    pub plus_gallons: f64,
    pub premium_gallons: f64,
    pub fuel_sales_cents: i32,
    pub grocery_sales_cents: i32,
    pub lottery_sales_cents: i32,
    pub cash_cents: i32,
    pub card_cents: i32,
    pub notes: Option<String>,
    pub created_by: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::sales_reports)]
pub struct NewSalesReport<'a> {
    pub hub_id: i32,
    pub station_id: i32,
    pub report_date: NaiveDate,
    pub regular_gallons: f64,
    pub plus_gallons: f64,
    pub premium_gallons: f64,
    pub fuel_sales_cents: i32,
    pub grocery_sales_cents: i32,
    pub lottery_sales_cents: i32,
    pub cash_cents: i32,
    pub card_cents: i32,
    pub notes: Option<&'a str>,
    pub created_by: &'a str,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::sales_reports, treat_none_as_null = true)]
pub struct UpdateSalesReport<'a> {
    pub regular_gallons: f64,
    pub plus_gallons: f64,
    pub premium_gallons: f64,
    pub fuel_sales_cents: i32,
    pub grocery_sales_cents: i32,
    pub lottery_sales_cents: i32,
    pub cash_cents: i32,
    pub card_cents: i32,
    pub notes: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl From<SalesReport> for DomainSalesReport {
    fn from(value: SalesReport) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            station_id: value.station_id,
            report_date: value.report_date,
            gallons: GradeGallons {
                regular: value.regular_gallons,
                plus: value.plus_gallons,
                premium: value.premium_gallons,
            },
            fuel_sales_cents: value.fuel_sales_cents,
            grocery_sales_cents: value.grocery_sales_cents,
            lottery_sales_cents: value.lottery_sales_cents,
            cash_cents: value.cash_cents,
            card_cents: value.card_cents,
            notes: value.notes,
            created_by: value.created_by,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewSalesReport> for NewSalesReport<'a> {
    fn from(value: &'a DomainNewSalesReport) -> Self {
        Self {
            hub_id: value.hub_id,
            station_id: value.station_id,
            report_date: value.report_date,
            regular_gallons: value.gallons.regular,
            plus_gallons: value.gallons.plus,
            premium_gallons: value.gallons.premium,
            fuel_sales_cents: value.fuel_sales_cents,
            grocery_sales_cents: value.grocery_sales_cents,
            lottery_sales_cents: value.lottery_sales_cents,
            cash_cents: value.cash_cents,
            card_cents: value.card_cents,
            notes: value.notes.as_deref(),
            created_by: value.created_by.as_str(),
        }
    }
}

impl<'a> From<&'a DomainUpdateSalesReport> for UpdateSalesReport<'a> {
    fn from(value: &'a DomainUpdateSalesReport) -> Self {
        Self {
            regular_gallons: value.gallons.regular,
            plus_gallons: value.gallons.plus,
            premium_gallons: value.gallons.premium,
            fuel_sales_cents: value.fuel_sales_cents,
            grocery_sales_cents: value.grocery_sales_cents,
            lottery_sales_cents: value.lottery_sales_cents,
            cash_cents: value.cash_cents,
            card_cents: value.card_cents,
            notes: value.notes.as_deref(),
            updated_at: value.updated_at,
        }
    }
}
