use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

use crate::domain::fuel::FuelGrade;

/// Gallons sold per grade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GradeGallons {
    pub regular: f64,
    pub plus: f64,
    pub premium: f64,
}

impl GradeGallons {
    pub fn get(&self, grade: FuelGrade) -> f64 {
        match grade {
            FuelGrade::Regular => self.regular,
            FuelGrade::Plus => self.plus,
            FuelGrade::Premium => self.premium,
        }
    }

    pub fn total(&self) -> f64 {
        self.regular + self.plus + self.premium
    }

    fn add(&mut self, other: &GradeGallons) {
        self.regular += other.regular;
        self.plus += other.plus;
        self.premium += other.premium;
    }
}

/// Daily shift-close figures for one station.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SalesReport {
    pub id: i32,
    pub hub_id: i32,
    pub station_id: i32,
    pub report_date: NaiveDate,
    pub gallons: GradeGallons,
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

impl SalesReport {
    pub fn total_sales_cents(&self) -> i64 {
        i64::from(self.fuel_sales_cents)
            + i64::from(self.grocery_sales_cents)
            + i64::from(self.lottery_sales_cents)
    }

    pub fn tendered_cents(&self) -> i64 {
        i64::from(self.cash_cents) + i64::from(self.card_cents)
    }

    /// Positive when the drawer is over, negative when short.
    pub fn over_short_cents(&self) -> i64 {
        self.tendered_cents() - self.total_sales_cents()
    }
}

/// Payload required to insert a sales report.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSalesReport {
    pub hub_id: i32,
    pub station_id: i32,
    pub report_date: NaiveDate,
    pub gallons: GradeGallons,
    pub fuel_sales_cents: i32,
    pub grocery_sales_cents: i32,
    pub lottery_sales_cents: i32,
    pub cash_cents: i32,
    pub card_cents: i32,
    pub notes: Option<String>,
    pub created_by: String,
}

/// Full replacement of the editable report figures.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateSalesReport {
    pub gallons: GradeGallons,
    pub fuel_sales_cents: i32,
    pub grocery_sales_cents: i32,
    pub lottery_sales_cents: i32,
    pub cash_cents: i32,
    pub card_cents: i32,
    pub notes: Option<String>,
    pub updated_at: NaiveDateTime,
}

/// Query definition used to list sales reports for a hub.
#[derive(Debug, Clone)]
pub struct SalesReportListQuery {
    pub hub_id: i32,
    pub station_id: Option<i32>,
    /// Inclusive lower bound on the report date.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on the report date.
    pub to: Option<NaiveDate>,
    pub pagination: Option<Pagination>,
}

impl SalesReportListQuery {
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            station_id: None,
            from: None,
            to: None,
            pagination: None,
        }
    }

    pub fn station(mut self, station_id: i32) -> Self {
        self.station_id = Some(station_id);
        self
    }

    pub fn between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Summed figures over a set of reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SalesTotals {
    pub reports: usize,
    pub gallons: GradeGallons,
    pub fuel_sales_cents: i64,
    pub grocery_sales_cents: i64,
    pub lottery_sales_cents: i64,
    pub total_sales_cents: i64,
    pub over_short_cents: i64,
}

impl SalesTotals {
    pub fn add(&mut self, report: &SalesReport) {
        self.reports += 1;
        self.gallons.add(&report.gallons);
        self.fuel_sales_cents += i64::from(report.fuel_sales_cents);
        self.grocery_sales_cents += i64::from(report.grocery_sales_cents);
        self.lottery_sales_cents += i64::from(report.lottery_sales_cents);
        self.total_sales_cents += report.total_sales_cents();
        self.over_short_cents += report.over_short_cents();
    }

    /// Average fuel revenue per gallon in cents, if any fuel was sold.
    pub fn average_price_cents(&self) -> Option<f64> {
        let gallons = self.gallons.total();
        (gallons > 0.0).then(|| self.fuel_sales_cents as f64 / gallons)
    }
}

/// Totals per station and per day over a set of reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SalesSummary {
    pub totals: SalesTotals,
    pub by_station: BTreeMap<i32, SalesTotals>,
    pub by_day: BTreeMap<NaiveDate, SalesTotals>,
}

impl SalesSummary {
    pub fn from_reports<'a, I>(reports: I) -> Self
    where
        I: IntoIterator<Item = &'a SalesReport>,
    {
        let mut summary = Self::default();
        for report in reports {
            summary.totals.add(report);
            summary
                .by_station
                .entry(report.station_id)
                .or_default()
                .add(report);
            summary
                .by_day
                .entry(report.report_date)
                .or_default()
                .add(report);
        }
        summary
    }
}
