use std::io::{Read, Seek};

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use chrono::{Local, NaiveDate};
use csv::Trim;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::sales::{GradeGallons, NewSalesReport, UpdateSalesReport};
use crate::forms::{MoneyError, blank_as_none, optional_multiline, parse_money_cents};

/// Result type returned by the sales form helpers.
pub type SalesFormResult<T> = Result<T, SalesFormError>;

/// Errors that can occur while processing sales report forms and uploads.
#[derive(Debug, Error)]
pub enum SalesFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("{field}: {source}")]
    Amount {
        field: &'static str,
        #[source]
        source: MoneyError,
    },
    #[error("gallons sold cannot be negative")]
    NegativeGallons,
    #[error("row {row}: {message}")]
    UploadRow { row: usize, message: String },
    #[error("upload contains no sales reports")]
    EmptyUpload,
    #[error("error reading the uploaded file")]
    FileRead(#[from] std::io::Error),
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Money fields typed as dollar amounts.
struct Amounts {
    fuel_sales_cents: i32,
    grocery_sales_cents: i32,
    lottery_sales_cents: i32,
    cash_cents: i32,
    card_cents: i32,
}

fn parse_amount(field: &'static str, value: &str) -> SalesFormResult<i32> {
    parse_money_cents(value).map_err(|source| SalesFormError::Amount { field, source })
}

fn parse_amounts(
    fuel_sales: &str,
    grocery_sales: &str,
    lottery_sales: &str,
    cash: &str,
    card: &str,
) -> SalesFormResult<Amounts> {
    Ok(Amounts {
        fuel_sales_cents: parse_amount("fuel sales", fuel_sales)?,
        grocery_sales_cents: parse_amount("grocery sales", grocery_sales)?,
        lottery_sales_cents: parse_amount("lottery sales", lottery_sales)?,
        cash_cents: parse_amount("cash", cash)?,
        card_cents: parse_amount("card", card)?,
    })
}

fn gallons(regular: f64, plus: f64, premium: f64) -> SalesFormResult<GradeGallons> {
    let gallons = GradeGallons {
        regular,
        plus,
        premium,
    };
    if [regular, plus, premium]
        .iter()
        .any(|value| !value.is_finite() || *value < 0.0)
    {
        return Err(SalesFormError::NegativeGallons);
    }
    Ok(gallons)
}

/// Payload of the "Add sales report" form.
#[derive(Debug, Deserialize, Validate)]
pub struct AddSalesReportForm {
    pub station_id: i32,
    pub report_date: NaiveDate,
    #[serde(default)]
    pub regular_gallons: f64,
    #[serde(default)]
    pub plus_gallons: f64,
    #[serde(default)]
    pub premium_gallons: f64,
    #[serde(default)]
    pub fuel_sales: String,
    #[serde(default)]
    pub grocery_sales: String,
    #[serde(default)]
    pub lottery_sales: String,
    #[serde(default)]
    pub cash: String,
    #[serde(default)]
    pub card: String,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

impl AddSalesReportForm {
    pub fn into_new_sales_report(
        self,
        hub_id: i32,
        created_by: &str,
    ) -> SalesFormResult<NewSalesReport> {
        self.validate()?;

        let gallons = gallons(self.regular_gallons, self.plus_gallons, self.premium_gallons)?;
        let amounts = parse_amounts(
            &self.fuel_sales,
            &self.grocery_sales,
            &self.lottery_sales,
            &self.cash,
            &self.card,
        )?;

        Ok(NewSalesReport {
            hub_id,
            station_id: self.station_id,
            report_date: self.report_date,
            gallons,
            fuel_sales_cents: amounts.fuel_sales_cents,
            grocery_sales_cents: amounts.grocery_sales_cents,
            lottery_sales_cents: amounts.lottery_sales_cents,
            cash_cents: amounts.cash_cents,
            card_cents: amounts.card_cents,
            notes: optional_multiline(self.notes.as_deref()),
            created_by: created_by.to_string(),
        })
    }
}

/// Payload of the "Edit sales report" form. Station and date are fixed.
#[derive(Debug, Deserialize, Validate)]
pub struct EditSalesReportForm {
    pub report_id: i32,
    #[serde(default)]
    pub regular_gallons: f64,
    #[serde(default)]
    pub plus_gallons: f64,
    #[serde(default)]
    pub premium_gallons: f64,
    #[serde(default)]
    pub fuel_sales: String,
    #[serde(default)]
    pub grocery_sales: String,
    #[serde(default)]
    pub lottery_sales: String,
    #[serde(default)]
    pub cash: String,
    #[serde(default)]
    pub card: String,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

impl EditSalesReportForm {
    pub fn into_update_sales_report(self) -> SalesFormResult<UpdateSalesReport> {
        self.validate()?;

        let gallons = gallons(self.regular_gallons, self.plus_gallons, self.premium_gallons)?;
        let amounts = parse_amounts(
            &self.fuel_sales,
            &self.grocery_sales,
            &self.lottery_sales,
            &self.cash,
            &self.card,
        )?;

        Ok(UpdateSalesReport {
            gallons,
            fuel_sales_cents: amounts.fuel_sales_cents,
            grocery_sales_cents: amounts.grocery_sales_cents,
            lottery_sales_cents: amounts.lottery_sales_cents,
            cash_cents: amounts.cash_cents,
            card_cents: amounts.card_cents,
            notes: optional_multiline(self.notes.as_deref()),
            updated_at: Local::now().naive_utc(),
        })
    }
}

/// Query string of the sales list, dashboard and export.
#[derive(Debug, Default, Deserialize)]
pub struct SalesFilterQuery {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub station_id: Option<i32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub to: Option<NaiveDate>,
    pub page: Option<usize>,
}

#[derive(MultipartForm)]
/// Multipart form for importing daily sales reports from CSV.
pub struct UploadSalesReportsForm {
    #[multipart(limit = "10MB")]
    pub csv: TempFile,
}

impl UploadSalesReportsForm {
    /// Parse the uploaded CSV file into new sales reports.
    pub fn parse(&mut self, hub_id: i32, created_by: &str) -> SalesFormResult<Vec<NewSalesReport>> {
        self.csv.file.rewind()?;
        parse_sales_reports(self.csv.file.by_ref(), hub_id, created_by)
    }
}

#[derive(Deserialize)]
struct SalesCsvRow {
    station_id: i32,
    report_date: NaiveDate,
    #[serde(default)]
    regular_gallons: f64,
    #[serde(default)]
    plus_gallons: f64,
    #[serde(default)]
    premium_gallons: f64,
    #[serde(default)]
    fuel_sales: String,
    #[serde(default)]
    grocery_sales: String,
    #[serde(default)]
    lottery_sales: String,
    #[serde(default)]
    cash: String,
    #[serde(default)]
    card: String,
}

/// Parse CSV rows in the layout written by [`crate::services::sales::export_sales_csv`].
pub fn parse_sales_reports<R: Read>(
    reader: R,
    hub_id: i32,
    created_by: &str,
) -> SalesFormResult<Vec<NewSalesReport>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(reader);

    let mut reports = Vec::new();

    for (index, row) in csv_reader.deserialize::<SalesCsvRow>().enumerate() {
        let row_number = index + 2; // header is row 1
        let record = row.map_err(|err| SalesFormError::UploadRow {
            row: row_number,
            message: err.to_string(),
        })?;

        let to_row_error = |err: SalesFormError| SalesFormError::UploadRow {
            row: row_number,
            message: err.to_string(),
        };

        let gallons = gallons(
            record.regular_gallons,
            record.plus_gallons,
            record.premium_gallons,
        )
        .map_err(to_row_error)?;
        let amounts = parse_amounts(
            &record.fuel_sales,
            &record.grocery_sales,
            &record.lottery_sales,
            &record.cash,
            &record.card,
        )
        .map_err(to_row_error)?;

        reports.push(NewSalesReport {
            hub_id,
            station_id: record.station_id,
            report_date: record.report_date,
            gallons,
            fuel_sales_cents: amounts.fuel_sales_cents,
            grocery_sales_cents: amounts.grocery_sales_cents,
            lottery_sales_cents: amounts.lottery_sales_cents,
            cash_cents: amounts.cash_cents,
            card_cents: amounts.card_cents,
            notes: None,
            created_by: created_by.to_string(),
        });
    }

    if reports.is_empty() {
        return Err(SalesFormError::EmptyUpload);
    }

    Ok(reports)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    const HEADER: &str = "station_id,report_date,regular_gallons,plus_gallons,premium_gallons,fuel_sales,grocery_sales,lottery_sales,cash,card\n";

    #[test]
    fn parses_uploaded_rows() {
        let csv = format!(
            "{HEADER}1,2024-06-01,1200.5,300,150.25,\"5,210.40\",820.10,240,2100,4170.5\n2,2024-06-01,900,0,0,3000,0,0,1000,2000\n"
        );

        let reports = parse_sales_reports(Cursor::new(csv), 4, "ops@example.com").expect("parses");

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].hub_id, 4);
        assert_eq!(reports[0].gallons.premium, 150.25);
        assert_eq!(reports[0].fuel_sales_cents, 521_040);
        assert_eq!(reports[0].card_cents, 417_050);
        assert_eq!(reports[1].station_id, 2);
        assert_eq!(reports[1].created_by, "ops@example.com");
    }

    #[test]
    fn reports_row_number_of_bad_amount() {
        let csv = format!("{HEADER}1,2024-06-01,10,0,0,12.345,0,0,0,0\n");

        let result = parse_sales_reports(Cursor::new(csv), 1, "ops@example.com");

        assert!(matches!(result, Err(SalesFormError::UploadRow { row: 2, .. })));
    }

    #[test]
    fn reports_row_number_of_bad_date() {
        let csv = format!("{HEADER}1,2024-06-01,10,0,0,1,0,0,0,0\n1,yesterday,10,0,0,1,0,0,0,0\n");

        let result = parse_sales_reports(Cursor::new(csv), 1, "ops@example.com");

        assert!(matches!(result, Err(SalesFormError::UploadRow { row: 3, .. })));
    }

    #[test]
    fn rejects_empty_upload() {
        let result = parse_sales_reports(Cursor::new(HEADER), 1, "ops@example.com");

        assert!(matches!(result, Err(SalesFormError::EmptyUpload)));
    }

    #[test]
    fn add_form_rejects_negative_gallons() {
        let form = AddSalesReportForm {
            station_id: 1,
            report_date: NaiveDate::from_ymd_opt(2024, 6, 1).expect("date"),
            regular_gallons: -3.0,
            plus_gallons: 0.0,
            premium_gallons: 0.0,
            fuel_sales: "10".to_string(),
            grocery_sales: String::new(),
            lottery_sales: String::new(),
            cash: String::new(),
            card: String::new(),
            notes: None,
        };

        assert!(matches!(
            form.into_new_sales_report(1, "ops@example.com"),
            Err(SalesFormError::NegativeGallons)
        ));
    }

    #[test]
    fn filter_query_treats_blank_values_as_missing() {
        let query: SalesFilterQuery =
            serde_html_form::from_str("station_id=&from=2024-06-01&to=").expect("parses");

        assert_eq!(query.station_id, None);
        assert_eq!(query.from, NaiveDate::from_ymd_opt(2024, 6, 1));
        assert_eq!(query.to, None);
    }
}
