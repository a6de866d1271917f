use chrono::NaiveDate;
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use serde::Serialize;

use crate::domain::audit::AuditAction;
use crate::domain::permission::{PermissionAction, pages};
use crate::domain::sales::{SalesReport, SalesReportListQuery, SalesSummary, SalesTotals};
use crate::domain::station::Station;
use crate::forms::format_cents;
use crate::forms::sales::{
    AddSalesReportForm, EditSalesReportForm, SalesFilterQuery, UploadSalesReportsForm,
};
use crate::repository::{
    AuditWriter, SalesReportReader, SalesReportWriter, StationReader, UserReader,
};
use crate::services::access::authorize;
use crate::services::stations::{all_stations, station_name};
use crate::services::{ServiceError, ServiceResult, audit, total_pages};

/// Columns of the CSV export. The first ten are also the import layout.
pub const EXPORT_HEADERS: [&str; 13] = [
    "station_id",
    "report_date",
    "regular_gallons",
    "plus_gallons",
    "premium_gallons",
    "fuel_sales",
    "grocery_sales",
    "lottery_sales",
    "cash",
    "card",
    "station",
    "total_sales",
    "over_short",
];

/// Report row with its derived figures.
#[derive(Debug, Serialize)]
pub struct SalesReportView {
    #[serde(flatten)]
    pub report: SalesReport,
    pub station_name: Option<String>,
    pub total_gallons: f64,
    pub total_sales_cents: i64,
    pub over_short_cents: i64,
}

impl SalesReportView {
    fn new(report: SalesReport, stations: &[Station]) -> Self {
        Self {
            station_name: station_name(stations, report.station_id),
            total_gallons: report.gallons.total(),
            total_sales_cents: report.total_sales_cents(),
            over_short_cents: report.over_short_cents(),
            report,
        }
    }
}

pub struct SalesPageData {
    pub reports: Paginated<SalesReportView>,
    /// Totals over every report matching the filter, not only the page.
    pub totals: SalesTotals,
    pub stations: Vec<Station>,
    pub station_id: Option<i32>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Translate the filter into a list query; rejects inverted date ranges.
pub(crate) fn list_query_for(
    hub_id: i32,
    station_id: Option<i32>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> ServiceResult<SalesReportListQuery> {
    if let (Some(from), Some(to)) = (from, to)
        && from > to
    {
        return Err(ServiceError::Form(
            "The start date must not be after the end date.".to_string(),
        ));
    }

    let mut query = SalesReportListQuery::new(hub_id);
    if let Some(station_id) = station_id {
        query = query.station(station_id);
    }
    query.from = from;
    query.to = to;
    Ok(query)
}

pub fn load_sales<R>(
    repo: &R,
    user: &AuthenticatedUser,
    filter: SalesFilterQuery,
) -> ServiceResult<SalesPageData>
where
    R: SalesReportReader + StationReader + UserReader + ?Sized,
{
    authorize(repo, user, pages::SALES, PermissionAction::View)?;

    let page = filter.page.unwrap_or(1);
    let base = list_query_for(user.hub_id, filter.station_id, filter.from, filter.to)?;

    let (total, reports) = repo
        .list_sales_reports(base.clone().paginate(page, DEFAULT_ITEMS_PER_PAGE))
        .map_err(ServiceError::from)?;
    let (_, all_reports) = repo
        .list_sales_reports(base)
        .map_err(ServiceError::from)?;
    let totals = SalesSummary::from_reports(&all_reports).totals;

    let stations = all_stations(repo, user.hub_id)?;
    let reports = reports
        .into_iter()
        .map(|report| SalesReportView::new(report, &stations))
        .collect();

    Ok(SalesPageData {
        reports: Paginated::new(reports, page, total_pages(total)),
        totals,
        stations,
        station_id: filter.station_id,
        from: filter.from,
        to: filter.to,
    })
}

/// Create the daily report; a second report for the same station and day is a conflict.
pub fn create_sales_report<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddSalesReportForm,
) -> ServiceResult<SalesReport>
where
    R: SalesReportWriter + UserReader + ?Sized,
{
    authorize(repo, user, pages::SALES, PermissionAction::Create)?;

    let new_report = form
        .into_new_sales_report(user.hub_id, &user.email)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_sales_report(&new_report)
        .map_err(ServiceError::from)
}

pub fn modify_sales_report<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: EditSalesReportForm,
) -> ServiceResult<SalesReport>
where
    R: SalesReportWriter + UserReader + ?Sized,
{
    authorize(repo, user, pages::SALES, PermissionAction::Edit)?;

    let report_id = form.report_id;
    let updates = form
        .into_update_sales_report()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.update_sales_report(report_id, user.hub_id, &updates)
        .map_err(ServiceError::from)
}

pub fn remove_sales_report<R>(repo: &R, user: &AuthenticatedUser, report_id: i32) -> ServiceResult<()>
where
    R: SalesReportWriter + AuditWriter + UserReader + ?Sized,
{
    authorize(repo, user, pages::SALES, PermissionAction::Delete)?;

    repo.delete_sales_report(report_id, user.hub_id)
        .map_err(ServiceError::from)?;

    audit::record(
        repo,
        user,
        AuditAction::Delete,
        pages::SALES,
        Some(report_id),
        None,
    );
    Ok(())
}

/// Import every row of an uploaded CSV in one transaction.
pub fn import_sales_reports<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: &mut UploadSalesReportsForm,
) -> ServiceResult<usize>
where
    R: SalesReportWriter + AuditWriter + UserReader + ?Sized,
{
    authorize(repo, user, pages::SALES, PermissionAction::Create)?;

    let reports = form
        .parse(user.hub_id, &user.email)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let imported = repo
        .create_sales_reports(&reports)
        .map_err(ServiceError::from)?;

    audit::record(
        repo,
        user,
        AuditAction::Import,
        pages::SALES,
        None,
        Some(format!("{imported} reports")),
    );
    Ok(imported)
}

/// CSV of every report matching the filter.
pub fn export_sales_csv<R>(
    repo: &R,
    user: &AuthenticatedUser,
    filter: SalesFilterQuery,
) -> ServiceResult<Vec<u8>>
where
    R: SalesReportReader + StationReader + UserReader + ?Sized,
{
    authorize(repo, user, pages::SALES, PermissionAction::Export)?;

    let query = list_query_for(user.hub_id, filter.station_id, filter.from, filter.to)?;
    let (_, reports) = repo
        .list_sales_reports(query)
        .map_err(ServiceError::from)?;
    let stations = all_stations(repo, user.hub_id)?;

    write_csv(&reports, &stations).map_err(|err| {
        log::error!("Failed to write sales CSV: {err}");
        ServiceError::Form("Could not build the CSV export.".to_string())
    })
}

fn write_csv(reports: &[SalesReport], stations: &[Station]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_HEADERS)?;

    for report in reports {
        writer.write_record([
            report.station_id.to_string(),
            report.report_date.to_string(),
            report.gallons.regular.to_string(),
            report.gallons.plus.to_string(),
            report.gallons.premium.to_string(),
            format_cents(i64::from(report.fuel_sales_cents)),
            format_cents(i64::from(report.grocery_sales_cents)),
            format_cents(i64::from(report.lottery_sales_cents)),
            format_cents(i64::from(report.cash_cents)),
            format_cents(i64::from(report.card_cents)),
            station_name(stations, report.station_id).unwrap_or_default(),
            format_cents(report.total_sales_cents()),
            format_cents(report.over_short_cents()),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))
}
