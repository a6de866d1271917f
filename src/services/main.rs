use chrono::NaiveDate;
use pushkind_common::domain::auth::AuthenticatedUser;
use serde::Serialize;

use crate::domain::delivery::DeliveryListQuery;
use crate::domain::inventory::InventoryListQuery;
use crate::domain::license::{LicenseListQuery, LicenseView};
use crate::domain::permission::{PermissionAction, pages};
use crate::domain::sales::{SalesSummary, SalesTotals};
use crate::domain::station::Station;
use crate::forms::sales::SalesFilterQuery;
use crate::repository::{
    DeliveryReader, InventoryReader, LicenseReader, SalesReportReader, StationReader, UserReader,
};
use crate::services::access::authorize;
use crate::services::inventory::TankView;
use crate::services::sales::list_query_for;
use crate::services::stations::{all_stations, station_name};
use crate::services::{ServiceError, ServiceResult, shift_date};

/// Length of the default dashboard range, today included.
pub const DEFAULT_RANGE_DAYS: i64 = 30;

#[derive(Debug, Serialize)]
pub struct StationSales {
    pub station_id: i32,
    pub station_name: Option<String>,
    #[serde(flatten)]
    pub totals: SalesTotals,
}

#[derive(Debug, Serialize)]
pub struct DailySales {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub totals: SalesTotals,
}

/// Everything shown on the dashboard and returned by `/api/v1/dashboard`.
#[derive(Debug, Serialize)]
pub struct DashboardData {
    pub station_id: Option<i32>,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub totals: SalesTotals,
    pub by_station: Vec<StationSales>,
    pub by_day: Vec<DailySales>,
    pub low_tanks: Vec<TankView>,
    pub expiring_licenses: Vec<LicenseView>,
    pub flagged_deliveries: usize,
    #[serde(skip)]
    pub stations: Vec<Station>,
}

/// Aggregate sales, tanks, licenses and deliveries for the filter.
///
/// Without dates the range covers the last [`DEFAULT_RANGE_DAYS`] days.
pub fn load_dashboard<R>(
    repo: &R,
    user: &AuthenticatedUser,
    filter: SalesFilterQuery,
    today: NaiveDate,
    warning_days: i64,
) -> ServiceResult<DashboardData>
where
    R: SalesReportReader
        + InventoryReader
        + LicenseReader
        + DeliveryReader
        + StationReader
        + UserReader
        + ?Sized,
{
    authorize(repo, user, pages::DASHBOARD, PermissionAction::View)?;

    let to = filter.to.unwrap_or(today);
    let from = match filter.from {
        Some(from) => from,
        None => shift_date(to, 1 - DEFAULT_RANGE_DAYS)?,
    };
    let station_id = filter.station_id;

    let (_, reports) = repo
        .list_sales_reports(list_query_for(user.hub_id, station_id, Some(from), Some(to))?)
        .map_err(ServiceError::from)?;
    let summary = SalesSummary::from_reports(&reports);
    let stations = all_stations(repo, user.hub_id)?;

    let by_station = summary
        .by_station
        .into_iter()
        .map(|(id, totals)| StationSales {
            station_id: id,
            station_name: station_name(&stations, id),
            totals,
        })
        .collect();
    let by_day = summary
        .by_day
        .into_iter()
        .map(|(date, totals)| DailySales { date, totals })
        .collect();

    let mut tank_query = InventoryListQuery::new(user.hub_id).low_only();
    let mut license_query =
        LicenseListQuery::new(user.hub_id).expiring_before(shift_date(today, warning_days)?);
    let mut delivery_query = DeliveryListQuery::new(user.hub_id).since(from);
    if let Some(id) = station_id {
        tank_query = tank_query.station(id);
        license_query = license_query.station(id);
        delivery_query = delivery_query.station(id);
    }

    let low_tanks = repo
        .list_inventory(tank_query)
        .map_err(ServiceError::from)?
        .into_iter()
        .map(|tank| TankView::new(tank, &stations))
        .collect();
    let expiring_licenses = repo
        .list_licenses(license_query)
        .map_err(ServiceError::from)?
        .into_iter()
        .map(|license| LicenseView::new(license, today, warning_days))
        .collect();
    let (_, deliveries) = repo
        .list_deliveries(delivery_query)
        .map_err(ServiceError::from)?;
    let flagged_deliveries = deliveries
        .iter()
        .filter(|delivery| delivery.delivery_date <= to && delivery.reconcile().has_discrepancy)
        .count();

    Ok(DashboardData {
        station_id,
        from,
        to,
        totals: summary.totals,
        by_station,
        by_day,
        low_tanks,
        expiring_licenses,
        flagged_deliveries,
        stations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::delivery::{Delivery, GradeReadings, TankReading};
    use crate::domain::permission::RoleTemplate;
    use crate::domain::sales::{GradeGallons, SalesReport};
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{
        HUB_ID, admin, date, fixed_datetime, member, profile, station,
    };

    fn report(station_id: i32, day: u32, fuel_cents: i32) -> SalesReport {
        SalesReport {
            id: day as i32,
            hub_id: HUB_ID,
            station_id,
            report_date: date(2024, 6, day),
            gallons: GradeGallons {
                regular: 100.0,
                plus: 0.0,
                premium: 0.0,
            },
            fuel_sales_cents: fuel_cents,
            grocery_sales_cents: 0,
            lottery_sales_cents: 0,
            cash_cents: fuel_cents,
            card_cents: 0,
            notes: None,
            created_by: "clerk@example.com".to_string(),
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    fn delivery(day: u32, after: f64) -> Delivery {
        Delivery {
            id: day as i32,
            hub_id: HUB_ID,
            station_id: 1,
            delivery_date: date(2024, 6, day),
            supplier: None,
            bol_number: None,
            readings: GradeReadings {
                plus: TankReading::new(100.0, 900.0, after),
                ..GradeReadings::default()
            },
            notes: None,
            created_by: "ops@example.com".to_string(),
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    fn repo() -> MockRepository {
        let mut repo = MockRepository::new();
        repo.expect_list_stations().returning(|_| {
            Ok((2, vec![station(1, "Main St #4"), station(2, "Harbor Rd")]))
        });
        repo.expect_list_inventory().returning(|_| Ok(vec![]));
        repo.expect_list_licenses().returning(|_| Ok(vec![]));
        repo
    }

    #[test]
    fn defaults_to_last_thirty_days() {
        let mut repo = repo();
        repo.expect_list_sales_reports()
            .withf(|query| {
                query.from == Some(date(2024, 6, 1))
                    && query.to == Some(date(2024, 6, 30))
                    && query.pagination.is_none()
            })
            .times(1)
            .returning(|_| {
                Ok((
                    3,
                    vec![report(1, 1, 10_000), report(2, 1, 5_000), report(1, 2, 2_500)],
                ))
            });
        repo.expect_list_deliveries()
            .withf(|query| query.since == Some(date(2024, 6, 1)))
            .returning(|_| Ok((2, vec![delivery(3, 1_000.0), delivery(4, 1_020.0)])));

        let data = load_dashboard(
            &repo,
            &admin(),
            SalesFilterQuery::default(),
            date(2024, 6, 30),
            30,
        )
        .expect("dashboard");

        assert_eq!(data.totals.fuel_sales_cents, 17_500);
        assert_eq!(data.by_station.len(), 2);
        assert_eq!(data.by_station[0].station_name.as_deref(), Some("Main St #4"));
        assert_eq!(data.by_station[0].totals.fuel_sales_cents, 12_500);
        assert_eq!(data.by_day.len(), 2);
        assert_eq!(data.by_day[0].totals.reports, 2);
        assert_eq!(data.flagged_deliveries, 1);
    }

    #[test]
    fn station_filter_narrows_every_source() {
        let mut repo = MockRepository::new();
        repo.expect_list_stations()
            .returning(|_| Ok((1, vec![station(2, "Harbor Rd")])));
        repo.expect_list_sales_reports()
            .withf(|query| query.station_id == Some(2))
            .returning(|_| Ok((0, vec![])));
        repo.expect_list_inventory()
            .withf(|query| query.station_id == Some(2) && query.low_only)
            .returning(|_| Ok(vec![]));
        repo.expect_list_licenses()
            .withf(|query| query.station_id == Some(2))
            .returning(|_| Ok(vec![]));
        repo.expect_list_deliveries()
            .withf(|query| query.station_id == Some(2))
            .returning(|_| Ok((0, vec![])));

        let filter = SalesFilterQuery {
            station_id: Some(2),
            from: Some(date(2024, 5, 1)),
            to: Some(date(2024, 5, 31)),
            page: None,
        };
        let data = load_dashboard(&repo, &admin(), filter, date(2024, 6, 30), 30)
            .expect("dashboard");

        assert_eq!(data.from, date(2024, 5, 1));
        assert_eq!(data.totals.reports, 0);
    }

    #[test]
    fn dashboard_json_has_summary_fields() {
        let mut repo = repo();
        repo.expect_list_sales_reports()
            .returning(|_| Ok((1, vec![report(1, 5, 1_000)])));
        repo.expect_list_deliveries().returning(|_| Ok((0, vec![])));

        let data = load_dashboard(
            &repo,
            &admin(),
            SalesFilterQuery::default(),
            date(2024, 6, 30),
            30,
        )
        .expect("dashboard");
        let json = serde_json::to_value(&data).expect("serializes");

        assert_eq!(json["by_day"][0]["date"], "2024-06-05");
        assert_eq!(json["by_station"][0]["fuel_sales_cents"], 1_000);
        assert!(json.get("stations").is_none());
    }

    #[test]
    fn profile_without_dashboard_rights_is_rejected() {
        let mut repo = MockRepository::new();
        let mut clerk = profile(RoleTemplate::Employee);
        clerk.is_active = false;
        repo.expect_get_user_by_email()
            .returning(move |_, _| Ok(Some(clerk.clone())));

        let result = load_dashboard(
            &repo,
            &member(),
            SalesFilterQuery::default(),
            date(2024, 6, 30),
            30,
        );

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn range_before_the_calendar_start_is_a_form_error() {
        let repo = MockRepository::new();
        let filter: SalesFilterQuery =
            serde_html_form::from_str("to=-262143-01-05").expect("query parses");

        let result = load_dashboard(&repo, &admin(), filter, date(2024, 6, 30), 30);

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }
}
