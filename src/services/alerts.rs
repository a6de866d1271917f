//! Alert messages for licenses, tanks and deliveries that need attention.

use chrono::NaiveDate;
use pushkind_common::domain::auth::AuthenticatedUser;
use serde::Serialize;

use crate::domain::delivery::DeliveryListQuery;
use crate::domain::inventory::InventoryListQuery;
use crate::domain::license::{LicenseListQuery, LicenseStatus};
use crate::domain::permission::{PermissionAction, pages};
use crate::domain::sms::SmsConfig;
use crate::repository::{
    DeliveryReader, InventoryReader, LicenseReader, SmsConfigReader, SmsLogWriter, StationReader,
    UserReader,
};
use crate::services::access::authorize;
use crate::services::sms::{SmsServiceError, SmsServiceResult, deliver, stored_config};
use crate::services::stations::{all_stations, station_name};
use crate::services::{ServiceError, ServiceResult, shift_date};
use crate::sms::{SmsError, SmsGateway};

/// Deliveries younger than this many days are checked for discrepancies.
pub const RECENT_DELIVERY_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    LicenseExpired,
    LicenseExpiring,
    LowTank,
    DeliveryDiscrepancy,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub station_id: Option<i32>,
    pub message: String,
}

/// Outcome of one alert run.
#[derive(Debug, Default, Serialize)]
pub struct AlertRun {
    pub alerts: Vec<Alert>,
    pub sent: usize,
    pub failed: usize,
}

fn prefix(name: Option<String>) -> String {
    name.map(|name| format!("{name}: ")).unwrap_or_default()
}

/// Everything that currently deserves an alert, licenses first.
pub fn collect_alerts<R>(
    repo: &R,
    hub_id: i32,
    today: NaiveDate,
    warning_days: i64,
) -> ServiceResult<Vec<Alert>>
where
    R: LicenseReader + InventoryReader + DeliveryReader + StationReader + ?Sized,
{
    let stations = all_stations(repo, hub_id)?;
    let mut alerts = Vec::new();

    let licenses = repo
        .list_licenses(
            LicenseListQuery::new(hub_id).expiring_before(shift_date(today, warning_days)?),
        )
        .map_err(ServiceError::from)?;
    for license in licenses {
        let at = prefix(
            license
                .station_id
                .and_then(|id| station_name(&stations, id)),
        );
        let alert = match license.status(today, warning_days) {
            LicenseStatus::Expired => Alert {
                kind: AlertKind::LicenseExpired,
                station_id: license.station_id,
                message: format!("{at}{} expired on {}", license.name, license.expiry_date),
            },
            LicenseStatus::ExpiringSoon => Alert {
                kind: AlertKind::LicenseExpiring,
                station_id: license.station_id,
                message: format!(
                    "{at}{} expires on {} ({} days)",
                    license.name,
                    license.expiry_date,
                    license.days_until_expiry(today)
                ),
            },
            LicenseStatus::Active => continue,
        };
        alerts.push(alert);
    }

    let tanks = repo
        .list_inventory(InventoryListQuery::new(hub_id).low_only())
        .map_err(ServiceError::from)?;
    for tank in tanks {
        alerts.push(Alert {
            kind: AlertKind::LowTank,
            station_id: Some(tank.station_id),
            message: format!(
                "{}{} tank is low: {:.0} of {:.0} gal",
                prefix(station_name(&stations, tank.station_id)),
                tank.grade.label(),
                tank.volume_gallons,
                tank.capacity_gallons
            ),
        });
    }

    let (_, deliveries) = repo
        .list_deliveries(
            DeliveryListQuery::new(hub_id).since(shift_date(today, -RECENT_DELIVERY_DAYS)?),
        )
        .map_err(ServiceError::from)?;
    for delivery in deliveries {
        let reconciliation = delivery.reconcile();
        if !reconciliation.has_discrepancy {
            continue;
        }
        let grades: Vec<String> = reconciliation
            .flagged_grades()
            .map(|grade| format!("{} {:+.1} gal", grade.grade.label(), grade.discrepancy))
            .collect();
        alerts.push(Alert {
            kind: AlertKind::DeliveryDiscrepancy,
            station_id: Some(delivery.station_id),
            message: format!(
                "{}delivery of {} is off: {}",
                prefix(station_name(&stations, delivery.station_id)),
                delivery.delivery_date,
                grades.join(", ")
            ),
        });
    }

    Ok(alerts)
}

/// Send every current alert to each configured recipient.
pub async fn run_alerts<R, F>(
    repo: &R,
    user: &AuthenticatedUser,
    today: NaiveDate,
    warning_days: i64,
    connect: F,
) -> SmsServiceResult<AlertRun>
where
    R: LicenseReader
        + InventoryReader
        + DeliveryReader
        + StationReader
        + SmsConfigReader
        + SmsLogWriter
        + UserReader
        + ?Sized,
    F: FnOnce(&SmsConfig) -> Result<Box<dyn SmsGateway>, SmsError>,
{
    authorize(repo, user, pages::SMS, PermissionAction::Create)?;

    let config = stored_config(repo, user.hub_id)?;
    if !config.is_enabled {
        return Err(SmsServiceError::Disabled);
    }

    let alerts = collect_alerts(repo, user.hub_id, today, warning_days)?;
    if alerts.is_empty() {
        return Ok(AlertRun::default());
    }

    let gateway = connect(&config)?;
    let mut run = AlertRun::default();
    for alert in &alerts {
        for recipient in &config.recipients {
            match deliver(repo, gateway.as_ref(), user.hub_id, recipient, &alert.message).await {
                Ok(_) => run.sent += 1,
                Err(_) => run.failed += 1,
            }
        }
    }

    log::info!(
        "Alert run for hub {}: {} alerts, {} sent, {} failed",
        user.hub_id,
        alerts.len(),
        run.sent,
        run.failed
    );
    run.alerts = alerts;
    Ok(run)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::delivery::{Delivery, GradeReadings, TankReading};
    use crate::domain::fuel::FuelGrade;
    use crate::domain::inventory::InventoryLevel;
    use crate::domain::license::License;
    use crate::repository::mock::MockRepository;
    use crate::services::sms::fake::FakeGateway;
    use crate::services::sms::tests::{config, logged};
    use crate::services::test_support::{HUB_ID, admin, date, fixed_datetime, station};

    fn license(id: i32, expiry: NaiveDate) -> License {
        License {
            id,
            hub_id: HUB_ID,
            station_id: Some(1),
            name: format!("Permit {id}"),
            license_number: None,
            authority: None,
            issue_date: None,
            expiry_date: expiry,
            document_path: None,
            notes: None,
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    fn tank(volume: f64) -> InventoryLevel {
        InventoryLevel {
            id: 1,
            hub_id: HUB_ID,
            station_id: 1,
            grade: FuelGrade::Regular,
            capacity_gallons: 10_000.0,
            volume_gallons: volume,
            low_level_gallons: 1_500.0,
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    fn delivery(after: f64) -> Delivery {
        Delivery {
            id: 1,
            hub_id: HUB_ID,
            station_id: 1,
            delivery_date: date(2024, 6, 10),
            supplier: None,
            bol_number: None,
            readings: GradeReadings {
                regular: TankReading::new(2_000.0, 6_000.0, after),
                ..GradeReadings::default()
            },
            notes: None,
            created_by: "ops@example.com".to_string(),
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    fn repo_with_findings() -> MockRepository {
        let mut repo = MockRepository::new();
        repo.expect_list_stations()
            .returning(|_| Ok((1, vec![station(1, "Main St #4")])));
        repo.expect_list_licenses()
            .withf(|query| query.expiring_before == Some(date(2024, 7, 12)))
            .returning(|_| Ok(vec![license(1, date(2024, 6, 1)), license(2, date(2024, 6, 20))]));
        repo.expect_list_inventory()
            .withf(|query| query.low_only)
            .returning(|_| Ok(vec![tank(1_500.0)]));
        repo.expect_list_deliveries()
            .withf(|query| query.since == Some(date(2024, 6, 5)))
            .returning(|_| Ok((2, vec![delivery(7_992.0), delivery(8_003.0)])));
        repo
    }

    #[test]
    fn collects_every_kind_of_alert() {
        let repo = repo_with_findings();

        let alerts = collect_alerts(&repo, HUB_ID, date(2024, 6, 12), 30).expect("alerts");

        let kinds: Vec<AlertKind> = alerts.iter().map(|alert| alert.kind).collect();
        assert_eq!(
            kinds,
            vec![
                AlertKind::LicenseExpired,
                AlertKind::LicenseExpiring,
                AlertKind::LowTank,
                AlertKind::DeliveryDiscrepancy,
            ]
        );
        assert_eq!(alerts[0].message, "Main St #4: Permit 1 expired on 2024-06-01");
        assert_eq!(
            alerts[3].message,
            "Main St #4: delivery of 2024-06-10 is off: Regular -8.0 gal"
        );
    }

    #[tokio::test]
    async fn run_sends_each_alert_to_each_recipient() {
        let gateway = Arc::new(FakeGateway::failing(&["+15557654321"]));
        let mut repo = repo_with_findings();
        repo.expect_get_sms_config()
            .returning(|_| Ok(Some(config(true))));
        repo.expect_record_sms_message()
            .times(8)
            .returning(|message| Ok(logged(message)));

        let shared = gateway.clone();
        let run = run_alerts(&repo, &admin(), date(2024, 6, 12), 30, move |_| {
            Ok(Box::new(shared) as Box<dyn SmsGateway>)
        })
        .await
        .expect("alert run");

        assert_eq!(run.alerts.len(), 4);
        assert_eq!(run.sent, 4);
        assert_eq!(run.failed, 4);
        assert!(gateway.sent().iter().all(|(to, _)| to == "+15551234567"));
    }

    #[tokio::test]
    async fn disabled_configuration_sends_nothing() {
        let mut repo = MockRepository::new();
        repo.expect_get_sms_config()
            .returning(|_| Ok(Some(config(false))));
        repo.expect_record_sms_message().never();

        let result = run_alerts(&repo, &admin(), date(2024, 6, 12), 30, |_| {
            Ok(Box::new(FakeGateway::default()) as Box<dyn SmsGateway>)
        })
        .await;

        assert!(matches!(result, Err(SmsServiceError::Disabled)));
    }
}
