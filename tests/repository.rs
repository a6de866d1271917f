use chrono::Local;
use pushkind_common::repository::errors::RepositoryError;

use pushkind_stations::domain::audit::{AuditAction, AuditListQuery, NewAuditEntry};
use pushkind_stations::domain::delivery::{
    DeliveryListQuery, GradeReadings, NewDelivery, TankReading,
};
use pushkind_stations::domain::fuel::FuelGrade;
use pushkind_stations::domain::inventory::{InventoryListQuery, NewInventoryLevel};
use pushkind_stations::domain::permission::{PermissionAction, PermissionMatrix, RoleTemplate};
use pushkind_stations::domain::sales::{GradeGallons, NewSalesReport, SalesReportListQuery};
use pushkind_stations::domain::sms::{NewSmsConfig, SmsProvider};
use pushkind_stations::domain::station::{NewStation, StationListQuery, UpdateStation};
use pushkind_stations::domain::user::NewUser;
use pushkind_stations::repository::{
    AuditReader, AuditWriter, DeliveryReader, DeliveryWriter, DieselRepository, InventoryReader,
    InventoryWriter, SalesReportReader, SalesReportWriter, SmsConfigReader, SmsConfigWriter,
    StationReader, StationWriter, UserReader, UserWriter,
};

mod common;

use common::date;

fn sales_report(hub_id: i32, station_id: i32, day: u32) -> NewSalesReport {
    NewSalesReport {
        hub_id,
        station_id,
        report_date: date(2024, 6, day),
        gallons: GradeGallons {
            regular: 1200.0,
            plus: 300.0,
            premium: 150.5,
        },
        fuel_sales_cents: 560_000,
        grocery_sales_cents: 80_000,
        lottery_sales_cents: 12_000,
        cash_cents: 200_000,
        card_cents: 452_000,
        notes: None,
        created_by: "owner@example.com".to_string(),
    }
}

fn tank(hub_id: i32, station_id: i32, grade: FuelGrade, volume: f64) -> NewInventoryLevel {
    NewInventoryLevel {
        hub_id,
        station_id,
        grade,
        capacity_gallons: 10_000.0,
        volume_gallons: volume,
        low_level_gallons: 1_500.0,
    }
}

#[test]
fn test_station_repository_is_hub_scoped() {
    let test_db = common::TestDb::new("test_station_repository_is_hub_scoped.db");
    let repo = DieselRepository::new(test_db.pool());

    let main_st = repo
        .create_station(&NewStation::new(1, "  Main St #4 ").with_address("12 Main St"))
        .unwrap();
    repo.create_station(&NewStation::new(1, "Airport")).unwrap();
    repo.create_station(&NewStation::new(2, "Elsewhere")).unwrap();

    assert_eq!(main_st.name, "Main St #4");

    let (total, stations) = repo.list_stations(StationListQuery::new(1)).unwrap();
    assert_eq!(total, 2);
    assert_eq!(stations[0].name, "Airport");

    let (total, found) = repo
        .list_stations(StationListQuery::new(1).search("main"))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(found[0].id, main_st.id);

    let updates = UpdateStation {
        name: "Main St #4".to_string(),
        address: None,
        phone: Some("555-0100".to_string()),
        manager_name: None,
        is_active: false,
        updated_at: Local::now().naive_utc(),
    };
    let err = repo
        .update_station(main_st.id, 2, &updates)
        .expect_err("expected hub-scoped update to fail");
    assert!(matches!(err, RepositoryError::NotFound));

    let updated = repo.update_station(main_st.id, 1, &updates).unwrap();
    assert!(!updated.is_active);
    assert_eq!(updated.phone.as_deref(), Some("555-0100"));

    let (active, _) = repo
        .list_stations(StationListQuery::new(1).active_only())
        .unwrap();
    assert_eq!(active, 1);

    let err = repo
        .delete_station(main_st.id, 2)
        .expect_err("expected hub-scoped delete to fail");
    assert!(matches!(err, RepositoryError::NotFound));

    repo.delete_station(main_st.id, 1).unwrap();
    assert!(repo.get_station_by_id(main_st.id, 1).unwrap().is_none());
}

#[test]
fn test_sales_reports_are_unique_per_station_and_day() {
    let test_db = common::TestDb::new("test_sales_reports_are_unique_per_station_and_day.db");
    let repo = DieselRepository::new(test_db.pool());
    let station = repo.create_station(&NewStation::new(1, "Main")).unwrap();

    let first = repo
        .create_sales_report(&sales_report(1, station.id, 1))
        .unwrap();
    assert_eq!(first.gallons.premium, 150.5);
    assert_eq!(first.total_sales_cents(), 652_000);

    assert!(
        repo.create_sales_report(&sales_report(1, station.id, 1))
            .is_err()
    );

    // The whole batch is rejected when one row collides.
    let batch = [
        sales_report(1, station.id, 2),
        sales_report(1, station.id, 1),
    ];
    assert!(repo.create_sales_reports(&batch).is_err());

    let (total, _) = repo
        .list_sales_reports(SalesReportListQuery::new(1))
        .unwrap();
    assert_eq!(total, 1);

    let batch = [
        sales_report(1, station.id, 2),
        sales_report(1, station.id, 3),
    ];
    assert_eq!(repo.create_sales_reports(&batch).unwrap(), 2);

    let (total, reports) = repo
        .list_sales_reports(
            SalesReportListQuery::new(1)
                .station(station.id)
                .between(date(2024, 6, 2), date(2024, 6, 3)),
        )
        .unwrap();
    assert_eq!(total, 2);
    assert!(reports.iter().all(|report| report.report_date >= date(2024, 6, 2)));
}

#[test]
fn test_delivery_updates_tank_volumes() {
    let test_db = common::TestDb::new("test_delivery_updates_tank_volumes.db");
    let repo = DieselRepository::new(test_db.pool());
    let station = repo.create_station(&NewStation::new(1, "Main")).unwrap();

    repo.upsert_inventory(&tank(1, station.id, FuelGrade::Regular, 2_000.0))
        .unwrap();
    repo.upsert_inventory(&tank(1, station.id, FuelGrade::Premium, 900.0))
        .unwrap();

    let readings = GradeReadings {
        regular: TankReading::new(2_000.0, 5_000.0, 6_990.0),
        plus: TankReading::default(),
        premium: TankReading::new(900.0, 1_000.0, 1_900.0),
    };
    let delivery = repo
        .create_delivery(
            &NewDelivery::new(1, station.id, date(2024, 6, 10), readings, "owner@example.com")
                .with_supplier("Fuel Co")
                .with_bol_number("BOL-1"),
        )
        .unwrap();

    assert!(delivery.reconcile().has_discrepancy);

    let tanks = repo
        .list_inventory(InventoryListQuery::new(1).station(station.id))
        .unwrap();
    let volume = |grade| {
        tanks
            .iter()
            .find(|tank| tank.grade == grade)
            .map(|tank| tank.volume_gallons)
    };
    assert_eq!(volume(FuelGrade::Regular), Some(6_990.0));
    assert_eq!(volume(FuelGrade::Premium), Some(1_900.0));
    assert_eq!(volume(FuelGrade::Plus), None);

    let (total, _) = repo
        .list_deliveries(DeliveryListQuery::new(1).since(date(2024, 6, 11)))
        .unwrap();
    assert_eq!(total, 0);

    let err = repo
        .create_delivery(&NewDelivery::new(
            2,
            station.id,
            date(2024, 6, 10),
            readings,
            "intruder@example.com",
        ))
        .expect_err("station of another hub");
    assert!(matches!(err, RepositoryError::NotFound));

    assert!(repo.get_delivery_by_id(delivery.id, 2).unwrap().is_none());
    repo.delete_delivery(delivery.id, 1).unwrap();
    assert!(repo.get_delivery_by_id(delivery.id, 1).unwrap().is_none());
}

#[test]
fn test_delivery_over_capacity_fills_tank_to_capacity() {
    let test_db = common::TestDb::new("test_delivery_over_capacity_fills_tank_to_capacity.db");
    let repo = DieselRepository::new(test_db.pool());
    let station = repo.create_station(&NewStation::new(1, "Main")).unwrap();

    repo.upsert_inventory(&tank(1, station.id, FuelGrade::Regular, 2_000.0))
        .unwrap();

    let readings = GradeReadings {
        regular: TankReading::new(2_000.0, 13_000.0, 15_000.0),
        ..GradeReadings::default()
    };
    let delivery = repo
        .create_delivery(&NewDelivery::new(
            1,
            station.id,
            date(2024, 6, 10),
            readings,
            "owner@example.com",
        ))
        .unwrap();

    assert_eq!(delivery.readings.regular.after, 15_000.0);

    let tanks = repo
        .list_inventory(InventoryListQuery::new(1).station(station.id))
        .unwrap();
    assert_eq!(tanks.len(), 1);
    assert_eq!(tanks[0].volume_gallons, tanks[0].capacity_gallons);
    assert_eq!(tanks[0].volume_gallons, 10_000.0);
}

#[test]
fn test_inventory_upsert_replaces_station_grade() {
    let test_db = common::TestDb::new("test_inventory_upsert_replaces_station_grade.db");
    let repo = DieselRepository::new(test_db.pool());
    let station = repo.create_station(&NewStation::new(1, "Main")).unwrap();

    let first = repo
        .upsert_inventory(&tank(1, station.id, FuelGrade::Plus, 4_000.0))
        .unwrap();
    let second = repo
        .upsert_inventory(&tank(1, station.id, FuelGrade::Plus, 1_000.0))
        .unwrap();

    assert_eq!(first.id, second.id);
    assert!(second.is_low());

    let low = repo
        .list_inventory(InventoryListQuery::new(1).low_only())
        .unwrap();
    assert_eq!(low.len(), 1);

    let reading = repo
        .record_inventory_reading(second.id, 1, 3_500.0)
        .unwrap();
    assert_eq!(reading.volume_gallons, 3_500.0);
    assert!(
        repo.list_inventory(InventoryListQuery::new(1).low_only())
            .unwrap()
            .is_empty()
    );

    let err = repo
        .record_inventory_reading(second.id, 2, 10.0)
        .expect_err("tank of another hub");
    assert!(matches!(err, RepositoryError::NotFound));
}

#[test]
fn test_user_permissions_round_trip() {
    let test_db = common::TestDb::new("test_user_permissions_round_trip.db");
    let repo = DieselRepository::new(test_db.pool());

    let user = repo
        .create_user(
            &NewUser::new(1, "Casey".to_string(), " Casey@Example.com ".to_string())
                .with_role(RoleTemplate::Manager),
        )
        .unwrap();
    assert_eq!(user.email, "casey@example.com");
    assert!(user.permissions.is_none());
    assert!(
        repo.get_user_by_email("casey@example.com", 1)
            .unwrap()
            .is_some()
    );
    assert!(
        repo.get_user_by_email("casey@example.com", 2)
            .unwrap()
            .is_none()
    );

    let mut matrix = PermissionMatrix::empty();
    matrix.set("sales", PermissionAction::View, true);
    matrix.set("sales", PermissionAction::Export, true);

    let saved = repo
        .save_user_permissions(user.id, 1, Some(&matrix))
        .unwrap();
    let stored = saved.permissions.expect("matrix stored");
    assert!(stored.allows("sales", PermissionAction::Export));
    assert!(!stored.allows("sales", PermissionAction::Delete));
    assert!(!stored.allows("audit", PermissionAction::View));

    let reloaded = repo.get_user_by_id(user.id, 1).unwrap().unwrap();
    assert_eq!(reloaded.permissions, Some(stored));

    let reset = repo.save_user_permissions(user.id, 1, None).unwrap();
    assert!(reset.permissions.is_none());
    assert!(
        reset
            .effective_permissions()
            .allows("sales", PermissionAction::Edit)
    );
}

#[test]
fn test_sms_config_is_one_per_hub() {
    let test_db = common::TestDb::new("test_sms_config_is_one_per_hub.db");
    let repo = DieselRepository::new(test_db.pool());

    let mut config = NewSmsConfig {
        hub_id: 1,
        provider: SmsProvider::Twilio,
        account_id: "AC0123456789abcdef0123456789abcdef".to_string(),
        auth_token: "0123456789abcdef0123456789abcdef".to_string(),
        sender: "+15550000000".to_string(),
        recipients: vec!["+15551111111".to_string()],
        is_enabled: true,
    };
    let first = repo.save_sms_config(&config).unwrap();

    config.recipients.push("+15552222222".to_string());
    config.is_enabled = false;
    let second = repo.save_sms_config(&config).unwrap();

    assert_eq!(first.id, second.id);
    assert!(!second.is_enabled);

    let stored = repo.get_sms_config(1).unwrap().expect("config stored");
    assert_eq!(stored.recipients.len(), 2);
    assert!(repo.get_sms_config(2).unwrap().is_none());
}

#[test]
fn test_audit_entries_filter_by_entity() {
    let test_db = common::TestDb::new("test_audit_entries_filter_by_entity.db");
    let repo = DieselRepository::new(test_db.pool());

    repo.record_audit_entry(
        &NewAuditEntry::new(1, "owner@example.com", AuditAction::Delete, "stations")
            .with_entity_id(3),
    )
    .unwrap();
    repo.record_audit_entry(
        &NewAuditEntry::new(1, "owner@example.com", AuditAction::Update, "sms")
            .with_details("twilio"),
    )
    .unwrap();
    repo.record_audit_entry(&NewAuditEntry::new(
        2,
        "other@example.com",
        AuditAction::Delete,
        "stations",
    ))
    .unwrap();

    let (total, entries) = repo
        .list_audit_entries(AuditListQuery::new(1).entity("stations"))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(entries[0].action, "delete");
    assert_eq!(entries[0].entity_id, Some(3));

    let (total, _) = repo.list_audit_entries(AuditListQuery::new(1)).unwrap();
    assert_eq!(total, 2);
}
