use chrono::{NaiveDate, NaiveDateTime};
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

use crate::domain::fuel::FuelGrade;

/// Allowed difference in gallons between the measured and the expected tank
/// volume after a delivery.
pub const DISCREPANCY_TOLERANCE_GALLONS: f64 = 5.0;

/// Tank measurements taken around a delivery for a single grade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TankReading {
    /// Stick reading before the drop.
    pub before: f64,
    /// Gallons on the bill of lading.
    pub delivered: f64,
    /// Stick reading after the drop.
    pub after: f64,
}

impl TankReading {
    pub fn new(before: f64, delivered: f64, after: f64) -> Self {
        Self {
            before,
            delivered,
            after,
        }
    }

    pub fn expected(&self) -> f64 {
        self.before + self.delivered
    }

    /// Positive when the tank holds more than expected, negative when less.
    pub fn discrepancy(&self) -> f64 {
        self.after - self.expected()
    }

    pub fn exceeds_tolerance(&self) -> bool {
        self.discrepancy().abs() > DISCREPANCY_TOLERANCE_GALLONS
    }

    /// Whether the grade took part in the delivery at all.
    pub fn is_recorded(&self) -> bool {
        self.before != 0.0 || self.delivered != 0.0 || self.after != 0.0
    }
}

/// Reconciled figures for one grade of a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradeReconciliation {
    pub grade: FuelGrade,
    pub before: f64,
    pub delivered: f64,
    pub after: f64,
    pub expected: f64,
    pub discrepancy: f64,
    pub flagged: bool,
}

impl GradeReconciliation {
    pub fn new(grade: FuelGrade, reading: TankReading) -> Self {
        Self {
            grade,
            before: reading.before,
            delivered: reading.delivered,
            after: reading.after,
            expected: reading.expected(),
            discrepancy: reading.discrepancy(),
            flagged: reading.exceeds_tolerance(),
        }
    }
}

/// Before/after volume reconciliation across all grades of a delivery.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reconciliation {
    pub grades: Vec<GradeReconciliation>,
    pub has_discrepancy: bool,
}

impl Reconciliation {
    pub fn from_readings(readings: &GradeReadings) -> Self {
        let grades: Vec<GradeReconciliation> = FuelGrade::ALL
            .into_iter()
            .map(|grade| GradeReconciliation::new(grade, readings.get(grade)))
            .collect();
        let has_discrepancy = grades.iter().any(|grade| grade.flagged);

        Self {
            grades,
            has_discrepancy,
        }
    }

    pub fn flagged_grades(&self) -> impl Iterator<Item = &GradeReconciliation> {
        self.grades.iter().filter(|grade| grade.flagged)
    }
}

/// Tank readings for every fuel grade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GradeReadings {
    pub regular: TankReading,
    pub plus: TankReading,
    pub premium: TankReading,
}

impl GradeReadings {
    pub fn get(&self, grade: FuelGrade) -> TankReading {
        match grade {
            FuelGrade::Regular => self.regular,
            FuelGrade::Plus => self.plus,
            FuelGrade::Premium => self.premium,
        }
    }
}

/// Fuel drop recorded for a station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    pub id: i32,
    pub hub_id: i32,
    pub station_id: i32,
    pub delivery_date: NaiveDate,
    pub supplier: Option<String>,
    /// Bill of lading number.
    pub bol_number: Option<String>,
    pub readings: GradeReadings,
    pub notes: Option<String>,
    /// Email of the user who recorded the delivery.
    pub created_by: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Delivery {
    pub fn reconcile(&self) -> Reconciliation {
        Reconciliation::from_readings(&self.readings)
    }
}

/// Payload required to record a new delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDelivery {
    pub hub_id: i32,
    pub station_id: i32,
    pub delivery_date: NaiveDate,
    pub supplier: Option<String>,
    pub bol_number: Option<String>,
    pub readings: GradeReadings,
    pub notes: Option<String>,
    pub created_by: String,
}

impl NewDelivery {
    pub fn new(
        hub_id: i32,
        station_id: i32,
        delivery_date: NaiveDate,
        readings: GradeReadings,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            hub_id,
            station_id,
            delivery_date,
            supplier: None,
            bol_number: None,
            readings,
            notes: None,
            created_by: created_by.into(),
        }
    }

    pub fn with_supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = Some(supplier.into());
        self
    }

    pub fn with_bol_number(mut self, bol_number: impl Into<String>) -> Self {
        self.bol_number = Some(bol_number.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn reconcile(&self) -> Reconciliation {
        Reconciliation::from_readings(&self.readings)
    }
}

/// Delivery paired with its reconciliation, as shown in lists.
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryView {
    #[serde(flatten)]
    pub delivery: Delivery,
    pub station_name: Option<String>,
    pub reconciliation: Reconciliation,
}

impl DeliveryView {
    pub fn new(delivery: Delivery, station_name: Option<String>) -> Self {
        let reconciliation = delivery.reconcile();
        Self {
            delivery,
            station_name,
            reconciliation,
        }
    }
}

/// Query definition used to list deliveries for a hub.
#[derive(Debug, Clone)]
pub struct DeliveryListQuery {
    pub hub_id: i32,
    pub station_id: Option<i32>,
    /// Only deliveries on or after this date.
    pub since: Option<NaiveDate>,
    pub pagination: Option<Pagination>,
}

impl DeliveryListQuery {
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            station_id: None,
            since: None,
            pagination: None,
        }
    }

    pub fn station(mut self, station_id: i32) -> Self {
        self.station_id = Some(station_id);
        self
    }

    pub fn since(mut self, date: NaiveDate) -> Self {
        self.since = Some(date);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn readings(regular: TankReading, plus: TankReading, premium: TankReading) -> GradeReadings {
        GradeReadings {
            regular,
            plus,
            premium,
        }
    }

    #[test]
    fn expected_and_discrepancy_follow_readings() {
        let reading = TankReading::new(1200.0, 3000.0, 4190.0);

        assert_eq!(reading.expected(), 4200.0);
        assert_eq!(reading.discrepancy(), -10.0);
        assert!(reading.exceeds_tolerance());
    }

    #[test]
    fn tolerance_boundary_is_not_flagged() {
        let over = TankReading::new(1000.0, 500.0, 1505.0);
        let under = TankReading::new(1000.0, 500.0, 1495.0);

        assert_eq!(over.discrepancy(), 5.0);
        assert!(!over.exceeds_tolerance());
        assert!(!under.exceeds_tolerance());
        assert!(TankReading::new(1000.0, 500.0, 1505.5).exceeds_tolerance());
    }

    #[test]
    fn delivery_is_flagged_when_any_grade_is_out_of_tolerance() {
        let clean = TankReading::new(100.0, 900.0, 1001.0);
        let short = TankReading::new(100.0, 900.0, 990.0);

        let ok = Reconciliation::from_readings(&readings(clean, clean, clean));
        assert!(!ok.has_discrepancy);
        assert_eq!(ok.grades.len(), 3);

        let flagged = Reconciliation::from_readings(&readings(clean, clean, short));
        assert!(flagged.has_discrepancy);
        let grades: Vec<FuelGrade> = flagged.flagged_grades().map(|grade| grade.grade).collect();
        assert_eq!(grades, vec![FuelGrade::Premium]);
    }

    #[test]
    fn reconciliation_reports_every_grade_in_order() {
        let reconciliation = Reconciliation::from_readings(&readings(
            TankReading::new(10.0, 20.0, 30.0),
            TankReading::new(1.0, 2.0, 10.0),
            TankReading::default(),
        ));

        let order: Vec<FuelGrade> = reconciliation.grades.iter().map(|g| g.grade).collect();
        assert_eq!(order, FuelGrade::ALL.to_vec());
        assert_eq!(reconciliation.grades[1].expected, 3.0);
        assert_eq!(reconciliation.grades[1].discrepancy, 7.0);
        assert!(reconciliation.grades[1].flagged);
        assert!(!reconciliation.grades[2].flagged);
    }

    #[test]
    fn unrecorded_grade_has_no_readings() {
        assert!(!TankReading::default().is_recorded());
        assert!(TankReading::new(0.0, 0.0, 12.0).is_recorded());
    }
}
