use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::fuel::FuelGrade;

/// Underground tank holding one fuel grade at a station.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryLevel {
    pub id: i32,
    pub hub_id: i32,
    pub station_id: i32,
    pub grade: FuelGrade,
    pub capacity_gallons: f64,
    pub volume_gallons: f64,
    /// Volume at or below which the tank is reported as low.
    pub low_level_gallons: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl InventoryLevel {
    /// Fill level in percent of capacity, `0.0` for tanks without capacity.
    pub fn fill_percent(&self) -> f64 {
        if self.capacity_gallons <= 0.0 {
            return 0.0;
        }
        (self.volume_gallons / self.capacity_gallons * 100.0).clamp(0.0, 100.0)
    }

    pub fn is_low(&self) -> bool {
        self.volume_gallons <= self.low_level_gallons
    }

    /// Gallons that still fit into the tank.
    pub fn ullage_gallons(&self) -> f64 {
        (self.capacity_gallons - self.volume_gallons).max(0.0)
    }
}

/// Tank definition inserted or replaced for a station and grade.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInventoryLevel {
    pub hub_id: i32,
    pub station_id: i32,
    pub grade: FuelGrade,
    pub capacity_gallons: f64,
    pub volume_gallons: f64,
    pub low_level_gallons: f64,
}

/// Query definition used to list tanks for a hub.
#[derive(Debug, Clone)]
pub struct InventoryListQuery {
    pub hub_id: i32,
    pub station_id: Option<i32>,
    /// Only tanks at or below their low-level threshold.
    pub low_only: bool,
}

impl InventoryListQuery {
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            station_id: None,
            low_only: false,
        }
    }

    pub fn station(mut self, station_id: i32) -> Self {
        self.station_id = Some(station_id);
        self
    }

    pub fn low_only(mut self) -> Self {
        self.low_only = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tank(capacity: f64, volume: f64, low: f64) -> InventoryLevel {
        InventoryLevel {
            id: 1,
            hub_id: 1,
            station_id: 1,
            grade: FuelGrade::Regular,
            capacity_gallons: capacity,
            volume_gallons: volume,
            low_level_gallons: low,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn fill_percent_is_bounded() {
        assert_eq!(tank(10_000.0, 2_500.0, 0.0).fill_percent(), 25.0);
        assert_eq!(tank(10_000.0, 12_000.0, 0.0).fill_percent(), 100.0);
        assert_eq!(tank(0.0, 10.0, 0.0).fill_percent(), 0.0);
    }

    #[test]
    fn low_threshold_is_inclusive() {
        assert!(tank(8_000.0, 1_000.0, 1_000.0).is_low());
        assert!(!tank(8_000.0, 1_000.5, 1_000.0).is_low());
    }

    #[test]
    fn ullage_never_negative() {
        assert_eq!(tank(8_000.0, 6_000.0, 0.0).ullage_gallons(), 2_000.0);
        assert_eq!(tank(8_000.0, 9_000.0, 0.0).ullage_gallons(), 0.0);
    }
}
