use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::fuel::FuelGrade;
use crate::domain::inventory::NewInventoryLevel;

/// Result type returned by the inventory form helpers.
pub type InventoryFormResult<T> = Result<T, InventoryFormError>;

/// Errors that can occur while processing tank forms.
#[derive(Debug, Error, PartialEq)]
pub enum InventoryFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("unknown fuel grade `{0}`")]
    UnknownGrade(String),
    #[error("volume of {volume} gal exceeds the tank capacity of {capacity} gal")]
    VolumeExceedsCapacity { volume: f64, capacity: f64 },
}

/// Reject readings that do not fit into the tank.
pub fn check_volume(volume: f64, capacity: f64) -> InventoryFormResult<()> {
    if volume > capacity {
        return Err(InventoryFormError::VolumeExceedsCapacity { volume, capacity });
    }
    Ok(())
}

/// Payload of the "Save tank" form; replaces the tank of the same grade.
#[derive(Debug, Deserialize, Validate)]
pub struct SaveTankForm {
    pub station_id: i32,
    pub grade: String,
    #[validate(range(exclusive_min = 0.0, max = 100_000.0))]
    pub capacity_gallons: f64,
    #[validate(range(min = 0.0))]
    pub volume_gallons: f64,
    #[validate(range(min = 0.0))]
    pub low_level_gallons: f64,
}

impl SaveTankForm {
    pub fn into_new_inventory_level(self, hub_id: i32) -> InventoryFormResult<NewInventoryLevel> {
        self.validate()?;

        let grade = FuelGrade::parse(&self.grade)
            .ok_or_else(|| InventoryFormError::UnknownGrade(self.grade.trim().to_string()))?;
        check_volume(self.volume_gallons, self.capacity_gallons)?;

        Ok(NewInventoryLevel {
            hub_id,
            station_id: self.station_id,
            grade,
            capacity_gallons: self.capacity_gallons,
            volume_gallons: self.volume_gallons,
            low_level_gallons: self.low_level_gallons,
        })
    }
}

/// Payload of the manual stick-reading form.
#[derive(Debug, Deserialize, Validate)]
pub struct RecordReadingForm {
    pub inventory_id: i32,
    #[validate(range(min = 0.0))]
    pub volume_gallons: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(grade: &str, volume: f64) -> SaveTankForm {
        SaveTankForm {
            station_id: 1,
            grade: grade.to_string(),
            capacity_gallons: 10_000.0,
            volume_gallons: volume,
            low_level_gallons: 1_500.0,
        }
    }

    #[test]
    fn converts_valid_tank() {
        let level = form("Premium", 6_000.0)
            .into_new_inventory_level(2)
            .expect("valid form");

        assert_eq!(level.grade, FuelGrade::Premium);
        assert_eq!(level.hub_id, 2);
    }

    #[test]
    fn rejects_overfilled_tank() {
        assert_eq!(
            form("regular", 12_000.0).into_new_inventory_level(2),
            Err(InventoryFormError::VolumeExceedsCapacity {
                volume: 12_000.0,
                capacity: 10_000.0
            })
        );
    }

    #[test]
    fn rejects_unknown_grade() {
        assert_eq!(
            form("diesel", 10.0).into_new_inventory_level(2),
            Err(InventoryFormError::UnknownGrade("diesel".to_string()))
        );
    }
}
