use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::fuel::FuelGrade;
use crate::domain::inventory::{
    InventoryLevel as DomainInventoryLevel, NewInventoryLevel as DomainNewInventoryLevel,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::fuel_inventory)]
pub struct InventoryLevel {
    pub id: i32,
    pub hub_id: i32,
    pub station_id: i32,
    pub grade: String,
    pub capacity_gallons: f64,
    pub volume_gallons: f64,
    pub low_level_gallons: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::fuel_inventory)]
pub struct NewInventoryLevel<'a> {
    pub hub_id: i32,
    pub station_id: i32,
    pub grade: &'a str,
    pub capacity_gallons: f64,
    pub volume_gallons: f64,
    pub low_level_gallons: f64,
}

impl InventoryLevel {
    /// Convert the row, skipping tanks with a grade this build does not know.
    pub fn into_domain(self) -> Option<DomainInventoryLevel> {
        let Some(grade) = FuelGrade::parse(&self.grade) else {
            log::warn!(
                "Skipping tank {} with unknown fuel grade `{}`",
                self.id,
                self.grade
            );
            return None;
        };

        Some(DomainInventoryLevel {
            id: self.id,
            hub_id: self.hub_id,
            station_id: self.station_id,
            grade,
            capacity_gallons: self.capacity_gallons,
            volume_gallons: self.volume_gallons,
            low_level_gallons: self.low_level_gallons,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewInventoryLevel> for NewInventoryLevel<'a> {
    fn from(value: &'a DomainNewInventoryLevel) -> Self {
        Self {
            hub_id: value.hub_id,
            station_id: value.station_id,
            grade: value.grade.as_str(),
            capacity_gallons: value.capacity_gallons,
            volume_gallons: value.volume_gallons,
            low_level_gallons: value.low_level_gallons,
        }
    }
}
