use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::delivery::{
    Delivery as DomainDelivery, GradeReadings, NewDelivery as DomainNewDelivery, TankReading,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::deliveries)]
pub struct Delivery {
    pub id: i32,
    pub hub_id: i32,
    pub station_id: i32,
    pub delivery_date: NaiveDate,
    pub supplier: Option<String>,
    pub bol_number: Option<String>,
    pub regular_before: f64,
    pub regular_delivered: f64,
    pub regular_after: f64,
    pub plus_before: f64,
    pub plus_delivered: f64,
    pub plus_after: f64,
    pub premium_before: f64,
    pub premium_delivered: f64,
    pub premium_after: f64,
    pub notes: Option<String>,
    pub created_by: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::deliveries)]
pub struct NewDelivery<'a> {
    pub hub_id: i32,
    pub station_id: i32,
    pub delivery_date: NaiveDate,
    pub supplier: Option<&'a str>,
    pub bol_number: Option<&'a str>,
    pub regular_before: f64,
    pub regular_delivered: f64,
    pub regular_after: f64,
    pub plus_before: f64,
    pub plus_delivered: f64,
    pub plus_after: f64,
    pub premium_before: f64,
    pub premium_delivered: f64,
    pub premium_after: f64,
    pub notes: Option<&'a str>,
    pub created_by: &'a str,
}

impl From<Delivery> for DomainDelivery {
    fn from(value: Delivery) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            station_id: value.station_id,
            delivery_date: value.delivery_date,
            supplier: value.supplier,
            bol_number: value.bol_number,
            readings: GradeReadings {
                regular: TankReading::new(
                    value.regular_before,
                    value.regular_delivered,
                    value.regular_after,
                ),
                plus: TankReading::new(value.plus_before, value.plus_delivered, value.plus_after),
                premium: TankReading::new(
                    value.premium_before,
                    value.premium_delivered,
                    value.premium_after,
                ),
            },
            notes: value.notes,
            created_by: value.created_by,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewDelivery> for NewDelivery<'a> {
    fn from(value: &'a DomainNewDelivery) -> Self {
        let GradeReadings {
            regular,
            plus,
            premium,
        } = value.readings;

        Self {
            hub_id: value.hub_id,
            station_id: value.station_id,
            delivery_date: value.delivery_date,
            supplier: value.supplier.as_deref(),
            bol_number: value.bol_number.as_deref(),
            regular_before: regular.before,
            regular_delivered: regular.delivered,
            regular_after: regular.after,
            plus_before: plus.before,
            plus_delivered: plus.delivered,
            plus_after: plus.after,
            premium_before: premium.before,
            premium_delivered: premium.delivered,
            premium_after: premium.after,
            notes: value.notes.as_deref(),
            created_by: value.created_by.as_str(),
        }
    }
}
