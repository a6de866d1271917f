use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::delivery::{GradeReadings, NewDelivery, TankReading};
use crate::domain::fuel::FuelGrade;
use crate::forms::{NAME_MAX_LEN, blank_as_zero, optional_inline, optional_multiline};

/// Result type returned by the delivery form helpers.
pub type DeliveryFormResult<T> = Result<T, DeliveryFormError>;

/// Errors that can occur while processing the delivery form.
#[derive(Debug, Error)]
pub enum DeliveryFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("{0} readings cannot be negative")]
    NegativeVolume(FuelGrade),
    #[error("enter the readings of at least one grade")]
    NoReadings,
}

/// Payload of the "Record delivery" form. Blank readings count as zero.
#[derive(Debug, Deserialize, Validate)]
pub struct AddDeliveryForm {
    pub station_id: i32,
    pub delivery_date: NaiveDate,
    #[validate(length(max = NAME_MAX_LEN))]
    pub supplier: Option<String>,
    #[validate(length(max = 64))]
    pub bol_number: Option<String>,
    #[serde(default, deserialize_with = "blank_as_zero")]
    pub regular_before: f64,
    #[serde(default, deserialize_with = "blank_as_zero")]
    pub regular_delivered: f64,
    #[serde(default, deserialize_with = "blank_as_zero")]
    pub regular_after: f64,
    #[serde(default, deserialize_with = "blank_as_zero")]
    pub plus_before: f64,
    #[serde(default, deserialize_with = "blank_as_zero")]
    pub plus_delivered: f64,
    #[serde(default, deserialize_with = "blank_as_zero")]
    pub plus_after: f64,
    #[serde(default, deserialize_with = "blank_as_zero")]
    pub premium_before: f64,
    #[serde(default, deserialize_with = "blank_as_zero")]
    pub premium_delivered: f64,
    #[serde(default, deserialize_with = "blank_as_zero")]
    pub premium_after: f64,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

impl AddDeliveryForm {
    fn readings(&self) -> DeliveryFormResult<GradeReadings> {
        let readings = GradeReadings {
            regular: TankReading::new(
                self.regular_before,
                self.regular_delivered,
                self.regular_after,
            ),
            plus: TankReading::new(self.plus_before, self.plus_delivered, self.plus_after),
            premium: TankReading::new(
                self.premium_before,
                self.premium_delivered,
                self.premium_after,
            ),
        };

        for grade in FuelGrade::ALL {
            let reading = readings.get(grade);
            let valid = [reading.before, reading.delivered, reading.after]
                .iter()
                .all(|value| value.is_finite() && *value >= 0.0);
            if !valid {
                return Err(DeliveryFormError::NegativeVolume(grade));
            }
        }

        if !FuelGrade::ALL
            .into_iter()
            .any(|grade| readings.get(grade).is_recorded())
        {
            return Err(DeliveryFormError::NoReadings);
        }

        Ok(readings)
    }

    pub fn into_new_delivery(self, hub_id: i32, created_by: &str) -> DeliveryFormResult<NewDelivery> {
        self.validate()?;

        let readings = self.readings()?;
        let mut delivery = NewDelivery::new(
            hub_id,
            self.station_id,
            self.delivery_date,
            readings,
            created_by,
        );

        if let Some(supplier) = optional_inline(self.supplier.as_deref()) {
            delivery = delivery.with_supplier(supplier);
        }
        if let Some(bol_number) = optional_inline(self.bol_number.as_deref()) {
            delivery = delivery.with_bol_number(bol_number);
        }
        if let Some(notes) = optional_multiline(self.notes.as_deref()) {
            delivery = delivery.with_notes(notes);
        }

        Ok(delivery)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_delivery_from_form_fields() {
        let form: AddDeliveryForm = serde_html_form::from_str(
            "station_id=3&delivery_date=2024-06-02&supplier=+Acme+Fuel+&bol_number=BOL-77\
             &regular_before=1000&regular_delivered=5000&regular_after=5990",
        )
        .expect("form parses");

        let delivery = form
            .into_new_delivery(1, "ops@example.com")
            .expect("valid form");

        assert_eq!(delivery.supplier.as_deref(), Some("Acme Fuel"));
        assert_eq!(delivery.readings.regular.after, 5990.0);
        assert!(!delivery.readings.plus.is_recorded());
        assert!(delivery.reconcile().has_discrepancy);
    }

    #[test]
    fn rejects_negative_readings() {
        let form: AddDeliveryForm = serde_html_form::from_str(
            "station_id=3&delivery_date=2024-06-02&plus_before=-1&plus_delivered=10&plus_after=9",
        )
        .expect("form parses");

        assert!(matches!(
            form.into_new_delivery(1, "ops@example.com"),
            Err(DeliveryFormError::NegativeVolume(FuelGrade::Plus))
        ));
    }

    #[test]
    fn rejects_delivery_without_readings() {
        let form: AddDeliveryForm =
            serde_html_form::from_str("station_id=3&delivery_date=2024-06-02").expect("parses");

        assert!(matches!(
            form.into_new_delivery(1, "ops@example.com"),
            Err(DeliveryFormError::NoReadings)
        ));
    }

    #[test]
    fn blank_readings_count_as_zero() {
        let form: AddDeliveryForm = serde_html_form::from_str(
            "station_id=3&delivery_date=2024-06-02&supplier=\
             &plus_before=&plus_delivered=&plus_after=\
             &premium_before=200&premium_delivered=800&premium_after=1000",
        )
        .expect("form parses");

        let delivery = form
            .into_new_delivery(1, "ops@example.com")
            .expect("valid form");

        assert!(delivery.supplier.is_none());
        assert!(!delivery.readings.plus.is_recorded());
        assert!(!delivery.reconcile().has_discrepancy);
    }
}
