use chrono::{Duration, NaiveDate};
pub use pushkind_common::services::errors::{ServiceError, ServiceResult};

pub mod access;
pub mod alerts;
pub mod audit;
pub mod deliveries;
pub mod employees;
pub mod inventory;
pub mod licenses;
pub mod main;
pub mod payroll;
pub mod permissions;
pub mod sales;
pub mod sms;
pub mod stations;
pub mod users;

#[cfg(test)]
pub(crate) mod test_support;

/// Number of pages for `total` items at the default page size.
pub(crate) fn total_pages(total: usize) -> usize {
    total.div_ceil(pushkind_common::pagination::DEFAULT_ITEMS_PER_PAGE)
}

/// `date` moved by `days`; a form error when the result leaves the calendar.
pub(crate) fn shift_date(date: NaiveDate, days: i64) -> ServiceResult<NaiveDate> {
    Duration::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .ok_or_else(|| ServiceError::Form(format!("Date {date} is out of range.")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_date_moves_both_ways() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date");

        assert_eq!(
            shift_date(date, -1).ok(),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(
            shift_date(date, 30).ok(),
            NaiveDate::from_ymd_opt(2024, 3, 31)
        );
    }

    #[test]
    fn shift_date_rejects_out_of_range_results() {
        let earliest = NaiveDate::MIN;

        assert!(matches!(shift_date(earliest, -29), Err(ServiceError::Form(_))));
        assert!(matches!(
            shift_date(NaiveDate::MAX, 1),
            Err(ServiceError::Form(_))
        ));
        assert!(matches!(
            shift_date(earliest, 200_000_000_000),
            Err(ServiceError::Form(_))
        ));
    }
}
