use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Default number of days before expiry a license is reported as expiring.
pub const DEFAULT_WARNING_DAYS: i64 = 30;
/// Longest accepted warning window, ten years.
pub const MAX_WARNING_DAYS: i64 = 3650;

/// Validity of a license relative to a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseStatus {
    Active,
    ExpiringSoon,
    Expired,
}

impl LicenseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LicenseStatus::Active => "active",
            LicenseStatus::ExpiringSoon => "expiring_soon",
            LicenseStatus::Expired => "expired",
        }
    }
}

/// Permit or license held for a station (or for the hub as a whole).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct License {
    pub id: i32,
    pub hub_id: i32,
    /// Station the license belongs to; `None` for company-wide licenses.
    pub station_id: Option<i32>,
    pub name: String,
    pub license_number: Option<String>,
    /// Issuing authority, e.g. the state environmental agency.
    pub authority: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub expiry_date: NaiveDate,
    /// Relative path of the uploaded scan inside the upload directory.
    pub document_path: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl License {
    /// Days from `today` until expiry; negative once expired.
    pub fn days_until_expiry(&self, today: NaiveDate) -> i64 {
        (self.expiry_date - today).num_days()
    }

    pub fn status(&self, today: NaiveDate, warning_days: i64) -> LicenseStatus {
        let days = self.days_until_expiry(today);
        if days < 0 {
            LicenseStatus::Expired
        } else if days <= warning_days {
            LicenseStatus::ExpiringSoon
        } else {
            LicenseStatus::Active
        }
    }
}

/// License together with its computed status, as shown in lists.
#[derive(Debug, Clone, Serialize)]
pub struct LicenseView {
    #[serde(flatten)]
    pub license: License,
    pub status: LicenseStatus,
    pub days_until_expiry: i64,
}

impl LicenseView {
    pub fn new(license: License, today: NaiveDate, warning_days: i64) -> Self {
        let status = license.status(today, warning_days);
        let days_until_expiry = license.days_until_expiry(today);
        Self {
            license,
            status,
            days_until_expiry,
        }
    }
}

/// Payload required to insert a license.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLicense {
    pub hub_id: i32,
    pub station_id: Option<i32>,
    pub name: String,
    pub license_number: Option<String>,
    pub authority: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub expiry_date: NaiveDate,
    pub notes: Option<String>,
}

/// Full replacement of the editable license fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateLicense {
    pub station_id: Option<i32>,
    pub name: String,
    pub license_number: Option<String>,
    pub authority: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub expiry_date: NaiveDate,
    pub notes: Option<String>,
    pub updated_at: NaiveDateTime,
}

/// Query definition used to list licenses for a hub.
#[derive(Debug, Clone)]
pub struct LicenseListQuery {
    pub hub_id: i32,
    pub station_id: Option<i32>,
    /// Only licenses expiring on or before this date.
    pub expiring_before: Option<NaiveDate>,
}

impl LicenseListQuery {
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            station_id: None,
            expiring_before: None,
        }
    }

    pub fn station(mut self, station_id: i32) -> Self {
        self.station_id = Some(station_id);
        self
    }

    pub fn expiring_before(mut self, date: NaiveDate) -> Self {
        self.expiring_before = Some(date);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn license(expiry: NaiveDate) -> License {
        License {
            id: 1,
            hub_id: 1,
            station_id: Some(2),
            name: "Tobacco retail".to_string(),
            license_number: None,
            authority: None,
            issue_date: None,
            expiry_date: expiry,
            document_path: None,
            notes: None,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    fn day(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).expect("date")
    }

    #[test]
    fn status_depends_on_warning_window() {
        let today = day(6, 1);

        assert_eq!(license(day(5, 31)).status(today, 30), LicenseStatus::Expired);
        assert_eq!(license(day(6, 1)).status(today, 30), LicenseStatus::ExpiringSoon);
        assert_eq!(license(day(7, 1)).status(today, 30), LicenseStatus::ExpiringSoon);
        assert_eq!(license(day(7, 2)).status(today, 30), LicenseStatus::Active);
    }

    #[test]
    fn view_carries_days_until_expiry() {
        let view = LicenseView::new(license(day(6, 11)), day(6, 1), DEFAULT_WARNING_DAYS);

        assert_eq!(view.days_until_expiry, 10);
        assert_eq!(view.status, LicenseStatus::ExpiringSoon);
    }
}
