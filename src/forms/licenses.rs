use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::license::{NewLicense, UpdateLicense};
use crate::forms::{
    NAME_MAX_LEN, blank_as_none, optional_inline, optional_multiline, sanitize_inline_text,
};

/// Result type returned by the license form helpers.
pub type LicenseFormResult<T> = Result<T, LicenseFormError>;

/// Errors that can occur while processing license forms.
#[derive(Debug, Error)]
pub enum LicenseFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("license name cannot be empty")]
    EmptyName,
    #[error("license cannot expire before it is issued")]
    ExpiresBeforeIssue,
}

fn check_dates(issue_date: Option<NaiveDate>, expiry_date: NaiveDate) -> LicenseFormResult<()> {
    match issue_date {
        Some(issued) if expiry_date < issued => Err(LicenseFormError::ExpiresBeforeIssue),
        _ => Ok(()),
    }
}

/// Payload of the "Add license" form.
#[derive(Debug, Deserialize, Validate)]
pub struct AddLicenseForm {
    /// Empty for company-wide licenses.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub station_id: Option<i32>,
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    #[validate(length(max = 64))]
    pub license_number: Option<String>,
    #[validate(length(max = NAME_MAX_LEN))]
    pub authority: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub issue_date: Option<NaiveDate>,
    pub expiry_date: NaiveDate,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

impl AddLicenseForm {
    pub fn into_new_license(self, hub_id: i32) -> LicenseFormResult<NewLicense> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(LicenseFormError::EmptyName);
        }
        check_dates(self.issue_date, self.expiry_date)?;

        Ok(NewLicense {
            hub_id,
            station_id: self.station_id,
            name,
            license_number: optional_inline(self.license_number.as_deref()),
            authority: optional_inline(self.authority.as_deref()),
            issue_date: self.issue_date,
            expiry_date: self.expiry_date,
            notes: optional_multiline(self.notes.as_deref()),
        })
    }
}

/// Payload of the "Edit license" form.
#[derive(Debug, Deserialize, Validate)]
pub struct EditLicenseForm {
    pub license_id: i32,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub station_id: Option<i32>,
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    #[validate(length(max = 64))]
    pub license_number: Option<String>,
    #[validate(length(max = NAME_MAX_LEN))]
    pub authority: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub issue_date: Option<NaiveDate>,
    pub expiry_date: NaiveDate,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

impl EditLicenseForm {
    pub fn into_update_license(self) -> LicenseFormResult<UpdateLicense> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(LicenseFormError::EmptyName);
        }
        check_dates(self.issue_date, self.expiry_date)?;

        Ok(UpdateLicense {
            station_id: self.station_id,
            name,
            license_number: optional_inline(self.license_number.as_deref()),
            authority: optional_inline(self.authority.as_deref()),
            issue_date: self.issue_date,
            expiry_date: self.expiry_date,
            notes: optional_multiline(self.notes.as_deref()),
            updated_at: Local::now().naive_utc(),
        })
    }
}

#[derive(MultipartForm)]
/// Multipart form carrying the scanned license document.
pub struct UploadLicenseDocumentForm {
    pub license_id: Text<i32>,
    #[multipart(limit = "20MB")]
    pub document: TempFile,
}
