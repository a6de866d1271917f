use serde::Deserialize;
use thiserror::Error;

use crate::domain::permission::{PageGroup, PermissionMatrix, RoleTemplate};

/// Errors that can occur while processing permission editor forms.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PermissionFormError {
    #[error("unknown role template `{0}`")]
    UnknownTemplate(String),
    #[error("unknown page group `{0}`")]
    UnknownGroup(String),
}

/// Checkbox matrix of the permission editor.
///
/// Every checked box submits a `grants=page:action` pair, so the body must be
/// parsed with `serde_html_form` to collect repeated keys.
#[derive(Debug, Deserialize)]
pub struct SavePermissionsForm {
    pub user_id: i32,
    #[serde(default)]
    pub grants: Vec<String>,
}

impl SavePermissionsForm {
    pub fn to_matrix(&self) -> PermissionMatrix {
        PermissionMatrix::from_grants(&self.grants)
    }
}

/// Overwrite a profile's matrix with a role template.
#[derive(Debug, Deserialize)]
pub struct ApplyTemplateForm {
    pub user_id: i32,
    pub template: String,
}

impl ApplyTemplateForm {
    pub fn template(&self) -> Result<RoleTemplate, PermissionFormError> {
        RoleTemplate::parse(&self.template)
            .ok_or_else(|| PermissionFormError::UnknownTemplate(self.template.trim().to_string()))
    }
}

/// Grant or revoke every action on a page group.
#[derive(Debug, Deserialize)]
pub struct BulkGroupForm {
    pub user_id: i32,
    pub group: String,
    #[serde(default)]
    pub grant: bool,
}

impl BulkGroupForm {
    pub fn group(&self) -> Result<PageGroup, PermissionFormError> {
        PageGroup::parse(&self.group)
            .ok_or_else(|| PermissionFormError::UnknownGroup(self.group.trim().to_string()))
    }
}
