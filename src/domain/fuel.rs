use std::fmt;

use serde::{Deserialize, Serialize};

/// Fuel grades sold at every station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelGrade {
    Regular,
    Plus,
    Premium,
}

impl FuelGrade {
    pub const ALL: [FuelGrade; 3] = [FuelGrade::Regular, FuelGrade::Plus, FuelGrade::Premium];

    pub fn as_str(self) -> &'static str {
        match self {
            FuelGrade::Regular => "regular",
            FuelGrade::Plus => "plus",
            FuelGrade::Premium => "premium",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FuelGrade::Regular => "Regular",
            FuelGrade::Plus => "Plus",
            FuelGrade::Premium => "Premium",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|grade| grade.as_str() == value)
    }
}

impl fmt::Display for FuelGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<FuelGrade> for &'static str {
    fn from(value: FuelGrade) -> Self {
        value.as_str()
    }
}
