#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A learner's occupation.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly in SeaORM entities.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")
)]
pub enum Occupation {
    #[default]
    #[serde(rename = "student")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "student"))]
    Student,
    #[serde(rename = "developer")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "developer"))]
    Developer,
    #[serde(rename = "data_scientist")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "data_scientist"))]
    DataScientist,
    #[serde(rename = "dba")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "dba"))]
    DatabaseAdmin,
}

impl Occupation {
    pub const ALL: &'static [Occupation] = &[
        Self::Student,
        Self::Developer,
        Self::DataScientist,
        Self::DatabaseAdmin,
    ];

    /// The stored value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Developer => "developer",
            Self::DataScientist => "data_scientist",
            Self::DatabaseAdmin => "dba",
        }
    }

    /// Human-readable label shown in admin choice widgets.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Developer => "Developer",
            Self::DataScientist => "Data Scientist",
            Self::DatabaseAdmin => "Database Admin",
        }
    }
}

impl fmt::Display for Occupation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Occupation {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|o| o.as_str() == s)
            .ok_or_else(|| ParseChoiceError::new("occupation", s, Self::ALL.iter().map(|o| o.as_str())))
    }
}

/// Enrollment mode for a course.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(5))")
)]
pub enum EnrollmentMode {
    #[default]
    #[serde(rename = "audit")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "audit"))]
    Audit,
    #[serde(rename = "honor")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "honor"))]
    Honor,
    #[serde(rename = "BETA")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "BETA"))]
    Beta,
}

impl EnrollmentMode {
    pub const ALL: &'static [EnrollmentMode] = &[Self::Audit, Self::Honor, Self::Beta];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Audit => "audit",
            Self::Honor => "honor",
            Self::Beta => "BETA",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Audit => "Audit",
            Self::Honor => "Honor",
            Self::Beta => "BETA",
        }
    }
}

impl fmt::Display for EnrollmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnrollmentMode {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ParseChoiceError::new("mode", s, Self::ALL.iter().map(|m| m.as_str())))
    }
}

/// Error when parsing a value outside a closed set of choices.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {field} '{invalid}'. Valid values: {valid}")]
pub struct ParseChoiceError {
    field: &'static str,
    invalid: String,
    valid: String,
}

impl ParseChoiceError {
    fn new<'a>(field: &'static str, invalid: &str, valid: impl Iterator<Item = &'a str>) -> Self {
        Self {
            field,
            invalid: invalid.to_string(),
            valid: valid.collect::<Vec<_>>().join(", "),
        }
    }
}
