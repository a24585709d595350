//! Write-boundary validation for health records.
//!
//! # Invariants
//! - Levels and severities are closed `1..=5` ranges.
//! - Index key fields are never blank.
//! - Scalar samples are finite numbers.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Smallest accepted 1-5 level.
pub const LEVEL_MIN: u8 = 1;
/// Largest accepted 1-5 level.
pub const LEVEL_MAX: u8 = 5;

/// Reason a record was rejected before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    LevelOutOfRange { field: &'static str, value: u8 },
    NonFiniteValue { field: &'static str },
    BlankField { field: &'static str },
    UnknownVariant { field: &'static str, value: String },
    /// Alerts are created unresolved; resolution goes through `resolve_alert`.
    CreatedResolved,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LevelOutOfRange { field, value } => write!(
                f,
                "`{field}` must be within {LEVEL_MIN}..={LEVEL_MAX}, got {value}"
            ),
            Self::NonFiniteValue { field } => write!(f, "`{field}` must be a finite number"),
            Self::BlankField { field } => write!(f, "`{field}` cannot be blank"),
            Self::UnknownVariant { field, value } => {
                write!(f, "unknown {field} value `{value}`")
            }
            Self::CreatedResolved => {
                write!(f, "vital alerts must be created with `resolved = false`")
            }
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn check_level(field: &'static str, value: u8) -> Result<(), ValidationError> {
    if (LEVEL_MIN..=LEVEL_MAX).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::LevelOutOfRange { field, value })
    }
}

pub(crate) fn check_not_blank(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::BlankField { field })
    } else {
        Ok(())
    }
}

pub(crate) fn check_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFiniteValue { field })
    }
}
