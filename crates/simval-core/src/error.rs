use thiserror::Error;

use crate::tolerance::{Comparison, ToleranceMode};

/// Failures raised while extracting or judging a single value.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("{mode} tolerance {tolerance} is not allowed ({rule})")]
    InvalidTolerance { mode: ToleranceMode, tolerance: f64, rule: &'static str },

    #[error("value outside tolerance: {0}")]
    ToleranceViolation(Box<Comparison>),

    #[error("pattern not found: \"{pattern}\"")]
    PatternNotFound { pattern: String },

    #[error("pattern \"{pattern}\" captured \"{value}\", which is not a number")]
    InvalidNumber { pattern: String, value: String },

    #[error("invalid extraction pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

impl CheckError {
    /// The comparison record attached to a tolerance violation.
    pub fn comparison(&self) -> Option<&Comparison> {
        match self {
            CheckError::ToleranceViolation(record) => Some(record.as_ref()),
            _ => None,
        }
    }
}
