//! Relative-or-absolute tolerance judgement.
//!
//! A comparison computes `error = actual - expected` and then judges it
//! against the policy threshold. Relative mode divides the error by the
//! expected value, so it is switched to absolute mode for a single
//! comparison whenever the expected value or the error is exactly zero. A
//! zero baseline therefore only passes a nonzero actual value if the
//! threshold, read as an absolute bound, covers it.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::CheckError;
use crate::format::{general, percent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToleranceMode {
    Relative,
    Absolute,
}

impl ToleranceMode {
    /// The mode a single comparison actually runs in.
    pub fn resolve(self, expected: f64, error: f64) -> Self {
        match self {
            ToleranceMode::Relative if expected == 0.0 || error == 0.0 => ToleranceMode::Absolute,
            mode => mode,
        }
    }
}

impl fmt::Display for ToleranceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToleranceMode::Relative => write!(f, "relative"),
            ToleranceMode::Absolute => write!(f, "absolute"),
        }
    }
}

/// Threshold plus the mode it is read in.
///
/// The threshold is only validated when a comparison runs, after the mode
/// has been resolved: relative thresholds must be positive, absolute ones
/// must not be negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TolerancePolicy {
    pub mode: ToleranceMode,
    pub threshold: f64,
}

impl TolerancePolicy {
    pub const fn relative(threshold: f64) -> Self {
        Self { mode: ToleranceMode::Relative, threshold }
    }

    pub const fn absolute(threshold: f64) -> Self {
        Self { mode: ToleranceMode::Absolute, threshold }
    }

    /// Zero absolute tolerance: the values must be identical.
    pub const fn exact() -> Self {
        Self::absolute(0.0)
    }
}

/// Audit record of one comparison.
///
/// `error` is the normalized error (a fraction of `expected`) when `mode` is
/// relative and the raw difference when it is absolute. `mode` is the mode
/// after resolution, so it may differ from the one requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub label: String,
    pub actual: f64,
    pub expected: f64,
    pub error: f64,
    pub tolerance: f64,
    pub requested_mode: ToleranceMode,
    pub mode: ToleranceMode,
    pub passed: bool,
}

impl Comparison {
    pub fn error_description(&self) -> String {
        match self.mode {
            ToleranceMode::Relative => format!("error = {}", percent(self.error)),
            ToleranceMode::Absolute => format!("error = {}", general(self.error)),
        }
    }

    pub fn threshold_description(&self) -> String {
        match self.mode {
            ToleranceMode::Relative => format!("tolerance = {}", percent(self.tolerance)),
            ToleranceMode::Absolute => format!("tolerance = {}", general(self.tolerance)),
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "actual = {}; expected = {}; {}; {}",
            general(self.actual),
            general(self.expected),
            self.error_description(),
            self.threshold_description()
        )
    }
}

/// Judge `actual` against `expected` without logging or failing on a miss.
///
/// Only an invalid threshold is an error here; a value outside tolerance is
/// reported through [`Comparison::passed`].
pub fn compare(
    label: &str,
    actual: f64,
    expected: f64,
    policy: TolerancePolicy,
) -> Result<Comparison, CheckError> {
    let raw_error = actual - expected;
    let mode = policy.mode.resolve(expected, raw_error);
    let tolerance = policy.threshold;

    let error = match mode {
        ToleranceMode::Relative => {
            if tolerance.is_nan() || tolerance <= 0.0 {
                return Err(CheckError::InvalidTolerance {
                    mode,
                    tolerance,
                    rule: "relative tolerance must be positive",
                });
            }
            raw_error / expected
        }
        ToleranceMode::Absolute => {
            if tolerance.is_nan() || tolerance < 0.0 {
                return Err(CheckError::InvalidTolerance {
                    mode,
                    tolerance,
                    rule: "tolerance must be equal or higher than zero",
                });
            }
            raw_error
        }
    };

    Ok(Comparison {
        label: label.to_string(),
        actual,
        expected,
        error,
        tolerance,
        requested_mode: policy.mode,
        mode,
        passed: error.abs() <= tolerance,
    })
}

/// Compare, log the diagnostic line and fail on a value outside tolerance.
///
/// The diagnostic is emitted before any failure is returned so a failing run
/// carries the numbers that caused it.
pub fn check(
    label: &str,
    actual: f64,
    expected: f64,
    policy: TolerancePolicy,
) -> Result<Comparison, CheckError> {
    let record = compare(label, actual, expected, policy)?;

    info!(
        target: "simval::compare",
        label = %record.label,
        actual = record.actual,
        expected = record.expected,
        error = record.error,
        tolerance = record.tolerance,
        mode = %record.mode,
        passed = record.passed,
        "[assert {}]: {}",
        record.label,
        record
    );

    if record.passed {
        Ok(record)
    } else {
        warn!(target: "simval::compare", "[assert {}] failed: {}", record.label, record);
        Err(CheckError::ToleranceViolation(Box::new(record)))
    }
}
