//! Pure comparison and extraction logic for simulation baselines.
//!
//! Nothing in this crate touches the filesystem or the environment:
//!
//! - [`tolerance`] judges an actual value against an expected one under a
//!   relative or absolute [`TolerancePolicy`] and produces a [`Comparison`]
//!   record whether the check passes or not.
//! - [`pattern`] turns a labelled [`Pattern`] into a line-oriented regex and
//!   pulls a single scalar out of report text.
//! - [`format`] renders numbers for the diagnostic lines.
//!
//! ```rust
//! use simval_core::{Pattern, TolerancePolicy, check, extract};
//!
//! let text = "Cell Count: 16745\n";
//! let actual = extract(&Pattern::count("Cell"), text).unwrap();
//! let record = check("Cell Count", actual, 16745.0, TolerancePolicy::relative(0.005)).unwrap();
//! assert!(record.passed);
//! ```

pub mod error;
pub mod format;
pub mod pattern;
pub mod tolerance;

pub use error::CheckError;
pub use pattern::{Pattern, SceneStat, extract, extract_int};
pub use tolerance::{Comparison, ToleranceMode, TolerancePolicy, check, compare};

pub type Result<T> = std::result::Result<T, CheckError>;
