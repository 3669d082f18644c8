//! Quantitative validation of simulation runs against cached summaries.
//!
//! - [`config`]: installation and working roots (`STARHOME`, `TESTHOME`).
//! - [`discovery`]: `Group<N>_*.sim` lookup and glob counts, always under a
//!   [`workdir::WorkdirGuard`].
//! - [`summary`]: the [`SummaryProvider`], resolving a [`SimulationRef`] to
//!   `Summary_<stem>.ref` text and regenerating it through the external
//!   [`driver`] on request.
//! - [`assertions`]: named checks composing extraction and tolerance
//!   judgement, recorded in an [`AuditTrail`].
//!
//! Extraction and comparison themselves live in `simval-core` and are
//! re-exported here.

#![forbid(unsafe_code)]

pub mod assertions;
pub mod audit;
pub mod config;
pub mod discovery;
pub mod driver;
pub mod error;
pub mod logging;
pub mod reference;
pub mod summary;
pub mod workdir;

pub use assertions::{Assertions, Expected, MeshEntity, Source, defaults};
pub use audit::AuditTrail;
pub use config::{DriverSettings, EngineConfig};
pub use discovery::{latest_simulation, matching_files, simulations};
pub use driver::{DriverOutcome, DriverRequest, ProcessDriver, SimulationDriver};
pub use error::{ErrorKind, Result, SimvalError};
pub use reference::{SimulationRef, group_id_from_test_name};
pub use summary::{SummaryProvider, artifact_name, artifact_path};

pub use simval_core::{
    CheckError, Comparison, Pattern, SceneStat, ToleranceMode, TolerancePolicy, check, compare,
    extract, extract_int,
};
