//! Cached summary artifacts.
//!
//! A summary artifact is the plain-text report written by the summary macro
//! for one simulation file. It lives next to the simulation file as
//! `Summary_<stem>.ref` and is never invalidated automatically: callers ask
//! for regeneration explicitly with `overwrite`, which deletes the old
//! artifact and runs the driver again.

use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::discovery::latest_simulation;
use crate::driver::{DriverRequest, ProcessDriver, SimulationDriver};
use crate::error::{Result, SimvalError};
use crate::reference::SimulationRef;

const ARTIFACT_PREFIX: &str = "Summary_";
const ARTIFACT_EXTENSION: &str = "ref";

/// `Summary_<stem>.ref` for a simulation file.
pub fn artifact_name(sim_file: &Path) -> Result<String> {
    let stem = sim_file.file_stem().and_then(|s| s.to_str()).ok_or_else(|| {
        SimvalError::Usage(format!("not a simulation file: \"{}\"", sim_file.display()))
    })?;
    Ok(format!("{ARTIFACT_PREFIX}{stem}.{ARTIFACT_EXTENSION}"))
}

/// Artifact path for a simulation file; computed, never looked up.
pub fn artifact_path(sim_file: &Path) -> Result<PathBuf> {
    Ok(sim_file.with_file_name(artifact_name(sim_file)?))
}

/// Resolves simulation references to summary text.
pub struct SummaryProvider<D = ProcessDriver> {
    config: EngineConfig,
    driver: D,
}

impl SummaryProvider<ProcessDriver> {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_driver(config, ProcessDriver)
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(EngineConfig::from_env()?))
    }
}

impl<D: SimulationDriver> SummaryProvider<D> {
    pub fn with_driver(config: EngineConfig, driver: D) -> Self {
        Self { config, driver }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Concrete simulation file behind `reference`.
    ///
    /// Group ids pick the latest matching file; explicit paths are taken
    /// relative to the working root.
    pub fn simulation_file(&self, reference: &SimulationRef) -> Result<PathBuf> {
        match reference {
            SimulationRef::ByGroupId(id) => latest_simulation(&self.config, *id),
            SimulationRef::ByPath(path) => Ok(self.config.work_root.join(path)),
        }
    }

    /// Artifact path for `reference`.
    pub fn resolve(&self, reference: &SimulationRef) -> Result<PathBuf> {
        artifact_path(&self.simulation_file(reference)?)
    }

    /// Summary text for `reference`, regenerating it first when `overwrite`.
    pub fn get(&self, reference: &SimulationRef, overwrite: bool) -> Result<String> {
        let sim_file = self.simulation_file(reference)?;
        let artifact = artifact_path(&sim_file)?;

        if overwrite {
            self.regenerate(&sim_file, &artifact)?;
        } else {
            debug!("reading cached summary {}", artifact.display());
        }

        match fs::read_to_string(&artifact) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == IoErrorKind::NotFound => {
                Err(SimvalError::ArtifactNotFound { path: artifact })
            }
            Err(e) => Err(SimvalError::io(artifact, e)),
        }
    }

    fn regenerate(&self, sim_file: &Path, artifact: &Path) -> Result<()> {
        if !sim_file.exists() {
            return Err(SimvalError::SimulationNotFound { pattern: sim_file.display().to_string() });
        }
        remove_if_exists(artifact)?;

        let macro_file = self.config.summary_macro();
        if !macro_file.exists() {
            return Err(SimvalError::MacroNotFound { path: macro_file });
        }

        info!("writing summary for {}", sim_file.display());
        let request = DriverRequest::new(&self.config, &macro_file, sim_file);
        let outcome = self.driver.run(&request)?;

        if outcome.timed_out {
            return Err(SimvalError::GenerationFailed {
                artifact: artifact.to_path_buf(),
                reason: "driver timed out".into(),
            });
        }
        if !outcome.success() {
            warn!("driver exit code {:?} for {}", outcome.exit_code, sim_file.display());
        }
        if !artifact.exists() {
            return Err(SimvalError::GenerationFailed {
                artifact: artifact.to_path_buf(),
                reason: format!("artifact not written (driver exit code {:?})", outcome.exit_code),
            });
        }

        info!("summary written: {}", artifact.display());
        Ok(())
    }
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!("removed stale summary {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == IoErrorKind::NotFound => Ok(()),
        Err(e) => Err(SimvalError::io(path, e)),
    }
}
