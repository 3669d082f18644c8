//! Engine configuration.
//!
//! Two roots are required: the installation root of the simulation driver
//! and the working root holding simulation files, the summary macro and the
//! cached summary artifacts. They come from `STARHOME` and `TESTHOME`, or
//! from a TOML file whose values those variables override.
//!
//! ```toml
//! install_root = "/opt/star/15.02"
//! work_root = "/data/regression"
//!
//! [driver]
//! executable = "star/bin/starccm+"
//! timeout_secs = 7200
//! ```

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SimvalError};

/// Installation root of the simulation driver.
pub const INSTALL_ROOT_ENV: &str = "STARHOME";
/// Working root with simulation files and summary artifacts.
pub const WORK_ROOT_ENV: &str = "TESTHOME";

/// Macro run by the driver to write a summary artifact.
pub const SUMMARY_MACRO: &str = "WriteSummaryTest.java";
/// Summary regeneration always runs on a single worker.
pub const DRIVER_WORKERS: u32 = 1;
pub const DEFAULT_DRIVER_EXECUTABLE: &str = "star/bin/starccm+";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriverSettings {
    /// Driver binary; relative paths are resolved against the install root.
    pub executable: PathBuf,
    /// Kill the driver after this many seconds. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self { executable: PathBuf::from(DEFAULT_DRIVER_EXECUTABLE), timeout_secs: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineConfig {
    pub install_root: PathBuf,
    pub work_root: PathBuf,
    pub driver: DriverSettings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    install_root: Option<PathBuf>,
    work_root: Option<PathBuf>,
    #[serde(default)]
    driver: DriverSettings,
}

impl EngineConfig {
    pub fn new(install_root: impl Into<PathBuf>, work_root: impl Into<PathBuf>) -> Self {
        Self {
            install_root: install_root.into(),
            work_root: work_root.into(),
            driver: DriverSettings::default(),
        }
    }

    pub fn with_driver(mut self, driver: DriverSettings) -> Self {
        self.driver = driver;
        self
    }

    /// Read both roots from the process environment.
    ///
    /// Fails at once when either variable is unset or empty.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`EngineConfig::from_env`] against an arbitrary lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let install_root = required_var(&lookup, INSTALL_ROOT_ENV)?;
        let work_root = required_var(&lookup, WORK_ROOT_ENV)?;
        let config = Self::new(install_root, work_root);
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML config file, then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|source| SimvalError::ConfigIo { path: path.to_path_buf(), source })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Self::from_toml_with(contents, |key| env::var(key).ok())
    }

    /// Parse TOML and apply overrides from `lookup`.
    pub fn from_toml_with<F>(contents: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file: ConfigFile = toml::from_str(contents)?;

        let install_root = non_empty(&lookup, INSTALL_ROOT_ENV)
            .map(PathBuf::from)
            .or(file.install_root)
            .ok_or(SimvalError::MissingEnv { key: INSTALL_ROOT_ENV })?;
        let work_root = non_empty(&lookup, WORK_ROOT_ENV)
            .map(PathBuf::from)
            .or(file.work_root)
            .ok_or(SimvalError::MissingEnv { key: WORK_ROOT_ENV })?;

        let config = Self { install_root, work_root, driver: file.driver };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.install_root.as_os_str().is_empty() {
            return Err(SimvalError::Config("install_root must not be empty".into()));
        }
        if self.work_root.as_os_str().is_empty() {
            return Err(SimvalError::Config("work_root must not be empty".into()));
        }
        if self.driver.executable.as_os_str().is_empty() {
            return Err(SimvalError::Config("driver.executable must not be empty".into()));
        }
        if self.driver.timeout_secs == Some(0) {
            return Err(SimvalError::Config("driver.timeout_secs must be > 0".into()));
        }
        Ok(())
    }

    pub fn driver_executable(&self) -> PathBuf {
        if self.driver.executable.is_absolute() {
            self.driver.executable.clone()
        } else {
            self.install_root.join(&self.driver.executable)
        }
    }

    pub fn summary_macro(&self) -> PathBuf {
        self.work_root.join(SUMMARY_MACRO)
    }

    pub fn driver_timeout(&self) -> Option<Duration> {
        self.driver.timeout_secs.map(Duration::from_secs)
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|value| !value.trim().is_empty())
}

fn required_var<F>(lookup: &F, key: &'static str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let value = non_empty(lookup, key).ok_or(SimvalError::MissingEnv { key })?;
    debug!("{key}={value}");
    Ok(value)
}
