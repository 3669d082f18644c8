//! Simulation references.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Result, SimvalError};

/// Which simulation run a check reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationRef {
    /// Latest `Group<N>_*.sim` file in the working root.
    ByGroupId(u32),
    /// Explicit simulation file, relative to the working root unless absolute.
    ByPath(PathBuf),
}

impl SimulationRef {
    /// Build a reference from optional parts, as a caller-facing API would
    /// receive them. Exactly one must be present.
    ///
    /// This never touches the filesystem.
    pub fn from_parts(group_id: Option<u32>, path: Option<PathBuf>) -> Result<Self> {
        match (group_id, path) {
            (Some(id), None) => Ok(SimulationRef::ByGroupId(id)),
            (None, Some(path)) if !path.as_os_str().is_empty() => Ok(SimulationRef::ByPath(path)),
            (Some(_), Some(_)) => {
                Err(SimvalError::Usage("provide a group id or a simulation file, not both".into()))
            }
            _ => Err(SimvalError::Usage(
                "provide at least a group id or a simulation file".into(),
            )),
        }
    }

    pub fn path(path: impl Into<PathBuf>) -> Self {
        SimulationRef::ByPath(path.into())
    }
}

impl From<u32> for SimulationRef {
    fn from(id: u32) -> Self {
        SimulationRef::ByGroupId(id)
    }
}

impl From<PathBuf> for SimulationRef {
    fn from(path: PathBuf) -> Self {
        SimulationRef::ByPath(path)
    }
}

impl From<&Path> for SimulationRef {
    fn from(path: &Path) -> Self {
        SimulationRef::ByPath(path.to_path_buf())
    }
}

impl From<&str> for SimulationRef {
    fn from(path: &str) -> Self {
        SimulationRef::ByPath(PathBuf::from(path))
    }
}

impl fmt::Display for SimulationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationRef::ByGroupId(id) => write!(f, "group {id}"),
            SimulationRef::ByPath(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Group id encoded in a test module file name such as `test_group15.rs`.
///
/// ```rust
/// use simval::group_id_from_test_name;
///
/// assert_eq!(group_id_from_test_name("tests/test_group07.rs").unwrap(), 7);
/// assert!(group_id_from_test_name("tests/helpers.rs").is_err());
/// ```
pub fn group_id_from_test_name(name: &str) -> Result<u32> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let regex = RE.get_or_init(|| {
        Regex::new(r"(?:^|[/\\])test_group(\d{2})\.\w+$")
            .expect("internal built-in regex must compile")
    });

    regex
        .captures(name)
        .and_then(|caps| caps[1].parse().ok())
        .ok_or_else(|| SimvalError::Usage(format!("not a test file: \"{name}\"")))
}
