//! Locating simulation files and counting artifacts under the working root.
//!
//! Every scan runs inside a [`WorkdirGuard`] so glob patterns are always
//! evaluated relative to the working root. Returned paths are joined back
//! onto the working root and stay valid after the guard is gone.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{Result, SimvalError};
use crate::workdir::WorkdirGuard;

/// Glob for the simulation files of a group.
pub fn simulation_glob(group_id: u32) -> String {
    format!("Group{group_id}_*.sim")
}

/// Glob for the pictures rendered for a group.
pub fn picture_glob(group_id: u32) -> String {
    format!("Group{group_id}_*.png")
}

/// Entries matching `pattern` under the working root.
///
/// With `required`, zero matches is a `NotFound` error.
pub fn matching_files(
    config: &EngineConfig,
    pattern: &str,
    required: bool,
) -> Result<Vec<PathBuf>> {
    let found = {
        let _guard = WorkdirGuard::enter(&config.work_root)?;
        let mut found = Vec::new();
        for entry in glob::glob(pattern)? {
            match entry {
                Ok(path) => found.push(path),
                Err(e) => debug!("skipping unreadable entry: {e}"),
            }
        }
        found
    };

    debug!("glob \"{pattern}\": {} match(es)", found.len());
    if required && found.is_empty() {
        return Err(SimvalError::NoMatches { pattern: pattern.to_string() });
    }
    Ok(found.into_iter().map(|path| config.work_root.join(path)).collect())
}

/// Simulation files of a group, oldest first.
///
/// Files are ordered by creation time, falling back to modification time
/// where the platform does not record creation. Names break ties.
pub fn simulations(config: &EngineConfig, group_id: u32) -> Result<Vec<PathBuf>> {
    let pattern = simulation_glob(group_id);
    let files = matching_files(config, &pattern, false)?;
    if files.is_empty() {
        return Err(SimvalError::SimulationNotFound { pattern });
    }

    let mut stamped = files
        .into_iter()
        .map(|path| {
            let created = created_at(&path)?;
            Ok((created, path))
        })
        .collect::<Result<Vec<_>>>()?;
    stamped.sort_by(|(a_time, a_path), (b_time, b_path)| match a_time.cmp(b_time) {
        Ordering::Equal => a_path.cmp(b_path),
        other => other,
    });

    Ok(stamped.into_iter().map(|(_, path)| path).collect())
}

/// Most recently created simulation file of a group.
pub fn latest_simulation(config: &EngineConfig, group_id: u32) -> Result<PathBuf> {
    let mut files = simulations(config, group_id)?;
    let latest = files
        .pop()
        .ok_or_else(|| SimvalError::SimulationNotFound { pattern: simulation_glob(group_id) })?;
    debug!("group {group_id}: latest simulation {}", latest.display());
    Ok(latest)
}

fn created_at(path: &Path) -> Result<SystemTime> {
    let metadata = fs::metadata(path).map_err(|source| SimvalError::io(path, source))?;
    metadata
        .created()
        .or_else(|_| metadata.modified())
        .map_err(|source| SimvalError::io(path, source))
}
