//! RAII guard for the process working directory.
//!
//! The working directory is process-wide state. Filesystem scans run with
//! the working root as the active directory, and the previous directory has
//! to come back on every exit path, including early returns and panics.
//!
//! # Usage
//!
//! ## Preferred: scoped approach
//!
//! ```rust,no_run
//! use simval::workdir::with_workdir;
//!
//! let sim_files = with_workdir("/data/regression", || {
//!     glob::glob("Group1_*.sim").map(|paths| paths.count())
//! })?;
//! println!("{sim_files} simulation files");
//! # Ok::<(), simval::SimvalError>(())
//! ```
//!
//! ## RAII approach
//!
//! ```rust,no_run
//! use simval::workdir::WorkdirGuard;
//!
//! let guard = WorkdirGuard::enter("/data/regression")?;
//! // relative paths now resolve against /data/regression
//! drop(guard); // previous directory restored
//! # Ok::<(), simval::SimvalError>(())
//! ```
//!
//! Tests that switch directories should still be marked
//! `#[serial(simval_workdir)]`: the internal lock only covers threads of the
//! current process.
use std::{
    cell::Cell,
    env,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, OnceLock},
};

use tracing::{debug, warn};

use crate::error::{Result, SimvalError};

/// Serializes directory switches across threads.
static WORKDIR_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn get_workdir_lock() -> &'static Mutex<()> {
    WORKDIR_LOCK.get_or_init(|| Mutex::new(()))
}

thread_local! {
    /// Set while this thread holds a [`WorkdirGuard`].
    static HELD: Cell<bool> = const { Cell::new(false) };
}

/// Switches the active directory on creation and restores it on drop.
///
/// The guard holds a global lock for its whole lifetime. Entering a second
/// guard on a thread that already holds one is a usage error instead of a
/// deadlock.
#[derive(Debug)]
pub struct WorkdirGuard {
    /// Directory that was active before the switch
    previous: PathBuf,
    /// Directory switched into
    active: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl WorkdirGuard {
    pub fn enter(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        if HELD.get() {
            return Err(SimvalError::Usage(format!(
                "working directory already switched on this thread, cannot enter \"{}\"",
                dir.display()
            )));
        }
        let lock = get_workdir_lock().lock().unwrap_or_else(|e| e.into_inner());

        let previous = env::current_dir().map_err(|source| SimvalError::io(".", source))?;
        env::set_current_dir(dir).map_err(|source| SimvalError::io(dir, source))?;
        debug!("workdir: {} -> {}", previous.display(), dir.display());
        HELD.set(true);

        Ok(Self { previous, active: dir.to_path_buf(), _lock: lock })
    }

    /// The directory that will be restored on drop.
    pub fn previous(&self) -> &Path {
        &self.previous
    }

    pub fn active(&self) -> &Path {
        &self.active
    }
}

impl Drop for WorkdirGuard {
    fn drop(&mut self) {
        HELD.set(false);
        match env::set_current_dir(&self.previous) {
            Ok(()) => debug!("workdir restored: {}", self.previous.display()),
            Err(e) => warn!("failed to restore workdir {}: {}", self.previous.display(), e),
        }
    }
}

/// Run `f` with `dir` as the active directory.
pub fn with_workdir<T, E, F>(dir: impl AsRef<Path>, f: F) -> Result<T>
where
    F: FnOnce() -> std::result::Result<T, E>,
    E: Into<SimvalError>,
{
    let _guard = WorkdirGuard::enter(dir)?;
    f().map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial(simval_workdir)]
    fn missing_directory_leaves_workdir_untouched() {
        let before = env::current_dir().unwrap();
        let err = WorkdirGuard::enter("/definitely/not/a/real/dir").unwrap_err();
        assert!(matches!(err, SimvalError::Io { .. }));
        assert_eq!(env::current_dir().unwrap(), before);
    }
}
