//! External simulation driver invocation.
//!
//! The driver is an opaque batch process: it loads a simulation file, plays
//! the summary macro and exits. Whether it worked is decided by the caller
//! from the artifact it should have written; the exit status is only
//! captured for the logs.

use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::{DRIVER_WORKERS, EngineConfig};
use crate::error::{Result, SimvalError};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// One batch run of the summary macro against a simulation file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverRequest {
    pub executable: PathBuf,
    pub macro_file: PathBuf,
    pub sim_file: PathBuf,
    pub work_dir: PathBuf,
    pub workers: u32,
    pub timeout: Option<Duration>,
}

impl DriverRequest {
    pub fn new(config: &EngineConfig, macro_file: &Path, sim_file: &Path) -> Self {
        Self {
            executable: config.driver_executable(),
            macro_file: macro_file.to_path_buf(),
            sim_file: sim_file.to_path_buf(),
            work_dir: config.work_root.clone(),
            workers: DRIVER_WORKERS,
            timeout: config.driver_timeout(),
        }
    }

    /// Arguments passed to the driver, in order.
    pub fn args(&self) -> Vec<String> {
        vec![
            "-batch".to_string(),
            self.macro_file.display().to_string(),
            "-np".to_string(),
            self.workers.to_string(),
            self.sim_file.display().to_string(),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DriverOutcome {
    /// `None` when the process was killed or ended by a signal.
    pub exit_code: Option<i32>,
    pub timed_out: bool,
}

impl DriverOutcome {
    pub fn from_status(status: ExitStatus) -> Self {
        Self { exit_code: status.code(), timed_out: false }
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0) && !self.timed_out
    }
}

/// Runs the summary macro. Implementations block until the run is over.
pub trait SimulationDriver {
    fn run(&self, request: &DriverRequest) -> Result<DriverOutcome>;
}

/// Spawns the real driver binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessDriver;

impl ProcessDriver {
    fn command(request: &DriverRequest) -> Command {
        let mut cmd = Command::new(&request.executable);
        cmd.args(request.args()).current_dir(&request.work_dir).stdin(Stdio::null());
        cmd
    }
}

impl SimulationDriver for ProcessDriver {
    fn run(&self, request: &DriverRequest) -> Result<DriverOutcome> {
        info!(
            "running driver: {} {}",
            request.executable.display(),
            request.args().join(" ")
        );
        let started = Instant::now();

        let mut child = Self::command(request).spawn().map_err(|source| {
            SimvalError::DriverLaunch { program: request.executable.clone(), source }
        })?;

        let outcome = match request.timeout {
            None => {
                let status = child
                    .wait()
                    .map_err(|source| SimvalError::io(&request.executable, source))?;
                DriverOutcome::from_status(status)
            }
            Some(limit) => wait_with_timeout(&mut child, limit, &request.executable)?,
        };

        debug!("driver finished in {:.1}s: {:?}", started.elapsed().as_secs_f64(), outcome);
        Ok(outcome)
    }
}

fn wait_with_timeout(child: &mut Child, limit: Duration, program: &Path) -> Result<DriverOutcome> {
    let deadline = Instant::now() + limit;
    loop {
        if let Some(status) = child.try_wait().map_err(|source| SimvalError::io(program, source))? {
            return Ok(DriverOutcome::from_status(status));
        }
        if Instant::now() >= deadline {
            warn!("driver exceeded {}s, killing pid {}", limit.as_secs(), child.id());
            if let Err(e) = child.kill() {
                warn!("failed to kill driver: {e}");
            }
            let status = child.wait().map_err(|source| SimvalError::io(program, source))?;
            return Ok(DriverOutcome { exit_code: status.code(), timed_out: true });
        }
        thread::sleep(POLL_INTERVAL);
    }
}
