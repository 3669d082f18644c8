// Shared fixtures for the simval integration tests.
//
// - `Workspace`: a temporary working root with helpers to lay down
//   simulation files, the summary macro and cached summaries
// - `FakeDriver`: a `SimulationDriver` that counts invocations and writes
//   a canned summary instead of launching a process

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use simval::{
    DriverOutcome, DriverRequest, EngineConfig, Result, SimulationDriver, SimvalError,
    artifact_path, config::SUMMARY_MACRO,
};
use tempfile::TempDir;

pub const GRID_SS_SUMMARY: &str = "\
Simulation: Group15_Grid_SS.sim
Cell Count: 16745
Face Count: 50532
Vertex Count: 18240
Part -> Unite: 11 Part Surfaces
Report -> Pressure Drop: 8.0329
Scene -> Pressure -> Scalar MIN: -11.1
Scene -> Pressure -> Scalar MAX: 13.61
Scene -> Vector -> Vector -> Vector MIN: 0.0
Scene -> Vector -> Vector -> Vector MAX: 5.3978
Iteration: 90
Time: 0.25
";

pub struct Workspace {
    pub dir: TempDir,
    pub config: EngineConfig,
}

impl Workspace {
    pub fn new() -> Self {
        simval::logging::init_test_logging();
        let dir = tempfile::tempdir().expect("create temp working root");
        let config = EngineConfig::new(dir.path().join("star"), dir.path());
        Self { dir, config }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.root().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, contents).expect("write fixture file");
        path
    }

    pub fn touch(&self, name: &str) -> PathBuf {
        self.write(name, "")
    }

    /// Write simulation files one after another so creation times increase.
    pub fn simulations(&self, names: &[&str]) -> Vec<PathBuf> {
        names
            .iter()
            .map(|name| {
                let path = self.touch(name);
                thread::sleep(Duration::from_millis(20));
                path
            })
            .collect()
    }

    pub fn with_macro(self) -> Self {
        self.write(SUMMARY_MACRO, "// summary macro\n");
        self
    }

    pub fn cache_summary(&self, sim_name: &str, contents: &str) -> PathBuf {
        let artifact = artifact_path(&self.root().join(sim_name)).expect("artifact path");
        fs::write(&artifact, contents).expect("write summary");
        artifact
    }
}

/// Records every request; optionally writes `summary` to the expected artifact.
#[derive(Default)]
pub struct FakeDriver {
    pub summary: Option<String>,
    pub exit_code: Option<i32>,
    calls: Cell<usize>,
    requests: RefCell<Vec<DriverRequest>>,
}

impl FakeDriver {
    pub fn writing(summary: &str) -> Self {
        Self { summary: Some(summary.to_string()), exit_code: Some(0), ..Self::default() }
    }

    /// Exits cleanly without producing anything.
    pub fn silent() -> Self {
        Self { exit_code: Some(0), ..Self::default() }
    }

    pub fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = Some(code);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn requests(&self) -> Vec<DriverRequest> {
        self.requests.borrow().clone()
    }
}

impl SimulationDriver for FakeDriver {
    fn run(&self, request: &DriverRequest) -> Result<DriverOutcome> {
        self.calls.set(self.calls.get() + 1);
        self.requests.borrow_mut().push(request.clone());

        if let Some(summary) = &self.summary {
            let artifact = artifact_path(&request.sim_file)?;
            fs::write(&artifact, summary).map_err(|e| SimvalError::io(&artifact, e))?;
        }
        Ok(DriverOutcome { exit_code: self.exit_code, timed_out: false })
    }
}
