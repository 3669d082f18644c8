//! Named, pre-configured checks.
//!
//! Each assertion fixes an extraction pattern and a default tolerance, reads
//! the report text (given directly or through the [`SummaryProvider`]),
//! extracts one scalar and judges it. Every comparison, passing or not, ends
//! up in the [`AuditTrail`].
//!
//! | Assertion            | Default tolerance |
//! |----------------------|-------------------|
//! | cell/face/vertex     | 0.5% relative     |
//! | part surfaces        | exact             |
//! | iteration            | exact             |
//! | elapsed time         | 0.01% relative    |
//! | report value         | 1% relative       |
//! | scene MIN/MAX        | 1% relative       |
//! | file count           | exact             |
//!
//! ```rust,no_run
//! use simval::{Assertions, Expected, SimulationRef, Source, TolerancePolicy};
//!
//! let mut checks = Assertions::from_env()?;
//! let run = SimulationRef::path("Group15_Grid_SS.sim");
//!
//! checks.assert_cell_count(run.clone(), 16745)?;
//! checks.assert_report(run.clone(), "Pressure Drop", 8.0329)?;
//! checks.assert_iteration(run, Expected::new(90.0).within(TolerancePolicy::relative(0.1)))?;
//! checks.assert_report(Source::text("Report -> Mass Flow: 1.5\n"), "Mass Flow", 1.5)?;
//! # Ok::<(), simval::SimvalError>(())
//! ```

use std::borrow::Cow;

use simval_core::{
    CheckError, Comparison, Pattern, SceneStat, TolerancePolicy, check, extract, extract_int,
};
use tracing::debug;

use crate::audit::AuditTrail;
use crate::config::EngineConfig;
use crate::discovery::{matching_files, picture_glob};
use crate::driver::{ProcessDriver, SimulationDriver};
use crate::error::{Result, SimvalError};
use crate::reference::SimulationRef;
use crate::summary::SummaryProvider;

/// Default tolerance of each assertion.
pub mod defaults {
    use simval_core::TolerancePolicy;

    pub const MESH_COUNT: TolerancePolicy = TolerancePolicy::relative(0.005);
    pub const PART_SURFACES: TolerancePolicy = TolerancePolicy::exact();
    pub const ITERATION: TolerancePolicy = TolerancePolicy::exact();
    pub const TIME: TolerancePolicy = TolerancePolicy::relative(0.0001);
    pub const REPORT: TolerancePolicy = TolerancePolicy::relative(0.01);
    pub const SCENE: TolerancePolicy = TolerancePolicy::relative(0.01);
    pub const FILE_COUNT: TolerancePolicy = TolerancePolicy::exact();
    pub const VALUE: TolerancePolicy = TolerancePolicy::relative(0.01);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshEntity {
    Cell,
    Face,
    Vertex,
}

impl MeshEntity {
    pub fn key(self) -> &'static str {
        match self {
            MeshEntity::Cell => "Cell",
            MeshEntity::Face => "Face",
            MeshEntity::Vertex => "Vertex",
        }
    }
}

/// Expected value, optionally overriding the assertion's default tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Expected {
    pub value: f64,
    pub policy: Option<TolerancePolicy>,
}

impl Expected {
    pub fn new(value: f64) -> Self {
        Self { value, policy: None }
    }

    pub fn within(mut self, policy: TolerancePolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    fn policy_or(&self, default: TolerancePolicy) -> TolerancePolicy {
        self.policy.unwrap_or(default)
    }
}

impl From<f64> for Expected {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<i32> for Expected {
    fn from(value: i32) -> Self {
        Self::new(f64::from(value))
    }
}

impl From<u32> for Expected {
    fn from(value: u32) -> Self {
        Self::new(f64::from(value))
    }
}

impl From<i64> for Expected {
    fn from(value: i64) -> Self {
        Self::new(value as f64)
    }
}

impl From<usize> for Expected {
    fn from(value: usize) -> Self {
        Self::new(value as f64)
    }
}

/// Where report text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source<'a> {
    /// Report text already in hand.
    Text(&'a str),
    /// Cached summary of a simulation run, read without regeneration.
    Simulation(SimulationRef),
}

impl<'a> Source<'a> {
    pub fn text(text: &'a str) -> Self {
        Source::Text(text)
    }
}

impl From<SimulationRef> for Source<'_> {
    fn from(reference: SimulationRef) -> Self {
        Source::Simulation(reference)
    }
}

impl From<u32> for Source<'_> {
    fn from(group_id: u32) -> Self {
        Source::Simulation(SimulationRef::ByGroupId(group_id))
    }
}

pub struct Assertions<D = ProcessDriver> {
    provider: SummaryProvider<D>,
    trail: AuditTrail,
}

impl Assertions<ProcessDriver> {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_provider(SummaryProvider::new(config))
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::with_provider(SummaryProvider::from_env()?))
    }
}

impl<D: SimulationDriver> Assertions<D> {
    pub fn with_provider(provider: SummaryProvider<D>) -> Self {
        Self { provider, trail: AuditTrail::new() }
    }

    pub fn provider(&self) -> &SummaryProvider<D> {
        &self.provider
    }

    pub fn trail(&self) -> &AuditTrail {
        &self.trail
    }

    pub fn into_trail(self) -> AuditTrail {
        self.trail
    }

    pub fn assert_cell_count<'a>(
        &mut self,
        source: impl Into<Source<'a>>,
        expected: impl Into<Expected>,
    ) -> Result<Comparison> {
        self.assert_count(source, MeshEntity::Cell, expected)
    }

    pub fn assert_face_count<'a>(
        &mut self,
        source: impl Into<Source<'a>>,
        expected: impl Into<Expected>,
    ) -> Result<Comparison> {
        self.assert_count(source, MeshEntity::Face, expected)
    }

    pub fn assert_vertex_count<'a>(
        &mut self,
        source: impl Into<Source<'a>>,
        expected: impl Into<Expected>,
    ) -> Result<Comparison> {
        self.assert_count(source, MeshEntity::Vertex, expected)
    }

    pub fn assert_count<'a>(
        &mut self,
        source: impl Into<Source<'a>>,
        entity: MeshEntity,
        expected: impl Into<Expected>,
    ) -> Result<Comparison> {
        let pattern = Pattern::count(entity.key());
        self.assert_pattern(source.into(), &pattern, false, expected.into(), defaults::MESH_COUNT)
    }

    pub fn assert_part_surfaces_count<'a>(
        &mut self,
        source: impl Into<Source<'a>>,
        part: &str,
        expected: impl Into<Expected>,
    ) -> Result<Comparison> {
        let pattern = Pattern::part_surfaces(part);
        self.assert_pattern(
            source.into(),
            &pattern,
            false,
            expected.into(),
            defaults::PART_SURFACES,
        )
    }

    pub fn assert_iteration<'a>(
        &mut self,
        source: impl Into<Source<'a>>,
        expected: impl Into<Expected>,
    ) -> Result<Comparison> {
        self.assert_pattern(
            source.into(),
            &Pattern::Iteration,
            true,
            expected.into(),
            defaults::ITERATION,
        )
    }

    pub fn assert_time<'a>(
        &mut self,
        source: impl Into<Source<'a>>,
        expected: impl Into<Expected>,
    ) -> Result<Comparison> {
        self.assert_pattern(source.into(), &Pattern::Time, false, expected.into(), defaults::TIME)
    }

    pub fn assert_report<'a>(
        &mut self,
        source: impl Into<Source<'a>>,
        report: &str,
        expected: impl Into<Expected>,
    ) -> Result<Comparison> {
        let pattern = Pattern::report(report);
        self.assert_pattern(source.into(), &pattern, false, expected.into(), defaults::REPORT)
    }

    pub fn assert_scene<'a>(
        &mut self,
        source: impl Into<Source<'a>>,
        scene: &str,
        displayer: &str,
        stat: SceneStat,
        expected: impl Into<Expected>,
    ) -> Result<Comparison> {
        let pattern = Pattern::scene(scene, displayer, stat);
        self.assert_pattern(source.into(), &pattern, false, expected.into(), defaults::SCENE)
    }

    pub fn assert_scene_min<'a>(
        &mut self,
        source: impl Into<Source<'a>>,
        scene: &str,
        displayer: &str,
        expected: impl Into<Expected>,
    ) -> Result<Comparison> {
        self.assert_scene(source, scene, displayer, SceneStat::Min, expected)
    }

    pub fn assert_scene_max<'a>(
        &mut self,
        source: impl Into<Source<'a>>,
        scene: &str,
        displayer: &str,
        expected: impl Into<Expected>,
    ) -> Result<Comparison> {
        self.assert_scene(source, scene, displayer, SceneStat::Max, expected)
    }

    /// Count filesystem entries under the working root matching `pattern`.
    /// Zero matches is a count of zero, not an error.
    pub fn assert_files_count(
        &mut self,
        pattern: &str,
        expected: impl Into<Expected>,
    ) -> Result<Comparison> {
        let found = matching_files(self.provider.config(), pattern, false)?;
        let label = format!("glob pattern \"{pattern}\"");
        self.judge(&label, found.len() as f64, expected.into(), defaults::FILE_COUNT)
    }

    pub fn assert_pictures_count(
        &mut self,
        group_id: u32,
        expected: impl Into<Expected>,
    ) -> Result<Comparison> {
        self.assert_files_count(&picture_glob(group_id), expected)
    }

    /// Regenerate the summary of `reference` and require it to be non-empty.
    pub fn assert_summary_written(&mut self, reference: &SimulationRef) -> Result<String> {
        let text = self.provider.get(reference, true)?;
        if text.is_empty() {
            return Err(SimvalError::GenerationFailed {
                artifact: self.provider.resolve(reference)?,
                reason: "summary is empty".into(),
            });
        }
        Ok(text)
    }

    /// Judge a value obtained elsewhere.
    pub fn assert_value(
        &mut self,
        label: &str,
        actual: f64,
        expected: impl Into<Expected>,
    ) -> Result<Comparison> {
        self.judge(label, actual, expected.into(), defaults::VALUE)
    }

    fn text<'s>(&self, source: &Source<'s>) -> Result<Cow<'s, str>> {
        match source {
            Source::Text(text) => Ok(Cow::Borrowed(*text)),
            Source::Simulation(reference) => Ok(Cow::Owned(self.provider.get(reference, false)?)),
        }
    }

    fn assert_pattern(
        &mut self,
        source: Source<'_>,
        pattern: &Pattern,
        integer: bool,
        expected: Expected,
        default: TolerancePolicy,
    ) -> Result<Comparison> {
        let text = self.text(&source)?;
        let actual = if integer {
            extract_int(pattern, &text)? as f64
        } else {
            extract(pattern, &text)?
        };
        debug!("extracted {} = {actual}", pattern.label());
        self.judge(&pattern.label(), actual, expected, default)
    }

    fn judge(
        &mut self,
        label: &str,
        actual: f64,
        expected: Expected,
        default: TolerancePolicy,
    ) -> Result<Comparison> {
        match check(label, actual, expected.value, expected.policy_or(default)) {
            Ok(record) => {
                self.trail.record(record.clone());
                Ok(record)
            }
            Err(CheckError::ToleranceViolation(record)) => {
                self.trail.record((*record).clone());
                Err(CheckError::ToleranceViolation(record).into())
            }
            Err(e) => Err(e.into()),
        }
    }
}
