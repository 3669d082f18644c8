//! Labelled extraction patterns over summary report text.
//!
//! Reports are line oriented with one metric per line:
//!
//! ```text
//! Cell Count: 16745
//! Report -> Pressure Drop: 8.0329
//! Scene -> Pressure -> Scalar MIN: -11.1
//! Iteration: 90
//! Time: 0.25
//! Part -> Unite: 11 Part Surfaces
//! ```
//!
//! Each [`Pattern`] compiles to a regex with exactly one capture group. Only
//! the first matching line is used.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CheckError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneStat {
    #[serde(rename = "MIN")]
    Min,
    #[serde(rename = "MAX")]
    Max,
}

impl SceneStat {
    pub fn as_str(self) -> &'static str {
        match self {
            SceneStat::Min => "MIN",
            SceneStat::Max => "MAX",
        }
    }
}

impl fmt::Display for SceneStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pattern template bound to its keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Pattern {
    /// `<Key> Count: n`, e.g. cells, faces or vertices.
    Count { key: String },
    /// `Report -> <Name>: n`
    Report { name: String },
    /// `Scene -> <Scene> -> <Displayer> <MIN|MAX>: n`, optionally with one
    /// extra `-> <Word>` segment between scene and displayer.
    Scene { scene: String, displayer: String, stat: SceneStat },
    /// `Iteration: n` (digits only)
    Iteration,
    /// `Time: n`
    Time,
    /// `Part -> <Name>: n Part...`, the surface count of a part.
    PartSurfaces { part: String },
    /// A raw regex with exactly one capture group.
    Custom { expression: String },
}

impl Pattern {
    pub fn count(key: impl Into<String>) -> Self {
        Pattern::Count { key: key.into() }
    }

    pub fn report(name: impl Into<String>) -> Self {
        Pattern::Report { name: name.into() }
    }

    pub fn scene(scene: impl Into<String>, displayer: impl Into<String>, stat: SceneStat) -> Self {
        Pattern::Scene { scene: scene.into(), displayer: displayer.into(), stat }
    }

    pub fn part_surfaces(part: impl Into<String>) -> Self {
        Pattern::PartSurfaces { part: part.into() }
    }

    pub fn custom(expression: impl Into<String>) -> Self {
        Pattern::Custom { expression: expression.into() }
    }

    /// Regex source for this pattern. Keys are escaped, so report and part
    /// names may contain regex metacharacters such as `+`.
    pub fn expression(&self) -> String {
        match self {
            Pattern::Count { key } => format!(r"{} Count:\s(.*)$", regex::escape(key)),
            Pattern::Report { name } => format!(r"Report -> {}:\s(.*)$", regex::escape(name)),
            Pattern::Scene { scene, displayer, stat } => format!(
                r"Scene -> {} -> (?:\w+ -> )?{} {}:\s(.*)$",
                regex::escape(scene),
                regex::escape(displayer),
                stat
            ),
            Pattern::Iteration => r"Iteration:\s(\d+)".to_string(),
            Pattern::Time => r"Time:\s(.*)$".to_string(),
            Pattern::PartSurfaces { part } => {
                format!(r"Part -> {}:\s(\d+) Part", regex::escape(part))
            }
            Pattern::Custom { expression } => expression.clone(),
        }
    }

    pub fn compile(&self) -> Result<Regex, CheckError> {
        Ok(Regex::new(&format!("(?m){}", self.expression()))?)
    }

    /// Short human label used in diagnostic lines.
    pub fn label(&self) -> String {
        match self {
            Pattern::Count { key } => format!("{key} Count"),
            Pattern::Report { name } => format!("Report {name}"),
            Pattern::Scene { scene, displayer, stat } => {
                format!("Scene {scene} -> {displayer} {stat}")
            }
            Pattern::Iteration => "Iteration".to_string(),
            Pattern::Time => "Time".to_string(),
            Pattern::PartSurfaces { part } => format!("Part Surfaces Count {part}"),
            Pattern::Custom { expression } => expression.clone(),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression())
    }
}

/// Pull the first scalar matched by `pattern` out of `text`.
pub fn extract(pattern: &Pattern, text: &str) -> Result<f64, CheckError> {
    let regex = pattern.compile()?;
    let captures = regex
        .captures(text)
        .ok_or_else(|| CheckError::PatternNotFound { pattern: pattern.expression() })?;
    let raw = captures.get(1).map(|m| m.as_str()).unwrap_or_default().trim();

    raw.parse::<f64>().map_err(|_| CheckError::InvalidNumber {
        pattern: pattern.expression(),
        value: raw.to_string(),
    })
}

/// Like [`extract`], truncating toward zero.
pub fn extract_int(pattern: &Pattern, text: &str) -> Result<i64, CheckError> {
    Ok(extract(pattern, text)?.trunc() as i64)
}
