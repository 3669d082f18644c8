use std::io;
use std::path::PathBuf;

use simval_core::CheckError;
use thiserror::Error;

/// Taxonomy bucket of a [`SimvalError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Usage,
    Configuration,
    NotFound,
    GenerationFailed,
    InvalidTolerance,
    ToleranceViolation,
    Io,
}

#[derive(Debug, Error)]
pub enum SimvalError {
    #[error("usage error: {0}")]
    Usage(String),

    #[error("{key} environment variable not defined")]
    MissingEnv { key: &'static str },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to read config file {path}: {source}")]
    ConfigIo { path: PathBuf, source: io::Error },

    #[error("failed to parse config TOML: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("simulation file not found: \"{pattern}\"")]
    SimulationNotFound { pattern: String },

    #[error("file not found: \"{pattern}\"")]
    NoMatches { pattern: String },

    #[error("summary artifact not found: \"{}\"", path.display())]
    ArtifactNotFound { path: PathBuf },

    #[error("macro not found: \"{}\"", path.display())]
    MacroNotFound { path: PathBuf },

    #[error("summary generation failed for {}: {reason}", artifact.display())]
    GenerationFailed { artifact: PathBuf, reason: String },

    #[error("failed to launch simulation driver `{}`: {source}", program.display())]
    DriverLaunch { program: PathBuf, source: io::Error },

    #[error("I/O error on {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    #[error("failed to write audit trail: {0}")]
    Audit(#[from] serde_json::Error),

    #[error(transparent)]
    Check(#[from] CheckError),
}

impl SimvalError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SimvalError::Io { path: path.into(), source }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SimvalError::Usage(_) | SimvalError::Glob(_) => ErrorKind::Usage,
            SimvalError::MissingEnv { .. }
            | SimvalError::Config(_)
            | SimvalError::ConfigIo { .. }
            | SimvalError::ConfigParse(_) => ErrorKind::Configuration,
            SimvalError::SimulationNotFound { .. }
            | SimvalError::NoMatches { .. }
            | SimvalError::ArtifactNotFound { .. }
            | SimvalError::MacroNotFound { .. } => ErrorKind::NotFound,
            SimvalError::GenerationFailed { .. } | SimvalError::DriverLaunch { .. } => {
                ErrorKind::GenerationFailed
            }
            SimvalError::Io { .. } | SimvalError::Audit(_) => ErrorKind::Io,
            SimvalError::Check(check) => match check {
                CheckError::InvalidTolerance { .. } => ErrorKind::InvalidTolerance,
                CheckError::ToleranceViolation(_) => ErrorKind::ToleranceViolation,
                CheckError::PatternNotFound { .. } | CheckError::InvalidNumber { .. } => {
                    ErrorKind::NotFound
                }
                CheckError::InvalidPattern(_) => ErrorKind::Usage,
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, SimvalError>;
