//! Error types for the crossent CLI.

use std::convert::Infallible;
use std::path::PathBuf;
use std::process::ExitCode;

use crossent::{CemError, StepError};
use thiserror::Error;

/// Result type alias for CLI operations
pub(crate) type Result<T> = std::result::Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug)]
pub(crate) enum CliError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Bad flag value or combination
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Unreadable config or checkpoint
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Optimizer rejected the configuration
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other optimizer failure
    #[error("Optimizer error: {0}")]
    Optimizer(String),
}

impl CliError {
    /// Get exit code for this error
    pub(crate) fn exit_code(&self) -> ExitCode {
        match self {
            Self::Optimizer(_) => ExitCode::from(1),
            Self::InvalidArgument(_) => ExitCode::from(2),
            Self::FileNotFound(_) => ExitCode::from(3),
            Self::InvalidFormat(_) => ExitCode::from(4),
            Self::ValidationFailed(_) => ExitCode::from(5),
            Self::Io(_) => ExitCode::from(7),
        }
    }
}

impl From<CemError> for CliError {
    fn from(e: CemError) -> Self {
        match e {
            CemError::Io(io) => Self::Io(io),
            CemError::Serialization(_) | CemError::UnsupportedVersion { .. } => {
                Self::InvalidFormat(e.to_string())
            }
            CemError::InvalidConfiguration { .. } | CemError::DimensionMismatch { .. } => {
                Self::ValidationFailed(e.to_string())
            }
            CemError::IllegalState(_) => Self::Optimizer(e.to_string()),
        }
    }
}

impl From<StepError<Infallible>> for CliError {
    fn from(e: StepError<Infallible>) -> Self {
        match e {
            StepError::Optimizer(e) => e.into(),
            StepError::Objective(never) => match never {},
        }
    }
}

impl From<csv::Error> for CliError {
    fn from(e: csv::Error) -> Self {
        match e.into_kind() {
            csv::ErrorKind::Io(io) => Self::Io(io),
            kind => Self::InvalidFormat(format!("CSV: {kind:?}")),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidFormat(e.to_string())
    }
}
