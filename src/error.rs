//! Error types for cross-entropy optimization.
//!
//! Configuration and state errors are raised synchronously to the caller
//! that triggered them. Objective failures are carried through
//! [`StepError::Objective`] untouched.

use thiserror::Error;

/// Main error type for optimizer operations.
///
/// # Examples
///
/// ```
/// use crossent::error::CemError;
///
/// let err = CemError::DimensionMismatch { expected: 3, actual: 2 };
/// assert!(err.to_string().contains("dimension mismatch"));
/// ```
#[derive(Debug, Error)]
pub enum CemError {
    /// A configuration value violates its constraint.
    #[error("invalid configuration: {param} = {value}, expected {constraint}")]
    InvalidConfiguration {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// A vector does not match the dimensionality of the search space.
    #[error("dimension mismatch: expected {expected} components, got {actual}")]
    DimensionMismatch {
        /// Dimensionality of the search space
        expected: usize,
        /// Length of the supplied vector
        actual: usize,
    },

    /// The optimizer was used before `init`.
    #[error("illegal state: {0}")]
    IllegalState(String),

    /// Checkpoint written by a newer format revision.
    #[error("unsupported checkpoint version: found {found}, max supported {supported}")]
    UnsupportedVersion {
        /// Version found in the record
        found: u32,
        /// Highest version this build reads
        supported: u32,
    },

    /// Checkpoint encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error while reading or writing a checkpoint.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CemError {
    /// Shorthand for [`CemError::InvalidConfiguration`].
    pub fn invalid_config(
        param: impl Into<String>,
        value: impl ToString,
        constraint: impl Into<String>,
    ) -> Self {
        Self::InvalidConfiguration {
            param: param.into(),
            value: value.to_string(),
            constraint: constraint.into(),
        }
    }

    /// Error for calls that need an initialized optimizer.
    pub fn not_initialized(operation: &str) -> Self {
        Self::IllegalState(format!("`{operation}` called before `init`"))
    }
}

impl From<serde_json::Error> for CemError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for optimizer operations.
pub type Result<T> = std::result::Result<T, CemError>;

/// Failure of a single optimization step.
///
/// Either the optimizer refused to run, or the objective function
/// reported an error while scoring the population. In the latter case the
/// partially evaluated population is discarded and the distribution is
/// left untouched.
#[derive(Debug, Error)]
pub enum StepError<E> {
    /// The optimizer itself rejected the call.
    #[error(transparent)]
    Optimizer(#[from] CemError),

    /// The objective function failed; the error is passed through as-is.
    #[error("objective evaluation failed: {0}")]
    Objective(E),
}

impl<E> StepError<E> {
    /// Returns the objective's error, if that is what failed.
    pub fn into_objective(self) -> Option<E> {
        match self {
            Self::Objective(e) => Some(e),
            Self::Optimizer(_) => None,
        }
    }
}
