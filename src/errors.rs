//! Centralized error handling for nd_normalize
//!
//! Every public operation returns [`Result`], so callers can tell a bad axis
//! list apart from a missing fit or a malformed parameter array.

use thiserror::Error;

/// Main error type for normalization operations
#[derive(Debug, Error)]
pub enum NormError {
    /// Parameter arrays supplied to a constructor disagree on their shape
    #[error("inconsistent parameter dimensions: parameter {index} has shape {found:?}, expected {expected:?}")]
    InconsistentParameterDimensions {
        index: usize,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    /// Wrong number of parameter arrays for a normalization family
    #[error("{family} takes {expected} parameter(s), got {found}")]
    ParameterCount {
        family: String,
        expected: usize,
        found: usize,
    },

    /// Operand shapes violate the broadcasting contract of the slice mapper
    #[error("shape mismatch on axis {axis}: expected length {expected}, found {found}")]
    ShapeMismatch {
        axis: usize,
        expected: usize,
        found: usize,
    },

    /// Operand rank differs from the reference array
    #[error("rank mismatch: expected {expected} dimensions, found {found}")]
    RankMismatch { expected: usize, found: usize },

    /// Inverse transform requested before any parameters were fit
    #[error("{family} normalization has not been fit")]
    UnfitNormalization { family: String },

    /// Registry lookup with an unknown family name
    #[error("unknown normalization '{name}'")]
    UnknownNormalization { name: String },

    /// Axis index not valid for the array
    #[error("axis {axis} is out of range for array with {ndim} dimensions")]
    AxisOutOfRange { axis: usize, ndim: usize },

    /// Axis listed more than once
    #[error("axis {axis} is listed more than once")]
    DuplicateAxis { axis: usize },

    /// Thread pool configuration error
    #[error("thread pool error: {0}")]
    ThreadPoolError(String),

    /// Malformed JSON configuration
    #[error("configuration error: {0}")]
    ConfigError(#[from] serde_json::Error),

    /// I/O operation errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Array shape error reported by ndarray
    #[error("array error: {0}")]
    ArrayError(#[from] ndarray::ShapeError),
}

/// Result type alias for normalization operations
pub type Result<T> = std::result::Result<T, NormError>;
