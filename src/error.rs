//! Error types shared by every stage of the pipeline.

use thiserror::Error;

/// Canonical error type for persistence and matching computations.
#[derive(Debug, Error)]
pub enum TdaError {
    /// A caller-supplied parameter is out of its valid range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A diagram holds fewer intervals than the comparison needs.
    #[error("insufficient intervals: required {required}, available {available}")]
    InsufficientIntervals { required: usize, available: usize },

    /// The input geometry cannot support the requested computation.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// The assignment problem is not square.
    #[error("no feasible assignment for a {rows}x{cols} cost matrix")]
    NoFeasibleAssignment { rows: usize, cols: usize },

    /// The Hungarian solver hit its iteration cap.
    #[error("assignment did not converge after {iterations} iterations")]
    AssignmentDidNotConverge { iterations: usize },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A recording row could not be parsed.
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl TdaError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        TdaError::InvalidParameter(message.into())
    }

    pub(crate) fn degenerate(message: impl Into<String>) -> Self {
        TdaError::DegenerateInput(message.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TdaError>;
