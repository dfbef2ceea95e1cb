//! Errors for timeline queries (range counting, hierarchical error
//! decomposition, threshold sweeps, and ensemble scoring).
//!
//! This module defines [`QueryError`], surfaced through the [`QueryResult`]
//! alias, for the layer that evaluates simulated timelines against ground
//! truth.
//!
//! ## Conventions
//! - A reversed query interval (`start > end`) is never silently swapped;
//!   it fails fast as [`QueryError::InvalidRange`].
//! - Empty timestamp sequences are legal inputs everywhere (zero counts,
//!   empty slices), never errors.
//! - Replica failures under the exclude-and-report policy are counted, not
//!   dropped; under fail-fast they surface as
//!   [`QueryError::ReplicaFailed`].

/// Result alias for query operations that may produce [`QueryError`].
pub type QueryResult<T> = Result<T, QueryError>;

/// Unified error type for the query layer.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryError {
    /// Query interval has `start > end` or a non-finite endpoint.
    InvalidRange { start: f64, end: f64 },

    /// Per-trajectory input lengths disagree.
    LengthMismatch { expected: usize, actual: usize },

    /// Bin edges for binned counting are not sorted ascending.
    UnsortedEdges { position: usize },

    /// Sliding-window grid parameters are degenerate (non-positive step or
    /// window width, zero points, or a non-finite component).
    InvalidGrid { start: f64, step: f64, num_points: usize, window: f64 },

    /// A reported crossing position lies outside the swept grid.
    PositionOutOfGrid { replica: usize, position: usize, num_positions: usize },

    /// A distribution has no candidate positions to weight.
    EmptyDistribution,

    /// An ensemble replica failed and the fail-fast policy is in force.
    ReplicaFailed { replica: usize, message: String },
}

impl std::error::Error for QueryError {}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryError::InvalidRange { start, end } => {
                write!(f, "Query interval must satisfy start <= end with finite endpoints; got ({start}, {end})")
            }
            QueryError::LengthMismatch { expected, actual } => {
                write!(f, "Per-trajectory input length mismatch: expected {expected}, got {actual}")
            }
            QueryError::UnsortedEdges { position } => {
                write!(f, "Bin edges must be sorted ascending; violation at position {position}")
            }
            QueryError::InvalidGrid { start, step, num_points, window } => {
                write!(
                    f,
                    "Sliding grid is degenerate: start {start}, step {step}, {num_points} points, window {window}"
                )
            }
            QueryError::PositionOutOfGrid { replica, position, num_positions } => {
                write!(
                    f,
                    "Replica {replica} reported crossing position {position}, outside the {num_positions}-point grid"
                )
            }
            QueryError::EmptyDistribution => {
                write!(f, "Distribution has no candidate positions.")
            }
            QueryError::ReplicaFailed { replica, message } => {
                write!(f, "Ensemble replica {replica} failed: {message}")
            }
        }
    }
}
