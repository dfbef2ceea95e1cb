//! Errors for bin alignment (boundary validation, rescaling, partitioning,
//! and boundary jitter).
//!
//! This module defines [`AlignError`], surfaced through the [`AlignResult`]
//! alias, for the layer that maps raw simulated timestamps onto true bin
//! boundaries and partitions trajectories by predicted per-bin counts.
//!
//! ## Conventions
//! - **Indices are 0-based** and name the offending trajectory so callers
//!   can locate the failing batch member.
//! - Bin boundaries must be finite with `end > start`; a zero-width source
//!   bin makes the affine rescale undefined and is reported rather than
//!   producing infinities.
//! - Asking for more events than a trajectory holds is a contract violation
//!   by the count model's caller, reported as [`AlignError::CountOutOfRange`]
//!   instead of a slicing panic.

/// Result alias for alignment operations that may produce [`AlignError`].
pub type AlignResult<T> = Result<T, AlignError>;

/// Unified error type for the bin-alignment layer.
#[derive(Debug, Clone, PartialEq)]
pub enum AlignError {
    /// Per-trajectory input lengths disagree (bounds, counts, valid lengths).
    LengthMismatch { expected: usize, actual: usize },

    /// A bin boundary is NaN/±inf.
    NonFiniteBound { start: f64, end: f64 },

    /// A bin's end does not lie strictly after its start.
    EmptyBin { start: f64, end: f64 },

    /// The source bin of an affine rescale has zero width for a trajectory.
    DegenerateSourceBin { trajectory: usize },

    /// A requested event count exceeds the events available in a trajectory.
    CountOutOfRange { trajectory: usize, count: usize, available: usize },

    /// A timestamp handed to alignment is NaN/±inf.
    NonFiniteTime { trajectory: usize, value: f64 },

    /// Jitter asked to place a bin edge inside a non-positive gap.
    ReversedJitterGap { last_known: f64, candidate: f64 },
}

impl std::error::Error for AlignError {}

impl std::fmt::Display for AlignError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlignError::LengthMismatch { expected, actual } => {
                write!(f, "Per-trajectory input length mismatch: expected {expected}, got {actual}")
            }
            AlignError::NonFiniteBound { start, end } => {
                write!(f, "Bin boundary must be finite; got ({start}, {end})")
            }
            AlignError::EmptyBin { start, end } => {
                write!(f, "Bin end must lie strictly after its start; got ({start}, {end})")
            }
            AlignError::DegenerateSourceBin { trajectory } => {
                write!(
                    f,
                    "Source bin for trajectory {trajectory} has zero width; affine rescale is undefined"
                )
            }
            AlignError::CountOutOfRange { trajectory, count, available } => {
                write!(
                    f,
                    "Trajectory {trajectory} holds {available} events but {count} were requested"
                )
            }
            AlignError::NonFiniteTime { trajectory, value } => {
                write!(f, "Timestamp for trajectory {trajectory} is non-finite: {value}")
            }
            AlignError::ReversedJitterGap { last_known, candidate } => {
                write!(
                    f,
                    "Jitter gap must be positive; last known time {last_known} is not before candidate {candidate}"
                )
            }
        }
    }
}
