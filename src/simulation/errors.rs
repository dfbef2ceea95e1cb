//! Errors for point-process simulation (window/batch validation, normalizer
//! checks, stopping-policy configuration, and divergence detection).
//!
//! This module defines the simulation error type, [`SimError`], used across
//! the stepper contract and the autoregressive unroll engine. It implements
//! `Display`/`Error` and is surfaced through the [`SimResult`] alias.
//!
//! ## Conventions
//! - **Indices are 0-based** and name the offending trajectory/step where
//!   available, so callers can locate the failing batch member.
//! - Gaps and timestamps must be **finite**; a non-finite prediction is a
//!   model divergence, reported as [`SimError::DivergedSimulation`] rather
//!   than propagated into downstream bisection.
//! - Structural mismatches (batch sizes, window lengths, hidden-state
//!   widths) are configuration errors detected before the unroll starts.

/// Crate-wide result alias for simulation operations that may produce
/// [`SimError`].
pub type SimResult<T> = Result<T, SimError>;

/// Unified error type for the simulation stack.
///
/// Covers input/shape validation for gap windows and hidden states,
/// normalizer construction, stopping-policy configuration, and runtime
/// divergence or non-termination of the autoregressive unroll.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    // ---- Input/shape validation ----
    /// Gap window has zero rows or zero columns.
    EmptyWindow { batch: usize, window_len: usize },

    /// A gap-window entry is NaN/±inf.
    NonFiniteWindowEntry { trajectory: usize, position: usize, value: f64 },

    /// Batch size of an input does not match the gap window's batch size.
    BatchSizeMismatch { expected: usize, actual: usize },

    /// Hidden state width does not match the stepper's declared hidden size.
    HiddenSizeMismatch { expected: usize, actual: usize },

    /// Stepper output has the wrong shape for the current window.
    StepOutputShapeMismatch { expected: (usize, usize), actual: (usize, usize) },

    // ---- Normalizer validation ----
    /// Gap normalizer scale must be finite and non-zero.
    InvalidGapScale { value: f64 },

    /// Gap normalizer shift must be finite.
    InvalidGapShift { value: f64 },

    /// Count normalizer standard deviation must be finite and > 0.
    InvalidCountStd { value: f64 },

    /// Count normalizer mean must be finite.
    InvalidCountMean { value: f64 },

    // ---- Stopping-policy configuration ----
    /// Maximum step bound must be >= 1.
    InvalidMaxSteps { value: usize },

    /// A boundary time is NaN/±inf.
    NonFiniteBoundary { trajectory: usize, value: f64 },

    /// Target counts are empty, so no steps can be planned.
    EmptyTargets,

    // ---- Runtime invariants ----
    /// A predicted gap or timestamp became non-finite during the unroll.
    DivergedSimulation { trajectory: usize, step: usize, value: f64 },

    /// The boundary loop exceeded the configured safety bound.
    MaxStepsExceeded { max_steps: usize },
}

impl std::error::Error for SimError {}

impl std::fmt::Display for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input/shape validation ----
            SimError::EmptyWindow { batch, window_len } => {
                write!(f, "Gap window must be non-empty; got shape ({batch}, {window_len}).")
            }
            SimError::NonFiniteWindowEntry { trajectory, position, value } => {
                write!(
                    f,
                    "Gap window entry at trajectory {trajectory}, position {position} is non-finite: {value}"
                )
            }
            SimError::BatchSizeMismatch { expected, actual } => {
                write!(f, "Batch size mismatch: expected {expected}, got {actual}")
            }
            SimError::HiddenSizeMismatch { expected, actual } => {
                write!(f, "Hidden state width mismatch: expected {expected}, got {actual}")
            }
            SimError::StepOutputShapeMismatch { expected, actual } => {
                write!(
                    f,
                    "Stepper output shape mismatch: expected {expected:?}, got {actual:?}"
                )
            }
            // ---- Normalizer validation ----
            SimError::InvalidGapScale { value } => {
                write!(f, "Gap normalizer scale must be finite and non-zero; got: {value}")
            }
            SimError::InvalidGapShift { value } => {
                write!(f, "Gap normalizer shift must be finite; got: {value}")
            }
            SimError::InvalidCountStd { value } => {
                write!(
                    f,
                    "Count normalizer standard deviation must be finite and > 0; got: {value}"
                )
            }
            SimError::InvalidCountMean { value } => {
                write!(f, "Count normalizer mean must be finite; got: {value}")
            }
            // ---- Stopping-policy configuration ----
            SimError::InvalidMaxSteps { value } => {
                write!(f, "Maximum step bound must be at least 1; got: {value}")
            }
            SimError::NonFiniteBoundary { trajectory, value } => {
                write!(f, "Boundary time for trajectory {trajectory} is non-finite: {value}")
            }
            SimError::EmptyTargets => {
                write!(f, "Target counts are empty; nothing to simulate.")
            }
            // ---- Runtime invariants ----
            SimError::DivergedSimulation { trajectory, step, value } => {
                write!(
                    f,
                    "Simulation diverged at trajectory {trajectory}, step {step}: non-finite value {value}"
                )
            }
            SimError::MaxStepsExceeded { max_steps } => {
                write!(
                    f,
                    "Boundary simulation exceeded the safety bound of {max_steps} steps; \
                     the model may be predicting non-advancing gaps"
                )
            }
        }
    }
}
