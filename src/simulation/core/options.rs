//! Simulation options and stopping policies.
//!
//! Purpose
//! -------
//! Collect the configuration for the autoregressive unroll in one place: the
//! safety bound on loop length, and the tagged stopping policy that decides
//! when a trajectory stops accepting events.
//!
//! Key behaviors
//! -------------
//! - [`SimOptions`] validates the maximum step bound at construction and
//!   supplies a conservative default.
//! - [`StopPolicy`] names the two stopping rules as an explicit tagged
//!   variant — the boundary rule continues **while any** trajectory is below
//!   its boundary; the fixed-count rule runs a precomputed number of
//!   iterations and masks finished trajectories. The two are deliberately
//!   never merged into one condition.
//!
//! Invariants & assumptions
//! ------------------------
//! - `SimOptions::max_steps >= 1`.
//! - Boundary times are finite per trajectory (checked at policy
//!   construction).
//! - The fixed-count policy's iteration budget is `max(targets)`;
//!   trajectories needing fewer steps are masked to no-ops, not stopped
//!   early.
use ndarray::Array1;

use crate::simulation::errors::{SimError, SimResult};

/// Default safety bound on boundary-driven unroll length.
pub const DEFAULT_MAX_STEPS: usize = 10_000;

/// SimOptions — engine-level configuration for a simulation run.
///
/// Fields
/// ------
/// - `max_steps`: `usize`
///   Upper bound on boundary-loop iterations. Without it a model predicting
///   non-advancing gaps would loop forever; exceeding the bound is surfaced
///   as [`SimError::MaxStepsExceeded`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimOptions {
    /// Maximum boundary-loop iterations before the run is aborted.
    pub max_steps: usize,
}

impl SimOptions {
    /// Construct validated options with an explicit step bound.
    ///
    /// Errors
    /// ------
    /// - `SimError::InvalidMaxSteps` when `max_steps == 0`.
    pub fn new(max_steps: usize) -> SimResult<Self> {
        if max_steps == 0 {
            return Err(SimError::InvalidMaxSteps { value: max_steps });
        }
        Ok(SimOptions { max_steps })
    }
}

impl Default for SimOptions {
    fn default() -> Self {
        SimOptions { max_steps: DEFAULT_MAX_STEPS }
    }
}

/// StopPolicy — when does a trajectory stop accepting simulated events?
///
/// Purpose
/// -------
/// Name the two stopping rules used by the unroll engine as an explicit
/// tagged variant, so call sites and tests can state which semantics they
/// rely on.
///
/// Key behaviors
/// -------------
/// - `AnyBelowBoundary`: the loop continues while **any** trajectory's
///   latest timestamp is still below its boundary. Trajectories that cross
///   early keep being stepped (intentional over-generation that downstream
///   consumers trim by bisection).
/// - `FixedStepCount`: the loop runs exactly `max(targets)` iterations; a
///   trajectory whose step index has reached its target is masked — its gap
///   is zeroed and its hidden state frozen — rather than removed from the
///   batch.
#[derive(Debug, Clone, PartialEq)]
pub enum StopPolicy {
    /// Continue while any trajectory's latest timestamp is below its
    /// per-trajectory boundary time.
    AnyBelowBoundary {
        /// One boundary time per trajectory, on the true (unnormalized)
        /// time axis.
        boundaries: Array1<f64>,
    },
    /// Run `max(targets)` iterations, masking each trajectory once its
    /// accepted-event count reaches its target.
    FixedStepCount {
        /// One target event count per trajectory.
        targets: Vec<usize>,
    },
}

impl StopPolicy {
    /// Build the boundary policy, validating finiteness of every boundary.
    ///
    /// Errors
    /// ------
    /// - `SimError::NonFiniteBoundary` naming the first offending
    ///   trajectory.
    pub fn any_below_boundary(boundaries: Array1<f64>) -> SimResult<Self> {
        for (trajectory, &value) in boundaries.iter().enumerate() {
            if !value.is_finite() {
                return Err(SimError::NonFiniteBoundary { trajectory, value });
            }
        }
        Ok(StopPolicy::AnyBelowBoundary { boundaries })
    }

    /// Build the fixed-count policy.
    ///
    /// Errors
    /// ------
    /// - `SimError::EmptyTargets` when no targets are supplied.
    pub fn fixed_step_count(targets: Vec<usize>) -> SimResult<Self> {
        if targets.is_empty() {
            return Err(SimError::EmptyTargets);
        }
        Ok(StopPolicy::FixedStepCount { targets })
    }

    /// Batch size implied by the policy's per-trajectory data.
    pub fn batch(&self) -> usize {
        match self {
            StopPolicy::AnyBelowBoundary { boundaries } => boundaries.len(),
            StopPolicy::FixedStepCount { targets } => targets.len(),
        }
    }
}
