//! Simulated-batch container — stacked unroll output with explicit valid
//! lengths.
//!
//! Purpose
//! -------
//! Hold the result of one autoregressive unroll: stacked per-trajectory gap
//! and timestamp matrices, an explicit valid length per trajectory, and the
//! final hidden state usable to resume simulation for a subsequent segment.
//!
//! Key behaviors
//! -------------
//! - `times` carries one more column than `gaps`: column 0 is the seed
//!   timestamp derived from the input window's last gap, and column `k + 1`
//!   is the timestamp produced by unroll step `k`.
//! - `valid_lens[i]` is the number of meaningful timestamp columns for
//!   trajectory `i`; entries at or past it are frozen copies of the last
//!   accepted timestamp (count-driven runs) or all meaningful
//!   (boundary-driven runs). An explicit length is used instead of a
//!   timestamp-of-zero padding sentinel, which would be ambiguous for a
//!   legitimately zero timestamp.
//! - Ragged accessors truncate each trajectory to its valid length for
//!   downstream query code that works on sorted slices.
//!
//! Invariants & assumptions
//! ------------------------
//! - `times.ncols() == gaps.ncols() + 1`.
//! - `valid_lens.len() == times.nrows() == gaps.nrows()`.
//! - `1 <= valid_lens[i] <= times.ncols()` for every trajectory.
//! - Within the valid prefix, timestamps are strictly increasing (positive
//!   gaps by construction of the intensity model).
use ndarray::Array2;

use crate::simulation::core::stepper::HiddenState;

/// SimulatedBatch — stacked output of one unroll segment.
///
/// Fields
/// ------
/// - `gaps`: `Array2<f64>` of shape `[batch, steps]`
///   Unnormalized predicted gaps, one column per unroll step. Masked steps
///   (count-driven runs past a trajectory's target) hold exactly `0.0`.
/// - `times`: `Array2<f64>` of shape `[batch, steps + 1]`
///   Absolute predicted timestamps; column 0 is the seed timestamp. Masked
///   steps repeat the last accepted timestamp.
/// - `valid_lens`: `Vec<usize>`
///   Number of meaningful timestamp columns per trajectory.
/// - `hidden_state`: [`HiddenState`]
///   Final recurrent state per trajectory — for trajectories masked before
///   the loop ended, the state frozen at the step their target was reached.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedBatch {
    pub gaps: Array2<f64>,
    pub times: Array2<f64>,
    pub valid_lens: Vec<usize>,
    pub hidden_state: HiddenState,
}

impl SimulatedBatch {
    /// Number of trajectories in the batch.
    #[inline]
    pub fn batch(&self) -> usize {
        self.times.nrows()
    }

    /// Number of unroll steps taken (excluding the seed timestamp).
    #[inline]
    pub fn steps(&self) -> usize {
        self.gaps.ncols()
    }

    /// Per-trajectory timestamps truncated to their valid lengths.
    ///
    /// Returns one sorted `Vec<f64>` per trajectory, ready for bisection
    /// queries.
    pub fn ragged_times(&self) -> Vec<Vec<f64>> {
        self.times
            .rows()
            .into_iter()
            .zip(self.valid_lens.iter())
            .map(|(row, &len)| row.iter().take(len).copied().collect())
            .collect()
    }

    /// Per-trajectory unnormalized gaps truncated to the accepted steps
    /// (`valid_lens[i] - 1` entries, since the seed timestamp has no
    /// corresponding predicted gap).
    pub fn ragged_gaps(&self) -> Vec<Vec<f64>> {
        self.gaps
            .rows()
            .into_iter()
            .zip(self.valid_lens.iter())
            .map(|(row, &len)| row.iter().take(len.saturating_sub(1)).copied().collect())
            .collect()
    }
}
