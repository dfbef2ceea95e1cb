//! Autoregressive unroll engine for recurrent point-process models.
//!
//! Purpose
//! -------
//! Repeatedly drive a [`PointProcessStepper`] to generate synthetic future
//! event timestamps, either until every trajectory has crossed a time
//! boundary or until each trajectory has produced a target number of events.
//! This is the discrete-event core of the forecasting pipeline: it owns the
//! sliding-window mechanics, the per-trajectory masking of finished
//! trajectories, and the hidden-state carry between simulation segments.
//!
//! Key behaviors
//! -------------
//! - The seed timestamp for a segment is derived from the input window's
//!   last (already-known) gap: `t_0 = anchor + denorm(last_gap)`.
//! - [`Simulator::simulate_until_boundary`] continues **while any**
//!   trajectory's latest timestamp is below its boundary; trajectories that
//!   cross early keep being stepped, so output deliberately over-generates
//!   past individual boundaries and must be trimmed by bisection downstream.
//! - [`Simulator::simulate_with_target_count`] runs exactly `max(targets)`
//!   iterations. Once a trajectory's step index reaches its target its
//!   predicted gap is zeroed (so it stops advancing time) and its hidden
//!   state is frozen at the value from the step at which the target was
//!   reached — a snapshot-before-conditional-update selection, not an
//!   in-place overwrite.
//! - Non-finite predictions abort the run with
//!   [`SimError::DivergedSimulation`]; the boundary loop additionally
//!   enforces [`SimOptions::max_steps`] so a non-advancing model cannot
//!   loop forever.
//!
//! Invariants & assumptions
//! ------------------------
//! - Gaps predicted by the model are almost-surely positive (guaranteed by
//!   the intensity family's support); the engine does not reorder
//!   timestamps.
//! - Hidden states are value snapshots; no trajectory's simulation mutates
//!   another's state.
//!
//! Downstream usage
//! ----------------
//! - Boundary-driven output feeds range queries directly (after trimming).
//! - Count-driven output feeds the bin aligner, which partitions it by the
//!   per-bin count predictions and rescales onto true bin boundaries.
//! - The returned hidden state resumes simulation for the next forecast bin
//!   without resetting context.
use ndarray::{Array1, Array2, ArrayView1};

use crate::simulation::core::{
    batch::SimulatedBatch,
    normalizer::GapNormalizer,
    options::{SimOptions, StopPolicy},
    stepper::{HiddenState, PointProcessStepper},
    window::GapWindow,
};
use crate::simulation::errors::{SimError, SimResult};

/// Simulator — drives a stepper under a stopping policy.
///
/// Purpose
/// -------
/// Bundle a stepper reference with the gap normalizer and engine options so
/// call sites can run repeated simulation segments with consistent
/// configuration.
///
/// Notes
/// -----
/// - The simulator borrows the stepper immutably; steppers are required to
///   be snapshot-valued, so one stepper can back many simulators.
pub struct Simulator<'a, S: PointProcessStepper> {
    stepper: &'a S,
    normalizer: GapNormalizer,
    options: SimOptions,
}

impl<'a, S: PointProcessStepper> Simulator<'a, S> {
    /// Construct a simulator over a stepper with the given normalizer and
    /// options.
    pub fn new(stepper: &'a S, normalizer: GapNormalizer, options: SimOptions) -> Self {
        Simulator { stepper, normalizer, options }
    }

    /// Unroll until every trajectory's latest timestamp has crossed its
    /// boundary.
    ///
    /// Parameters
    /// ----------
    /// - `anchor_times`: last observed absolute timestamp per trajectory.
    /// - `window`: encoder context of normalized gaps, newest at the end.
    /// - `boundaries`: per-trajectory boundary times on the true time axis.
    /// - `initial_state`: hidden state returned by a previous segment, or
    ///   `None` to start from the model's zero state.
    ///
    /// Returns
    /// -------
    /// SimResult<SimulatedBatch>
    ///   Stacked gaps/timestamps (all columns meaningful — over-generation
    ///   past individual boundaries is intentional) and the final hidden
    ///   state.
    ///
    /// Errors
    /// ------
    /// - `SimError::BatchSizeMismatch` / `HiddenSizeMismatch` on shape
    ///   disagreements.
    /// - `SimError::DivergedSimulation` on a non-finite prediction.
    /// - `SimError::MaxStepsExceeded` when the loop outlives
    ///   `SimOptions::max_steps`.
    pub fn simulate_until_boundary(
        &self, anchor_times: ArrayView1<f64>, window: &GapWindow, boundaries: ArrayView1<f64>,
        initial_state: Option<&HiddenState>,
    ) -> SimResult<SimulatedBatch> {
        let policy = StopPolicy::any_below_boundary(boundaries.to_owned())?;
        self.unroll(anchor_times, window, &policy, initial_state)
    }

    /// Unroll for `max(targets)` steps, masking each trajectory once it has
    /// produced its target number of events.
    ///
    /// Parameters
    /// ----------
    /// - `anchor_times`: last observed absolute timestamp per trajectory.
    /// - `window`: encoder context of normalized gaps, newest at the end.
    /// - `targets`: accepted-event budget per trajectory (typically the
    ///   count model's denormalized per-bin predictions).
    /// - `initial_state`: hidden state from a previous segment, or `None`.
    ///
    /// Returns
    /// -------
    /// SimResult<SimulatedBatch>
    ///   For trajectory `i`, `valid_lens[i] = targets[i] + 1`: the seed
    ///   timestamp, the `targets[i] - 1` further in-bin events, and the
    ///   first event past the target (used downstream to estimate where the
    ///   bin edge falls). Gap columns past the target hold exactly `0.0`
    ///   and timestamp columns repeat the last accepted value.
    pub fn simulate_with_target_count(
        &self, anchor_times: ArrayView1<f64>, window: &GapWindow, targets: &[usize],
        initial_state: Option<&HiddenState>,
    ) -> SimResult<SimulatedBatch> {
        let policy = StopPolicy::fixed_step_count(targets.to_vec())?;
        self.unroll(anchor_times, window, &policy, initial_state)
    }

    // ---- Shared unroll ----------------------------------------------------

    /// One loop, two stopping rules. The policy variant decides both the
    /// continuation condition and the per-step acceptance mask; everything
    /// else (step, validate, slide, denormalize, append) is common.
    fn unroll(
        &self, anchor_times: ArrayView1<f64>, window: &GapWindow, policy: &StopPolicy,
        initial_state: Option<&HiddenState>,
    ) -> SimResult<SimulatedBatch> {
        let batch = window.batch();
        self.check_shapes(anchor_times, window, policy, initial_state)?;

        // Seed timestamp from the window's own last gap.
        let seed_gaps = self.normalizer.denormalize_batch(window.last().view());
        let mut latest_times = &anchor_times + &seed_gaps;
        for (trajectory, &t) in latest_times.iter().enumerate() {
            if !t.is_finite() {
                return Err(SimError::DivergedSimulation { trajectory, step: 0, value: t });
            }
        }

        let mut times_cols: Vec<Array1<f64>> = vec![latest_times.clone()];
        let mut gaps_cols: Vec<Array1<f64>> = Vec::new();
        let mut work_window = window.clone();
        let mut carried: HiddenState = match initial_state {
            Some(state) => state.clone(),
            None => Array2::zeros((batch, self.stepper.hidden_size())),
        };
        let mut started = initial_state.is_some();

        let step_budget = match policy {
            StopPolicy::AnyBelowBoundary { .. } => self.options.max_steps,
            StopPolicy::FixedStepCount { targets } => {
                targets.iter().copied().max().unwrap_or(0)
            }
        };

        let mut step = 0;
        loop {
            match policy {
                StopPolicy::AnyBelowBoundary { boundaries } => {
                    let any_below = latest_times
                        .iter()
                        .zip(boundaries.iter())
                        .any(|(&t, &b)| t < b);
                    if !any_below {
                        break;
                    }
                    if step >= step_budget {
                        return Err(SimError::MaxStepsExceeded {
                            max_steps: self.options.max_steps,
                        });
                    }
                }
                StopPolicy::FixedStepCount { .. } => {
                    if step >= step_budget {
                        break;
                    }
                }
            }

            let hidden_arg = if started { Some(&carried) } else { None };
            let out = self.stepper.step(&work_window, hidden_arg)?;
            out.validate_against(&work_window)?;

            let newest_norm = out.gaps_pred.column(work_window.len() - 1).to_owned();
            let active: Vec<bool> = match policy {
                StopPolicy::AnyBelowBoundary { .. } => vec![true; batch],
                StopPolicy::FixedStepCount { targets } => {
                    targets.iter().map(|&target| step < target).collect()
                }
            };

            for (trajectory, &g) in newest_norm.iter().enumerate() {
                if active[trajectory] && !g.is_finite() {
                    return Err(SimError::DivergedSimulation { trajectory, step, value: g });
                }
            }

            // Masked trajectories slide a zero gap into the window and keep
            // their previous hidden state (one-step-lookback freeze).
            let masked_norm = Array1::from_shape_fn(batch, |i| {
                if active[i] {
                    newest_norm[i]
                } else {
                    0.0
                }
            });
            work_window.slide(masked_norm.view())?;

            let mut next_hidden = out.hidden_state;
            for (i, &is_active) in active.iter().enumerate() {
                if !is_active {
                    let frozen = carried.row(i).to_owned();
                    next_hidden.row_mut(i).assign(&frozen);
                }
            }
            carried = next_hidden;
            started = true;

            let mut gap_col = Array1::zeros(batch);
            let mut time_col = latest_times.clone();
            for i in 0..batch {
                if active[i] {
                    let gap = self.normalizer.denormalize(newest_norm[i]);
                    let t = latest_times[i] + gap;
                    if !t.is_finite() {
                        return Err(SimError::DivergedSimulation {
                            trajectory: i,
                            step,
                            value: t,
                        });
                    }
                    gap_col[i] = gap;
                    time_col[i] = t;
                }
            }
            gaps_cols.push(gap_col);
            latest_times = time_col.clone();
            times_cols.push(time_col);
            step += 1;
        }

        let valid_lens = match policy {
            StopPolicy::AnyBelowBoundary { .. } => vec![times_cols.len(); batch],
            StopPolicy::FixedStepCount { targets } => {
                targets.iter().map(|&target| target + 1).collect()
            }
        };

        Ok(SimulatedBatch {
            gaps: stack_columns(batch, &gaps_cols),
            times: stack_columns(batch, &times_cols),
            valid_lens,
            hidden_state: carried,
        })
    }

    fn check_shapes(
        &self, anchor_times: ArrayView1<f64>, window: &GapWindow, policy: &StopPolicy,
        initial_state: Option<&HiddenState>,
    ) -> SimResult<()> {
        let batch = window.batch();
        if anchor_times.len() != batch {
            return Err(SimError::BatchSizeMismatch { expected: batch, actual: anchor_times.len() });
        }
        if policy.batch() != batch {
            return Err(SimError::BatchSizeMismatch { expected: batch, actual: policy.batch() });
        }
        if let Some(state) = initial_state {
            if state.nrows() != batch {
                return Err(SimError::BatchSizeMismatch { expected: batch, actual: state.nrows() });
            }
            if state.ncols() != self.stepper.hidden_size() {
                return Err(SimError::HiddenSizeMismatch {
                    expected: self.stepper.hidden_size(),
                    actual: state.ncols(),
                });
            }
        }
        Ok(())
    }
}

/// Stack per-step column vectors into a `[batch, steps]` matrix.
fn stack_columns(batch: usize, cols: &[Array1<f64>]) -> Array2<f64> {
    Array2::from_shape_fn((batch, cols.len()), |(i, j)| cols[j][i])
}
