//! Sliding-window threshold sweeps over simulated timelines.
//!
//! Purpose
//! -------
//! Answer "when does the event rate first cross a threshold?": sweep a
//! fixed-size window across the time axis at stepped start points, count the
//! events inside each window placement by bisection, and locate the first
//! placement whose count satisfies the threshold comparison.
//!
//! Key behaviors
//! -------------
//! - "No crossing within the swept range" is `Option::None`, a first-class
//!   outcome — never conflated with a crossing at position 0. Aggregates
//!   over mixed outcomes must exclude the `None` entries and report how
//!   many were excluded ([`threshold_mae`]).
//! - The comparison direction is an explicit tagged variant; at-least and
//!   at-most sweeps are the same scan with a different predicate.
use crate::queries::errors::{QueryError, QueryResult};
use crate::queries::range::{count_in_range, QueryInterval};

/// SlideGrid — the swept placements of a fixed-size window.
///
/// Fields
/// ------
/// - `start`: `f64`
///   Left edge of the first window placement.
/// - `step`: `f64`
///   Distance between consecutive placements (> 0).
/// - `num_points`: `usize`
///   Number of placements swept (>= 1).
/// - `window`: `f64`
///   Width of every placement (> 0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideGrid {
    pub start: f64,
    pub step: f64,
    pub num_points: usize,
    pub window: f64,
}

impl SlideGrid {
    /// Construct a validated sliding grid.
    ///
    /// Errors
    /// ------
    /// - `QueryError::InvalidGrid` for a non-positive step or window width,
    ///   zero placements, or non-finite components.
    pub fn new(start: f64, step: f64, num_points: usize, window: f64) -> QueryResult<Self> {
        let finite = start.is_finite() && step.is_finite() && window.is_finite();
        if !finite || step <= 0.0 || window <= 0.0 || num_points == 0 {
            return Err(QueryError::InvalidGrid { start, step, num_points, window });
        }
        Ok(SlideGrid { start, step, num_points, window })
    }

    /// Left edge of placement `k`.
    #[inline]
    pub fn position(&self, k: usize) -> f64 {
        self.start + self.step * k as f64
    }

    /// The query interval covered by placement `k`.
    pub fn interval(&self, k: usize) -> QueryInterval {
        // start/step/window validated finite and positive at construction.
        QueryInterval { start: self.position(k), end: self.position(k) + self.window }
    }
}

/// Direction of the threshold comparison in a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdDirection {
    /// Crossing when the window count is `>= threshold`.
    AtLeast,
    /// Crossing when the window count is `<= threshold`.
    AtMost,
}

impl ThresholdDirection {
    #[inline]
    fn satisfied(&self, count: usize, threshold: usize) -> bool {
        match self {
            ThresholdDirection::AtLeast => count >= threshold,
            ThresholdDirection::AtMost => count <= threshold,
        }
    }
}

/// Event counts for every window placement of a grid over one trajectory.
pub fn window_counts(sorted_timestamps: &[f64], grid: &SlideGrid) -> Vec<usize> {
    (0..grid.num_points)
        .map(|k| count_in_range(sorted_timestamps, grid.interval(k)))
        .collect()
}

/// First placement index whose count satisfies the threshold comparison.
///
/// Returns `None` when no placement in the swept range crosses; callers
/// aggregating over trajectories must exclude `None` entries rather than
/// treating them as zero.
pub fn first_crossing_position(
    counts_over_slide: &[usize], threshold: usize, direction: ThresholdDirection,
) -> Option<usize> {
    counts_over_slide.iter().position(|&c| direction.satisfied(c, threshold))
}

/// Sweep one trajectory and report the first crossing placement, if any.
pub fn first_crossing_in_sweep(
    sorted_timestamps: &[f64], grid: &SlideGrid, threshold: usize,
    direction: ThresholdDirection,
) -> Option<usize> {
    first_crossing_position(&window_counts(sorted_timestamps, grid), threshold, direction)
}

/// ThresholdMae — crossing-position MAE with explicit exclusion accounting.
///
/// Fields
/// ------
/// - `mae`: `Option<f64>`
///   Mean absolute error over the pairs where both sides reported a
///   crossing; `None` when no such pair exists.
/// - `excluded`: `usize`
///   Number of pairs dropped because either side reported no crossing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdMae {
    pub mae: Option<f64>,
    pub excluded: usize,
}

/// MAE between predicted and true first-crossing positions.
///
/// Pairs where either side is `None` (no crossing in range) are excluded
/// from the mean and counted in [`ThresholdMae::excluded`], so a missing
/// crossing can never masquerade as "crossed at position 0."
///
/// Errors
/// ------
/// - `QueryError::LengthMismatch` when the two slices disagree in length.
pub fn threshold_mae(
    predicted: &[Option<f64>], truth: &[Option<f64>],
) -> QueryResult<ThresholdMae> {
    if predicted.len() != truth.len() {
        return Err(QueryError::LengthMismatch {
            expected: predicted.len(),
            actual: truth.len(),
        });
    }

    let mut total = 0.0;
    let mut kept = 0usize;
    for (p, t) in predicted.iter().zip(truth.iter()) {
        match (p, t) {
            (Some(p), Some(t)) => {
                total += (p - t).abs();
                kept += 1;
            }
            _ => {}
        }
    }

    Ok(ThresholdMae {
        mae: if kept > 0 { Some(total / kept as f64) } else { None },
        excluded: predicted.len() - kept,
    })
}
