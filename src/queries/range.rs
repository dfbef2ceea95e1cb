//! Bisection-based range counting over sorted timelines.
//!
//! Purpose
//! -------
//! Answer "how many events fall in `[start, end]`" and "which events fall in
//! `[start, end]`" over sorted per-trajectory timestamp sequences, using
//! binary search rather than linear scans. These two primitives underpin
//! every downstream metric: hierarchical error decomposition, sliding-window
//! threshold sweeps, and per-bin count extraction.
//!
//! Key behaviors
//! -------------
//! - Boundary ties follow an exclusive-lower, inclusive-upper convention: a
//!   timestamp exactly equal to `start` is excluded, one exactly equal to
//!   `end` is included. Both counting and trimming use the same rank
//!   function so they can never disagree.
//! - Empty sequences are legal: zero count, empty slice.
//!
//! Invariants & assumptions
//! ------------------------
//! - Input sequences are sorted ascending (guaranteed for simulated
//!   trajectories by positive gaps); this is assumed, not checked, in the
//!   hot path.
use crate::queries::errors::{QueryError, QueryResult};

/// QueryInterval — a validated `[start, end]` query range.
///
/// Invariants
/// ----------
/// - Both endpoints are finite and `start <= end`. A reversed interval is a
///   caller bug and is rejected at construction, never swapped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryInterval {
    /// Exclusive lower endpoint (events exactly at `start` are not counted).
    pub start: f64,
    /// Inclusive upper endpoint.
    pub end: f64,
}

impl QueryInterval {
    /// Construct a validated query interval.
    ///
    /// Errors
    /// ------
    /// - `QueryError::InvalidRange` when `start > end` or either endpoint is
    ///   non-finite.
    pub fn new(start: f64, end: f64) -> QueryResult<Self> {
        if !start.is_finite() || !end.is_finite() || start > end {
            return Err(QueryError::InvalidRange { start, end });
        }
        Ok(QueryInterval { start, end })
    }

    /// Midpoint of the interval, used by hierarchical bisection.
    #[inline]
    pub fn midpoint(&self) -> f64 {
        self.start + (self.end - self.start) / 2.0
    }

    /// The two halves of this interval split at its midpoint.
    pub fn bisect(&self) -> (QueryInterval, QueryInterval) {
        let mid = self.midpoint();
        (
            QueryInterval { start: self.start, end: mid },
            QueryInterval { start: mid, end: self.end },
        )
    }
}

/// Rank of `t` in a sorted sequence: the number of elements `<= t`.
#[inline]
fn rank(sorted: &[f64], t: f64) -> usize {
    sorted.partition_point(|&x| x <= t)
}

/// Count events in `(interval.start, interval.end]` by bisection.
///
/// Returns `rank(end) - rank(start)`; an empty sequence yields 0.
pub fn count_in_range(sorted_timestamps: &[f64], interval: QueryInterval) -> usize {
    rank(sorted_timestamps, interval.end) - rank(sorted_timestamps, interval.start)
}

/// Slice the events in `(interval.start, interval.end]` out of a sorted
/// sequence.
///
/// Same bisection as [`count_in_range`], returning the sub-slice instead of
/// its length, so trimmed predicted and true sequences are always compared
/// on the same window.
pub fn trim_to_interval(sorted_timestamps: &[f64], interval: QueryInterval) -> &[f64] {
    let lo = rank(sorted_timestamps, interval.start);
    let hi = rank(sorted_timestamps, interval.end);
    &sorted_timestamps[lo..hi]
}

/// Per-trajectory range counts over a batch of sorted sequences.
pub fn count_in_range_batch(trajectories: &[Vec<f64>], interval: QueryInterval) -> Vec<usize> {
    trajectories.iter().map(|t| count_in_range(t, interval)).collect()
}

/// Count events per consecutive bin defined by sorted edges.
///
/// Parameters
/// ----------
/// - `sorted_timestamps`: one sorted trajectory.
/// - `edges`: ascending bin edges; `edges[k]..edges[k + 1]` is bin `k`, with
///   the usual exclusive-lower, inclusive-upper tie convention.
///
/// Returns
/// -------
/// QueryResult<Vec<usize>>
///   `edges.len() - 1` per-bin counts.
///
/// Errors
/// ------
/// - `QueryError::UnsortedEdges` naming the first out-of-order edge.
/// - `QueryError::InvalidRange` when fewer than two edges are supplied.
pub fn binned_counts(sorted_timestamps: &[f64], edges: &[f64]) -> QueryResult<Vec<usize>> {
    if edges.len() < 2 {
        return Err(QueryError::InvalidRange {
            start: edges.first().copied().unwrap_or(f64::NAN),
            end: f64::NAN,
        });
    }
    for (k, pair) in edges.windows(2).enumerate() {
        if !(pair[0] <= pair[1]) || !pair[0].is_finite() || !pair[1].is_finite() {
            return Err(QueryError::UnsortedEdges { position: k + 1 });
        }
    }
    let ranks: Vec<usize> = edges.iter().map(|&e| rank(sorted_timestamps, e)).collect();
    Ok(ranks.windows(2).map(|pair| pair[1] - pair[0]).collect())
}

/// Concatenate per-bin event sub-sequences back into one sorted timeline.
///
/// The count-driven pipeline produces one ragged sub-sequence per forecast
/// bin; sliding-window sweeps and whole-horizon range queries want the flat
/// timeline. Bins are assumed to be in forecast order with sorted contents,
/// so concatenation preserves global order.
pub fn flatten_bins(bins: &[Vec<f64>]) -> Vec<f64> {
    let total = bins.iter().map(|b| b.len()).sum();
    let mut flat = Vec::with_capacity(total);
    for bin in bins {
        flat.extend_from_slice(bin);
    }
    flat
}
