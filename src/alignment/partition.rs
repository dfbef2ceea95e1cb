//! Partitioning simulated trajectories by predicted per-bin counts.
//!
//! Purpose
//! -------
//! Bridge the count model and the point-process simulator: given a batched
//! set of simulated event values and a target count per trajectory, split
//! each trajectory into its in-bin prefix, an optional fixed-width context
//! window ending at the count-th entry (left-padded from the previous bin's
//! carry-over tail when the bin alone is too short), the end event at
//! position `count - 1`, and the gap to the first event past the bin.
//!
//! Key behaviors
//! -------------
//! - The fixed-width window is built newest-last: take the last `pad_to`
//!   entries of `carry_tail ++ in_bin`. When the combined history is still
//!   shorter than `pad_to`, the window is returned shorter and the
//!   shortfall is reported per trajectory in
//!   [`PartitionedEvents::truncated`] — the caller decides whether a short
//!   context is acceptable, this layer only makes it observable.
//! - The end gap (`events[count] - events[count - 1]`) is produced only when
//!   no carry buffer is supplied, mirroring the two call patterns: the
//!   first bin of a forecast (no carry, end gap needed to estimate the bin
//!   edge) and subsequent bins (carry supplied, edge already known).
//!
//! Edge cases
//! ----------
//! - `count == 0`: empty in-bin prefix, `end_event == None`, and no end gap.
//! - `count == events[i].len()`: no event past the bin exists, so the end
//!   gap is `None` for that trajectory.
use crate::alignment::errors::{AlignError, AlignResult};

/// PartitionedEvents — the per-bin split of a batched simulated trajectory.
///
/// Fields
/// ------
/// - `in_bin`: `Vec<Vec<f64>>`
///   The first `count` entries per trajectory (ragged).
/// - `windows`: `Option<Vec<Vec<f64>>>`
///   Present when a `pad_to` width was requested: a window of up to
///   `pad_to` entries ending at the count-th entry, left-padded from the
///   carry buffer's tail.
/// - `end_events`: `Vec<Option<f64>>`
///   The value at position `count - 1`, or `None` for a zero count.
/// - `end_gaps`: `Option<Vec<Option<f64>>>`
///   Present when no carry buffer was supplied: the gap between positions
///   `count` and `count - 1`, or `None` where either position is missing.
/// - `truncated`: `Vec<usize>`
///   Per trajectory, how many entries short of `pad_to` the window is
///   (always 0 when `pad_to` was not requested or history sufficed).
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionedEvents {
    pub in_bin: Vec<Vec<f64>>,
    pub windows: Option<Vec<Vec<f64>>>,
    pub end_events: Vec<Option<f64>>,
    pub end_gaps: Option<Vec<Option<f64>>>,
    pub truncated: Vec<usize>,
}

/// Split batched simulated event values by a target count per trajectory.
///
/// Parameters
/// ----------
/// - `events`: ragged per-trajectory simulated values (timestamps or gaps),
///   oldest first.
/// - `counts`: target event count per trajectory.
/// - `carry`: previous bin's per-trajectory tail, used to left-pad the
///   fixed-width window; `None` for the first bin of a forecast.
/// - `pad_to`: requested window width; `None` skips window construction.
///
/// Errors
/// ------
/// - `AlignError::LengthMismatch` when `counts` or `carry` disagree with
///   the batch size.
/// - `AlignError::CountOutOfRange` when a count exceeds a trajectory's
///   available events.
pub fn partition_by_count(
    events: &[Vec<f64>], counts: &[usize], carry: Option<&[Vec<f64>]>, pad_to: Option<usize>,
) -> AlignResult<PartitionedEvents> {
    let batch = events.len();
    if counts.len() != batch {
        return Err(AlignError::LengthMismatch { expected: batch, actual: counts.len() });
    }
    if let Some(carry_rows) = carry {
        if carry_rows.len() != batch {
            return Err(AlignError::LengthMismatch { expected: batch, actual: carry_rows.len() });
        }
    }

    let mut in_bin = Vec::with_capacity(batch);
    let mut end_events = Vec::with_capacity(batch);
    let mut end_gaps = Vec::with_capacity(batch);
    let mut windows = pad_to.map(|_| Vec::with_capacity(batch));
    let mut truncated = vec![0usize; batch];

    for i in 0..batch {
        let row = &events[i];
        let count = counts[i];
        if count > row.len() {
            return Err(AlignError::CountOutOfRange {
                trajectory: i,
                count,
                available: row.len(),
            });
        }

        in_bin.push(row[..count].to_vec());
        end_events.push(if count > 0 { Some(row[count - 1]) } else { None });
        end_gaps.push(match count {
            0 => None,
            c if c < row.len() => Some(row[c] - row[c - 1]),
            _ => None,
        });

        if let (Some(width), Some(window_rows)) = (pad_to, windows.as_mut()) {
            let mut window = Vec::with_capacity(width);
            if count < width {
                let need = width - count;
                if let Some(carry_rows) = carry {
                    let tail = &carry_rows[i];
                    let take = need.min(tail.len());
                    window.extend_from_slice(&tail[tail.len() - take..]);
                    truncated[i] = need - take;
                } else {
                    truncated[i] = need;
                }
                window.extend_from_slice(&row[..count]);
            } else {
                window.extend_from_slice(&row[count - width..count]);
            }
            window_rows.push(window);
        }
    }

    Ok(PartitionedEvents {
        in_bin,
        windows,
        end_events,
        end_gaps: if carry.is_none() { Some(end_gaps) } else { None },
        truncated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The in-bin prefix, end event, and end gap without a carry buffer.
    // - Fixed-width window construction with sufficient and insufficient
    //   carry, including the reported truncation shortfall.
    // - Count-out-of-range and length-mismatch validation.
    // - The zero-count edge case.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify the first-bin call pattern: no carry, end gap derived from the
    // first event past the count.
    //
    // Given
    // -----
    // - Events `[1.0, 2.0, 3.0, 4.5]` with count 3.
    //
    // Expect
    // ------
    // - In-bin `[1.0, 2.0, 3.0]`, end event `3.0`, end gap `1.5`.
    fn partition_without_carry_exposes_end_gap() {
        // Arrange
        let events = vec![vec![1.0, 2.0, 3.0, 4.5]];

        // Act
        let parts = partition_by_count(&events, &[3], None, None).unwrap();

        // Assert
        assert_eq!(parts.in_bin, vec![vec![1.0, 2.0, 3.0]]);
        assert_eq!(parts.end_events, vec![Some(3.0)]);
        assert_eq!(parts.end_gaps, Some(vec![Some(1.5)]));
        assert!(parts.windows.is_none());
        assert_eq!(parts.truncated, vec![0]);
    }

    #[test]
    // Purpose
    // -------
    // Verify window construction: enough in-bin history truncates to the
    // most recent `pad_to` entries; a short bin left-pads from the carry
    // tail; no end gaps are produced when a carry buffer is present.
    //
    // Given
    // -----
    // - Two trajectories with counts `[4, 2]`, `pad_to = 3`, carry tails
    //   `[0.1, 0.2]` each.
    //
    // Expect
    // ------
    // - Trajectory 0: window is its entries at positions 1..4.
    // - Trajectory 1: window is `[0.2, 10.0, 20.0]` (one carry entry).
    // - `end_gaps == None`, no truncation reported.
    fn partition_with_carry_builds_windows() {
        // Arrange
        let events = vec![vec![1.0, 2.0, 3.0, 4.0, 5.0], vec![10.0, 20.0, 30.0]];
        let carry = vec![vec![0.1, 0.2], vec![0.1, 0.2]];

        // Act
        let parts = partition_by_count(&events, &[4, 2], Some(&carry), Some(3)).unwrap();

        // Assert
        let windows = parts.windows.expect("pad_to should produce windows");
        assert_eq!(windows[0], vec![2.0, 3.0, 4.0]);
        assert_eq!(windows[1], vec![0.2, 10.0, 20.0]);
        assert!(parts.end_gaps.is_none());
        assert_eq!(parts.truncated, vec![0, 0]);
    }

    #[test]
    // Purpose
    // -------
    // Ensure an insufficient carry buffer yields a shorter window plus a
    // reported shortfall rather than an error.
    //
    // Given
    // -----
    // - One event with count 1, `pad_to = 4`, carry tail of length 1.
    //
    // Expect
    // ------
    // - Window `[0.5, 7.0]` and `truncated == [2]`.
    fn partition_reports_truncation_on_short_carry() {
        // Arrange
        let events = vec![vec![7.0]];
        let carry = vec![vec![0.5]];

        // Act
        let parts = partition_by_count(&events, &[1], Some(&carry), Some(4)).unwrap();

        // Assert
        assert_eq!(parts.windows, Some(vec![vec![0.5, 7.0]]));
        assert_eq!(parts.truncated, vec![2]);
    }

    #[test]
    // Purpose
    // -------
    // Verify validation: a count beyond the available events and a counts
    // vector of the wrong length are rejected.
    //
    // Given
    // -----
    // - One trajectory of 2 events with count 3; then counts of length 2.
    //
    // Expect
    // ------
    // - `CountOutOfRange { trajectory: 0, count: 3, available: 2 }`, then
    //   `LengthMismatch`.
    fn partition_validates_counts() {
        // Arrange
        let events = vec![vec![1.0, 2.0]];

        // Act / Assert
        assert_eq!(
            partition_by_count(&events, &[3], None, None).unwrap_err(),
            AlignError::CountOutOfRange { trajectory: 0, count: 3, available: 2 }
        );
        assert_eq!(
            partition_by_count(&events, &[1, 1], None, None).unwrap_err(),
            AlignError::LengthMismatch { expected: 1, actual: 2 }
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify the zero-count edge case: empty prefix, no end event, no end
    // gap.
    //
    // Given
    // -----
    // - One trajectory with count 0.
    //
    // Expect
    // ------
    // - Empty in-bin, `end_events == [None]`, `end_gaps == Some([None])`.
    fn partition_handles_zero_count() {
        // Arrange
        let events = vec![vec![1.0, 2.0]];

        // Act
        let parts = partition_by_count(&events, &[0], None, None).unwrap();

        // Assert
        assert_eq!(parts.in_bin, vec![Vec::<f64>::new()]);
        assert_eq!(parts.end_events, vec![None]);
        assert_eq!(parts.end_gaps, Some(vec![None]));
    }
}
