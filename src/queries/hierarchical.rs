//! Hierarchical count-error decomposition over bisected intervals.
//!
//! Purpose
//! -------
//! Score a simulated timeline against ground truth at multiple temporal
//! resolutions at once: compute the mean absolute count error over a query
//! interval, then bisect the interval at its midpoint and recurse into both
//! halves, accumulating each level's error into a single scalar.
//!
//! Key behaviors
//! -------------
//! - `depth` counts the levels examined: depth 1 scores only the root,
//!   depth `n` evaluates `2^n - 1` intervals in total.
//! - The accumulation is deliberately **not** normalized across levels.
//!   Events inside a fine sub-interval also contribute to the count error of
//!   every enclosing interval, so coarse-grained error is weighted more
//!   heavily than fine-grained error. This depth-weighting is a documented
//!   property of the metric; consumers comparing runs must use the same
//!   depth on both sides.
//! - Each level trims both sequences to its interval before recursing, so
//!   children bisect already-trimmed slices rather than rescanning the full
//!   timeline.
use crate::queries::errors::{QueryError, QueryResult};
use crate::queries::range::{trim_to_interval, QueryInterval};

/// CountDelta — one level's count error plus the trimmed sequences.
///
/// Fields
/// ------
/// - `mae`: `f64`
///   Mean over trajectories of `|predicted_count - true_count|` inside the
///   interval.
/// - `predicted_trimmed` / `true_trimmed`: `Vec<Vec<f64>>`
///   Per-trajectory events restricted to the interval, returned so the
///   hierarchical recursion can reuse them instead of re-trimming the full
///   timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct CountDelta {
    pub mae: f64,
    pub predicted_trimmed: Vec<Vec<f64>>,
    pub true_trimmed: Vec<Vec<f64>>,
}

/// Absolute count error at a single interval, batched over trajectories.
///
/// Parameters
/// ----------
/// - `predicted` / `truth`: sorted per-trajectory timestamp sequences.
/// - `interval`: the query range; counting uses the exclusive-lower,
///   inclusive-upper tie convention of
///   [`count_in_range`](crate::queries::range::count_in_range).
///
/// Returns
/// -------
/// QueryResult<CountDelta>
///   The level's MAE and both trimmed sequence sets. An empty batch yields
///   an MAE of 0.
///
/// Errors
/// ------
/// - `QueryError::LengthMismatch` when the two batches disagree in size.
pub fn count_delta_mae(
    predicted: &[Vec<f64>], truth: &[Vec<f64>], interval: QueryInterval,
) -> QueryResult<CountDelta> {
    if predicted.len() != truth.len() {
        return Err(QueryError::LengthMismatch {
            expected: predicted.len(),
            actual: truth.len(),
        });
    }

    let predicted_trimmed: Vec<Vec<f64>> =
        predicted.iter().map(|t| trim_to_interval(t, interval).to_vec()).collect();
    let true_trimmed: Vec<Vec<f64>> =
        truth.iter().map(|t| trim_to_interval(t, interval).to_vec()).collect();

    let mae = if predicted_trimmed.is_empty() {
        0.0
    } else {
        let total: f64 = predicted_trimmed
            .iter()
            .zip(true_trimmed.iter())
            .map(|(p, t)| (p.len() as f64 - t.len() as f64).abs())
            .sum();
        total / predicted_trimmed.len() as f64
    };

    Ok(CountDelta { mae, predicted_trimmed, true_trimmed })
}

/// Depth-weighted hierarchical count MAE over a bisected interval tree.
///
/// Parameters
/// ----------
/// - `predicted` / `truth`: sorted per-trajectory timestamp sequences.
/// - `interval`: the root query range.
/// - `depth`: levels to examine; 0 returns 0 without touching the inputs.
///
/// Returns
/// -------
/// QueryResult<f64>
///   The sum of every examined interval's count MAE: the root once, each
///   half once, each quarter once, and so on — `2^depth - 1` interval
///   evaluations in total. See the module docs for the resulting
///   depth-weighting.
pub fn hierarchical_mae(
    predicted: &[Vec<f64>], truth: &[Vec<f64>], interval: QueryInterval, depth: usize,
) -> QueryResult<f64> {
    if depth == 0 {
        return Ok(0.0);
    }

    let delta = count_delta_mae(predicted, truth, interval)?;
    let (left, right) = interval.bisect();
    let left_sum = hierarchical_mae(&delta.predicted_trimmed, &delta.true_trimmed, left, depth - 1)?;
    let right_sum =
        hierarchical_mae(&delta.predicted_trimmed, &delta.true_trimmed, right, depth - 1)?;
    Ok(delta.mae + left_sum + right_sum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - depth-1 equivalence with the root-only count MAE.
    // - depth-2 decomposition against independently computed per-half MAEs.
    // - Empty-sequence and length-mismatch behavior.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify depth 1 equals the root-only count MAE (no recursion
    // contributes).
    //
    // Given
    // -----
    // - Predicted `[1, 2, 3]` vs. truth `[1, 2]` on `(0, 10)` for one
    //   trajectory.
    //
    // Expect
    // ------
    // - Both `count_delta_mae` and depth-1 `hierarchical_mae` equal 1.0.
    fn depth_one_equals_root_count_mae() {
        // Arrange
        let predicted = vec![vec![1.0, 2.0, 3.0]];
        let truth = vec![vec![1.0, 2.0]];
        let interval = QueryInterval::new(0.0, 10.0).unwrap();

        // Act
        let delta = count_delta_mae(&predicted, &truth, interval).unwrap();
        let hier = hierarchical_mae(&predicted, &truth, interval, 1).unwrap();

        // Assert
        assert_abs_diff_eq!(delta.mae, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(hier, 1.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Verify the depth-2 decomposition: the result equals root MAE plus the
    // independently computed left-half and right-half MAEs.
    //
    // Given
    // -----
    // - Root `(0, 8)` with midpoint 4. Predicted `[1, 2, 5]`, truth
    //   `[1, 6, 7]` for one trajectory: root counts 3 vs 3 (MAE 0), left
    //   half `(0, 4)` counts 2 vs 1 (MAE 1), right half `(4, 8)` counts
    //   1 vs 2 (MAE 1).
    //
    // Expect
    // ------
    // - Depth-2 result 2.0 = 0 + 1 + 1, matching per-half calls.
    fn depth_two_sums_root_and_halves() {
        // Arrange
        let predicted = vec![vec![1.0, 2.0, 5.0]];
        let truth = vec![vec![1.0, 6.0, 7.0]];
        let root = QueryInterval::new(0.0, 8.0).unwrap();
        let (left, right) = root.bisect();

        // Act
        let hier = hierarchical_mae(&predicted, &truth, root, 2).unwrap();
        let root_mae = count_delta_mae(&predicted, &truth, root).unwrap().mae;
        let left_mae = count_delta_mae(&predicted, &truth, left).unwrap().mae;
        let right_mae = count_delta_mae(&predicted, &truth, right).unwrap().mae;

        // Assert
        assert_abs_diff_eq!(hier, root_mae + left_mae + right_mae, epsilon = 1e-12);
        assert_abs_diff_eq!(hier, 2.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Verify depth 0 is exactly 0, empty trajectories are legal, and a
    // batch-size mismatch is rejected.
    //
    // Given
    // -----
    // - depth 0 on arbitrary inputs; empty sequences at depth 3; batches of
    //   sizes 1 and 2.
    //
    // Expect
    // ------
    // - 0.0, 0.0, and `LengthMismatch`.
    fn hierarchical_mae_edge_cases() {
        // Arrange
        let interval = QueryInterval::new(0.0, 4.0).unwrap();
        let one = vec![vec![1.0]];
        let empty = vec![Vec::<f64>::new()];

        // Act / Assert
        assert_eq!(hierarchical_mae(&one, &one, interval, 0).unwrap(), 0.0);
        assert_eq!(hierarchical_mae(&empty, &empty, interval, 3).unwrap(), 0.0);
        assert_eq!(
            count_delta_mae(&one, &[vec![1.0], vec![2.0]], interval).unwrap_err(),
            QueryError::LengthMismatch { expected: 1, actual: 2 }
        );
    }
}
