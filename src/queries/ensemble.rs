//! Ensemble aggregation and probabilistic scoring of crossing positions.
//!
//! Purpose
//! -------
//! Turn many independent stochastic simulation replicas into an empirical
//! distribution over "first window crossing the threshold," and score that
//! distribution against the observed crossing with the continuous ranked
//! probability score (CRPS).
//!
//! Key behaviors
//! -------------
//! - Replica outcomes are aggregated with reciprocal-rank weighting: the
//!   k-th replica to report a given position contributes weight `1/k`, so
//!   positions reported early and consistently across replicas outweigh
//!   late stragglers. Replica order is the submission order, which is why
//!   the runner preserves it even when executing in parallel.
//! - A trajectory with no crossing in any replica falls back to an explicit
//!   uniform distribution over the swept positions rather than dividing by
//!   zero; the fallback is flagged on the result.
//! - Replicas run with no shared mutable state; each worker receives its
//!   replica index and returns a value. Failures either abort the whole
//!   aggregate or are excluded and counted, per [`FailurePolicy`] — a
//!   failed replica is never silently dropped.
use rayon::prelude::*;

use crate::queries::errors::{QueryError, QueryResult};

/// How replica failures propagate into the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// First failure aborts the whole aggregate.
    FailFast,
    /// Failed replicas are excluded and the exclusion count is reported.
    ExcludeAndReport,
}

/// ReplicaOutcomes — ordered crossing reports from an ensemble run.
///
/// Fields
/// ------
/// - `crossings`: `Vec<Option<usize>>`
///   One entry per successful replica, in submission order; `None` means
///   that replica found no crossing in the swept range.
/// - `failed`: `usize`
///   Replicas excluded under [`FailurePolicy::ExcludeAndReport`]; always 0
///   under fail-fast.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplicaOutcomes {
    pub crossings: Vec<Option<usize>>,
    pub failed: usize,
}

/// Run `num_replicas` independent replicas and collect their crossing
/// reports in submission order.
///
/// Parameters
/// ----------
/// - `num_replicas`: how many independent draws to run.
/// - `policy`: failure propagation (see [`FailurePolicy`]).
/// - `parallel`: dispatch replicas across the rayon pool instead of
///   running sequentially; results are identical because each worker is a
///   pure function of its replica index.
/// - `replica`: the worker — typically seeds a generator from the replica
///   index, simulates, sweeps, and returns the first crossing position.
pub fn run_replicas<F>(
    num_replicas: usize, policy: FailurePolicy, parallel: bool, replica: F,
) -> QueryResult<ReplicaOutcomes>
where
    F: Fn(usize) -> QueryResult<Option<usize>> + Sync,
{
    let results: Vec<QueryResult<Option<usize>>> = if parallel {
        (0..num_replicas).into_par_iter().map(&replica).collect()
    } else {
        (0..num_replicas).map(&replica).collect()
    };

    let mut crossings = Vec::with_capacity(num_replicas);
    let mut failed = 0usize;
    for (idx, result) in results.into_iter().enumerate() {
        match result {
            Ok(crossing) => crossings.push(crossing),
            Err(err) => match policy {
                FailurePolicy::FailFast => {
                    return Err(QueryError::ReplicaFailed {
                        replica: idx,
                        message: err.to_string(),
                    });
                }
                FailurePolicy::ExcludeAndReport => failed += 1,
            },
        }
    }
    Ok(ReplicaOutcomes { crossings, failed })
}

/// CrossingDistribution — weighted empirical distribution over swept
/// positions.
///
/// Fields
/// ------
/// - `weights`: `Vec<f64>`
///   One weight per swept position, normalized to sum to 1.
/// - `fallback_uniform`: `bool`
///   True when no replica reported any crossing and the distribution was
///   replaced by the explicit uniform fallback.
/// - `no_crossing`: `usize`
///   Replicas that reported no crossing (excluded from the weighting).
#[derive(Debug, Clone, PartialEq)]
pub struct CrossingDistribution {
    pub weights: Vec<f64>,
    pub fallback_uniform: bool,
    pub no_crossing: usize,
}

/// Aggregate replica crossing reports into a reciprocal-rank-weighted
/// distribution over `num_positions` swept positions.
///
/// The k-th replica (in submission order) to report a given position adds
/// `1/k` to that position's weight; weights are then normalized to sum
/// to 1. When every replica reports no crossing, the result is the uniform
/// distribution with `fallback_uniform` set.
///
/// Errors
/// ------
/// - `QueryError::EmptyDistribution` when `num_positions == 0`.
/// - `QueryError::PositionOutOfGrid` when a report lies outside the grid.
pub fn ensemble_distribution(
    crossings: &[Option<usize>], num_positions: usize,
) -> QueryResult<CrossingDistribution> {
    if num_positions == 0 {
        return Err(QueryError::EmptyDistribution);
    }

    let mut weights = vec![0.0f64; num_positions];
    let mut reports = vec![0usize; num_positions];
    let mut no_crossing = 0usize;

    for (replica, crossing) in crossings.iter().enumerate() {
        match *crossing {
            Some(position) if position >= num_positions => {
                return Err(QueryError::PositionOutOfGrid {
                    replica,
                    position,
                    num_positions,
                });
            }
            Some(position) => {
                reports[position] += 1;
                weights[position] += 1.0 / reports[position] as f64;
            }
            None => no_crossing += 1,
        }
    }

    let total: f64 = weights.iter().sum();
    if total == 0.0 {
        let uniform = 1.0 / num_positions as f64;
        return Ok(CrossingDistribution {
            weights: vec![uniform; num_positions],
            fallback_uniform: true,
            no_crossing,
        });
    }
    for w in &mut weights {
        *w /= total;
    }
    Ok(CrossingDistribution { weights, fallback_uniform: false, no_crossing })
}

/// Continuous ranked probability score of a weighted empirical distribution
/// against an observed scalar outcome.
///
/// For candidate positions `x_i` with weights `w_i` (summing to 1) and
/// observation `y`:
/// `CRPS = Σ_i w_i |x_i - y| - ½ Σ_i Σ_j w_i w_j |x_i - x_j|`.
/// Lower is better; a point mass exactly at `y` scores 0.
///
/// Errors
/// ------
/// - `QueryError::EmptyDistribution` for empty inputs.
/// - `QueryError::LengthMismatch` when positions and weights disagree.
pub fn score_distribution(
    true_position: f64, positions: &[f64], weights: &[f64],
) -> QueryResult<f64> {
    if positions.is_empty() {
        return Err(QueryError::EmptyDistribution);
    }
    if positions.len() != weights.len() {
        return Err(QueryError::LengthMismatch {
            expected: positions.len(),
            actual: weights.len(),
        });
    }

    let accuracy: f64 = positions
        .iter()
        .zip(weights.iter())
        .map(|(&x, &w)| w * (x - true_position).abs())
        .sum();

    // Each unordered pair appears twice in the full double sum; iterating
    // i < j and skipping the ½ factor accounts for both.
    let mut spread = 0.0;
    for (i, (&xi, &wi)) in positions.iter().zip(weights.iter()).enumerate() {
        for (&xj, &wj) in positions[i + 1..].iter().zip(weights[i + 1..].iter()) {
            spread += wi * wj * (xi - xj).abs();
        }
    }
    Ok(accuracy - spread)
}

/// ScoreReport — trajectory-averaged CRPS with exclusion accounting.
///
/// Fields
/// ------
/// - `mean_crps`: `Option<f64>`
///   Average score over trajectories whose true crossing exists; `None`
///   when every trajectory was excluded.
/// - `excluded`: `usize`
///   Trajectories dropped because the ground truth reported no crossing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreReport {
    pub mean_crps: Option<f64>,
    pub excluded: usize,
}

/// Score one distribution per trajectory against the true crossing
/// positions, excluding trajectories whose truth has no crossing.
///
/// Errors
/// ------
/// - `QueryError::LengthMismatch` when batches or per-trajectory lengths
///   disagree.
/// - Any error from [`score_distribution`].
pub fn score_ensemble(
    true_positions: &[Option<f64>], distributions: &[CrossingDistribution],
    grid_positions: &[f64],
) -> QueryResult<ScoreReport> {
    if true_positions.len() != distributions.len() {
        return Err(QueryError::LengthMismatch {
            expected: true_positions.len(),
            actual: distributions.len(),
        });
    }

    let mut total = 0.0;
    let mut kept = 0usize;
    for (truth, dist) in true_positions.iter().zip(distributions.iter()) {
        match truth {
            Some(y) => {
                total += score_distribution(*y, grid_positions, &dist.weights)?;
                kept += 1;
            }
            None => {}
        }
    }

    Ok(ScoreReport {
        mean_crps: if kept > 0 { Some(total / kept as f64) } else { None },
        excluded: true_positions.len() - kept,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Reciprocal-rank weighting arithmetic and normalization.
    // - The uniform fallback for crossing-free ensembles.
    // - CRPS values on point masses and a hand-computed two-point case.
    // - Replica-runner failure policies and parallel/sequential agreement.
    // - Exclusion accounting in ensemble scoring.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify reciprocal-rank weighting: repeated reports of a position decay
    // as 1, 1/2, 1/3, ... and weights normalize to sum to 1.
    //
    // Given
    // -----
    // - Reports `[Some(1), Some(1), Some(0), None]` over a 3-point grid:
    //   raw weights position 1 → 1 + 1/2 = 1.5, position 0 → 1.0.
    //
    // Expect
    // ------
    // - Normalized weights `[0.4, 0.6, 0.0]`, one no-crossing replica, no
    //   fallback.
    fn ensemble_distribution_applies_reciprocal_rank_weights() {
        // Arrange
        let crossings = [Some(1), Some(1), Some(0), None];

        // Act
        let dist = ensemble_distribution(&crossings, 3).unwrap();

        // Assert
        assert_abs_diff_eq!(dist.weights[0], 0.4, epsilon = 1e-12);
        assert_abs_diff_eq!(dist.weights[1], 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(dist.weights[2], 0.0, epsilon = 1e-12);
        assert_eq!(dist.no_crossing, 1);
        assert!(!dist.fallback_uniform);
    }

    #[test]
    // Purpose
    // -------
    // Verify the explicit uniform fallback when no replica crosses, and
    // rejection of out-of-grid reports.
    //
    // Given
    // -----
    // - All-`None` reports over a 4-point grid; then a report of position 5
    //   over the same grid.
    //
    // Expect
    // ------
    // - Uniform weights 0.25 with `fallback_uniform`; then
    //   `PositionOutOfGrid { replica: 0, position: 5, .. }`.
    fn ensemble_distribution_falls_back_to_uniform() {
        // Arrange / Act
        let dist = ensemble_distribution(&[None, None, None], 4).unwrap();

        // Assert
        assert!(dist.fallback_uniform);
        assert_eq!(dist.no_crossing, 3);
        for &w in &dist.weights {
            assert_abs_diff_eq!(w, 0.25, epsilon = 1e-12);
        }
        assert_eq!(
            ensemble_distribution(&[Some(5)], 4).unwrap_err(),
            QueryError::PositionOutOfGrid { replica: 0, position: 5, num_positions: 4 }
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify CRPS properties: a point mass at the observation scores 0, and
    // a two-point distribution matches the hand-computed value.
    //
    // Given
    // -----
    // - Point mass at 3.0 observed at 3.0.
    // - Positions `[0.0, 4.0]` with weights `[0.5, 0.5]` observed at 4.0:
    //   accuracy = 0.5·4 + 0.5·0 = 2.0, spread term = 0.5·0.5·4 = 1.0.
    //
    // Expect
    // ------
    // - Scores 0.0 and 1.0.
    fn score_distribution_matches_hand_computation() {
        // Arrange / Act / Assert
        assert_abs_diff_eq!(
            score_distribution(3.0, &[3.0], &[1.0]).unwrap(),
            0.0,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            score_distribution(4.0, &[0.0, 4.0], &[0.5, 0.5]).unwrap(),
            1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify the replica runner: fail-fast surfaces the failing replica,
    // exclude-and-report counts it, and parallel execution preserves
    // submission order.
    //
    // Given
    // -----
    // - 5 replicas where replica 2 fails and replica 4 reports no crossing;
    //   run under both policies, sequential and parallel.
    //
    // Expect
    // ------
    // - Fail-fast: `ReplicaFailed { replica: 2, .. }`.
    // - Exclude: crossings `[Some(0), Some(1), Some(3), None]`, 1 failed;
    //   identical for parallel.
    fn run_replicas_honors_failure_policy_and_order() {
        // Arrange
        let worker = |idx: usize| -> QueryResult<Option<usize>> {
            match idx {
                2 => Err(QueryError::EmptyDistribution),
                4 => Ok(None),
                i => Ok(Some(i)),
            }
        };

        // Act / Assert
        assert!(matches!(
            run_replicas(5, FailurePolicy::FailFast, false, worker).unwrap_err(),
            QueryError::ReplicaFailed { replica: 2, .. }
        ));
        let sequential = run_replicas(5, FailurePolicy::ExcludeAndReport, false, worker).unwrap();
        let parallel = run_replicas(5, FailurePolicy::ExcludeAndReport, true, worker).unwrap();
        assert_eq!(sequential.crossings, vec![Some(0), Some(1), Some(3), None]);
        assert_eq!(sequential.failed, 1);
        assert_eq!(sequential, parallel);
    }

    #[test]
    // Purpose
    // -------
    // Verify ensemble scoring excludes trajectories whose ground truth has
    // no crossing and reports the exclusion count.
    //
    // Given
    // -----
    // - Two trajectories over grid positions `[0.0, 1.0]`: one with truth
    //   at 1.0 and a point mass at 1.0 (score 0), one with truth `None`.
    //
    // Expect
    // ------
    // - `mean_crps == Some(0.0)` and `excluded == 1`.
    fn score_ensemble_excludes_missing_truth() {
        // Arrange
        let dists = vec![
            CrossingDistribution {
                weights: vec![0.0, 1.0],
                fallback_uniform: false,
                no_crossing: 0,
            },
            CrossingDistribution {
                weights: vec![0.5, 0.5],
                fallback_uniform: false,
                no_crossing: 0,
            },
        ];

        // Act
        let report = score_ensemble(&[Some(1.0), None], &dists, &[0.0, 1.0]).unwrap();

        // Assert
        assert_abs_diff_eq!(report.mean_crps.unwrap(), 0.0, epsilon = 1e-12);
        assert_eq!(report.excluded, 1);
    }
}
