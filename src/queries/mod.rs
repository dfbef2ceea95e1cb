//! queries — evaluation of simulated timelines against ground truth.
//!
//! Purpose
//! -------
//! Provide the query half of the forecasting pipeline: bisection-based
//! range counting and trimming over sorted timelines ([`range`]), recursive
//! hierarchical count-error decomposition ([`hierarchical`]),
//! sliding-window threshold sweeps ([`threshold`]), and ensemble
//! aggregation with CRPS scoring ([`ensemble`]).
//!
//! Key behaviors
//! -------------
//! - All counting shares one tie convention — exclusive lower, inclusive
//!   upper — so counts and trims can never disagree.
//! - "No crossing" and "no ground truth" are `Option::None` outcomes,
//!   excluded from aggregates with an explicit exclusion count, never
//!   coerced to zero.
//! - Replica ensembles run sequentially or across the rayon pool with no
//!   shared mutable state; failures abort or are excluded and counted,
//!   never silently dropped.
//!
//! Conventions
//! -----------
//! - No I/O and no logging; error conditions are surfaced as
//!   [`QueryResult`] and tolerated shortfalls as in-band counters.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each submodule and pin the tie convention, the
//!   depth-decomposition law of the hierarchical MAE, the uniform fallback
//!   of ensemble weighting, and hand-computed CRPS values.

pub mod ensemble;
pub mod errors;
pub mod hierarchical;
pub mod range;
pub mod threshold;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::ensemble::{
    ensemble_distribution, run_replicas, score_distribution, score_ensemble,
    CrossingDistribution, FailurePolicy, ReplicaOutcomes, ScoreReport,
};
pub use self::errors::{QueryError, QueryResult};
pub use self::hierarchical::{count_delta_mae, hierarchical_mae, CountDelta};
pub use self::range::{
    binned_counts, count_in_range, count_in_range_batch, flatten_bins, trim_to_interval,
    QueryInterval,
};
pub use self::threshold::{
    first_crossing_in_sweep, first_crossing_position, threshold_mae, window_counts, SlideGrid,
    ThresholdDirection, ThresholdMae,
};
