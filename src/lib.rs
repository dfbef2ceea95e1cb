//! rust_pointprocess — autoregressive point-process simulation and
//! hierarchical count inference.
//!
//! Purpose
//! -------
//! Serve as the crate root for the event-forecasting engine: unroll a
//! trained recurrent temporal point-process model into synthetic future
//! event timelines, align those timelines with externally predicted per-bin
//! event counts, and evaluate range, hierarchical, and threshold queries
//! against ground truth.
//!
//! Key behaviors
//! -------------
//! - [`simulation`] drives a [`PointProcessStepper`](simulation::PointProcessStepper)
//!   under two stopping policies (time boundary, per-trajectory event-count
//!   target) with explicit masking and hidden-state carry.
//! - [`alignment`] maps simulated bins onto true bin boundaries, partitions
//!   trajectories by predicted counts, and jitters the unobserved bin edge.
//! - [`queries`] answers range counts by bisection, decomposes count error
//!   hierarchically over bisected intervals, sweeps sliding-window
//!   thresholds, and scores replica ensembles with CRPS.
//!
//! Invariants & assumptions
//! ------------------------
//! - Trained models (the point-process stepper and the count predictor) and
//!   dataset configuration (bin size, anchors, normalization parameters)
//!   are external collaborators; this crate performs no training, no data
//!   ingestion, and no checkpoint I/O.
//! - Trajectories are strictly increasing timestamp sequences; validity is
//!   carried as explicit per-trajectory lengths, never inferred from zero
//!   sentinels.
//! - The numerical core performs no I/O and no logging; callers orchestrate
//!   observability. Error conditions surface as typed results
//!   (`SimResult`, `AlignResult`, `QueryResult`); tolerated shortfalls
//!   surface as in-band counters.
//!
//! Conventions
//! -----------
//! - Indexing is 0-based; batched matrices are `[batch, _]`-major with the
//!   newest entry at the end of each row.
//! - Range counting uses an exclusive-lower, inclusive-upper tie convention
//!   throughout.
//! - Randomness (bin-edge jitter, replica divergence) is injected via
//!   explicit generators so runs are reproducible under a seed.
//!
//! Downstream usage
//! ----------------
//! - A typical forecast of one future bin: denormalize the count model's
//!   prediction into step targets, run
//!   [`Simulator::simulate_with_target_count`](simulation::Simulator::simulate_with_target_count),
//!   partition and jitter via [`alignment`], rescale onto the true bin, and
//!   evaluate with [`queries`]. The returned hidden state seeds the next
//!   bin's simulation.
//!
//! Testing notes
//! -------------
//! - Unit tests live in `#[cfg(test)]` modules beside each component; the
//!   `tests/` directory exercises the full simulate → align → query
//!   pipeline end to end with synthetic steppers.

pub mod alignment;
pub mod queries;
pub mod simulation;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_pointprocess::prelude::*;
//
// to import the main crate surface in a single line.

pub mod prelude {
    pub use crate::alignment::{
        bin_boundary_jitter, partition_by_count, rescale_to_true_bin, AlignError, AlignResult,
        BinBounds, PartitionedEvents, RescaledBin,
    };
    pub use crate::queries::{
        count_delta_mae, count_in_range, ensemble_distribution, first_crossing_position,
        hierarchical_mae, score_distribution, threshold_mae, trim_to_interval,
        CrossingDistribution, FailurePolicy, QueryError, QueryInterval, QueryResult, SlideGrid,
        ThresholdDirection,
    };
    pub use crate::simulation::{
        CountNormalizer, GapNormalizer, GapWindow, HiddenState, PointProcessStepper, SimError,
        SimOptions, SimResult, SimulatedBatch, Simulator, StepOutput, StopPolicy,
    };
}
