//! simulation — autoregressive point-process simulation stack.
//!
//! Purpose
//! -------
//! Provide the event-level half of the forecasting pipeline: drive a trained
//! recurrent point-process model forward in time, producing synthetic future
//! event timestamps either until a time boundary is crossed or until a
//! per-trajectory event-count target is met. Bundles the core data types
//! ([`core`]), the unroll engine ([`simulator`]), and the simulation error
//! surface ([`errors`]) under one namespace.
//!
//! Key behaviors
//! -------------
//! - [`Simulator::simulate_until_boundary`] over-generates past individual
//!   boundaries (the loop continues while **any** trajectory is below its
//!   boundary); downstream query code trims by bisection.
//! - [`Simulator::simulate_with_target_count`] runs `max(targets)` steps and
//!   masks finished trajectories: zeroed gaps, frozen timestamps, and a
//!   one-step-lookback hidden-state freeze.
//! - Hidden states returned in [`SimulatedBatch`] resume subsequent
//!   segments, so a multi-bin forecast keeps recurrent context across bins.
//!
//! Conventions
//! -----------
//! - The simulation stack performs no I/O and no logging; callers
//!   orchestrate model loading and observability. Error conditions are
//!   surfaced as [`SimResult`]; panics indicate programming errors.
//!
//! Downstream usage
//! ----------------
//! - Count-driven output feeds [`alignment`](crate::alignment) for bin
//!   rescaling and partitioning; both outputs feed
//!   [`queries`](crate::queries) for range counts, hierarchical error
//!   decomposition, and threshold-crossing distributions.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each submodule; the simulator tests drive
//!   synthetic [`PointProcessStepper`] implementations through both stopping
//!   policies and the divergence/safety-bound paths.

pub mod core;
pub mod errors;
pub mod simulator;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    CountNormalizer, GapNormalizer, GapWindow, HiddenState, IntensityParams, PointProcessStepper,
    SimOptions, SimulatedBatch, StepOutput, StopPolicy,
};
pub use self::errors::{SimError, SimResult};
pub use self::simulator::Simulator;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_pointprocess::simulation::prelude::*;
//
// to import the main simulation surface in a single line.

pub mod prelude {
    pub use super::{
        CountNormalizer, GapNormalizer, GapWindow, HiddenState, IntensityParams,
        PointProcessStepper, SimError, SimOptions, SimResult, SimulatedBatch, Simulator,
        StepOutput, StopPolicy,
    };
}
