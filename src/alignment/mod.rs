//! alignment — mapping simulated timelines onto true forecast bins.
//!
//! Purpose
//! -------
//! Connect count-driven simulation output to the dataset's real bin grid:
//! rescale a bin's simulated timestamps affinely onto its true boundaries
//! ([`rescale`]), partition a trajectory into per-bin slices by predicted
//! event counts ([`partition`]), and place the unobserved bin edge inside
//! the gap that straddles it ([`jitter`]).
//!
//! Key behaviors
//! -------------
//! - Validity is always carried explicitly (per-trajectory valid lengths or
//!   ragged slices); a zero value is just a value, never a padding marker.
//! - Randomness for jitter is injected via an explicit generator so tests
//!   and replicas are reproducible.
//!
//! Conventions
//! -----------
//! - No I/O and no logging; error conditions are surfaced as
//!   [`AlignResult`]. Shortfalls the layer can tolerate (a carry buffer too
//!   short to fill a window) are reported in-band via counters instead.
//!
//! Downstream usage
//! ----------------
//! - The orchestration layer runs `simulate_with_target_count`, partitions
//!   by the count model's per-bin predictions, jitters the bin edge, and
//!   rescales onto true boundaries before handing the timeline to the query
//!   layer.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each submodule; they pin the identity and
//!   affine-law properties of the rescaler, the carry/padding rules of the
//!   partitioner, and seeded reproducibility of the jitter draw.

pub mod bounds;
pub mod errors;
pub mod jitter;
pub mod partition;
pub mod rescale;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::bounds::BinBounds;
pub use self::errors::{AlignError, AlignResult};
pub use self::jitter::bin_boundary_jitter;
pub use self::partition::{partition_by_count, PartitionedEvents};
pub use self::rescale::{rescale_to_true_bin, RescaledBin};
