//! core — shared simulation data types, normalizers, and the stepper seam.
//!
//! Purpose
//! -------
//! Collect the building blocks the autoregressive unroll engine is assembled
//! from: the sliding gap window fed to the recurrent model, the affine
//! normalizers connecting model space to the true time axis, the stepper
//! trait and its output contract, stopping policies, and the stacked batch
//! container that simulation segments produce.
//!
//! Key behaviors
//! -------------
//! - Validate structural invariants at construction ([`GapWindow`],
//!   [`GapNormalizer`], [`CountNormalizer`], [`SimOptions`], [`StopPolicy`])
//!   so the hot unroll loop can run without per-step rechecking.
//! - Define the model seam ([`PointProcessStepper`], [`StepOutput`],
//!   [`IntensityParams`], [`HiddenState`]) as snapshot-valued stepping over
//!   batched windows.
//! - Carry unroll results with explicit per-trajectory valid lengths
//!   ([`SimulatedBatch`]) instead of padding sentinels.
//!
//! Invariants & assumptions
//! ------------------------
//! - All matrices are `[batch, _]`-major with the newest entry at the end of
//!   each row; indexing is 0-based throughout.
//! - Gap windows and normalizer parameters are finite by construction;
//!   non-finite model output is a runtime divergence reported by the engine,
//!   never silently stored.
//!
//! Conventions
//! -----------
//! - This module performs no I/O and no logging; it operates purely on
//!   `ndarray` containers and scalar values. Error conditions are surfaced
//!   via [`SimResult`](crate::simulation::errors::SimResult).
//!
//! Downstream usage
//! ----------------
//! - The unroll engine in [`simulator`](crate::simulation::simulator) drives
//!   these types; the alignment and query layers consume [`SimulatedBatch`]
//!   output.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover construction validation, slide
//!   mechanics, normalizer round trips and count rounding, output-shape
//!   validation, and ragged truncation of batches.

pub mod batch;
pub mod normalizer;
pub mod options;
pub mod stepper;
pub mod window;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::batch::SimulatedBatch;
pub use self::normalizer::{CountNormalizer, GapNormalizer};
pub use self::options::{SimOptions, StopPolicy, DEFAULT_MAX_STEPS};
pub use self::stepper::{HiddenState, IntensityParams, PointProcessStepper, StepOutput};
pub use self::window::GapWindow;
