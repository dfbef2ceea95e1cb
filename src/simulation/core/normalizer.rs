//! Affine normalizers for gaps and bin counts.
//!
//! Purpose
//! -------
//! Provide small, validated containers for the two affine transforms that
//! connect the simulation core to its externally trained collaborators: the
//! gap normalizer used by the recurrent point-process model, and the
//! mean/std normalizer used by the count-prediction model.
//!
//! Key behaviors
//! -------------
//! - [`GapNormalizer`] maps raw inter-event gaps into model space
//!   (`(gap - shift) / scale`) and back (`gap_norm * scale + shift`), both
//!   elementwise over batched arrays and for scalars.
//! - [`CountNormalizer`] denormalizes count-model output
//!   (`count_norm * std + mean`), rounding to non-negative integer step
//!   targets for the count-driven simulation loop.
//! - Both constructors reject degenerate transforms with typed errors
//!   instead of letting division by zero or NaN propagate.
//!
//! Invariants & assumptions
//! ------------------------
//! - `GapNormalizer::scale` is finite and non-zero; `shift` is finite.
//! - `CountNormalizer::std` is finite and strictly positive; `mean` is
//!   finite.
//! - The normalization parameters are supplied by the dataset pipeline that
//!   trained the models; this module never estimates them.
//!
//! Conventions
//! -----------
//! - "Normalized" always means model space; "unnormalized" means the true
//!   time axis in dataset units.
//! - Rounding of denormalized counts is half-away-from-zero (`f64::round`),
//!   clamped below at zero — a negative count prediction yields a target of
//!   zero events rather than an error.
//!
//! Testing notes
//! -------------
//! - Unit tests cover constructor validation, the normalize/denormalize
//!   round trip, and count rounding/clamping behavior.
use ndarray::{Array1, ArrayView1, ArrayView2};

use crate::simulation::errors::{SimError, SimResult};

/// GapNormalizer — affine transform between raw and normalized gaps.
///
/// Purpose
/// -------
/// Represent the per-dataset affine pair `(shift, scale)` satisfying
/// `denormalize(x) = x * scale + shift`, applied at every point where the
/// simulation engine converts model-space gap predictions into timestamps
/// on the true time axis (and back).
///
/// Fields
/// ------
/// - `shift`: `f64`
///   Additive component of the transform (the `a` of the dataset's
///   normalization scheme). Finite.
/// - `scale`: `f64`
///   Multiplicative component (the `d`). Finite and non-zero so that
///   normalization is invertible.
///
/// Invariants
/// ----------
/// - `shift.is_finite()` and `scale.is_finite()`.
/// - `scale != 0.0`.
///
/// Notes
/// -----
/// - Any normalization scheme expressible as an affine pair is compatible;
///   average-based gap normalization is one instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapNormalizer {
    /// Additive component of the affine transform.
    pub shift: f64,
    /// Multiplicative component of the affine transform (non-zero).
    pub scale: f64,
}

impl GapNormalizer {
    /// Construct a validated gap normalizer from `(shift, scale)`.
    ///
    /// Returns
    /// -------
    /// SimResult<GapNormalizer>
    ///   - `Ok` when both components are finite and `scale != 0.0`.
    ///   - `Err(SimError::InvalidGapShift)` / `Err(SimError::InvalidGapScale)`
    ///     otherwise.
    pub fn new(shift: f64, scale: f64) -> SimResult<Self> {
        if !shift.is_finite() {
            return Err(SimError::InvalidGapShift { value: shift });
        }
        if !scale.is_finite() || scale == 0.0 {
            return Err(SimError::InvalidGapScale { value: scale });
        }
        Ok(GapNormalizer { shift, scale })
    }

    /// Map a single normalized gap back to the true time axis.
    #[inline]
    pub fn denormalize(&self, gap_norm: f64) -> f64 {
        gap_norm * self.scale + self.shift
    }

    /// Map a single raw gap into model space.
    #[inline]
    pub fn normalize(&self, gap: f64) -> f64 {
        (gap - self.shift) / self.scale
    }

    /// Denormalize a batched vector of gaps elementwise.
    pub fn denormalize_batch(&self, gaps_norm: ArrayView1<f64>) -> Array1<f64> {
        gaps_norm.mapv(|g| self.denormalize(g))
    }

    /// Normalize a batched vector of gaps elementwise.
    pub fn normalize_batch(&self, gaps: ArrayView1<f64>) -> Array1<f64> {
        gaps.mapv(|g| self.normalize(g))
    }
}

/// CountNormalizer — mean/std transform for count-model output.
///
/// Purpose
/// -------
/// Denormalize the count-prediction model's output back into event counts
/// and round them into the integer step targets consumed by the
/// count-driven simulation loop.
///
/// Fields
/// ------
/// - `mean`: `f64`
///   Per-bin count mean used during count-model training. Finite.
/// - `std`: `f64`
///   Per-bin count standard deviation. Finite and strictly positive.
///
/// Invariants
/// ----------
/// - `mean.is_finite()`, `std.is_finite()`, `std > 0.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountNormalizer {
    /// Per-bin count mean from the count-model training pipeline.
    pub mean: f64,
    /// Per-bin count standard deviation (strictly positive).
    pub std: f64,
}

impl CountNormalizer {
    /// Construct a validated count normalizer from `(mean, std)`.
    ///
    /// Returns
    /// -------
    /// SimResult<CountNormalizer>
    ///   - `Ok` when `mean` is finite and `std` is finite and > 0.
    ///   - `Err(SimError::InvalidCountMean)` / `Err(SimError::InvalidCountStd)`
    ///     otherwise.
    pub fn new(mean: f64, std: f64) -> SimResult<Self> {
        if !mean.is_finite() {
            return Err(SimError::InvalidCountMean { value: mean });
        }
        if !std.is_finite() || std <= 0.0 {
            return Err(SimError::InvalidCountStd { value: std });
        }
        Ok(CountNormalizer { mean, std })
    }

    /// Denormalize one normalized count prediction to the raw count scale.
    #[inline]
    pub fn denormalize(&self, count_norm: f64) -> f64 {
        count_norm * self.std + self.mean
    }

    /// Denormalize a batch of normalized count predictions and round them to
    /// non-negative integer step targets.
    ///
    /// Notes
    /// -----
    /// - Negative denormalized predictions clamp to a target of 0 events;
    ///   the count model offers no guarantee of positivity.
    /// - Non-finite predictions are rejected so they cannot silently become
    ///   a huge or zero step budget.
    pub fn denormalize_to_targets(&self, counts_norm: ArrayView1<f64>) -> SimResult<Vec<usize>> {
        let mut targets = Vec::with_capacity(counts_norm.len());
        for (trajectory, &c) in counts_norm.iter().enumerate() {
            let raw = self.denormalize(c);
            if !raw.is_finite() {
                return Err(SimError::DivergedSimulation { trajectory, step: 0, value: raw });
            }
            targets.push(raw.round().max(0.0) as usize);
        }
        Ok(targets)
    }

    /// Denormalize a `[batch, bins]` matrix of normalized count predictions
    /// into per-bin step targets, one `Vec<usize>` per forecast bin.
    pub fn denormalize_bins_to_targets(
        &self, counts_norm: ArrayView2<f64>,
    ) -> SimResult<Vec<Vec<usize>>> {
        let mut per_bin = Vec::with_capacity(counts_norm.ncols());
        for bin_idx in 0..counts_norm.ncols() {
            per_bin.push(self.denormalize_to_targets(counts_norm.column(bin_idx))?);
        }
        Ok(per_bin)
    }
}
