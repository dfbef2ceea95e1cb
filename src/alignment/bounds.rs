//! Bin boundaries on the true time axis.
//!
//! Purpose
//! -------
//! Provide a validated `(start, end)` pair for forecast bins. Boundaries are
//! externally supplied (derived from the dataset's fixed bin size and a
//! per-trajectory anchor time) and are consumed by the rescaler and by range
//! queries; validating once here keeps the arithmetic downstream
//! unconditional.
use crate::alignment::errors::{AlignError, AlignResult};

/// BinBounds — one forecast bin's `(start, end)` on the true time axis.
///
/// Invariants
/// ----------
/// - Both components are finite.
/// - `end > start` (bins have positive width).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinBounds {
    /// Inclusive-exclusive lower edge of the bin.
    pub start: f64,
    /// Upper edge of the bin.
    pub end: f64,
}

impl BinBounds {
    /// Construct validated bin bounds.
    ///
    /// Errors
    /// ------
    /// - `AlignError::NonFiniteBound` when either component is NaN/±inf.
    /// - `AlignError::EmptyBin` when `end <= start`.
    pub fn new(start: f64, end: f64) -> AlignResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(AlignError::NonFiniteBound { start, end });
        }
        if end <= start {
            return Err(AlignError::EmptyBin { start, end });
        }
        Ok(BinBounds { start, end })
    }

    /// Width of the bin, `end - start`. Strictly positive by construction.
    #[inline]
    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}
