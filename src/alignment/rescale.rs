//! Affine rescaling of simulated timestamps onto true bin boundaries.
//!
//! Purpose
//! -------
//! A count-driven simulation places the right *number* of events in a bin,
//! but its bin edges live wherever the simulated trajectory happened to put
//! them. This module maps each trajectory's simulated bin span affinely onto
//! the externally known true bin span,
//! `f(t) = true_start + (true_width / sim_width) * (t - sim_start)`,
//! and re-derives inter-event gaps from the rescaled timestamps.
//!
//! Key behaviors
//! -------------
//! - The rescale is elementwise over the valid prefix of each trajectory;
//!   positions at or past the valid length are written as exactly `0.0` in
//!   both outputs. Validity is carried by the explicit per-trajectory length,
//!   never inferred from a zero value.
//! - Gaps are successive differences of the rescaled timestamps; the first
//!   valid position has no predecessor and its gap is `0.0`.
//! - Source bin spans come straight from simulated data and are validated
//!   here (finite, non-zero width); true bin spans arrive as already
//!   validated [`BinBounds`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Rescaling preserves event order: the affine factor is positive for
//!   forward bins, so sorted inputs stay sorted.
//! - With identical source and target spans the map is the identity (up to
//!   floating representation), so re-running an aligned bin is harmless.
use ndarray::{Array2, ArrayView2};

use crate::alignment::bounds::BinBounds;
use crate::alignment::errors::{AlignError, AlignResult};

/// RescaledBin — one bin's timestamps mapped onto true boundaries.
///
/// Fields
/// ------
/// - `times`: `Array2<f64>` of shape `[batch, positions]`
///   Rescaled absolute timestamps; positions past a trajectory's valid
///   length hold `0.0`.
/// - `gaps`: `Array2<f64>` of the same shape
///   Successive differences of `times` within the valid prefix; position 0
///   and padding positions hold `0.0`.
/// - `valid_lens`: `Vec<usize>`
///   Number of meaningful positions per trajectory, carried through from
///   the input unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct RescaledBin {
    pub times: Array2<f64>,
    pub gaps: Array2<f64>,
    pub valid_lens: Vec<usize>,
}

/// Map simulated timestamps onto true bin boundaries, per trajectory.
///
/// Parameters
/// ----------
/// - `times`: `[batch, positions]` simulated absolute timestamps.
/// - `valid_lens`: meaningful positions per trajectory; entries past this
///   are ignored on input and zeroed on output.
/// - `sim_spans`: per-trajectory `(start, end)` of the span the simulated
///   events actually occupy (typically seed timestamp to the jittered bin
///   edge).
/// - `true_bounds`: per-trajectory true bin boundaries.
///
/// Returns
/// -------
/// AlignResult<RescaledBin>
///   Rescaled timestamps, re-derived gaps, and the carried valid lengths.
///
/// Errors
/// ------
/// - `AlignError::LengthMismatch` when per-trajectory inputs disagree in
///   length.
/// - `AlignError::NonFiniteBound` / `AlignError::DegenerateSourceBin` for
///   bad simulated spans.
/// - `AlignError::NonFiniteTime` for a non-finite timestamp inside a valid
///   prefix.
pub fn rescale_to_true_bin(
    times: ArrayView2<f64>, valid_lens: &[usize], sim_spans: &[(f64, f64)],
    true_bounds: &[BinBounds],
) -> AlignResult<RescaledBin> {
    let (batch, positions) = times.dim();
    check_len(batch, valid_lens.len())?;
    check_len(batch, sim_spans.len())?;
    check_len(batch, true_bounds.len())?;

    let mut out_times = Array2::zeros((batch, positions));
    let mut out_gaps = Array2::zeros((batch, positions));

    for i in 0..batch {
        let (sim_start, sim_end) = sim_spans[i];
        if !sim_start.is_finite() || !sim_end.is_finite() {
            return Err(AlignError::NonFiniteBound { start: sim_start, end: sim_end });
        }
        let sim_width = sim_end - sim_start;
        if sim_width == 0.0 {
            return Err(AlignError::DegenerateSourceBin { trajectory: i });
        }
        let factor = true_bounds[i].width() / sim_width;
        let len = valid_lens[i].min(positions);

        for j in 0..len {
            let t = times[(i, j)];
            if !t.is_finite() {
                return Err(AlignError::NonFiniteTime { trajectory: i, value: t });
            }
            out_times[(i, j)] = true_bounds[i].start + factor * (t - sim_start);
        }
        for j in 1..len {
            out_gaps[(i, j)] = out_times[(i, j)] - out_times[(i, j - 1)];
        }
    }

    Ok(RescaledBin { times: out_times, gaps: out_gaps, valid_lens: valid_lens.to_vec() })
}

fn check_len(expected: usize, actual: usize) -> AlignResult<()> {
    if expected != actual {
        return Err(AlignError::LengthMismatch { expected, actual });
    }
    Ok(())
}
