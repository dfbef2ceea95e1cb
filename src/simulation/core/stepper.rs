//! The stepper seam — contract between the simulation engine and a trained
//! recurrent point-process model.
//!
//! Purpose
//! -------
//! Define the trait the autoregressive unroll engine drives. A stepper wraps
//! a trained model: given the current gap window and an optional carried
//! hidden state, it produces per-position gap predictions, the raw intensity
//! parameters of the conditional-intensity family, and an updated hidden
//! state aligned with the window's last position.
//!
//! Key behaviors
//! -------------
//! - [`PointProcessStepper::step`] is a pure snapshot operation: returned
//!   hidden states are owned values, and calling `step` again with a
//!   different window must not corrupt previously returned states.
//! - `hidden == None` means "first call": the model substitutes its own
//!   zero initialization.
//! - [`StepOutput::validate_against`] checks the model's output shapes
//!   against the window before the engine consumes them, so a misbehaving
//!   model surfaces as a typed error rather than a slicing panic.
//!
//! Conventions
//! -----------
//! - Gap predictions are in **normalized** model space; the engine
//!   denormalizes them via [`GapNormalizer`](super::normalizer::GapNormalizer).
//! - Only the last-position prediction is consumed during single-step
//!   decoding; the full per-position matrix is returned for likelihood-based
//!   variants.
use ndarray::{Array1, Array2};

use crate::simulation::core::window::GapWindow;
use crate::simulation::errors::{SimError, SimResult};

/// Per-trajectory hidden state carried across simulation steps,
/// shape `[batch, hidden_size]`.
pub type HiddenState = Array2<f64>;

/// IntensityParams — raw conditional-intensity parameters per trajectory.
///
/// Purpose
/// -------
/// Carry the exponential-decay intensity parameterization produced alongside
/// each gap prediction: the base log-intensity `d` and the decay/growth rate
/// `wt`, one value per trajectory. The engine itself never evaluates the
/// intensity; these are passed through for likelihood-based consumers.
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityParams {
    /// Base log-intensity per trajectory.
    pub d: Array1<f64>,
    /// Decay/growth rate per trajectory.
    pub wt: Array1<f64>,
}

impl IntensityParams {
    /// Log-intensity `d + wt * elapsed` at a given time since the last event.
    ///
    /// Convenience for consumers inspecting the conditional intensity
    /// implied by a step; not used by the unroll engine.
    pub fn log_intensity_at(&self, trajectory: usize, elapsed: f64) -> f64 {
        self.d[trajectory] + self.wt[trajectory] * elapsed
    }
}

/// StepOutput — one stepper invocation's results.
///
/// Fields
/// ------
/// - `gaps_pred`: `Array2<f64>` of shape `[batch, window_len]`
///   Predicted next normalized gap for every window position; single-step
///   decoding consumes only the last column.
/// - `intensity`: [`IntensityParams`]
///   Raw intensity parameters aligned with the last window position.
/// - `hidden_state`: [`HiddenState`]
///   Updated recurrent state, shape `[batch, hidden_size]`; an owned
///   snapshot, never a shared mutable handle.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutput {
    pub gaps_pred: Array2<f64>,
    pub intensity: IntensityParams,
    pub hidden_state: HiddenState,
}

impl StepOutput {
    /// Check this output's shapes against the window that produced it.
    ///
    /// Errors
    /// ------
    /// - `SimError::StepOutputShapeMismatch` when `gaps_pred` does not match
    ///   the window's `[batch, window_len]` shape.
    /// - `SimError::BatchSizeMismatch` when the hidden state or intensity
    ///   vectors have a different batch size than the window.
    pub fn validate_against(&self, window: &GapWindow) -> SimResult<()> {
        let expected = (window.batch(), window.len());
        if self.gaps_pred.dim() != expected {
            return Err(SimError::StepOutputShapeMismatch {
                expected,
                actual: self.gaps_pred.dim(),
            });
        }
        if self.hidden_state.nrows() != window.batch() {
            return Err(SimError::BatchSizeMismatch {
                expected: window.batch(),
                actual: self.hidden_state.nrows(),
            });
        }
        if self.intensity.d.len() != window.batch() || self.intensity.wt.len() != window.batch() {
            return Err(SimError::BatchSizeMismatch {
                expected: window.batch(),
                actual: self.intensity.d.len(),
            });
        }
        Ok(())
    }
}

/// Contract for a trained recurrent point-process model.
///
/// Purpose
/// -------
/// The seam between the simulation engine and the (externally trained)
/// model. Implementations wrap whatever inference backend produced the
/// model; the engine only requires repeatable, snapshot-valued stepping.
///
/// Key behaviors
/// -------------
/// - `step(window, None)` starts from the model's zero state.
/// - `step(window, Some(hidden))` resumes from a previously returned state.
/// - Implementations must be callable repeatedly with different window
///   slices without corrupting earlier returned states.
pub trait PointProcessStepper {
    /// Width of the hidden state vectors this stepper produces.
    fn hidden_size(&self) -> usize;

    /// Advance the model one step over the given window.
    ///
    /// Parameters
    /// ----------
    /// - `window`: the current `[batch, window_len]` normalized gap context.
    /// - `hidden`: `None` on the first call, otherwise a state previously
    ///   returned by this stepper.
    ///
    /// Returns
    /// -------
    /// SimResult<StepOutput>
    ///   Per-position gap predictions, intensity parameters, and the updated
    ///   hidden state.
    fn step(&self, window: &GapWindow, hidden: Option<&HiddenState>) -> SimResult<StepOutput>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `StepOutput::validate_against` shape checks.
    // - `IntensityParams::log_intensity_at` arithmetic.
    //
    // They intentionally DO NOT cover:
    // - Real stepper implementations (the simulator tests define synthetic
    //   steppers and exercise the trait end to end).
    // -------------------------------------------------------------------------

    fn output(batch: usize, window_len: usize, hidden: usize) -> StepOutput {
        StepOutput {
            gaps_pred: Array2::zeros((batch, window_len)),
            intensity: IntensityParams { d: Array1::zeros(batch), wt: Array1::zeros(batch) },
            hidden_state: Array2::zeros((batch, hidden)),
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that matching shapes validate and mismatched gap matrices are
    // reported with both shapes.
    //
    // Given
    // -----
    // - A 2×3 window; outputs with gap shapes 2×3 (good) and 2×2 (bad).
    //
    // Expect
    // ------
    // - `Ok(())` for the matching output; `StepOutputShapeMismatch` carrying
    //   `expected = (2, 3)`, `actual = (2, 2)` for the other.
    fn step_output_validate_checks_gap_shape() {
        // Arrange
        let window = GapWindow::new(array![[0.1, 0.2, 0.3], [0.4, 0.5, 0.6]]).unwrap();

        // Act / Assert
        assert!(output(2, 3, 4).validate_against(&window).is_ok());
        assert_eq!(
            output(2, 2, 4).validate_against(&window).unwrap_err(),
            SimError::StepOutputShapeMismatch { expected: (2, 3), actual: (2, 2) }
        );
    }

    #[test]
    // Purpose
    // -------
    // Ensure a hidden state with the wrong batch size is rejected.
    //
    // Given
    // -----
    // - A 2×3 window; an output whose hidden state has 3 rows.
    //
    // Expect
    // ------
    // - `SimError::BatchSizeMismatch { expected: 2, actual: 3 }`.
    fn step_output_validate_checks_hidden_batch() {
        // Arrange
        let window = GapWindow::new(array![[0.1, 0.2, 0.3], [0.4, 0.5, 0.6]]).unwrap();
        let mut out = output(2, 3, 4);
        out.hidden_state = Array2::zeros((3, 4));

        // Act / Assert
        assert_eq!(
            out.validate_against(&window).unwrap_err(),
            SimError::BatchSizeMismatch { expected: 2, actual: 3 }
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify the log-intensity helper evaluates `d + wt * elapsed`.
    //
    // Given
    // -----
    // - `d = [1.0]`, `wt = [-0.5]`, `elapsed = 2.0`.
    //
    // Expect
    // ------
    // - `log_intensity_at(0, 2.0) == 0.0`.
    fn intensity_log_intensity_at_evaluates_affine_form() {
        // Arrange
        let intensity = IntensityParams { d: array![1.0], wt: array![-0.5] };

        // Act / Assert
        assert!((intensity.log_intensity_at(0, 2.0) - 0.0).abs() < 1e-12);
    }
}
