//! Batched sliding gap windows — the recurrent model's input context.
//!
//! Purpose
//! -------
//! Provide a validated, fixed-length sliding window of normalized inter-event
//! gaps, batched over trajectories. The window is the encoder context handed
//! to the point-process stepper at every simulation step; its length never
//! changes during a simulation — each step evicts the oldest gap and appends
//! the newest prediction.
//!
//! Key behaviors
//! -------------
//! - Validate shape and finiteness once at construction so the unroll loop
//!   can slide without rechecking.
//! - `slide` shifts every column left by one and writes the newest gap into
//!   the last column, in place, allocation-free.
//!
//! Ordering assumptions
//! --------------------
//! - Columns store the **newest gap at the end** (`window.last()` is the most
//!   recent context gap), matching the lag ordering used throughout the
//!   crate.
use ndarray::{s, Array1, Array2, ArrayView1};

use crate::simulation::errors::{SimError, SimResult};

/// GapWindow — fixed-length batched window of normalized gaps.
///
/// Purpose
/// -------
/// Hold the `[batch, window_len]` context matrix consumed by the stepper,
/// with the newest gap in the last column of each row.
///
/// Invariants
/// ----------
/// - `batch >= 1` and `window_len >= 1`.
/// - Every entry is finite at construction; `slide` preserves this by
///   rejecting non-finite replacements at the call site (the simulator
///   checks predictions before sliding).
///
/// Performance
/// -----------
/// - `slide` is O(batch × window_len) and performs no allocations.
#[derive(Debug, Clone, PartialEq)]
pub struct GapWindow {
    gaps: Array2<f64>,
}

impl GapWindow {
    /// Construct a validated gap window from a `[batch, window_len]` matrix
    /// of normalized gaps.
    ///
    /// Returns
    /// -------
    /// SimResult<GapWindow>
    ///   - `Ok` when the matrix is non-empty and every entry is finite.
    ///   - `Err(SimError::EmptyWindow)` for a zero-sized matrix.
    ///   - `Err(SimError::NonFiniteWindowEntry)` naming the first offending
    ///     entry otherwise.
    pub fn new(gaps: Array2<f64>) -> SimResult<Self> {
        let (batch, window_len) = gaps.dim();
        if batch == 0 || window_len == 0 {
            return Err(SimError::EmptyWindow { batch, window_len });
        }
        for (trajectory, row) in gaps.rows().into_iter().enumerate() {
            for (position, &value) in row.iter().enumerate() {
                if !value.is_finite() {
                    return Err(SimError::NonFiniteWindowEntry { trajectory, position, value });
                }
            }
        }
        Ok(GapWindow { gaps })
    }

    /// Number of trajectories in the batch.
    #[inline]
    pub fn batch(&self) -> usize {
        self.gaps.nrows()
    }

    /// Fixed window length (number of context gaps per trajectory).
    #[inline]
    pub fn len(&self) -> usize {
        self.gaps.ncols()
    }

    /// Always `false`; construction rejects empty windows. Present for
    /// clippy's `len` convention.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// View of the full `[batch, window_len]` context matrix.
    #[inline]
    pub fn view(&self) -> ndarray::ArrayView2<'_, f64> {
        self.gaps.view()
    }

    /// The newest (last-column) gap per trajectory.
    pub fn last(&self) -> Array1<f64> {
        self.gaps.column(self.gaps.ncols() - 1).to_owned()
    }

    /// Slide the window one step: drop the oldest gap and append `newest`.
    ///
    /// Parameters
    /// ----------
    /// - `newest`: `ArrayView1<f64>`
    ///   One normalized gap per trajectory, length equal to `batch()`.
    ///
    /// Errors
    /// ------
    /// - `SimError::BatchSizeMismatch` when `newest.len() != batch()`.
    ///
    /// Notes
    /// -----
    /// - Finiteness of `newest` is the caller's responsibility; the
    ///   simulator validates predictions before sliding so that a divergence
    ///   is reported with its step index.
    pub fn slide(&mut self, newest: ArrayView1<f64>) -> SimResult<()> {
        if newest.len() != self.batch() {
            return Err(SimError::BatchSizeMismatch {
                expected: self.batch(),
                actual: newest.len(),
            });
        }
        let window_len = self.len();
        for col in 1..window_len {
            let shifted = self.gaps.column(col).to_owned();
            self.gaps.slice_mut(s![.., col - 1]).assign(&shifted);
        }
        self.gaps.slice_mut(s![.., window_len - 1]).assign(&newest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Construction validation (empty shape, non-finite entries).
    // - Slide mechanics: eviction order and newest-at-end placement.
    //
    // They intentionally DO NOT cover:
    // - Interaction with the stepper (simulator tests).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that a valid matrix constructs and exposes batch/len.
    //
    // Given
    // -----
    // - A 2×3 finite matrix.
    //
    // Expect
    // ------
    // - `batch() == 2`, `len() == 3`, `last()` equals the last column.
    fn gap_window_new_accepts_valid_matrix() {
        // Arrange
        let gaps = array![[0.1, 0.2, 0.3], [1.0, 1.1, 1.2]];

        // Act
        let window = GapWindow::new(gaps).expect("valid window should construct");

        // Assert
        assert_eq!(window.batch(), 2);
        assert_eq!(window.len(), 3);
        assert_eq!(window.last(), array![0.3, 1.2]);
    }

    #[test]
    // Purpose
    // -------
    // Ensure construction rejects empty matrices and non-finite entries.
    //
    // Given
    // -----
    // - A 0×3 matrix and a 1×2 matrix containing NaN at position (0, 1).
    //
    // Expect
    // ------
    // - `EmptyWindow` and `NonFiniteWindowEntry { trajectory: 0, position: 1 }`.
    fn gap_window_new_rejects_invalid_input() {
        // Arrange / Act / Assert
        assert!(matches!(
            GapWindow::new(Array2::zeros((0, 3))).unwrap_err(),
            SimError::EmptyWindow { .. }
        ));

        let err = GapWindow::new(array![[0.5, f64::NAN]]).unwrap_err();
        match err {
            SimError::NonFiniteWindowEntry { trajectory, position, .. } => {
                assert_eq!(trajectory, 0);
                assert_eq!(position, 1);
            }
            other => panic!("expected NonFiniteWindowEntry, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify slide drops the oldest column and appends the newest gap at the
    // end per trajectory.
    //
    // Given
    // -----
    // - Window rows `[1, 2, 3]` and `[4, 5, 6]`; newest gaps `[7, 8]`.
    //
    // Expect
    // ------
    // - Rows become `[2, 3, 7]` and `[5, 6, 8]`.
    fn gap_window_slide_evicts_oldest_and_appends_newest() {
        // Arrange
        let mut window = GapWindow::new(array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        let newest = array![7.0, 8.0];

        // Act
        window.slide(newest.view()).expect("matching batch should slide");

        // Assert
        assert_eq!(window.view(), array![[2.0, 3.0, 7.0], [5.0, 6.0, 8.0]].view());
    }

    #[test]
    // Purpose
    // -------
    // Ensure slide rejects a newest-gap vector with the wrong batch size.
    //
    // Given
    // -----
    // - A 2-trajectory window and a length-3 newest vector.
    //
    // Expect
    // ------
    // - `SimError::BatchSizeMismatch { expected: 2, actual: 3 }`.
    fn gap_window_slide_rejects_batch_mismatch() {
        // Arrange
        let mut window = GapWindow::new(array![[1.0, 2.0], [3.0, 4.0]]).unwrap();
        let newest = array![1.0, 2.0, 3.0];

        // Act
        let err = window.slide(newest.view()).unwrap_err();

        // Assert
        assert_eq!(err, SimError::BatchSizeMismatch { expected: 2, actual: 3 });
    }
}
