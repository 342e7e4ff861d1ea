//! Validated 1D sample sequences.
//!
//! A [`SampleSeries`] pairs strictly increasing positions with finite values.
//! Limiters and WENO stencils both read from it; neither owns the data.

use std::borrow::Cow;

use crate::error::{ReconError, Result};

/// Relative spacing tolerance used to detect uniform grids.
pub const UNIFORM_SPACING_TOL: f64 = 1e-12;

/// Ordered `(position, value)` samples.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleSeries<'a> {
    positions: Cow<'a, [f64]>,
    values: &'a [f64],
}

impl<'a> SampleSeries<'a> {
    /// Create a sample series from caller-owned positions and values.
    ///
    /// # Errors
    /// - [`ReconError::LengthMismatch`] if the slices differ in length
    /// - [`ReconError::NonFiniteSample`] on NaN or infinite entries
    /// - [`ReconError::NonIncreasingPositions`] if positions are not strictly increasing
    pub fn new(positions: &'a [f64], values: &'a [f64]) -> Result<Self> {
        if positions.len() != values.len() {
            return Err(ReconError::LengthMismatch {
                positions: positions.len(),
                values: values.len(),
            });
        }
        for (i, (&x, &y)) in positions.iter().zip(values.iter()).enumerate() {
            if !x.is_finite() || !y.is_finite() {
                return Err(ReconError::NonFiniteSample { index: i });
            }
        }
        for i in 1..positions.len() {
            if positions[i] <= positions[i - 1] {
                return Err(ReconError::NonIncreasingPositions { index: i });
            }
        }
        Ok(Self {
            positions: Cow::Borrowed(positions),
            values,
        })
    }

    /// Create a uniformly spaced series starting at `x0` with spacing `dx`.
    pub fn uniform(x0: f64, dx: f64, values: &'a [f64]) -> Result<Self> {
        if !x0.is_finite() || !dx.is_finite() {
            return Err(ReconError::NonFiniteSample { index: 0 });
        }
        if dx <= 0.0 && values.len() > 1 {
            return Err(ReconError::NonIncreasingPositions { index: 1 });
        }
        check_finite(values)?;
        let positions = (0..values.len()).map(|i| x0 + i as f64 * dx).collect();
        Ok(Self {
            positions: Cow::Owned(positions),
            values,
        })
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if there are no samples.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sample positions.
    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    /// Sample values.
    pub fn values(&self) -> &'a [f64] {
        self.values
    }

    /// Fail unless the series has at least `required` samples.
    pub fn require(&self, required: usize) -> Result<()> {
        if self.len() < required {
            return Err(ReconError::insufficient(required, self.len()));
        }
        Ok(())
    }

    /// Divided difference `(y[i+1] - y[i]) / (x[i+1] - x[i])`.
    ///
    /// Panics if `i + 1 >= len`.
    #[inline]
    pub fn divided_difference(&self, i: usize) -> f64 {
        (self.values[i + 1] - self.values[i]) / (self.positions[i + 1] - self.positions[i])
    }

    /// Cell edges: midpoints between neighbouring positions, with the two
    /// outer edges mirrored across the first and last sample.
    ///
    /// Returns `len + 1` edges. Cell `i` spans `[edges[i], edges[i + 1]]`.
    pub fn cell_edges(&self) -> Vec<f64> {
        cell_edges(&self.positions)
    }

    /// Width of every cell implied by [`cell_edges`](Self::cell_edges).
    pub fn cell_widths(&self) -> Vec<f64> {
        self.cell_edges().windows(2).map(|e| e[1] - e[0]).collect()
    }

    /// Whether the spacing is uniform within [`UNIFORM_SPACING_TOL`].
    pub fn is_uniform(&self) -> bool {
        is_uniform(&self.positions)
    }
}

/// Reconstructed states on either side of interface `i + 1/2`.
///
/// `left` is the value coming from cell `index` (often written `q^-`),
/// `right` the value from cell `index + 1` (`q^+`).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterfaceState {
    /// Index of the cell to the left of the interface
    pub index: usize,
    /// State reconstructed from the left cell
    pub left: f64,
    /// State reconstructed from the right cell
    pub right: f64,
}

impl InterfaceState {
    /// Jump `right - left` across the interface.
    pub fn jump(&self) -> f64 {
        self.right - self.left
    }
}

pub(crate) fn check_finite(values: &[f64]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(ReconError::NonFiniteSample { index }),
        None => Ok(()),
    }
}

pub(crate) fn cell_edges(positions: &[f64]) -> Vec<f64> {
    let n = positions.len();
    match n {
        0 => Vec::new(),
        1 => vec![positions[0] - 0.5, positions[0] + 0.5],
        _ => {
            let mut edges = Vec::with_capacity(n + 1);
            edges.push(positions[0] - 0.5 * (positions[1] - positions[0]));
            for w in positions.windows(2) {
                edges.push(0.5 * (w[0] + w[1]));
            }
            edges.push(positions[n - 1] + 0.5 * (positions[n - 1] - positions[n - 2]));
            edges
        }
    }
}

pub(crate) fn is_uniform(positions: &[f64]) -> bool {
    if positions.len() < 3 {
        return true;
    }
    let h = positions[1] - positions[0];
    positions
        .windows(2)
        .all(|w| ((w[1] - w[0]) - h).abs() <= UNIFORM_SPACING_TOL * h.abs())
}
