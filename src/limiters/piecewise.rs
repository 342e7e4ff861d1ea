//! Piecewise-linear reconstruction from a slope field.
//!
//! Each cell `i` carries `q_i + σ_i (x - x_i)` over `[e_i, e_{i+1}]`, where the
//! edges are midpoints between neighbouring sample positions. The states at
//! interface `i + 1/2` are the right edge value of cell `i` (`q^-`) and the
//! left edge value of cell `i + 1` (`q^+`), which is what a flux function
//! consumes.

use super::kind::LimiterKind;
use super::slopes::limited_slopes;
use crate::error::{ReconError, Result};
use crate::samples::{InterfaceState, SampleSeries};

/// Piecewise-linear reconstruction over a sample series.
#[derive(Clone, Debug)]
pub struct PiecewiseLinear<'s, 'a> {
    samples: &'s SampleSeries<'a>,
    slopes: Vec<f64>,
    edges: Vec<f64>,
}

impl<'s, 'a> PiecewiseLinear<'s, 'a> {
    /// Create a reconstruction from precomputed slopes.
    pub fn new(samples: &'s SampleSeries<'a>, slopes: Vec<f64>) -> Result<Self> {
        if slopes.len() != samples.len() {
            return Err(ReconError::LengthMismatch {
                positions: samples.len(),
                values: slopes.len(),
            });
        }
        Ok(Self {
            samples,
            edges: samples.cell_edges(),
            slopes,
        })
    }

    /// Create a reconstruction with TVD-limited slopes.
    pub fn limited(samples: &'s SampleSeries<'a>, kind: LimiterKind) -> Result<Self> {
        let slopes = limited_slopes(samples, kind)?;
        Self::new(samples, slopes)
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.slopes.len()
    }

    /// Returns true if there are no cells.
    pub fn is_empty(&self) -> bool {
        self.slopes.is_empty()
    }

    /// Slope of every cell.
    pub fn slopes(&self) -> &[f64] {
        &self.slopes
    }

    /// Value at the left edge of cell `i` (`q^+_{i-1/2}`).
    ///
    /// # Panics
    /// If `i >= self.len()`.
    pub fn left_state(&self, i: usize) -> f64 {
        let x = self.samples.positions()[i];
        self.samples.values()[i] - self.slopes[i] * (x - self.edges[i])
    }

    /// Value at the right edge of cell `i` (`q^-_{i+1/2}`).
    ///
    /// # Panics
    /// If `i >= self.len()`.
    pub fn right_state(&self, i: usize) -> f64 {
        let x = self.samples.positions()[i];
        self.samples.values()[i] + self.slopes[i] * (self.edges[i + 1] - x)
    }

    /// Evaluate cell `i` at reference offset `xi` in `[-1, 1]`.
    ///
    /// `xi = -1` and `xi = 1` are the cell edges.
    ///
    /// # Errors
    /// [`ReconError::OffsetOutOfRange`] unless `xi` is in `[-1, 1]`.
    ///
    /// # Panics
    /// If `i >= self.len()`.
    pub fn evaluate(&self, i: usize, xi: f64) -> Result<f64> {
        if !(-1.0..=1.0).contains(&xi) {
            return Err(ReconError::OffsetOutOfRange(xi));
        }
        let mid = 0.5 * (self.edges[i] + self.edges[i + 1]);
        let half = 0.5 * (self.edges[i + 1] - self.edges[i]);
        let x = mid + xi * half;
        Ok(self.samples.values()[i] + self.slopes[i] * (x - self.samples.positions()[i]))
    }

    /// States on both sides of every interior interface `i + 1/2`.
    pub fn interface_states(&self) -> Vec<InterfaceState> {
        (0..self.len().saturating_sub(1))
            .map(|i| InterfaceState {
                index: i,
                left: self.right_state(i),
                right: self.left_state(i + 1),
            })
            .collect()
    }

    /// Total variation of the reconstructed edge values.
    ///
    /// Runs over `q^+_{1/2}, q^-_{1/2}, ...` in spatial order, i.e. both edge
    /// values of every cell.
    pub fn total_variation(&self) -> f64 {
        let edge_values: Vec<f64> = (0..self.len())
            .flat_map(|i| [self.left_state(i), self.right_state(i)])
            .collect();
        total_variation(&edge_values)
    }
}

/// Total variation `Σ |v[i+1] - v[i]|`.
pub fn total_variation(values: &[f64]) -> f64 {
    values.windows(2).map(|w| (w[1] - w[0]).abs()).sum()
}
