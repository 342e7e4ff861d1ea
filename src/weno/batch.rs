//! WENO over whole arrays of unit-spaced samples.

use super::reconstructor::{WenoReconstructor, blend};
use crate::error::{ReconError, Result};
use crate::samples::{InterfaceState, check_finite};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

impl WenoReconstructor {
    /// Value at `xi` in every cell with a full stencil.
    ///
    /// Entry `i` is `None` for the `k - 1` cells at either end whose stencil
    /// would leave the array.
    pub fn reconstruct_cells(&self, values: &[f64], xi: f64) -> Result<Vec<Option<f64>>> {
        let k = self.check_array(values, self.order().stencil_width())?;
        let offset = self.offset_weights(xi)?;
        let n = values.len();

        (0..n)
            .map(|i| {
                if i + 1 < k || i + k > n {
                    return Ok(None);
                }
                let stencil = &values[i + 1 - k..i + k];
                blend(
                    self.tables(),
                    &offset,
                    stencil,
                    self.config().epsilon,
                    self.config().power,
                )
                .map(|w| Some(w.value))
            })
            .collect()
    }

    /// Left and right states at every interface whose two neighbouring cells
    /// both have a full stencil.
    pub fn reconstruct_interfaces(&self, values: &[f64]) -> Result<Vec<InterfaceState>> {
        let k = self.check_array(values, self.order().stencil_width() + 1)?;
        let n = values.len();
        ((k - 1)..(n - k))
            .map(|i| self.interface_state(values, i, k))
            .collect()
    }

    fn interface_state(&self, values: &[f64], i: usize, k: usize) -> Result<InterfaceState> {
        let left = self.reconstruct(&values[i + 1 - k..i + k], 1.0)?;
        let right = self.reconstruct(&values[i + 2 - k..i + k + 1], -1.0)?;
        Ok(InterfaceState {
            index: i,
            left,
            right,
        })
    }

    fn check_array(&self, values: &[f64], required: usize) -> Result<usize> {
        if values.len() < required {
            return Err(ReconError::insufficient(required, values.len()));
        }
        check_finite(values)?;
        Ok(self.order().half_width())
    }
}

#[cfg(feature = "parallel")]
impl WenoReconstructor {
    /// Parallel version of [`reconstruct_cells`](Self::reconstruct_cells).
    pub fn reconstruct_cells_parallel(&self, values: &[f64], xi: f64) -> Result<Vec<Option<f64>>> {
        let k = self.check_array(values, self.order().stencil_width())?;
        let offset = self.offset_weights(xi)?;
        let n = values.len();

        (0..n)
            .into_par_iter()
            .map(|i| {
                if i + 1 < k || i + k > n {
                    return Ok(None);
                }
                blend(
                    self.tables(),
                    &offset,
                    &values[i + 1 - k..i + k],
                    self.config().epsilon,
                    self.config().power,
                )
                .map(|w| Some(w.value))
            })
            .collect()
    }

    /// Parallel version of [`reconstruct_interfaces`](Self::reconstruct_interfaces).
    pub fn reconstruct_interfaces_parallel(&self, values: &[f64]) -> Result<Vec<InterfaceState>> {
        let k = self.check_array(values, self.order().stencil_width() + 1)?;
        let n = values.len();
        // Warm both edge offsets before fanning out
        self.offset_weights(1.0)?;
        self.offset_weights(-1.0)?;
        ((k - 1)..(n - k))
            .into_par_iter()
            .map(|i| self.interface_state(values, i, k))
            .collect()
    }
}
