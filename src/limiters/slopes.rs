//! Limited and unlimited slope fields over a sample series.
//!
//! For interior cell `i` the forward and backward divided differences are
//!
//! ```text
//! F_i = (y[i+1] - y[i]) / (x[i+1] - x[i])
//! B_i = (y[i] - y[i-1]) / (x[i] - x[i-1])
//! ```
//!
//! and the limited slope is `σ_i = φ(F_i / B_i) · B_i`. The first and last
//! cells lack a full stencil and get a zero slope.

use log::trace;

use super::kind::LimiterKind;
use crate::error::Result;
use crate::samples::SampleSeries;

/// Stencil width required by the TVD limiters.
pub const LIMITER_STENCIL: usize = 3;

/// Compute TVD-limited slopes for every cell.
///
/// # Errors
/// Returns [`ReconError::InsufficientSamples`](crate::ReconError::InsufficientSamples)
/// when the series has fewer than three samples.
pub fn limited_slopes(samples: &SampleSeries, kind: LimiterKind) -> Result<Vec<f64>> {
    samples.require(LIMITER_STENCIL)?;
    let n = samples.len();
    trace!("{} slopes over {} samples", kind, n);

    let mut slopes = vec![0.0; n];
    for i in 1..n - 1 {
        let forward = samples.divided_difference(i);
        let backward = samples.divided_difference(i - 1);
        slopes[i] = kind.limit(forward, backward);
    }
    Ok(slopes)
}

/// Compute TVD-limited slopes from raw position and value slices.
///
/// Validates the inputs with [`SampleSeries::new`] first.
pub fn limited_slope(positions: &[f64], values: &[f64], kind: LimiterKind) -> Result<Vec<f64>> {
    let samples = SampleSeries::new(positions, values)?;
    limited_slopes(&samples, kind)
}

/// Compute limited slopes in parallel.
///
/// Identical results to [`limited_slopes`]; cells are independent.
#[cfg(feature = "parallel")]
pub fn limited_slopes_parallel(samples: &SampleSeries, kind: LimiterKind) -> Result<Vec<f64>> {
    use rayon::prelude::*;

    samples.require(LIMITER_STENCIL)?;
    let n = samples.len();

    let slopes = (0..n)
        .into_par_iter()
        .map(|i| {
            if i == 0 || i == n - 1 {
                0.0
            } else {
                kind.limit(samples.divided_difference(i), samples.divided_difference(i - 1))
            }
        })
        .collect();
    Ok(slopes)
}

/// Unlimited two-point slope estimates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FiniteDifference {
    /// Downwind slope `F_i` (Lax-Wendroff)
    Forward,
    /// Upwind slope `B_i` (Beam-Warming)
    Backward,
    /// Central slope over `[x[i-1], x[i+1]]` (Fromm)
    #[default]
    Centered,
}

/// Unlimited finite-difference slopes.
///
/// Only two samples are needed. Cells at the ends of the series fall back to
/// the one-sided difference that exists.
pub fn unlimited_slopes(samples: &SampleSeries, scheme: FiniteDifference) -> Result<Vec<f64>> {
    samples.require(2)?;
    let n = samples.len();
    let x = samples.positions();
    let y = samples.values();

    let slopes = (0..n)
        .map(|i| {
            let has_left = i > 0;
            let has_right = i + 1 < n;
            match (scheme, has_left, has_right) {
                (FiniteDifference::Centered, true, true) => {
                    (y[i + 1] - y[i - 1]) / (x[i + 1] - x[i - 1])
                }
                (FiniteDifference::Backward, true, _) | (_, true, false) => {
                    samples.divided_difference(i - 1)
                }
                _ => samples.divided_difference(i),
            }
        })
        .collect();
    Ok(slopes)
}
