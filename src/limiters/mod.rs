//! TVD slope limiters.
//!
//! Limiters bound the slope of a piecewise-linear reconstruction so that no
//! new extrema appear relative to the cell averages.
//!
//! - [`LimiterKind`]: minmod, van Leer, MC and superbee
//! - [`limited_slopes`]: per-cell limited slopes over a [`SampleSeries`](crate::SampleSeries)
//! - [`PiecewiseLinear`]: interface states built from a slope field
//!
//! # References
//! - van Leer (1979), "Towards the ultimate conservative difference scheme V"
//! - Sweby (1984), "High resolution schemes using flux limiters..."
//! - Roe (1986), "Characteristic-based schemes for the Euler equations"

mod kind;
mod piecewise;
mod slopes;

pub use kind::{LimiterKind, Ratio, minmod};
pub use piecewise::{PiecewiseLinear, total_variation};
pub use slopes::{
    FiniteDifference, LIMITER_STENCIL, limited_slope, limited_slopes, unlimited_slopes,
};

#[cfg(feature = "parallel")]
pub use slopes::limited_slopes_parallel;
