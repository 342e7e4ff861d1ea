//! # recon-rs
//!
//! High-resolution reconstruction of 1D sampled data for finite-volume and
//! finite-difference solvers.
//!
//! This crate provides:
//! - TVD slope limiters (minmod, van Leer, MC, superbee)
//! - Piecewise-linear interface states from limited slopes
//! - WENO reconstruction of arbitrary odd order `2k - 1` (k = 2..=6)
//! - Point-value and cell-average sample interpretations
//! - Batch evaluation over whole arrays, data-parallel with `parallel`

pub mod config;
pub mod error;
pub mod limiters;
pub mod polynomial;
pub mod samples;
pub mod weno;

// Re-export main types for convenience
pub use config::{
    DEFAULT_EPSILON, DEFAULT_POWER, MAX_HALF_WIDTH, SampleKind, WenoConfig, WenoOrder,
    check_offset,
};
pub use error::{ReconError, Result};
pub use limiters::{
    FiniteDifference, LimiterKind, PiecewiseLinear, Ratio, limited_slope, limited_slopes, minmod,
    total_variation, unlimited_slopes,
};
#[cfg(feature = "parallel")]
pub use limiters::limited_slopes_parallel;
pub use samples::{InterfaceState, SampleSeries};
pub use weno::{OffsetWeights, StencilTables, WenoReconstructor, WenoWeights, weno_reconstruct};
