//! Weighted essentially non-oscillatory (WENO) reconstruction.
//!
//! A stencil of `2k - 1` samples is split into `k` candidate sub-stencils of
//! `k` samples each. Each candidate carries a polynomial of degree `k - 1`;
//! the optimal weights γ(ξ) combine them into the full-stencil polynomial,
//! and smoothness indicators β bend those weights away from candidates that
//! cross a discontinuity.
//!
//! Components:
//! - [`StencilTables`]: data-independent fits, smoothness forms and γ(ξ)
//! - [`WenoReconstructor`]: cached evaluation for one order
//! - [`weno_reconstruct`]: single-call entry point with explicit positions
//!
//! # Example
//! ```
//! use recon_rs::{WenoOrder, WenoReconstructor};
//!
//! let recon = WenoReconstructor::with_order(WenoOrder::WENO5).unwrap();
//! let w = recon.weights(&[1.0, 1.0, 1.0, 0.0, 0.0], -1.0).unwrap();
//! assert_eq!(w.dominant(), 0);
//! ```

mod batch;
mod reconstructor;
mod tables;

pub use reconstructor::{WenoReconstructor, WenoWeights, weno_reconstruct};
pub use tables::{OffsetWeights, StencilTables};
