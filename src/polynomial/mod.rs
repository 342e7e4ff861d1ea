//! Polynomial fitting on stencils.
//!
//! This module provides:
//! - Exact monomial calculus (evaluation, integrals, derivative Gram matrices)
//! - Normalized stencil geometry (nodes and cell edges)
//! - Stencil Vandermonde matrices for point-value and cell-average fits

mod monomial;
mod stencil;
mod vandermonde;

pub use monomial::{average_row, derivative_gram, eval, falling_factorial, integral, point_row};
pub use stencil::StencilGeometry;
pub use vandermonde::StencilVandermonde;
