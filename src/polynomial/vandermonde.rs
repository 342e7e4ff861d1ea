//! Stencil Vandermonde matrices.
//!
//! The sampling matrix V maps monomial coefficients to the samples of a
//! stencil:
//! - point values: `V[i,m] = x_i^m`
//! - cell averages: `V[i,m] = (1/|I_i|) ∫_{I_i} x^m dx`
//!
//! so `samples = V * coeffs` and `coeffs = V^{-1} * samples`. Every linear
//! functional of the fitted polynomial (a point value, a derivative energy)
//! becomes a fixed row or quadratic form in the stencil samples.

use faer::{Mat, linalg::solvers::Solve};

use super::monomial::{average_row, point_row};
use super::stencil::StencilGeometry;
use crate::config::SampleKind;
use crate::error::{ReconError, Result};

/// Tolerance on `V * V^{-1} = I` below which a fit is accepted.
const INVERSE_TOL: f64 = 1e-8;

/// Sampling matrix of a stencil and its inverse.
#[derive(Clone)]
pub struct StencilVandermonde {
    /// Sampling matrix: V[i,m] is sample i of monomial m
    pub v: Mat<f64>,
    /// Inverse: monomial coefficients from samples
    pub v_inv: Mat<f64>,
    /// Polynomial degree (stencil width - 1)
    pub degree: usize,
}

impl std::fmt::Debug for StencilVandermonde {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StencilVandermonde")
            .field("degree", &self.degree)
            .finish()
    }
}

impl StencilVandermonde {
    /// Build the sampling matrix for `geometry` and invert it.
    ///
    /// # Errors
    /// [`ReconError::DegenerateStencil`] if the matrix is numerically singular.
    pub fn new(kind: SampleKind, geometry: &StencilGeometry) -> Result<Self> {
        let n = geometry.len();
        if n == 0 {
            return Err(ReconError::DegenerateStencil("empty stencil".to_string()));
        }

        let mut v = Mat::<f64>::zeros(n, n);
        for i in 0..n {
            let row = match kind {
                SampleKind::PointValues => point_row(n, geometry.nodes[i]),
                SampleKind::CellAverages => {
                    average_row(n, geometry.edges[i], geometry.edges[i + 1])
                }
            };
            for (m, value) in row.into_iter().enumerate() {
                v[(i, m)] = value;
            }
        }

        // Compute inverse using LU decomposition
        let lu = v.as_ref().full_piv_lu();
        let mut v_inv = Mat::<f64>::zeros(n, n);

        // Solve V * V_inv = I column by column
        for j in 0..n {
            let mut rhs = Mat::<f64>::zeros(n, 1);
            rhs[(j, 0)] = 1.0;
            let col = lu.solve(&rhs);
            for i in 0..n {
                v_inv[(i, j)] = col[(i, 0)];
            }
        }

        let residual = identity_residual(&v, &v_inv);
        if !residual.is_finite() || residual > INVERSE_TOL {
            return Err(ReconError::DegenerateStencil(format!(
                "sampling matrix of width {n} is singular (residual {residual:e})"
            )));
        }

        Ok(Self {
            v,
            v_inv,
            degree: n - 1,
        })
    }

    /// Number of samples in the stencil.
    pub fn width(&self) -> usize {
        self.degree + 1
    }

    /// Monomial coefficients of the polynomial fitted to `samples`.
    pub fn coefficients(&self, samples: &[f64]) -> Vec<f64> {
        let n = self.width();
        (0..n)
            .map(|m| (0..n).map(|i| self.v_inv[(m, i)] * samples[i]).sum::<f64>())
            .collect()
    }

    /// Weights `r` with `p(x) = Σ r_i samples_i` for the fitted polynomial.
    pub fn evaluation_row(&self, x: f64) -> Vec<f64> {
        let n = self.width();
        let powers = point_row(n, x);
        (0..n)
            .map(|i| (0..n).map(|m| powers[m] * self.v_inv[(m, i)]).sum::<f64>())
            .collect()
    }

    /// Pull a quadratic form on coefficients back to samples: `V^{-T} G V^{-1}`.
    pub fn pullback(&self, gram: &[Vec<f64>]) -> Mat<f64> {
        let n = self.width();
        // tmp = G * V^{-1}
        let mut tmp = Mat::<f64>::zeros(n, n);
        for m in 0..n {
            for j in 0..n {
                tmp[(m, j)] = (0..n).map(|l| gram[m][l] * self.v_inv[(l, j)]).sum::<f64>();
            }
        }
        let mut q = Mat::<f64>::zeros(n, n);
        for i in 0..n {
            for j in 0..n {
                q[(i, j)] = (0..n).map(|m| self.v_inv[(m, i)] * tmp[(m, j)]).sum::<f64>();
            }
        }
        q
    }
}

/// Max-norm of `A * B - I`.
fn identity_residual(a: &Mat<f64>, b: &Mat<f64>) -> f64 {
    let n = a.nrows();
    let mut worst: f64 = 0.0;
    for i in 0..n {
        for j in 0..n {
            let sum: f64 = (0..n).map(|k| a[(i, k)] * b[(k, j)]).sum();
            let target = if i == j { 1.0 } else { 0.0 };
            let err = (sum - target).abs();
            if err.is_nan() {
                return f64::NAN;
            }
            worst = worst.max(err);
        }
    }
    worst
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polynomial::monomial::eval;

    #[test]
    fn test_point_fit_reproduces_polynomial() {
        let g = StencilGeometry::uniform(3);
        let vander = StencilVandermonde::new(SampleKind::PointValues, &g).unwrap();

        // p(x) = 1 - x + 2x²
        let p = [1.0, -1.0, 2.0];
        let samples: Vec<f64> = g.nodes.iter().map(|&x| eval(&p, x)).collect();
        let coeffs = vander.coefficients(&samples);
        for (a, b) in coeffs.iter().zip(&p) {
            assert!((a - b).abs() < 1e-12);
        }

        let row = vander.evaluation_row(0.5);
        let value: f64 = row.iter().zip(&samples).map(|(r, s)| r * s).sum();
        assert!((value - eval(&p, 0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_average_fit_reproduces_means() {
        let g = StencilGeometry::uniform(3);
        let vander = StencilVandermonde::new(SampleKind::CellAverages, &g).unwrap();

        // Averages of x² over unit cells centred at -1, 0, 1
        let samples = [1.0 + 1.0 / 12.0, 1.0 / 12.0, 1.0 + 1.0 / 12.0];
        let coeffs = vander.coefficients(&samples);
        assert!(coeffs[0].abs() < 1e-12);
        assert!(coeffs[1].abs() < 1e-12);
        assert!((coeffs[2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cell_average_interface_row() {
        // Classic third-order reconstruction at x = 1/2 from averages at -2..0
        let g = StencilGeometry::uniform(5).sub(0, 3);
        let vander = StencilVandermonde::new(SampleKind::CellAverages, &g).unwrap();
        let row = vander.evaluation_row(0.5);
        let expected = [2.0 / 6.0, -7.0 / 6.0, 11.0 / 6.0];
        for (a, b) in row.iter().zip(&expected) {
            assert!((a - b).abs() < 1e-12, "{a} vs {b}");
        }
    }

    #[test]
    fn test_rows_sum_to_one() {
        // Constants are reproduced exactly
        for width in 2..=7 {
            let g = StencilGeometry::uniform(if width % 2 == 1 { width } else { width + 1 })
                .sub(0, width);
            for kind in [SampleKind::PointValues, SampleKind::CellAverages] {
                let vander = StencilVandermonde::new(kind, &g).unwrap();
                let sum: f64 = vander.evaluation_row(0.3).iter().sum();
                assert!((sum - 1.0).abs() < 1e-9, "width {width}: {sum}");
            }
        }
    }

    #[test]
    fn test_duplicate_nodes_are_singular() {
        let g = StencilGeometry {
            nodes: vec![0.0, 0.0, 1.0],
            edges: vec![-0.5, 0.0, 0.5, 1.5],
        };
        assert!(matches!(
            StencilVandermonde::new(SampleKind::PointValues, &g),
            Err(ReconError::DegenerateStencil(_))
        ));
    }
}
