//! Precomputed WENO stencil tables.
//!
//! For a stencil of `2k - 1` samples and `k` candidate sub-stencils these
//! tables hold everything that does not depend on the data:
//! - the candidate and full-stencil polynomial fits
//! - the Jiang-Shu smoothness indicators as `k x k` quadratic forms
//! - per offset ξ, the evaluation rows and the optimal weights γ(ξ)
//!
//! # References
//! - Jiang & Shu (1996), "Efficient implementation of weighted ENO schemes"
//! - Shu (1998), "Essentially non-oscillatory and weighted essentially
//!   non-oscillatory schemes for hyperbolic conservation laws"

use faer::{Mat, linalg::solvers::Solve};
use log::{debug, warn};

use crate::config::{SampleKind, WenoOrder};
use crate::error::{ReconError, Result};
use crate::polynomial::{StencilGeometry, StencilVandermonde, derivative_gram};

/// Residual allowed in `Σ γ_j p_j(ξ) = P(ξ)` (max-norm over sample weights).
const WEIGHT_RESIDUAL_TOL: f64 = 1e-8;

/// Relative ridge added to the normal equations.
const RIDGE: f64 = 1e-10;

/// Refinement sweeps after the ridge solve.
const REFINEMENT_STEPS: usize = 4;

/// Above this l1-norm an optimal-weight solution is treated as noise from a
/// rank-deficient system.
const WEIGHT_L1_MAX: f64 = 1e6;

/// Data-independent tables for one order, sample kind and stencil geometry.
#[derive(Clone, Debug)]
pub struct StencilTables {
    order: WenoOrder,
    kind: SampleKind,
    geometry: StencilGeometry,
    candidates: Vec<StencilVandermonde>,
    full: StencilVandermonde,
    smoothness: Vec<Mat<f64>>,
}

impl StencilTables {
    /// Tables for a unit-spaced stencil.
    pub fn uniform(order: WenoOrder, kind: SampleKind) -> Result<Self> {
        Self::build(order, kind, StencilGeometry::uniform(order.stencil_width()))
    }

    /// Tables for an arbitrary strictly increasing stencil of `2k - 1` positions.
    pub fn from_positions(order: WenoOrder, kind: SampleKind, positions: &[f64]) -> Result<Self> {
        if positions.len() != order.stencil_width() {
            return Err(ReconError::StencilSizeMismatch {
                expected: order.stencil_width(),
                actual: positions.len(),
            });
        }
        Self::build(order, kind, StencilGeometry::from_positions(positions)?)
    }

    fn build(order: WenoOrder, kind: SampleKind, geometry: StencilGeometry) -> Result<Self> {
        let k = order.half_width();
        let (a, b) = geometry.center_cell();
        let gram = derivative_gram(k, a, b);

        let candidates = (0..k)
            .map(|j| StencilVandermonde::new(kind, &geometry.sub(j, k)))
            .collect::<Result<Vec<_>>>()?;
        let smoothness = candidates.iter().map(|c| c.pullback(&gram)).collect();
        let full = StencilVandermonde::new(kind, &geometry)?;

        debug!(
            "built {} stencil tables ({:?}, center cell [{:.3}, {:.3}])",
            order, kind, a, b
        );

        Ok(Self {
            order,
            kind,
            geometry,
            candidates,
            full,
            smoothness,
        })
    }

    /// Stencil order.
    pub fn order(&self) -> WenoOrder {
        self.order
    }

    /// Sample interpretation.
    pub fn kind(&self) -> SampleKind {
        self.kind
    }

    /// Normalized stencil geometry.
    pub fn geometry(&self) -> &StencilGeometry {
        &self.geometry
    }

    /// Smoothness quadratic form of candidate `j`.
    pub fn smoothness_form(&self, j: usize) -> &Mat<f64> {
        &self.smoothness[j]
    }

    /// Jiang-Shu smoothness indicators β_j for a full stencil of values.
    ///
    /// Rounding can push a zero quadratic form slightly negative; results are
    /// clamped at 0.
    pub fn smoothness(&self, values: &[f64]) -> Vec<f64> {
        let k = self.order.half_width();
        self.smoothness
            .iter()
            .enumerate()
            .map(|(j, q)| {
                let s = &values[j..j + k];
                let mut beta = 0.0;
                for m in 0..k {
                    let mut row = 0.0;
                    for n in 0..k {
                        row += q[(m, n)] * s[n];
                    }
                    beta += s[m] * row;
                }
                beta.max(0.0)
            })
            .collect()
    }

    /// Evaluation rows and optimal weights at reference offset `xi`.
    ///
    /// γ solves `Σ_j γ_j r_j = R` in the least-squares sense, where `r_j` is
    /// the evaluation row of candidate `j` shifted to its place in the full
    /// stencil and `R` the row of the full-stencil fit. The system is
    /// consistent, so the residual must vanish. Where the normal matrix is
    /// singular (all candidates coincide at the point) the weights are not
    /// unique and the minimum-norm choice is returned.
    pub fn offset_weights(&self, xi: f64) -> Result<OffsetWeights> {
        let k = self.order.half_width();
        let width = self.order.stencil_width();
        let x = self.geometry.offset_point(xi);

        let candidate_rows: Vec<Vec<f64>> =
            self.candidates.iter().map(|c| c.evaluation_row(x)).collect();
        let full_row = self.full.evaluation_row(x);

        // A is width x k; column j holds candidate row j at offset j
        let mut a = Mat::<f64>::zeros(width, k);
        for (j, row) in candidate_rows.iter().enumerate() {
            for (i, &r) in row.iter().enumerate() {
                a[(j + i, j)] = r;
            }
        }

        let mut normal = Mat::<f64>::zeros(k, k);
        let mut rhs = Mat::<f64>::zeros(k, 1);
        for p in 0..k {
            for q in 0..k {
                normal[(p, q)] = (0..width).map(|i| a[(i, p)] * a[(i, q)]).sum::<f64>();
            }
            rhs[(p, 0)] = (0..width).map(|i| a[(i, p)] * full_row[i]).sum::<f64>();
        }

        let trace: f64 = (0..k).map(|p| normal[(p, p)]).sum();
        let lambda = RIDGE * (trace / k as f64).max(1.0);
        let gamma = solve_refined(&normal, &rhs, lambda);
        let linear = accept(gamma, &a, &full_row).ok_or_else(|| {
            ReconError::DegenerateStencil(format!(
                "no optimal weights reproduce the full stencil at xi = {xi}"
            ))
        })?;

        if linear.iter().any(|&g| g < 0.0) {
            warn!(
                "{}: negative optimal weights at xi = {}: {:?}",
                self.order, xi, linear
            );
        }

        Ok(OffsetWeights {
            xi,
            linear,
            candidate_rows,
            full_row,
        })
    }
}

/// Ridge-regularised solve of `N γ = rhs` followed by iterative refinement
/// against the unregularised `N`.
///
/// Refinement converges to the exact solution when `N` is well conditioned
/// and never adds a null-space component, so a singular `N` yields the
/// minimum-norm solution.
fn solve_refined(normal: &Mat<f64>, rhs: &Mat<f64>, lambda: f64) -> Vec<f64> {
    let k = normal.nrows();
    let mut ridge = normal.clone();
    for p in 0..k {
        ridge[(p, p)] += lambda;
    }
    let lu = ridge.as_ref().full_piv_lu();

    let first = lu.solve(rhs);
    let mut gamma: Vec<f64> = (0..k).map(|i| first[(i, 0)]).collect();
    for _ in 0..REFINEMENT_STEPS {
        let mut residual = Mat::<f64>::zeros(k, 1);
        for p in 0..k {
            let applied: f64 = (0..k).map(|q| normal[(p, q)] * gamma[q]).sum();
            residual[(p, 0)] = rhs[(p, 0)] - applied;
        }
        let correction = lu.solve(&residual);
        for (i, g) in gamma.iter_mut().enumerate() {
            *g += correction[(i, 0)];
        }
    }
    gamma
}

/// Normalize γ to unit sum and accept it if it reproduces the full stencil.
fn accept(mut gamma: Vec<f64>, a: &Mat<f64>, full_row: &[f64]) -> Option<Vec<f64>> {
    let sum: f64 = gamma.iter().sum();
    let l1: f64 = gamma.iter().map(|g| g.abs()).sum();
    if !sum.is_finite() || sum.abs() < 1e-12 || l1 > WEIGHT_L1_MAX {
        return None;
    }
    for g in &mut gamma {
        *g /= sum;
    }

    let residual = (0..a.nrows())
        .map(|i| {
            let combined: f64 = (0..a.ncols()).map(|j| a[(i, j)] * gamma[j]).sum();
            (combined - full_row[i]).abs()
        })
        .fold(0.0, f64::max);
    (residual <= WEIGHT_RESIDUAL_TOL).then_some(gamma)
}

/// Data-independent quantities at one evaluation offset.
#[derive(Clone, Debug, PartialEq)]
pub struct OffsetWeights {
    /// Reference offset ξ in [-1, 1]
    pub xi: f64,
    /// Optimal (linear) weights γ_j, summing to 1
    pub linear: Vec<f64>,
    /// Evaluation row of each candidate over its own `k` samples
    pub candidate_rows: Vec<Vec<f64>>,
    /// Evaluation row of the full-stencil polynomial
    pub full_row: Vec<f64>,
}

impl OffsetWeights {
    /// Candidate values `p_j(ξ)` for a full stencil of values.
    pub fn candidate_values(&self, values: &[f64]) -> Vec<f64> {
        self.candidate_rows
            .iter()
            .enumerate()
            .map(|(j, row)| row.iter().zip(&values[j..]).map(|(r, v)| r * v).sum())
            .collect()
    }

    /// Value of the full-stencil polynomial `P(ξ)`.
    pub fn full_value(&self, values: &[f64]) -> f64 {
        self.full_row.iter().zip(values).map(|(r, v)| r * v).sum()
    }
}
