//! Configuration tokens for reconstruction.
//!
//! Everything here is validated when it is constructed, so the numerical
//! kernels never see an even order or a negative epsilon.

use std::fmt;
use std::str::FromStr;

use crate::error::{ReconError, Result};

/// Largest supported half-stencil size (formal order 11).
///
/// Monomial fits on wider stencils lose too many digits for the weight
/// identities to hold to the tolerances the tests demand.
pub const MAX_HALF_WIDTH: usize = 6;

/// Default WENO regularisation ε.
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// Default exponent p in `γ / (ε + β)^p`.
pub const DEFAULT_POWER: i32 = 2;

/// What a sample value represents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SampleKind {
    /// Point values: candidate polynomials interpolate the samples
    #[default]
    PointValues,
    /// Cell averages: candidate polynomials reproduce the cell means
    CellAverages,
}

/// WENO order, stored as the half-stencil size `k`.
///
/// The formal order is `2k - 1` and the full stencil has `2k - 1` samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "usize", into = "usize"))]
pub struct WenoOrder {
    k: usize,
}

impl WenoOrder {
    /// WENO3 (k = 2).
    pub const WENO3: WenoOrder = WenoOrder { k: 2 };
    /// WENO5 (k = 3).
    pub const WENO5: WenoOrder = WenoOrder { k: 3 };
    /// WENO7 (k = 4).
    pub const WENO7: WenoOrder = WenoOrder { k: 4 };

    /// Create from the half-stencil size `k` (number of candidate stencils).
    pub fn from_half_width(k: usize) -> Result<Self> {
        if k < 2 {
            return Err(ReconError::InvalidOrder(format!(
                "half-stencil size must be at least 2, got {k}"
            )));
        }
        if k > MAX_HALF_WIDTH {
            return Err(ReconError::InvalidOrder(format!(
                "half-stencil size {k} exceeds the supported maximum {MAX_HALF_WIDTH}"
            )));
        }
        Ok(Self { k })
    }

    /// Create from the formal order `2k - 1` (3, 5, 7, ...).
    pub fn from_order(order: usize) -> Result<Self> {
        if order % 2 == 0 {
            return Err(ReconError::InvalidOrder(format!(
                "formal order must be odd, got {order}"
            )));
        }
        Self::from_half_width(order.div_ceil(2))
    }

    /// Half-stencil size `k`.
    pub fn half_width(&self) -> usize {
        self.k
    }

    /// Formal order `2k - 1`.
    pub fn order(&self) -> usize {
        2 * self.k - 1
    }

    /// Number of samples in the full stencil (`2k - 1`).
    pub fn stencil_width(&self) -> usize {
        2 * self.k - 1
    }

    /// Number of candidate stencils (`k`).
    pub fn n_candidates(&self) -> usize {
        self.k
    }
}

impl Default for WenoOrder {
    fn default() -> Self {
        Self::WENO5
    }
}

impl fmt::Display for WenoOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "weno{}", self.order())
    }
}

impl FromStr for WenoOrder {
    type Err = ReconError;

    /// Parse `"5"`, `"weno5"` or `"WENO5"` as a formal order.
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        let digits = lower.strip_prefix("weno").unwrap_or(&lower);
        let order: usize = digits
            .parse()
            .map_err(|_| ReconError::InvalidOrder(format!("cannot parse order from {s:?}")))?;
        Self::from_order(order)
    }
}

impl TryFrom<usize> for WenoOrder {
    type Error = ReconError;

    fn try_from(order: usize) -> Result<Self> {
        Self::from_order(order)
    }
}

impl From<WenoOrder> for usize {
    fn from(order: WenoOrder) -> usize {
        order.order()
    }
}

/// Configuration for a [`WenoReconstructor`](crate::weno::WenoReconstructor).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WenoConfig {
    /// Stencil order
    pub order: WenoOrder,
    /// Interpretation of the samples
    pub sample_kind: SampleKind,
    /// Regularisation ε in the nonlinear weights
    pub epsilon: f64,
    /// Exponent p in the nonlinear weights
    pub power: i32,
    /// Offsets whose optimal weights are precomputed
    pub offsets: Vec<f64>,
}

impl Default for WenoConfig {
    fn default() -> Self {
        Self {
            order: WenoOrder::WENO5,
            sample_kind: SampleKind::PointValues,
            epsilon: DEFAULT_EPSILON,
            power: DEFAULT_POWER,
            offsets: vec![-1.0, 1.0],
        }
    }
}

impl WenoConfig {
    /// Create a default config with the given order.
    pub fn new(order: WenoOrder) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    /// Set the sample interpretation.
    pub fn with_sample_kind(mut self, kind: SampleKind) -> Self {
        self.sample_kind = kind;
        self
    }

    /// Set ε.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the exponent p.
    pub fn with_power(mut self, power: i32) -> Self {
        self.power = power;
        self
    }

    /// Replace the list of precomputed offsets.
    pub fn with_offsets(mut self, offsets: impl Into<Vec<f64>>) -> Self {
        self.offsets = offsets.into();
        self
    }

    /// Check ε, p and the offsets.
    pub fn validate(&self) -> Result<()> {
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(ReconError::InvalidConfig(format!(
                "epsilon must be positive and finite, got {}",
                self.epsilon
            )));
        }
        if self.power < 1 {
            return Err(ReconError::InvalidConfig(format!(
                "weight exponent must be at least 1, got {}",
                self.power
            )));
        }
        for &xi in &self.offsets {
            check_offset(xi)?;
        }
        Ok(())
    }
}

/// Fail unless `xi` lies in the reference interval `[-1, 1]`.
pub fn check_offset(xi: f64) -> Result<()> {
    if (-1.0..=1.0).contains(&xi) {
        Ok(())
    } else {
        Err(ReconError::OffsetOutOfRange(xi))
    }
}
