//! Nonlinear WENO blending on a single stencil.
//!
//! The reconstructor owns one set of [`StencilTables`] for unit-spaced data
//! and caches [`OffsetWeights`] per evaluation offset. Offsets listed in the
//! [`WenoConfig`] are computed up front; any other offset is computed on first
//! use and shared afterwards.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use log::{debug, trace};

use super::tables::{OffsetWeights, StencilTables};
use crate::config::{WenoConfig, WenoOrder, check_offset};
use crate::error::{ReconError, Result};
use crate::samples::{SampleSeries, check_finite};

/// Result of one WENO evaluation, with every intermediate quantity.
#[derive(Clone, Debug, PartialEq)]
pub struct WenoWeights {
    /// Reference offset ξ
    pub xi: f64,
    /// Optimal weights γ_j
    pub linear: Vec<f64>,
    /// Smoothness indicators β_j
    pub smoothness: Vec<f64>,
    /// Normalized nonlinear weights w_j
    pub nonlinear: Vec<f64>,
    /// Candidate values p_j(ξ)
    pub candidates: Vec<f64>,
    /// Reconstructed value Σ w_j p_j(ξ)
    pub value: f64,
}

impl WenoWeights {
    /// Index of the candidate stencil carrying the largest nonlinear weight.
    pub fn dominant(&self) -> usize {
        self.nonlinear
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (j, &w)| if w > best.1 { (j, w) } else { best })
            .0
    }

    /// Σ w_j; 1 up to rounding.
    pub fn weight_sum(&self) -> f64 {
        self.nonlinear.iter().sum()
    }
}

/// Combine candidates with `w~_j = γ_j / (ε + β_j)^p`.
///
/// The raw weights are scaled by `min_j (ε + β_j)^p` before normalizing, so
/// large data (β far above 1) cannot underflow them to zero.
pub(super) fn blend(
    tables: &StencilTables,
    offset: &OffsetWeights,
    values: &[f64],
    epsilon: f64,
    power: i32,
) -> Result<WenoWeights> {
    let smoothness = tables.smoothness(values);
    let candidates = offset.candidate_values(values);

    let floor = smoothness
        .iter()
        .map(|&beta| epsilon + beta)
        .fold(f64::INFINITY, f64::min);
    let raw: Vec<f64> = offset
        .linear
        .iter()
        .zip(&smoothness)
        .map(|(&gamma, &beta)| {
            let shifted = epsilon + beta;
            let ratio = if shifted == floor { 1.0 } else { floor / shifted };
            gamma * ratio.powi(power)
        })
        .collect();
    let total: f64 = raw.iter().sum();
    if !total.is_finite() || total == 0.0 {
        return Err(ReconError::DegenerateStencil(format!(
            "nonlinear weights sum to {total} at xi = {}",
            offset.xi
        )));
    }

    let nonlinear: Vec<f64> = raw.iter().map(|w| w / total).collect();
    let value = nonlinear.iter().zip(&candidates).map(|(w, p)| w * p).sum();

    Ok(WenoWeights {
        xi: offset.xi,
        linear: offset.linear.clone(),
        smoothness,
        nonlinear,
        candidates,
        value,
    })
}

/// Cache key for an offset; `-0.0` and `0.0` share an entry.
fn offset_key(xi: f64) -> u64 {
    if xi == 0.0 { 0.0f64.to_bits() } else { xi.to_bits() }
}

/// WENO reconstructor for one order and sample interpretation.
///
/// `Send + Sync`: the offset cache sits behind an `RwLock` and cached entries
/// are handed out as `Arc`s, so one reconstructor can serve rayon workers.
#[derive(Debug)]
pub struct WenoReconstructor {
    config: WenoConfig,
    tables: StencilTables,
    cache: RwLock<HashMap<u64, Arc<OffsetWeights>>>,
}

impl WenoReconstructor {
    /// Build the tables for `config` and precompute its offsets.
    ///
    /// # Errors
    /// Any validation error of the config, or
    /// [`ReconError::DegenerateStencil`] if a configured offset has no
    /// optimal weights.
    pub fn new(config: WenoConfig) -> Result<Self> {
        config.validate()?;
        let tables = StencilTables::uniform(config.order, config.sample_kind)?;

        let mut cache = HashMap::with_capacity(config.offsets.len());
        for &xi in &config.offsets {
            cache.insert(offset_key(xi), Arc::new(tables.offset_weights(xi)?));
        }
        debug!(
            "{} reconstructor ready with {} precomputed offsets",
            config.order,
            cache.len()
        );

        Ok(Self {
            config,
            tables,
            cache: RwLock::new(cache),
        })
    }

    /// Reconstructor with the default configuration for `order`.
    pub fn with_order(order: WenoOrder) -> Result<Self> {
        Self::new(WenoConfig::new(order))
    }

    /// Configuration the reconstructor was built with.
    pub fn config(&self) -> &WenoConfig {
        &self.config
    }

    /// Order shortcut for `config().order`.
    pub fn order(&self) -> WenoOrder {
        self.config.order
    }

    /// Tables for unit-spaced data.
    pub fn tables(&self) -> &StencilTables {
        &self.tables
    }

    /// Cached optimal weights and evaluation rows at `xi`.
    pub fn offset_weights(&self, xi: f64) -> Result<Arc<OffsetWeights>> {
        check_offset(xi)?;
        let key = offset_key(xi);

        if let Some(hit) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            trace!("{}: offset cache hit at xi = {}", self.order(), xi);
            return Ok(Arc::clone(hit));
        }

        let computed = Arc::new(self.tables.offset_weights(xi)?);
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(cache.entry(key).or_insert(computed)))
    }

    /// Offsets currently held in the cache, sorted.
    pub fn cached_offsets(&self) -> Vec<f64> {
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        let mut offsets: Vec<f64> = cache.values().map(|w| w.xi).collect();
        offsets.sort_by(f64::total_cmp);
        offsets
    }

    fn check_stencil(&self, values: &[f64]) -> Result<()> {
        let expected = self.order().stencil_width();
        if values.len() != expected {
            return Err(ReconError::StencilSizeMismatch {
                expected,
                actual: values.len(),
            });
        }
        check_finite(values)
    }

    /// Full evaluation on a unit-spaced stencil of `2k - 1` values.
    ///
    /// # Errors
    /// - [`ReconError::StencilSizeMismatch`] unless `values.len() == 2k - 1`
    /// - [`ReconError::NonFiniteSample`] on NaN or infinite values
    /// - [`ReconError::OffsetOutOfRange`] unless `xi` is in `[-1, 1]`
    pub fn weights(&self, values: &[f64], xi: f64) -> Result<WenoWeights> {
        self.check_stencil(values)?;
        let offset = self.offset_weights(xi)?;
        blend(
            &self.tables,
            &offset,
            values,
            self.config.epsilon,
            self.config.power,
        )
    }

    /// Reconstructed value at `xi` on a unit-spaced stencil.
    pub fn reconstruct(&self, values: &[f64], xi: f64) -> Result<f64> {
        Ok(self.weights(values, xi)?.value)
    }

    /// Evaluation on a stencil with explicit positions.
    ///
    /// Uniformly spaced stencils use the cached tables; anything else builds
    /// tables for its own geometry.
    pub fn weights_at(&self, samples: &SampleSeries, xi: f64) -> Result<WenoWeights> {
        if samples.is_uniform() {
            return self.weights(samples.values(), xi);
        }

        let values = samples.values();
        self.check_stencil(values)?;
        check_offset(xi)?;
        let tables =
            StencilTables::from_positions(self.order(), self.config.sample_kind, samples.positions())?;
        let offset = tables.offset_weights(xi)?;
        blend(
            &tables,
            &offset,
            values,
            self.config.epsilon,
            self.config.power,
        )
    }

    /// Reconstructed value at `xi` on a stencil with explicit positions.
    pub fn reconstruct_at(&self, samples: &SampleSeries, xi: f64) -> Result<f64> {
        Ok(self.weights_at(samples, xi)?.value)
    }
}

type SharedReconstructors = RwLock<HashMap<WenoOrder, Arc<WenoReconstructor>>>;

/// Process-wide reconstructors with the default configuration, one per order.
fn shared_reconstructor(order: WenoOrder) -> Result<Arc<WenoReconstructor>> {
    static SHARED: OnceLock<SharedReconstructors> = OnceLock::new();
    let shared = SHARED.get_or_init(|| RwLock::new(HashMap::new()));

    if let Some(existing) = shared
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&order)
    {
        return Ok(Arc::clone(existing));
    }

    let built = Arc::new(WenoReconstructor::with_order(order)?);
    let mut map = shared.write().unwrap_or_else(PoisonError::into_inner);
    Ok(Arc::clone(map.entry(order).or_insert(built)))
}

/// Reconstruct the value at reference offset `xi` of the center cell of a
/// `2k - 1` point stencil.
///
/// `xi = -1` and `xi = +1` are the left and right edges of the center cell
/// (midpoints to the neighbouring positions), so on a uniform grid the
/// evaluation point lies `xi / 2` spacings from the center sample. Samples are
/// treated as point values with ε = 1e-6 and p = 2; use a
/// [`WenoReconstructor`] for other settings.
///
/// # Errors
/// - [`ReconError::InvalidOrder`] unless `2 <= k <= 6`
/// - [`ReconError::StencilSizeMismatch`] unless `values.len() == 2k - 1`
/// - [`ReconError::LengthMismatch`] if positions and values differ in length
/// - [`ReconError::NonFiniteSample`] / [`ReconError::NonIncreasingPositions`]
///   on malformed input
/// - [`ReconError::OffsetOutOfRange`] unless `xi` is in `[-1, 1]`
///
/// # Example
/// ```
/// use recon_rs::weno_reconstruct;
///
/// let x = [0.0, 1.0, 2.0, 3.0, 4.0];
/// let y = [1.0, 1.0, 1.0, 1.0, 1.0];
/// let v = weno_reconstruct(&y, &x, 3, 1.0).unwrap();
/// assert!((v - 1.0).abs() < 1e-12);
/// ```
pub fn weno_reconstruct(values: &[f64], positions: &[f64], k: usize, xi: f64) -> Result<f64> {
    let order = WenoOrder::from_half_width(k)?;
    if values.len() != order.stencil_width() {
        return Err(ReconError::StencilSizeMismatch {
            expected: order.stencil_width(),
            actual: values.len(),
        });
    }
    let samples = SampleSeries::new(positions, values)?;
    shared_reconstructor(order)?.reconstruct_at(&samples, xi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SampleKind;

    #[test]
    fn test_constant_data_is_exact() {
        let recon = WenoReconstructor::with_order(WenoOrder::WENO5).unwrap();
        let w = recon.weights(&[2.5; 5], 1.0).unwrap();
        assert!((w.value - 2.5).abs() < 1e-12);
        assert!((w.weight_sum() - 1.0).abs() < 1e-12);
        // All β vanish: nonlinear weights fall back to the linear ones
        for (a, b) in w.nonlinear.iter().zip(&w.linear) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_step_picks_flat_stencil() {
        let recon = WenoReconstructor::with_order(WenoOrder::WENO5).unwrap();
        let values = [1.0, 1.0, 1.0, 0.0, 0.0];
        for xi in [-1.0, 1.0] {
            let w = recon.weights(&values, xi).unwrap();
            assert_eq!(w.dominant(), 0);
            assert!(w.nonlinear[0] > 0.999);
            assert!((w.value - 1.0).abs() < 1e-9, "xi = {xi}: {}", w.value);
        }
    }

    #[test]
    fn test_large_amplitude_weights_stay_normalized() {
        let recon = WenoReconstructor::with_order(WenoOrder::WENO5).unwrap();
        let unit = [1.0, 0.0, 1.0, 0.0, 1.0];
        let large: Vec<f64> = unit.iter().map(|v| v * 1e80).collect();

        let w = recon.weights(&large, 1.0).unwrap();
        assert!(w.value.is_finite());
        assert!((w.weight_sum() - 1.0).abs() < 1e-12, "{:?}", w.nonlinear);

        // β dwarfs ε at both scales, so the result scales with the data
        let reference = recon.reconstruct(&unit, 1.0).unwrap();
        let scaled = w.value / 1e80;
        assert!(
            (scaled - reference).abs() < 1e-4 * reference.abs().max(1.0),
            "{scaled} vs {reference}"
        );
    }

    #[test]
    fn test_offsets_are_cached() {
        let config = WenoConfig::new(WenoOrder::WENO3).with_offsets(vec![-1.0, 1.0]);
        let recon = WenoReconstructor::new(config).unwrap();
        assert_eq!(recon.cached_offsets(), vec![-1.0, 1.0]);

        let first = recon.offset_weights(0.5).unwrap();
        let second = recon.offset_weights(0.5).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(recon.cached_offsets(), vec![-1.0, 0.5, 1.0]);

        // Signed zeros share an entry
        let a = recon.offset_weights(0.0).unwrap();
        let b = recon.offset_weights(-0.0).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_stencil_size_checked() {
        let recon = WenoReconstructor::with_order(WenoOrder::WENO5).unwrap();
        assert_eq!(
            recon.reconstruct(&[1.0, 2.0, 3.0], 0.5).unwrap_err(),
            ReconError::StencilSizeMismatch {
                expected: 5,
                actual: 3
            }
        );
        assert!(matches!(
            recon.reconstruct(&[1.0; 5], 1.5),
            Err(ReconError::OffsetOutOfRange(_))
        ));
        assert!(matches!(
            recon.reconstruct(&[1.0, f64::NAN, 1.0, 1.0, 1.0], 0.5),
            Err(ReconError::NonFiniteSample { index: 1 })
        ));
    }

    #[test]
    fn test_cell_average_mode() {
        let config = WenoConfig::new(WenoOrder::WENO5).with_sample_kind(SampleKind::CellAverages);
        let recon = WenoReconstructor::new(config).unwrap();
        // Averages of x over unit cells are the centers; the edge value is 1/2
        let values = [-2.0, -1.0, 0.0, 1.0, 2.0];
        let v = recon.reconstruct(&values, 1.0).unwrap();
        assert!((v - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_free_function_matches_reconstructor() {
        let x = [0.0, 0.1, 0.2, 0.3, 0.4];
        let y = [0.0, 0.01, 0.04, 0.09, 0.16];
        let recon = WenoReconstructor::with_order(WenoOrder::WENO5).unwrap();
        let direct = recon.reconstruct(&y, 0.3).unwrap();
        let free = weno_reconstruct(&y, &x, 3, 0.3).unwrap();
        assert!((direct - free).abs() < 1e-14);
    }

    #[test]
    fn test_free_function_errors() {
        let x = [0.0, 1.0, 2.0];
        assert!(matches!(
            weno_reconstruct(&[1.0, 2.0, 3.0], &x, 1, 0.0),
            Err(ReconError::InvalidOrder(_))
        ));
        assert!(matches!(
            weno_reconstruct(&[1.0, 2.0, 3.0], &x[..2], 2, 0.0),
            Err(ReconError::LengthMismatch { .. })
        ));
        assert!(matches!(
            weno_reconstruct(&[1.0, 2.0, 3.0], &[0.0, 2.0, 1.0], 2, 0.0),
            Err(ReconError::NonIncreasingPositions { index: 2 })
        ));
    }
}
