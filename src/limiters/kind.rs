//! Limiter functions φ(θ) and the closed set of limiter kinds.

use std::fmt;
use std::str::FromStr;

use crate::error::ReconError;

/// Ratio of consecutive differences θ = F / B.
///
/// A zero backward difference is kept symbolic instead of relying on IEEE
/// signed infinities, so every limiter sees an explicit branch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Ratio {
    /// Ordinary finite ratio.
    Finite(f64),
    /// B = 0 with F != 0, or F / B overflows; `positive` is the sign of F / B.
    Infinite { positive: bool },
}

impl Ratio {
    /// Build the ratio of a forward and a backward difference.
    ///
    /// `F = B = 0` gives θ = 0 (flat data, no slope). A quotient that
    /// overflows (subnormal B, huge F) is classified as infinite.
    pub fn new(forward: f64, backward: f64) -> Self {
        if backward == 0.0 {
            if forward == 0.0 {
                return Ratio::Finite(0.0);
            }
            return Ratio::Infinite {
                positive: forward > 0.0,
            };
        }
        if forward.is_infinite() && backward.is_infinite() {
            return Ratio::Finite(forward.signum() * backward.signum());
        }
        let theta = forward / backward;
        if theta.is_finite() {
            Ratio::Finite(theta)
        } else {
            Ratio::Infinite {
                positive: theta > 0.0,
            }
        }
    }
}

/// TVD slope limiter.
///
/// Exactly four variants; selection is by enum rather than trait object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LimiterKind {
    /// Most dissipative: smaller of the two one-sided slopes
    #[default]
    Minmod,
    /// Smooth harmonic-mean limiter
    VanLeer,
    /// Monotonized central
    MonotonizedCentral,
    /// Most compressive second-order TVD limiter
    Superbee,
}

impl LimiterKind {
    /// All limiter kinds, ordered from most to least dissipative (roughly).
    pub const ALL: [LimiterKind; 4] = [
        LimiterKind::Minmod,
        LimiterKind::VanLeer,
        LimiterKind::MonotonizedCentral,
        LimiterKind::Superbee,
    ];

    /// Short name used in configuration and logging.
    pub fn name(&self) -> &'static str {
        match self {
            LimiterKind::Minmod => "minmod",
            LimiterKind::VanLeer => "vanleer",
            LimiterKind::MonotonizedCentral => "mc",
            LimiterKind::Superbee => "superbee",
        }
    }

    /// Evaluate φ(θ) for a finite ratio.
    pub fn phi(&self, theta: f64) -> f64 {
        match self {
            LimiterKind::Minmod => theta.min(1.0).max(0.0),
            // (θ + |θ|) / (1 + |θ|), written so large θ cannot overflow
            LimiterKind::VanLeer => {
                if theta <= 0.0 {
                    0.0
                } else if theta < 1.0 {
                    2.0 * theta / (1.0 + theta)
                } else {
                    2.0 / (1.0 + theta.recip())
                }
            }
            LimiterKind::MonotonizedCentral => (0.5 * (1.0 + theta)).min(2.0).min(theta).max(0.0),
            LimiterKind::Superbee => {
                let a = (2.0 * theta).min(1.0);
                let b = theta.min(2.0);
                a.max(b).max(0.0)
            }
        }
    }

    /// Limit of φ(θ) as θ → +∞.
    pub fn saturation(&self) -> f64 {
        match self {
            LimiterKind::Minmod => 1.0,
            LimiterKind::VanLeer | LimiterKind::MonotonizedCentral | LimiterKind::Superbee => 2.0,
        }
    }

    /// Evaluate φ on a possibly infinite ratio.
    pub fn phi_ratio(&self, ratio: Ratio) -> f64 {
        match ratio {
            Ratio::Finite(theta) => self.phi(theta),
            Ratio::Infinite { positive: true } => self.saturation(),
            Ratio::Infinite { positive: false } => 0.0,
        }
    }

    /// Limited slope σ = φ(F/B) · B from forward and backward differences.
    ///
    /// With B = 0 the product is 0 for every limiter, including the
    /// saturated case.
    #[inline]
    pub fn limit(&self, forward: f64, backward: f64) -> f64 {
        self.phi_ratio(Ratio::new(forward, backward)) * backward
    }
}

impl fmt::Display for LimiterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LimiterKind {
    type Err = ReconError;

    /// Parse a limiter name. Case, `-`, `_` and spaces are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "minmod" => Ok(LimiterKind::Minmod),
            "vanleer" => Ok(LimiterKind::VanLeer),
            "mc" | "monotonizedcentral" => Ok(LimiterKind::MonotonizedCentral),
            "superbee" => Ok(LimiterKind::Superbee),
            _ => Err(ReconError::UnknownLimiter(s.to_string())),
        }
    }
}

/// Two-argument minmod.
///
/// Returns 0 if the arguments have different signs, otherwise the one with
/// smaller magnitude.
pub fn minmod(a: f64, b: f64) -> f64 {
    if a > 0.0 && b > 0.0 {
        a.min(b)
    } else if a < 0.0 && b < 0.0 {
        a.max(b)
    } else {
        0.0
    }
}
