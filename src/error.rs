//! Error types for reconstruction kernels.

use thiserror::Error;

/// Errors that can occur while validating inputs or building stencil tables.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReconError {
    /// Fewer samples than the stencil needs.
    #[error("Insufficient samples: need at least {required}, got {actual}")]
    InsufficientSamples { required: usize, actual: usize },

    /// A fixed-width stencil received the wrong number of samples.
    #[error("Stencil size mismatch: expected exactly {expected} samples, got {actual}")]
    StencilSizeMismatch { expected: usize, actual: usize },

    /// Positions and values have different lengths.
    #[error("Length mismatch: {positions} positions but {values} values")]
    LengthMismatch { positions: usize, values: usize },

    /// Positions must be strictly increasing.
    #[error("Positions not strictly increasing at index {index}")]
    NonIncreasingPositions { index: usize },

    /// A position or value is NaN or infinite.
    #[error("Non-finite sample at index {index}")]
    NonFiniteSample { index: usize },

    /// Limiter name not recognised.
    #[error("Unknown limiter: {0}")]
    UnknownLimiter(String),

    /// Malformed WENO order.
    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    /// Invalid weighting parameter (ε, exponent).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Evaluation offset outside the reference interval [-1, 1].
    #[error("Evaluation offset {0} outside [-1, 1]")]
    OffsetOutOfRange(f64),

    /// Singular polynomial fit or inconsistent weight system.
    #[error("Degenerate stencil: {0}")]
    DegenerateStencil(String),
}

impl ReconError {
    /// Create an insufficient-samples error.
    pub fn insufficient(required: usize, actual: usize) -> Self {
        Self::InsufficientSamples { required, actual }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ReconError>;
