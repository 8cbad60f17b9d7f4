//! Error types for request handling and engine configuration.
//!
//! Engine-level failures stay as [`PricingError`](pricer_core::types::PricingError)
//! and are absorbed into the result set. The errors here abort a request
//! before any numerics run.

use pricer_core::market_data::MarketDataError;
use pricer_models::instruments::{ContractShape, InstrumentError};
use std::fmt;
use thiserror::Error;

/// Request-level failure.
///
/// # Examples
/// ```
/// use pricer_pricing::ValuationError;
///
/// let err = ValuationError::UnsupportedMethod("Trinomial".to_string());
/// assert!(err.is_invalid_field());
/// assert_eq!(err.to_string(), "Unsupported pricing method: 'Trinomial'");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValuationError {
    /// Option type name not recognised.
    #[error("Invalid option type: '{0}'")]
    InvalidOptionType(String),

    /// Exercise style name not recognised.
    #[error("Invalid exercise style: '{0}'")]
    InvalidExerciseStyle(String),

    /// Barrier type name not recognised.
    #[error("Invalid barrier type: '{0}'")]
    InvalidBarrierType(String),

    /// Pricing method name not recognised.
    #[error("Unsupported pricing method: '{0}'")]
    UnsupportedMethod(String),

    /// The method cannot price this contract shape.
    #[error("Pricing method {method} cannot price a {shape} contract")]
    UnsupportedContractShape {
        /// Canonical method name
        method: &'static str,
        /// Shape of the rejected contract
        shape: ContractShape,
    },

    /// A field required by the request route is absent.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// A numeric input is out of range.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Engine settings failed validation.
    #[error("Invalid configuration: {0}")]
    ConfigError(#[from] ConfigError),
}

impl ValuationError {
    /// True for the unrecognised-name family (option type, exercise style,
    /// barrier type, method).
    pub fn is_invalid_field(&self) -> bool {
        matches!(
            self,
            ValuationError::InvalidOptionType(_)
                | ValuationError::InvalidExerciseStyle(_)
                | ValuationError::InvalidBarrierType(_)
                | ValuationError::UnsupportedMethod(_)
        )
    }
}

impl From<InstrumentError> for ValuationError {
    fn from(err: InstrumentError) -> Self {
        match err {
            InstrumentError::InvalidOptionType { value } => ValuationError::InvalidOptionType(value),
            InstrumentError::InvalidExerciseStyle { value } => {
                ValuationError::InvalidExerciseStyle(value)
            }
            InstrumentError::InvalidBarrierType { value } => {
                ValuationError::InvalidBarrierType(value)
            }
            other => ValuationError::InvalidInput(other.to_string()),
        }
    }
}

impl From<MarketDataError> for ValuationError {
    fn from(err: MarketDataError) -> Self {
        ValuationError::InvalidInput(err.to_string())
    }
}

/// Configuration error for engine settings.
///
/// These errors occur when settings are built or loaded with out-of-range
/// parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Sample bounds outside [1, 10_000_000] or min above max.
    InvalidSampleCount {
        /// Minimum samples
        min: usize,
        /// Maximum samples
        max: usize,
    },
    /// Time step count outside [1, 100_000].
    InvalidStepCount(usize),
    /// Grid point count outside [5, 100_000].
    InvalidGridSize(usize),
    /// Invalid parameter value with name and description.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSampleCount { min, max } => {
                write!(
                    f,
                    "Invalid sample bounds [{}, {}]: must satisfy 1 <= min <= max <= 10_000_000",
                    min, max
                )
            }
            Self::InvalidStepCount(count) => {
                write!(
                    f,
                    "Invalid step count {}: must be in range [1, 100_000]",
                    count
                )
            }
            Self::InvalidGridSize(count) => {
                write!(
                    f,
                    "Invalid grid size {}: must be in range [5, 100_000]",
                    count
                )
            }
            Self::InvalidParameter { name, value } => {
                write!(f, "Invalid parameter '{}': {}", name, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
