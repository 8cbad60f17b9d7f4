//! Error types for analytical pricing operations.
//!
//! This module provides:
//! - `AnalyticalError`: Errors specific to closed-form pricing

use pricer_core::types::PricingError;
use thiserror::Error;

/// Analytical pricing errors.
///
/// # Variants
/// - `InvalidVolatility`: Negative or non-finite volatility
/// - `InvalidSpot`: Non-positive spot price
/// - `InvalidBarrier`: Non-positive barrier level
/// - `BarrierTouched`: Spot already on the far side of the barrier
/// - `NumericalInstability`: Result is not finite
///
/// # Examples
/// ```
/// use pricer_models::analytical::AnalyticalError;
///
/// let err = AnalyticalError::InvalidVolatility { volatility: -0.2 };
/// assert!(format!("{}", err).contains("volatility"));
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AnalyticalError {
    /// Invalid volatility (negative or non-finite).
    #[error("Invalid volatility: σ = {volatility}")]
    InvalidVolatility {
        /// The invalid volatility value
        volatility: f64,
    },

    /// Invalid spot price (non-positive).
    #[error("Invalid spot price: S = {spot}")]
    InvalidSpot {
        /// The invalid spot price value
        spot: f64,
    },

    /// Invalid barrier level (non-positive).
    #[error("Invalid barrier level: H = {level}")]
    InvalidBarrier {
        /// The invalid level
        level: f64,
    },

    /// Barrier already breached at valuation.
    #[error("Barrier touched: S = {spot}, H = {barrier}")]
    BarrierTouched {
        /// Spot
        spot: f64,
        /// Barrier level
        barrier: f64,
    },

    /// Numerical instability during computation.
    #[error("Numerical instability: {message}")]
    NumericalInstability {
        /// Description of the numerical issue
        message: String,
    },
}

impl From<AnalyticalError> for PricingError {
    fn from(err: AnalyticalError) -> Self {
        match err {
            AnalyticalError::InvalidVolatility { .. }
            | AnalyticalError::InvalidSpot { .. }
            | AnalyticalError::InvalidBarrier { .. } => PricingError::InvalidInput(err.to_string()),
            AnalyticalError::BarrierTouched { spot, barrier } => {
                PricingError::barrier_touched(spot, barrier)
            }
            AnalyticalError::NumericalInstability { .. } => {
                PricingError::NumericalInstability(err.to_string())
            }
        }
    }
}
