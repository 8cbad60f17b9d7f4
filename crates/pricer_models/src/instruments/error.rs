//! Instrument error types.
//!
//! This module provides structured error handling for contract
//! construction and enumerated field parsing.

use pricer_core::types::PricingError;
use thiserror::Error;

/// Instrument-related errors.
///
/// # Variants
/// - `InvalidOptionType`: Option type name not recognised
/// - `InvalidExerciseStyle`: Exercise style name not recognised
/// - `InvalidBarrierType`: Barrier type name not recognised
/// - `InvalidStrike`: Strike price is non-positive
/// - `InvalidMaturity`: Maturity is shorter than one day
/// - `InvalidBarrierLevel`: Barrier level is non-positive
/// - `InvalidRebate`: Rebate is negative
///
/// # Examples
/// ```
/// use pricer_models::instruments::InstrumentError;
///
/// let err = InstrumentError::InvalidStrike { strike: -100.0 };
/// assert!(format!("{}", err).contains("-100"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InstrumentError {
    /// Unknown option type name.
    #[error("Invalid option type: '{value}'")]
    InvalidOptionType {
        /// The rejected value
        value: String,
    },

    /// Unknown exercise style name.
    #[error("Invalid exercise style: '{value}'")]
    InvalidExerciseStyle {
        /// The rejected value
        value: String,
    },

    /// Unknown barrier type name.
    #[error("Invalid barrier type: '{value}'")]
    InvalidBarrierType {
        /// The rejected value
        value: String,
    },

    /// Invalid strike price (non-positive).
    #[error("Invalid strike: K = {strike}")]
    InvalidStrike {
        /// The invalid strike value
        strike: f64,
    },

    /// Maturity shorter than one day.
    #[error("Invalid maturity: {days} days")]
    InvalidMaturity {
        /// The invalid maturity in days
        days: i64,
    },

    /// Invalid barrier level (non-positive).
    #[error("Invalid barrier level: H = {level}")]
    InvalidBarrierLevel {
        /// The invalid level
        level: f64,
    },

    /// Invalid rebate (negative).
    #[error("Invalid rebate: {rebate}")]
    InvalidRebate {
        /// The invalid rebate
        rebate: f64,
    },
}

impl From<InstrumentError> for PricingError {
    fn from(err: InstrumentError) -> Self {
        PricingError::InvalidInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_option_type_display() {
        let err = InstrumentError::InvalidOptionType {
            value: "Straddle".to_string(),
        };
        assert_eq!(format!("{}", err), "Invalid option type: 'Straddle'");
    }

    #[test]
    fn test_invalid_maturity_display() {
        let err = InstrumentError::InvalidMaturity { days: 0 };
        assert_eq!(format!("{}", err), "Invalid maturity: 0 days");
    }

    #[test]
    fn test_invalid_barrier_level_display() {
        let err = InstrumentError::InvalidBarrierLevel { level: -80.0 };
        assert_eq!(format!("{}", err), "Invalid barrier level: H = -80");
    }

    #[test]
    fn test_into_pricing_error() {
        let err = InstrumentError::InvalidRebate { rebate: -1.0 };
        let pricing_err: PricingError = err.into();
        match pricing_err {
            PricingError::InvalidInput(msg) => assert_eq!(msg, "Invalid rebate: -1"),
            _ => panic!("Expected InvalidInput variant"),
        }
    }

    #[test]
    fn test_clone_and_equality() {
        let err1 = InstrumentError::InvalidStrike { strike: 0.0 };
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
