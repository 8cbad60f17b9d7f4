//! Market data error types.
//!
//! This module provides structured error handling for market data operations
//! including quote validation, yield curve and volatility lookups.

use crate::types::PricingError;
use thiserror::Error;

/// Market data operation errors.
///
/// # Variants
///
/// - `InvalidMaturity`: Negative time to maturity
/// - `InvalidSpot`: Non-positive or non-finite spot price
/// - `InvalidVolatility`: Negative or non-finite volatility
/// - `NonFiniteQuote`: A quote holds NaN or infinity
///
/// # Examples
///
/// ```
/// use pricer_core::market_data::MarketDataError;
///
/// let err = MarketDataError::InvalidMaturity { t: -1.0 };
/// assert!(format!("{}", err).contains("-1"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    /// Invalid maturity (negative time).
    #[error("Invalid maturity: t = {t}")]
    InvalidMaturity {
        /// The invalid maturity value
        t: f64,
    },

    /// Invalid spot price.
    #[error("Invalid spot: S = {spot}")]
    InvalidSpot {
        /// The invalid spot value
        spot: f64,
    },

    /// Invalid volatility.
    #[error("Invalid volatility: sigma = {sigma}")]
    InvalidVolatility {
        /// The invalid volatility value
        sigma: f64,
    },

    /// Quote value is NaN or infinite.
    #[error("Quote '{name}' is not finite: {value}")]
    NonFiniteQuote {
        /// Quote name
        name: String,
        /// Offending value
        value: f64,
    },
}

impl From<MarketDataError> for PricingError {
    fn from(err: MarketDataError) -> Self {
        PricingError::InvalidInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_maturity_display() {
        let err = MarketDataError::InvalidMaturity { t: -1.5 };
        assert_eq!(format!("{}", err), "Invalid maturity: t = -1.5");
    }

    #[test]
    fn test_invalid_spot_display() {
        let err = MarketDataError::InvalidSpot { spot: -100.0 };
        assert_eq!(format!("{}", err), "Invalid spot: S = -100");
    }

    #[test]
    fn test_non_finite_quote_display() {
        let err = MarketDataError::NonFiniteQuote {
            name: "volatility".to_string(),
            value: f64::NAN,
        };
        assert_eq!(format!("{}", err), "Quote 'volatility' is not finite: NaN");
    }

    #[test]
    fn test_into_pricing_error() {
        let mkt_err = MarketDataError::InvalidVolatility { sigma: -0.2 };
        let pricing_err: PricingError = mkt_err.into();
        match pricing_err {
            PricingError::InvalidInput(msg) => {
                assert!(msg.contains("sigma = -0.2"));
            }
            _ => panic!("Expected InvalidInput variant"),
        }
    }
}
