//! Volatility surface trait definition.

use crate::market_data::error::MarketDataError;
use num_traits::Float;

/// Black volatility lookup.
///
/// # Invariants
///
/// - σ > 0 for all valid (strike, expiry) pairs
pub trait VolatilitySurface<T: Float> {
    /// Implied volatility for the given strike and expiry (years).
    fn volatility(&self, strike: T, expiry: T) -> Result<T, MarketDataError>;

    /// Total Black variance `σ² t`.
    fn black_variance(&self, strike: T, expiry: T) -> Result<T, MarketDataError> {
        let sigma = self.volatility(strike, expiry)?;
        Ok(sigma * sigma * expiry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedVol(f64);

    impl VolatilitySurface<f64> for FixedVol {
        fn volatility(&self, _strike: f64, expiry: f64) -> Result<f64, MarketDataError> {
            if expiry < 0.0 {
                return Err(MarketDataError::InvalidMaturity { t: expiry });
            }
            Ok(self.0)
        }
    }

    #[test]
    fn test_default_black_variance() {
        let surface = FixedVol(0.2);
        let var = surface.black_variance(100.0, 2.0).unwrap();
        assert!((var - 0.08).abs() < 1e-15);
    }

    #[test]
    fn test_black_variance_propagates_error() {
        assert!(FixedVol(0.2).black_variance(100.0, -1.0).is_err());
    }
}
