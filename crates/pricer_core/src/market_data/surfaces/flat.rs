//! Constant Black volatility linked to a quote.

use super::VolatilitySurface;
use crate::market_data::error::MarketDataError;
use crate::market_data::quote::SimpleQuote;
use crate::types::DayCountConvention;

/// Flat volatility for every strike and expiry, read from a quote.
///
/// # Example
///
/// ```
/// use pricer_core::market_data::surfaces::{BlackConstantVol, VolatilitySurface};
/// use pricer_core::market_data::SimpleQuote;
/// use pricer_core::types::DayCountConvention;
///
/// let vol = SimpleQuote::new("volatility", 0.20);
/// let surface = BlackConstantVol::new(vol.clone(), DayCountConvention::Actual365Fixed);
///
/// assert_eq!(surface.volatility(80.0, 0.5).unwrap(), 0.20);
/// vol.set_value(0.25);
/// assert_eq!(surface.volatility(120.0, 2.0).unwrap(), 0.25);
/// ```
#[derive(Debug, Clone)]
pub struct BlackConstantVol {
    sigma: SimpleQuote,
    day_count: DayCountConvention,
}

impl BlackConstantVol {
    /// Construct a surface linked to `sigma`.
    pub fn new(sigma: SimpleQuote, day_count: DayCountConvention) -> Self {
        Self { sigma, day_count }
    }

    /// Current volatility.
    #[inline]
    pub fn sigma(&self) -> f64 {
        self.sigma.value()
    }

    /// Linked quote handle.
    pub fn sigma_quote(&self) -> &SimpleQuote {
        &self.sigma
    }

    /// Day count convention of the surface.
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }
}

impl VolatilitySurface<f64> for BlackConstantVol {
    fn volatility(&self, _strike: f64, expiry: f64) -> Result<f64, MarketDataError> {
        if expiry < 0.0 {
            return Err(MarketDataError::InvalidMaturity { t: expiry });
        }
        let sigma = self.sigma();
        if !sigma.is_finite() || sigma < 0.0 {
            return Err(MarketDataError::InvalidVolatility { sigma });
        }
        Ok(sigma)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_volatility_rejected() {
        let vol = SimpleQuote::new("volatility", -0.1);
        let surface = BlackConstantVol::new(vol.clone(), DayCountConvention::Actual365Fixed);
        assert_eq!(
            surface.volatility(100.0, 1.0),
            Err(MarketDataError::InvalidVolatility { sigma: -0.1 })
        );

        vol.set_value(0.0);
        assert_eq!(surface.volatility(100.0, 1.0), Ok(0.0));
    }

    #[test]
    fn test_bumped_variance() {
        let vol = SimpleQuote::new("volatility", 0.2);
        let surface = BlackConstantVol::new(vol.clone(), DayCountConvention::Actual365Fixed);
        let _bump = vol.bump(0.3);
        let var = surface.black_variance(100.0, 1.0).unwrap();
        assert!((var - 0.09).abs() < 1e-15);
    }
}
