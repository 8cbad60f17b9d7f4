//! Yield curve trait definition.

use crate::market_data::error::MarketDataError;
use num_traits::Float;

/// Discount curve indexed by year fraction from the curve's reference date.
///
/// # Invariants
///
/// - D(0) = 1
/// - D(t) > 0 for all t >= 0
///
/// # Example
///
/// ```
/// use pricer_core::market_data::curves::{FlatForward, YieldCurve};
/// use pricer_core::market_data::SimpleQuote;
/// use pricer_core::types::{Date, DayCountConvention};
///
/// let rate = SimpleQuote::new("rate", 0.05);
/// let today = Date::from_ymd(2024, 1, 2).unwrap();
/// let curve = FlatForward::new(today, rate, DayCountConvention::Actual365Fixed);
///
/// let df = curve.discount_factor(1.0).unwrap();
/// assert!((df - 0.951229).abs() < 1e-5);
/// assert!((curve.forward_rate(1.0, 2.0).unwrap() - 0.05).abs() < 1e-12);
/// ```
pub trait YieldCurve<T: Float> {
    /// Discount factor for maturity `t` (years, `t >= 0`).
    ///
    /// # Errors
    ///
    /// `MarketDataError::InvalidMaturity` if `t < 0`.
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError>;

    /// Continuously compounded zero rate, `r(t) = -ln(D(t)) / t`.
    fn zero_rate(&self, t: T) -> Result<T, MarketDataError> {
        if t <= T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: t.to_f64().unwrap_or(0.0),
            });
        }
        let df = self.discount_factor(t)?;
        Ok(-df.ln() / t)
    }

    /// Forward rate between `t1` and `t2`, `f = -ln(D(t2) / D(t1)) / (t2 - t1)`.
    fn forward_rate(&self, t1: T, t2: T) -> Result<T, MarketDataError> {
        let dt = t2 - t1;
        if dt <= T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: dt.to_f64().unwrap_or(0.0),
            });
        }
        let df1 = self.discount_factor(t1)?;
        let df2 = self.discount_factor(t2)?;
        Ok(-(df2 / df1).ln() / dt)
    }
}
