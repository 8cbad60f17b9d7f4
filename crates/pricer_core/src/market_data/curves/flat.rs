//! Flat forward curve linked to a rate quote.

use super::YieldCurve;
use crate::market_data::error::MarketDataError;
use crate::market_data::quote::SimpleQuote;
use crate::types::{Date, DayCountConvention};

/// Flat continuously compounded curve whose rate is read from a quote.
///
/// The curve holds a handle to the quote rather than a copy of its value,
/// so bumping the quote moves every discount factor the curve returns.
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
/// let curve = FlatForward::new(today, rate.clone(), DayCountConvention::Actual365Fixed);
///
/// let before = curve.discount_factor(1.0).unwrap();
/// let _bump = rate.bump(0.06);
/// assert!(curve.discount_factor(1.0).unwrap() < before);
/// ```
#[derive(Debug, Clone)]
pub struct FlatForward {
    reference_date: Date,
    rate: SimpleQuote,
    day_count: DayCountConvention,
}

impl FlatForward {
    /// Construct a curve anchored at `reference_date`.
    pub fn new(reference_date: Date, rate: SimpleQuote, day_count: DayCountConvention) -> Self {
        Self {
            reference_date,
            rate,
            day_count,
        }
    }

    /// Curve anchor date.
    #[inline]
    pub fn reference_date(&self) -> Date {
        self.reference_date
    }

    /// Current rate read through the quote.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate.value()
    }

    /// Linked quote handle.
    pub fn rate_quote(&self) -> &SimpleQuote {
        &self.rate
    }

    /// Day count used to turn dates into year fractions.
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Year fraction from the reference date to `date`.
    pub fn time_from_reference(&self, date: Date) -> f64 {
        self.day_count.year_fraction(self.reference_date, date)
    }

    /// Discount factor for a payment on `date`.
    pub fn discount_date(&self, date: Date) -> Result<f64, MarketDataError> {
        self.discount_factor(self.time_from_reference(date))
    }

    /// Same curve re-anchored at another date, still linked to the same quote.
    pub fn with_reference_date(&self, reference_date: Date) -> Self {
        Self {
            reference_date,
            rate: self.rate.clone(),
            day_count: self.day_count,
        }
    }
}

impl YieldCurve<f64> for FlatForward {
    /// `D(t) = exp(-r t)`
    #[inline]
    fn discount_factor(&self, t: f64) -> Result<f64, MarketDataError> {
        if t < 0.0 {
            return Err(MarketDataError::InvalidMaturity { t });
        }
        Ok((-self.rate() * t).exp())
    }

    #[inline]
    fn zero_rate(&self, t: f64) -> Result<f64, MarketDataError> {
        if t < 0.0 {
            return Err(MarketDataError::InvalidMaturity { t });
        }
        Ok(self.rate())
    }

    #[inline]
    fn forward_rate(&self, t1: f64, t2: f64) -> Result<f64, MarketDataError> {
        if t1 < 0.0 || t2 <= t1 {
            return Err(MarketDataError::InvalidMaturity { t: t2 - t1 });
        }
        Ok(self.rate())
    }
}
