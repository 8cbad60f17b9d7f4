//! Black-Scholes-Merton pricing model for European options.
//!
//! This module provides the Black-Scholes model with a continuous dividend
//! yield for pricing European call and put options with analytical Greeks.
//!
//! ## Mathematical Formulas
//!
//! **Call Price**: C = S·e^(-qT)·N(d₁) - K·e^(-rT)·N(d₂)
//! **Put Price**: P = K·e^(-rT)·N(-d₂) - S·e^(-qT)·N(-d₁)
//!
//! Where:
//! - d₁ = (ln(S/K) + (r - q + σ²/2)T) / (σ√T)
//! - d₂ = d₁ - σ√T
//!
//! A zero volatility is the deterministic limit: the option is worth the
//! discounted forward intrinsic value max(φ(S·e^(-qT) - K·e^(-rT)), 0).

use num_traits::Float;

use super::distributions::{norm_cdf, norm_pdf};
use super::error::AnalyticalError;
use crate::instruments::OptionType;

/// Full set of closed-form sensitivities.
///
/// Theta is the derivative with respect to calendar time in years
/// (negative for time decay).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Greeks<T: Float> {
    /// ∂V/∂S
    pub delta: T,
    /// ∂²V/∂S²
    pub gamma: T,
    /// ∂V/∂σ
    pub vega: T,
    /// ∂V/∂t
    pub theta: T,
    /// ∂V/∂r
    pub rho: T,
}

/// Black-Scholes model for European option pricing.
///
/// # Type Parameters
/// * `T` - Floating-point type implementing `Float` (e.g., `f64`, `f32`)
///
/// # Examples
/// ```
/// use pricer_models::analytical::BlackScholes;
///
/// let bs = BlackScholes::new(100.0_f64, 0.05, 0.2).unwrap();
/// let call_price = bs.price_call(100.0, 1.0);
/// let put_price = bs.price_put(100.0, 1.0);
///
/// // Put-call parity: C - P = S - K*exp(-rT)
/// let parity = call_price - put_price - (100.0 - 100.0 * (-0.05_f64).exp());
/// assert!(parity.abs() < 1e-10);
/// assert!((call_price - 10.4506).abs() < 1e-4);
/// ```
#[derive(Debug, Clone)]
pub struct BlackScholes<T: Float> {
    /// Spot price (S)
    spot: T,
    /// Risk-free interest rate (r)
    rate: T,
    /// Continuous dividend yield (q)
    dividend: T,
    /// Volatility (σ)
    volatility: T,
}

impl<T: Float> BlackScholes<T> {
    /// Creates a new Black-Scholes model with zero dividend yield.
    ///
    /// # Errors
    /// - `AnalyticalError::InvalidSpot` if spot <= 0
    /// - `AnalyticalError::InvalidVolatility` if volatility < 0 or not finite
    ///
    /// # Examples
    /// ```
    /// use pricer_models::analytical::BlackScholes;
    ///
    /// assert!(BlackScholes::new(-100.0_f64, 0.05, 0.2).is_err());
    /// assert!(BlackScholes::new(100.0_f64, 0.05, -0.2).is_err());
    /// assert!(BlackScholes::new(100.0_f64, 0.05, 0.0).is_ok());
    /// ```
    pub fn new(spot: T, rate: T, volatility: T) -> Result<Self, AnalyticalError> {
        let zero = T::zero();

        if !(spot > zero) || !spot.is_finite() {
            return Err(AnalyticalError::InvalidSpot {
                spot: spot.to_f64().unwrap_or(0.0),
            });
        }

        if !(volatility >= zero) || !volatility.is_finite() {
            return Err(AnalyticalError::InvalidVolatility {
                volatility: volatility.to_f64().unwrap_or(0.0),
            });
        }

        Ok(Self {
            spot,
            rate,
            dividend: zero,
            volatility,
        })
    }

    /// Sets the continuous dividend yield.
    pub fn with_dividend(mut self, dividend: T) -> Self {
        self.dividend = dividend;
        self
    }

    /// Returns the spot price.
    #[inline]
    pub fn spot(&self) -> T {
        self.spot
    }

    /// Returns the risk-free rate.
    #[inline]
    pub fn rate(&self) -> T {
        self.rate
    }

    /// Returns the dividend yield.
    #[inline]
    pub fn dividend(&self) -> T {
        self.dividend
    }

    /// Returns the volatility.
    #[inline]
    pub fn volatility(&self) -> T {
        self.volatility
    }

    fn expired(expiry: T) -> bool {
        expiry <= T::from(1e-10).unwrap()
    }

    /// True when the terminal spot is known, either at expiry or with zero
    /// volatility.
    fn deterministic(&self, expiry: T) -> bool {
        Self::expired(expiry) || self.volatility == T::zero()
    }

    /// Computes d₁ = (ln(S/K) + (r - q + σ²/2)T) / (σ√T).
    ///
    /// Returns ±100 (or 0 at the money) when the terminal spot is known:
    /// spot against strike for expired options, forward against strike for
    /// zero volatility.
    #[inline]
    pub fn d1(&self, strike: T, expiry: T) -> T {
        let half = T::from(0.5).unwrap();
        let log_moneyness = (self.spot / strike).ln();

        if self.deterministic(expiry) {
            let large = T::from(100.0).unwrap();
            let log_forward = if Self::expired(expiry) {
                log_moneyness
            } else {
                log_moneyness + (self.rate - self.dividend) * expiry
            };
            if log_forward > T::zero() {
                return large;
            } else if log_forward < T::zero() {
                return -large;
            } else {
                return T::zero();
            }
        }

        let vol_sqrt_t = self.volatility * expiry.sqrt();
        let drift = (self.rate - self.dividend + half * self.volatility * self.volatility) * expiry;

        (log_moneyness + drift) / vol_sqrt_t
    }

    /// Computes d₂ = d₁ - σ√T.
    #[inline]
    pub fn d2(&self, strike: T, expiry: T) -> T {
        if self.deterministic(expiry) {
            return self.d1(strike, expiry);
        }
        self.d1(strike, expiry) - self.volatility * expiry.sqrt()
    }

    /// Computes European call option price.
    #[inline]
    pub fn price_call(&self, strike: T, expiry: T) -> T {
        self.price(OptionType::Call, strike, expiry)
    }

    /// Computes European put option price.
    #[inline]
    pub fn price_put(&self, strike: T, expiry: T) -> T {
        self.price(OptionType::Put, strike, expiry)
    }

    /// Computes the European price for `option_type`.
    ///
    /// Expired options return intrinsic value.
    pub fn price(&self, option_type: OptionType, strike: T, expiry: T) -> T {
        if Self::expired(expiry) {
            return option_type.payoff(self.spot, strike);
        }

        let phi: T = option_type.sign();
        let d1 = self.d1(strike, expiry);
        let d2 = self.d2(strike, expiry);
        let df_r = (-self.rate * expiry).exp();
        let df_q = (-self.dividend * expiry).exp();

        phi * (self.spot * df_q * norm_cdf(phi * d1) - strike * df_r * norm_cdf(phi * d2))
    }

    /// Computes Delta (∂V/∂S).
    ///
    /// - Call Delta = e^(-qT)·N(d₁)
    /// - Put Delta = e^(-qT)·(N(d₁) - 1)
    #[inline]
    pub fn delta(&self, option_type: OptionType, strike: T, expiry: T) -> T {
        let one = T::one();
        let zero = T::zero();

        if Self::expired(expiry) {
            return match option_type {
                OptionType::Call if self.spot > strike => one,
                OptionType::Put if self.spot < strike => -one,
                _ => zero,
            };
        }

        let df_q = (-self.dividend * expiry).exp();
        let n_d1 = norm_cdf(self.d1(strike, expiry));
        match option_type {
            OptionType::Call => df_q * n_d1,
            OptionType::Put => df_q * (n_d1 - one),
        }
    }

    /// Computes Gamma = e^(-qT)·φ(d₁) / (S·σ·√T).
    ///
    /// Zero when the terminal spot is known.
    #[inline]
    pub fn gamma(&self, strike: T, expiry: T) -> T {
        if self.deterministic(expiry) {
            return T::zero();
        }

        let df_q = (-self.dividend * expiry).exp();
        let d1 = self.d1(strike, expiry);
        df_q * norm_pdf(d1) / (self.spot * self.volatility * expiry.sqrt())
    }

    /// Computes Vega = S·e^(-qT)·√T·φ(d₁).
    #[inline]
    pub fn vega(&self, strike: T, expiry: T) -> T {
        if Self::expired(expiry) {
            return T::zero();
        }

        let df_q = (-self.dividend * expiry).exp();
        let d1 = self.d1(strike, expiry);
        self.spot * df_q * expiry.sqrt() * norm_pdf(d1)
    }

    /// Computes Theta (∂V/∂t, per year).
    ///
    /// θ = -S·e^(-qT)·φ(d₁)·σ/(2√T) - φ·r·K·e^(-rT)·N(φd₂) + φ·q·S·e^(-qT)·N(φd₁)
    #[inline]
    pub fn theta(&self, option_type: OptionType, strike: T, expiry: T) -> T {
        if Self::expired(expiry) {
            return T::zero();
        }

        let phi: T = option_type.sign();
        let two = T::from(2.0).unwrap();
        let d1 = self.d1(strike, expiry);
        let d2 = self.d2(strike, expiry);
        let df_r = (-self.rate * expiry).exp();
        let s_df_q = self.spot * (-self.dividend * expiry).exp();

        let decay = -(s_df_q * norm_pdf(d1) * self.volatility) / (two * expiry.sqrt());
        decay - phi * self.rate * strike * df_r * norm_cdf(phi * d2)
            + phi * self.dividend * s_df_q * norm_cdf(phi * d1)
    }

    /// Computes Rho (∂V/∂r).
    ///
    /// - Call Rho = K·T·e^(-rT)·N(d₂)
    /// - Put Rho = -K·T·e^(-rT)·N(-d₂)
    #[inline]
    pub fn rho(&self, option_type: OptionType, strike: T, expiry: T) -> T {
        if Self::expired(expiry) {
            return T::zero();
        }

        let phi: T = option_type.sign();
        let d2 = self.d2(strike, expiry);
        let df_r = (-self.rate * expiry).exp();
        phi * strike * expiry * df_r * norm_cdf(phi * d2)
    }

    /// All five Greeks at once.
    pub fn greeks(&self, option_type: OptionType, strike: T, expiry: T) -> Greeks<T> {
        Greeks {
            delta: self.delta(option_type, strike, expiry),
            gamma: self.gamma(strike, expiry),
            vega: self.vega(strike, expiry),
            theta: self.theta(option_type, strike, expiry),
            rho: self.rho(option_type, strike, expiry),
        }
    }
}
