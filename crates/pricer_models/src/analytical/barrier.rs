//! Closed-form single-barrier option prices (Reiner-Rubinstein, with rebate).
//!
//! Continuous monitoring, flat rate, dividend yield and volatility. The
//! knock-out rebate is paid at hit; the knock-in rebate is paid at expiry
//! when the barrier was never reached.
//!
//! ## Building blocks (Haug notation)
//!
//! With b = r - q, μ = (b - σ²/2)/σ², λ = √(μ² + 2r/σ²), η = +1 for down
//! barriers and -1 for up barriers, φ = +1 for calls and -1 for puts:
//!
//! - A, B: vanilla-like terms at strike and barrier
//! - C, D: reflected terms scaled by (H/S)^(2μ)
//! - E: knock-in rebate
//! - F: knock-out rebate, see [`HitRebate`]
//!
//! With zero volatility the spot follows its forward, so the barrier is hit
//! at a known time or never.

use num_traits::Float;

use super::black_scholes::BlackScholes;
use super::distributions::norm_cdf;
use super::error::AnalyticalError;
use crate::instruments::{BarrierType, OptionType};

/// Reiner-Rubinstein barrier formulas on top of a Black-Scholes market.
///
/// # Examples
/// ```
/// use pricer_models::analytical::{BarrierAnalytic, BlackScholes};
/// use pricer_models::instruments::{BarrierType, OptionType};
///
/// let bs = BlackScholes::new(100.0_f64, 0.05, 0.2).unwrap();
/// let formula = BarrierAnalytic::new(bs.clone());
///
/// let out = formula
///     .price(OptionType::Call, BarrierType::DownOut, 80.0, 0.0, 90.0, 1.0)
///     .unwrap();
/// let inn = formula
///     .price(OptionType::Call, BarrierType::DownIn, 80.0, 0.0, 90.0, 1.0)
///     .unwrap();
/// assert!((out + inn - bs.price_call(90.0, 1.0)).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct BarrierAnalytic<T: Float> {
    model: BlackScholes<T>,
}

impl<T: Float> BarrierAnalytic<T> {
    /// Wraps a Black-Scholes market.
    pub fn new(model: BlackScholes<T>) -> Self {
        Self { model }
    }

    /// Underlying market.
    pub fn model(&self) -> &BlackScholes<T> {
        &self.model
    }

    /// Prices a single-barrier option.
    ///
    /// # Errors
    /// - `AnalyticalError::InvalidBarrier` if `level <= 0`
    /// - `AnalyticalError::BarrierTouched` if spot is on or beyond the barrier
    /// - `AnalyticalError::NumericalInstability` if the result is not finite
    pub fn price(
        &self,
        option_type: OptionType,
        barrier_type: BarrierType,
        level: T,
        rebate: T,
        strike: T,
        expiry: T,
    ) -> Result<T, AnalyticalError> {
        let zero = T::zero();
        let one = T::one();
        let two = T::from(2.0).unwrap();
        let half = T::from(0.5).unwrap();

        if !(level > zero) {
            return Err(AnalyticalError::InvalidBarrier {
                level: level.to_f64().unwrap_or(0.0),
            });
        }

        let s = self.model.spot();
        let touched = if barrier_type.is_down() {
            s <= level
        } else {
            s >= level
        };
        if touched {
            return Err(AnalyticalError::BarrierTouched {
                spot: s.to_f64().unwrap_or(0.0),
                barrier: level.to_f64().unwrap_or(0.0),
            });
        }

        if expiry <= T::from(1e-10).unwrap() {
            return Ok(if barrier_type.is_knock_in() {
                rebate
            } else {
                option_type.payoff(s, strike)
            });
        }

        let r = self.model.rate();
        let q = self.model.dividend();
        let sigma = self.model.volatility();
        let h = level;
        let k = strike;
        let hit_rebate = HitRebate::new(&self.model, barrier_type);

        if sigma == zero {
            let vanilla = self.model.price(option_type, k, expiry);
            let hit_time = hit_rebate.hit_time(s, h).filter(|tau| *tau <= expiry);
            return Ok(match (barrier_type.is_knock_in(), hit_time) {
                (true, Some(_)) => vanilla,
                (true, None) => rebate * (-r * expiry).exp(),
                (false, Some(tau)) => rebate * (-r * tau).exp(),
                (false, None) => vanilla,
            });
        }

        let eta = if barrier_type.is_down() { one } else { -one };
        let phi: T = option_type.sign();

        let sigma_sq = sigma * sigma;
        let st = sigma * expiry.sqrt();
        let mu = (r - q - half * sigma_sq) / sigma_sq;
        let df_r = (-r * expiry).exp();
        let df_q = (-q * expiry).exp();

        let shift = (one + mu) * st;
        let x1 = (s / k).ln() / st + shift;
        let x2 = (s / h).ln() / st + shift;
        let y1 = (h * h / (s * k)).ln() / st + shift;
        let y2 = (h / s).ln() / st + shift;

        let ln_hs = (h / s).ln();
        let hs_2mu = (two * mu * ln_hs).exp();
        let hs_2mu1 = (two * (mu + one) * ln_hs).exp();

        let a = phi * s * df_q * norm_cdf(phi * x1) - phi * k * df_r * norm_cdf(phi * (x1 - st));
        let b = phi * s * df_q * norm_cdf(phi * x2) - phi * k * df_r * norm_cdf(phi * (x2 - st));
        let c = phi * s * df_q * hs_2mu1 * norm_cdf(eta * y1)
            - phi * k * df_r * hs_2mu * norm_cdf(eta * (y1 - st));
        let d = phi * s * df_q * hs_2mu1 * norm_cdf(eta * y2)
            - phi * k * df_r * hs_2mu * norm_cdf(eta * (y2 - st));
        let e = rebate * df_r * (norm_cdf(eta * (x2 - st)) - hs_2mu * norm_cdf(eta * (y2 - st)));
        let f = hit_rebate.value(s, h, rebate, expiry);

        let strike_above = k >= h;
        let value = match (barrier_type, option_type, strike_above) {
            (BarrierType::DownOut, OptionType::Call, true) => a - c + f,
            (BarrierType::DownOut, OptionType::Call, false) => b - d + f,
            (BarrierType::UpOut, OptionType::Call, true) => f,
            (BarrierType::UpOut, OptionType::Call, false) => a - b + c - d + f,
            (BarrierType::DownOut, OptionType::Put, true) => a - b + c - d + f,
            (BarrierType::DownOut, OptionType::Put, false) => f,
            (BarrierType::UpOut, OptionType::Put, true) => b - d + f,
            (BarrierType::UpOut, OptionType::Put, false) => a - c + f,
            (BarrierType::DownIn, OptionType::Call, true) => c + e,
            (BarrierType::DownIn, OptionType::Call, false) => a - b + d + e,
            (BarrierType::UpIn, OptionType::Call, true) => a + e,
            (BarrierType::UpIn, OptionType::Call, false) => b - c + d + e,
            (BarrierType::DownIn, OptionType::Put, true) => b - c + d + e,
            (BarrierType::DownIn, OptionType::Put, false) => a + e,
            (BarrierType::UpIn, OptionType::Put, true) => a - b + d + e,
            (BarrierType::UpIn, OptionType::Put, false) => c + e,
        };

        if !value.is_finite() {
            return Err(AnalyticalError::NumericalInstability {
                message: "barrier price is not finite".to_string(),
            });
        }
        Ok(value.max(zero))
    }
}

/// Present value of a rebate paid at the first hit of a barrier within a
/// horizon, continuously monitored.
///
/// Built once per market and evaluated from any starting spot, so path
/// simulations can price the rebate leg of each step in closed form.
///
/// # Examples
/// ```
/// use pricer_models::analytical::{BlackScholes, HitRebate};
/// use pricer_models::instruments::BarrierType;
///
/// let bs = BlackScholes::new(100.0_f64, 0.05, 0.2).unwrap();
/// let leg = HitRebate::new(&bs, BarrierType::DownOut);
///
/// let near = leg.value(100.0, 95.0, 1.0, 1.0);
/// let far = leg.value(100.0, 60.0, 1.0, 1.0);
/// assert!(near > far && far > 0.0);
/// assert_eq!(leg.value(100.0, 95.0, 1.0, 0.0), 0.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct HitRebate<T: Float> {
    rate: T,
    carry: T,
    volatility: T,
    mu: T,
    lambda: T,
    eta: T,
}

impl<T: Float> HitRebate<T> {
    /// Rebate leg for `barrier_type` in the market of `model`.
    pub fn new(model: &BlackScholes<T>, barrier_type: BarrierType) -> Self {
        let two = T::from(2.0).unwrap();
        let half = T::from(0.5).unwrap();
        let rate = model.rate();
        let carry = rate - model.dividend();
        let volatility = model.volatility();
        let sigma_sq = volatility * volatility;
        let mu = (carry - half * sigma_sq) / sigma_sq;
        let lambda = (mu * mu + two * rate / sigma_sq).sqrt();
        Self {
            rate,
            carry,
            volatility,
            mu,
            lambda,
            eta: if barrier_type.is_down() { T::one() } else { -T::one() },
        }
    }

    /// Value at `spot` of `rebate` paid when `level` is first hit within
    /// `horizon` years.
    pub fn value(&self, spot: T, level: T, rebate: T, horizon: T) -> T {
        let zero = T::zero();
        if !(horizon > zero) || rebate == zero {
            return zero;
        }
        if self.volatility == zero {
            return match self.hit_time(spot, level) {
                Some(tau) if tau <= horizon => rebate * (-self.rate * tau).exp(),
                _ => zero,
            };
        }

        let two = T::from(2.0).unwrap();
        let eta = self.eta;
        let st = self.volatility * horizon.sqrt();
        let ln_hs = (level / spot).ln();
        let z = ln_hs / st + self.lambda * st;
        rebate
            * (((self.mu + self.lambda) * ln_hs).exp() * norm_cdf(eta * z)
                + ((self.mu - self.lambda) * ln_hs).exp()
                    * norm_cdf(eta * (z - two * self.lambda * st)))
    }

    /// Time at which the forward of `spot` reaches `level`; `None` when the
    /// forward moves away from the barrier.
    pub fn hit_time(&self, spot: T, level: T) -> Option<T> {
        let tau = (level / spot).ln() / self.carry;
        (tau.is_finite() && tau > T::zero()).then_some(tau)
    }
}
