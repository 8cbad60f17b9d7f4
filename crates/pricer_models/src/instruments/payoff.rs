//! Option type and plain vanilla payoff.

use super::error::InstrumentError;
use num_traits::Float;
use std::fmt;
use std::str::FromStr;

/// Call or put.
///
/// Parsed case-insensitively from `"Call"` / `"Put"`.
///
/// # Examples
/// ```
/// use pricer_models::instruments::OptionType;
///
/// let call: OptionType = "call".parse().unwrap();
/// assert_eq!(call, OptionType::Call);
/// assert_eq!(call.payoff(110.0_f64, 100.0), 10.0);
/// assert!("Straddle".parse::<OptionType>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OptionType {
    /// Call option: max(S - K, 0)
    Call,
    /// Put option: max(K - S, 0)
    Put,
}

impl OptionType {
    /// Intrinsic payoff at `spot` for `strike`.
    #[inline]
    pub fn payoff<T: Float>(&self, spot: T, strike: T) -> T {
        match self {
            OptionType::Call => (spot - strike).max(T::zero()),
            OptionType::Put => (strike - spot).max(T::zero()),
        }
    }

    /// +1 for calls, -1 for puts.
    #[inline]
    pub fn sign<T: Float>(&self) -> T {
        match self {
            OptionType::Call => T::one(),
            OptionType::Put => -T::one(),
        }
    }

    /// Returns whether this is a call.
    #[inline]
    pub fn is_call(&self) -> bool {
        matches!(self, OptionType::Call)
    }

    /// Canonical name.
    pub fn name(&self) -> &'static str {
        match self {
            OptionType::Call => "Call",
            OptionType::Put => "Put",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OptionType {
    type Err = InstrumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" => Ok(OptionType::Call),
            "put" => Ok(OptionType::Put),
            _ => Err(InstrumentError::InvalidOptionType {
                value: s.to_string(),
            }),
        }
    }
}

/// Plain vanilla payoff `max(φ(S - K), 0)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlainVanillaPayoff {
    option_type: OptionType,
    strike: f64,
}

impl PlainVanillaPayoff {
    /// Creates a payoff, rejecting non-positive strikes.
    pub fn new(option_type: OptionType, strike: f64) -> Result<Self, InstrumentError> {
        if !strike.is_finite() || strike <= 0.0 {
            return Err(InstrumentError::InvalidStrike { strike });
        }
        Ok(Self {
            option_type,
            strike,
        })
    }

    /// Option type.
    #[inline]
    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    /// Strike.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Payoff at `spot`.
    #[inline]
    pub fn value(&self, spot: f64) -> f64 {
        self.option_type.payoff(spot, self.strike)
    }
}
