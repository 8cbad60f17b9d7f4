//! Contract specification and the dated contract built from it.

use super::barrier::Barrier;
use super::error::InstrumentError;
use super::exercise::{Exercise, ExerciseStyle};
use super::payoff::{OptionType, PlainVanillaPayoff};
use pricer_core::types::Date;
use std::fmt;

/// Request-level description of an option.
///
/// Barrier type and level travel together in `barrier`, so a contract has
/// either both or neither.
///
/// # Examples
/// ```
/// use pricer_models::instruments::{ContractSpec, ExerciseStyle, OptionType};
/// use pricer_core::types::Date;
///
/// let spec = ContractSpec::vanilla(OptionType::Call, 100.0, ExerciseStyle::European, 365);
/// let contract = spec.anchor(Date::from_ymd(2024, 1, 2).unwrap()).unwrap();
/// assert_eq!(contract.maturity_date(), Date::from_ymd(2025, 1, 1).unwrap());
/// assert!(!contract.shape().has_barrier);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContractSpec {
    /// Call or put
    pub option_type: OptionType,
    /// Strike price
    pub strike: f64,
    /// European or American
    pub exercise_style: ExerciseStyle,
    /// Calendar days from valuation to maturity
    pub maturity_days: i64,
    /// Optional barrier terms
    pub barrier: Option<Barrier>,
}

impl ContractSpec {
    /// Vanilla contract without barrier.
    pub fn vanilla(
        option_type: OptionType,
        strike: f64,
        exercise_style: ExerciseStyle,
        maturity_days: i64,
    ) -> Self {
        Self {
            option_type,
            strike,
            exercise_style,
            maturity_days,
            barrier: None,
        }
    }

    /// Adds barrier terms.
    pub fn with_barrier(mut self, barrier: Barrier) -> Self {
        self.barrier = Some(barrier);
        self
    }

    /// Checks strike and maturity.
    pub fn validate(&self) -> Result<(), InstrumentError> {
        if !self.strike.is_finite() || self.strike <= 0.0 {
            return Err(InstrumentError::InvalidStrike {
                strike: self.strike,
            });
        }
        if self.maturity_days < 1 {
            return Err(InstrumentError::InvalidMaturity {
                days: self.maturity_days,
            });
        }
        Ok(())
    }

    /// Shape used for method compatibility checks.
    #[inline]
    pub fn shape(&self) -> ContractShape {
        ContractShape {
            has_barrier: self.barrier.is_some(),
            exercise_style: self.exercise_style,
        }
    }

    /// Anchors the contract at `valuation_date`.
    pub fn anchor(&self, valuation_date: Date) -> Result<OptionContract, InstrumentError> {
        self.validate()?;
        let maturity = valuation_date
            .add_days(self.maturity_days)
            .map_err(|_| InstrumentError::InvalidMaturity {
                days: self.maturity_days,
            })?;
        let exercise = Exercise::for_style(self.exercise_style, valuation_date, maturity)?;
        let payoff = PlainVanillaPayoff::new(self.option_type, self.strike)?;
        Ok(OptionContract {
            payoff,
            exercise,
            barrier: self.barrier,
        })
    }
}

/// Whether a contract carries a barrier and how it is exercised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContractShape {
    /// Barrier present
    pub has_barrier: bool,
    /// Exercise style
    pub exercise_style: ExerciseStyle,
}

impl fmt::Display for ContractShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.has_barrier { "barrier" } else { "vanilla" };
        write!(f, "{} {}", self.exercise_style, kind)
    }
}

/// Dated contract: vanilla payoff, exercise schedule and optional barrier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionContract {
    payoff: PlainVanillaPayoff,
    exercise: Exercise,
    barrier: Option<Barrier>,
}

impl OptionContract {
    /// Payoff.
    #[inline]
    pub fn payoff(&self) -> &PlainVanillaPayoff {
        &self.payoff
    }

    /// Exercise schedule.
    #[inline]
    pub fn exercise(&self) -> &Exercise {
        &self.exercise
    }

    /// Barrier terms, if any.
    #[inline]
    pub fn barrier(&self) -> Option<&Barrier> {
        self.barrier.as_ref()
    }

    /// Call or put.
    #[inline]
    pub fn option_type(&self) -> OptionType {
        self.payoff.option_type()
    }

    /// Strike.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.payoff.strike()
    }

    /// Maturity date.
    #[inline]
    pub fn maturity_date(&self) -> Date {
        self.exercise.last_date()
    }

    /// Shape of the contract.
    pub fn shape(&self) -> ContractShape {
        ContractShape {
            has_barrier: self.barrier.is_some(),
            exercise_style: self.exercise.style(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::BarrierType;

    fn today() -> Date {
        Date::from_ymd(2024, 1, 2).unwrap()
    }

    #[test]
    fn test_validate_strike_and_maturity() {
        let spec = ContractSpec::vanilla(OptionType::Call, -1.0, ExerciseStyle::European, 365);
        assert_eq!(
            spec.validate(),
            Err(InstrumentError::InvalidStrike { strike: -1.0 })
        );

        let spec = ContractSpec::vanilla(OptionType::Call, 100.0, ExerciseStyle::European, 0);
        assert_eq!(
            spec.validate(),
            Err(InstrumentError::InvalidMaturity { days: 0 })
        );
    }

    #[test]
    fn test_anchor_american_barrier() {
        let barrier = Barrier::new(BarrierType::DownOut, 80.0, 0.0).unwrap();
        let spec = ContractSpec::vanilla(OptionType::Put, 90.0, ExerciseStyle::American, 30)
            .with_barrier(barrier);
        let contract = spec.anchor(today()).unwrap();
        assert_eq!(contract.exercise().first_date(), today().add_days(1).unwrap());
        assert_eq!(contract.maturity_date(), today().add_days(30).unwrap());
        assert_eq!(contract.barrier(), Some(&barrier));
        assert_eq!(contract.shape(), spec.shape());
    }

    #[test]
    fn test_shape_display() {
        let spec = ContractSpec::vanilla(OptionType::Call, 100.0, ExerciseStyle::European, 365);
        assert_eq!(spec.shape().to_string(), "European vanilla");
        let spec = spec.with_barrier(Barrier::new(BarrierType::UpIn, 130.0, 0.0).unwrap());
        assert_eq!(spec.shape().to_string(), "European barrier");
    }
}
