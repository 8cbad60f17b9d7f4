//! Option exercise definitions.
//!
//! - [`ExerciseStyle`]: European or American, as requested
//! - [`Exercise`]: the dated exercise schedule attached to a contract

use super::error::InstrumentError;
use pricer_core::types::Date;
use std::fmt;
use std::str::FromStr;

/// Requested exercise style.
///
/// # Examples
/// ```
/// use pricer_models::instruments::ExerciseStyle;
///
/// let style: ExerciseStyle = "american".parse().unwrap();
/// assert!(style.allows_early_exercise());
/// assert!("Bermudan".parse::<ExerciseStyle>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExerciseStyle {
    /// Exercise only at maturity.
    European,
    /// Exercise on any day in the exercise window.
    American,
}

impl ExerciseStyle {
    /// Returns whether exercise is possible before maturity.
    #[inline]
    pub fn allows_early_exercise(&self) -> bool {
        matches!(self, ExerciseStyle::American)
    }

    /// Canonical name.
    pub fn name(&self) -> &'static str {
        match self {
            ExerciseStyle::European => "European",
            ExerciseStyle::American => "American",
        }
    }
}

impl fmt::Display for ExerciseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExerciseStyle {
    type Err = InstrumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "european" => Ok(ExerciseStyle::European),
            "american" => Ok(ExerciseStyle::American),
            _ => Err(InstrumentError::InvalidExerciseStyle {
                value: s.to_string(),
            }),
        }
    }
}

/// Dated exercise schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exercise {
    /// Exercise on the maturity date only.
    European {
        /// Maturity date
        maturity: Date,
    },
    /// Exercise on any date in `[earliest, latest]`.
    American {
        /// First exercise date
        earliest: Date,
        /// Last exercise date (maturity)
        latest: Date,
    },
}

impl Exercise {
    /// Builds the schedule for `style` on a contract valued at `valuation_date`.
    ///
    /// American exercise opens one day after the valuation date.
    pub fn for_style(
        style: ExerciseStyle,
        valuation_date: Date,
        maturity: Date,
    ) -> Result<Self, InstrumentError> {
        if maturity <= valuation_date {
            return Err(InstrumentError::InvalidMaturity {
                days: maturity - valuation_date,
            });
        }
        Ok(match style {
            ExerciseStyle::European => Exercise::European { maturity },
            ExerciseStyle::American => {
                let earliest = valuation_date.add_days(1).map_err(|_| {
                    InstrumentError::InvalidMaturity {
                        days: maturity - valuation_date,
                    }
                })?;
                Exercise::American {
                    earliest,
                    latest: maturity,
                }
            }
        })
    }

    /// Last exercise date.
    #[inline]
    pub fn last_date(&self) -> Date {
        match self {
            Exercise::European { maturity } => *maturity,
            Exercise::American { latest, .. } => *latest,
        }
    }

    /// First date on which exercise is allowed.
    #[inline]
    pub fn first_date(&self) -> Date {
        match self {
            Exercise::European { maturity } => *maturity,
            Exercise::American { earliest, .. } => *earliest,
        }
    }

    /// Style of this schedule.
    #[inline]
    pub fn style(&self) -> ExerciseStyle {
        match self {
            Exercise::European { .. } => ExerciseStyle::European,
            Exercise::American { .. } => ExerciseStyle::American,
        }
    }
}
