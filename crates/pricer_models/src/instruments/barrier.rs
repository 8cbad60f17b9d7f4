//! Barrier terms for single-barrier options.

use super::error::InstrumentError;
use std::fmt;
use std::str::FromStr;

/// Barrier direction and knock behaviour.
///
/// # Examples
/// ```
/// use pricer_models::instruments::BarrierType;
///
/// let bt: BarrierType = "DownOut".parse().unwrap();
/// assert!(bt.is_down());
/// assert!(!bt.is_knock_in());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BarrierType {
    /// Activated when spot falls to the barrier.
    DownIn,
    /// Extinguished when spot falls to the barrier.
    DownOut,
    /// Activated when spot rises to the barrier.
    UpIn,
    /// Extinguished when spot rises to the barrier.
    UpOut,
}

impl BarrierType {
    /// All barrier types in canonical order.
    pub const ALL: [BarrierType; 4] = [
        BarrierType::DownOut,
        BarrierType::DownIn,
        BarrierType::UpOut,
        BarrierType::UpIn,
    ];

    /// Barrier sits below spot.
    #[inline]
    pub fn is_down(&self) -> bool {
        matches!(self, BarrierType::DownIn | BarrierType::DownOut)
    }

    /// Option comes alive on touch.
    #[inline]
    pub fn is_knock_in(&self) -> bool {
        matches!(self, BarrierType::DownIn | BarrierType::UpIn)
    }

    /// Canonical name.
    pub fn name(&self) -> &'static str {
        match self {
            BarrierType::DownIn => "DownIn",
            BarrierType::DownOut => "DownOut",
            BarrierType::UpIn => "UpIn",
            BarrierType::UpOut => "UpOut",
        }
    }
}

impl fmt::Display for BarrierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BarrierType {
    type Err = InstrumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "downin" => Ok(BarrierType::DownIn),
            "downout" => Ok(BarrierType::DownOut),
            "upin" => Ok(BarrierType::UpIn),
            "upout" => Ok(BarrierType::UpOut),
            _ => Err(InstrumentError::InvalidBarrierType {
                value: s.to_string(),
            }),
        }
    }
}

/// Barrier terms: type, level and the rebate paid when the option is
/// knocked out (or never knocked in).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Barrier {
    /// Barrier type
    pub barrier_type: BarrierType,
    /// Barrier level
    pub level: f64,
    /// Cash rebate
    pub rebate: f64,
}

impl Barrier {
    /// Creates validated barrier terms.
    ///
    /// ```
    /// use pricer_models::instruments::{Barrier, BarrierType};
    ///
    /// let b = Barrier::new(BarrierType::DownOut, 80.0, 0.0).unwrap();
    /// assert!(b.is_touched(80.0));
    /// assert!(!b.is_touched(100.0));
    /// assert!(Barrier::new(BarrierType::UpIn, 0.0, 0.0).is_err());
    /// ```
    pub fn new(barrier_type: BarrierType, level: f64, rebate: f64) -> Result<Self, InstrumentError> {
        if !level.is_finite() || level <= 0.0 {
            return Err(InstrumentError::InvalidBarrierLevel { level });
        }
        if !rebate.is_finite() || rebate < 0.0 {
            return Err(InstrumentError::InvalidRebate { rebate });
        }
        Ok(Self {
            barrier_type,
            level,
            rebate,
        })
    }

    /// Whether `spot` is on or beyond the barrier.
    #[inline]
    pub fn is_touched(&self, spot: f64) -> bool {
        if self.barrier_type.is_down() {
            spot <= self.level
        } else {
            spot >= self.level
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_names() {
        for bt in BarrierType::ALL {
            assert_eq!(bt.name().parse::<BarrierType>().unwrap(), bt);
            assert_eq!(bt.name().to_uppercase().parse::<BarrierType>().unwrap(), bt);
        }
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(
            "DoubleKnockOut".parse::<BarrierType>(),
            Err(InstrumentError::InvalidBarrierType {
                value: "DoubleKnockOut".to_string()
            })
        );
    }

    #[test]
    fn test_up_barrier_touch() {
        let b = Barrier::new(BarrierType::UpOut, 120.0, 0.0).unwrap();
        assert!(b.is_touched(120.0));
        assert!(b.is_touched(130.0));
        assert!(!b.is_touched(119.99));
    }

    #[test]
    fn test_negative_rebate_rejected() {
        assert_eq!(
            Barrier::new(BarrierType::DownIn, 90.0, -1.0),
            Err(InstrumentError::InvalidRebate { rebate: -1.0 })
        );
    }
}
