//! Result set returned by every valuation.
//!
//! A [`ResultSet`] always holds six entries in display order
//! NPV, delta, vega, theta, rho, gamma. Each entry records where its value
//! came from through [`QuantityValue`].

use std::fmt;

/// One of the six reported quantities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quantity {
    /// Net present value
    Npv,
    /// dV/dS
    Delta,
    /// dV/dsigma
    Vega,
    /// dV/dt, per year
    Theta,
    /// dV/dr
    Rho,
    /// d2V/dS2
    Gamma,
}

impl Quantity {
    /// All quantities in display order.
    pub const ALL: [Quantity; 6] = [
        Quantity::Npv,
        Quantity::Delta,
        Quantity::Vega,
        Quantity::Theta,
        Quantity::Rho,
        Quantity::Gamma,
    ];

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Quantity::Npv => "NPV",
            Quantity::Delta => "delta",
            Quantity::Vega => "vega",
            Quantity::Theta => "theta",
            Quantity::Rho => "rho",
            Quantity::Gamma => "gamma",
        }
    }

    #[inline]
    fn index(&self) -> usize {
        match self {
            Quantity::Npv => 0,
            Quantity::Delta => 1,
            Quantity::Vega => 2,
            Quantity::Theta => 3,
            Quantity::Rho => 4,
            Quantity::Gamma => 5,
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A reported value and its source.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum QuantityValue {
    /// Supplied by the pricing engine.
    Engine(f64),
    /// Filled in by bump-and-reprice; NaN when a repricing failed.
    Bumped(f64),
    /// Neither the engine nor the estimator produced it.
    #[default]
    Unavailable,
}

impl QuantityValue {
    /// Numeric value; NaN when unavailable.
    #[inline]
    pub fn value(&self) -> f64 {
        match self {
            QuantityValue::Engine(v) | QuantityValue::Bumped(v) => *v,
            QuantityValue::Unavailable => f64::NAN,
        }
    }

    /// True unless the entry is `Unavailable`.
    #[inline]
    pub fn is_available(&self) -> bool {
        !matches!(self, QuantityValue::Unavailable)
    }

    /// Short source label.
    pub fn source(&self) -> &'static str {
        match self {
            QuantityValue::Engine(_) => "engine",
            QuantityValue::Bumped(_) => "bump",
            QuantityValue::Unavailable => "unavailable",
        }
    }
}

/// The six quantities of a valuation.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::greeks::{Quantity, QuantityValue, ResultSet};
///
/// let mut results = ResultSet::unavailable();
/// results.set(Quantity::Npv, QuantityValue::Engine(10.45));
///
/// assert_eq!(results.npv(), 10.45);
/// assert!(results.value(Quantity::Delta).is_nan());
/// assert_eq!(results.iter().count(), 6);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ResultSet {
    values: [QuantityValue; 6],
}

impl ResultSet {
    /// Every entry unavailable.
    #[inline]
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Entry for `quantity`.
    #[inline]
    pub fn get(&self, quantity: Quantity) -> QuantityValue {
        self.values[quantity.index()]
    }

    /// Replaces the entry for `quantity`.
    #[inline]
    pub fn set(&mut self, quantity: Quantity, value: QuantityValue) {
        self.values[quantity.index()] = value;
    }

    /// Numeric value for `quantity`; NaN when unavailable.
    #[inline]
    pub fn value(&self, quantity: Quantity) -> f64 {
        self.get(quantity).value()
    }

    /// Net present value; NaN when unavailable.
    #[inline]
    pub fn npv(&self) -> f64 {
        self.value(Quantity::Npv)
    }

    /// True when NPV is available and not NaN.
    #[inline]
    pub fn is_valued(&self) -> bool {
        !self.npv().is_nan()
    }

    /// Entries in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Quantity, QuantityValue)> + '_ {
        Quantity::ALL.iter().map(move |q| (*q, self.get(*q)))
    }
}

// Serde support (optional feature)
#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::ser::{Serialize, SerializeMap, Serializer};

    impl Serialize for QuantityValue {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            let v = self.value();
            if v.is_finite() {
                serializer.serialize_f64(v)
            } else {
                serializer.serialize_none()
            }
        }
    }

    impl Serialize for ResultSet {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            let mut map = serializer.serialize_map(Some(6))?;
            for (quantity, value) in self.iter() {
                map.serialize_entry(quantity.name(), &value)?;
            }
            map.end()
        }
    }
}
