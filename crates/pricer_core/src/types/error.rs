//! Error types for structured error handling.
//!
//! This module provides:
//! - `PricingError`: Errors from pricing engines and quantity reads
//! - `DateError`: Errors from date construction and parsing

use std::fmt;

/// Categorised pricing errors.
///
/// Raised by pricing engines when a contract cannot be valued or a
/// requested quantity cannot be produced in closed form.
///
/// # Variants
/// - `InvalidInput`: Invalid market data or parameters
/// - `NumericalInstability`: Computation failed to produce a finite value
/// - `ModelFailure`: Model assumptions violated
/// - `UnsupportedInstrument`: Contract shape not supported by the engine
/// - `QuantityUnavailable`: Engine does not provide the requested quantity
/// - `BarrierTouched`: Spot already sits on the far side of the barrier
///
/// # Examples
/// ```
/// use pricer_core::types::PricingError;
///
/// let err = PricingError::InvalidInput("Negative spot price".to_string());
/// assert_eq!(format!("{}", err), "Invalid input: Negative spot price");
///
/// let err = PricingError::QuantityUnavailable("vega");
/// assert_eq!(format!("{}", err), "Quantity not provided by engine: vega");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// Invalid input data or parameters
    InvalidInput(String),

    /// Numerical instability during computation
    NumericalInstability(String),

    /// Model failed to produce valid result
    ModelFailure(String),

    /// Instrument type not supported
    UnsupportedInstrument(String),

    /// The engine does not produce this quantity
    QuantityUnavailable(&'static str),

    /// Barrier already breached at the valuation date
    BarrierTouched {
        /// Current spot
        spot: String,
        /// Barrier level
        barrier: String,
    },
}

impl PricingError {
    /// Creates a `BarrierTouched` error from numeric spot and barrier levels.
    pub fn barrier_touched(spot: f64, barrier: f64) -> Self {
        PricingError::BarrierTouched {
            spot: spot.to_string(),
            barrier: barrier.to_string(),
        }
    }
}

impl fmt::Display for PricingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            PricingError::NumericalInstability(msg) => {
                write!(f, "Numerical instability: {}", msg)
            }
            PricingError::ModelFailure(msg) => write!(f, "Model failure: {}", msg),
            PricingError::UnsupportedInstrument(msg) => {
                write!(f, "Unsupported instrument: {}", msg)
            }
            PricingError::QuantityUnavailable(name) => {
                write!(f, "Quantity not provided by engine: {}", name)
            }
            PricingError::BarrierTouched { spot, barrier } => {
                write!(f, "Barrier touched: spot {} against barrier {}", spot, barrier)
            }
        }
    }
}

impl std::error::Error for PricingError {}

/// Date-related errors.
///
/// # Variants
/// - `InvalidDate`: Invalid date components (e.g., February 30th)
/// - `ParseError`: Failed to parse date string
/// - `OutOfRange`: Date arithmetic left the representable range
///
/// # Examples
/// ```
/// use pricer_core::types::DateError;
///
/// let err = DateError::InvalidDate { year: 2024, month: 2, day: 30 };
/// assert_eq!(format!("{}", err), "Invalid date: 2024-2-30");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// Invalid date components (e.g., February 30th).
    InvalidDate {
        /// Year component
        year: i32,
        /// Month component (1-12)
        month: u32,
        /// Day component (1-31)
        day: u32,
    },

    /// Failed to parse date string.
    ParseError(String),

    /// Date arithmetic overflowed the calendar range.
    OutOfRange(String),
}

impl fmt::Display for DateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateError::InvalidDate { year, month, day } => {
                write!(f, "Invalid date: {}-{}-{}", year, month, day)
            }
            DateError::ParseError(msg) => write!(f, "Date parse error: {}", msg),
            DateError::OutOfRange(msg) => write!(f, "Date out of range: {}", msg),
        }
    }
}

impl std::error::Error for DateError {}

impl From<DateError> for PricingError {
    fn from(err: DateError) -> Self {
        PricingError::InvalidInput(err.to_string())
    }
}
