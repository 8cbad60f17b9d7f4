//! Core time and error types.
//!
//! This module provides:
//! - `time`: Time types (Date, DayCountConvention) for option valuation
//! - `error`: Structured error types for pricing and date operations
//!
//! # Re-exports
//!
//! - [`Date`], [`DayCountConvention`] from `time`
//! - [`PricingError`], [`DateError`] from `error`

pub mod error;
pub mod time;

pub use error::{DateError, PricingError};
pub use time::{Date, DayCountConvention};
