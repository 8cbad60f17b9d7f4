//! Option contract definitions.
//!
//! # Instrument Types
//!
//! - [`OptionType`], [`PlainVanillaPayoff`]: call/put payoff
//! - [`ExerciseStyle`], [`Exercise`]: requested style and dated schedule
//! - [`BarrierType`], [`Barrier`]: single-barrier terms with rebate
//! - [`ContractSpec`]: request-level contract description
//! - [`OptionContract`]: contract anchored at a valuation date
//!
//! # Examples
//!
//! ```
//! use pricer_models::instruments::{
//!     Barrier, BarrierType, ContractSpec, ExerciseStyle, OptionType,
//! };
//! use pricer_core::types::Date;
//!
//! let barrier = Barrier::new(BarrierType::DownOut, 80.0, 0.0).unwrap();
//! let spec = ContractSpec::vanilla(OptionType::Call, 90.0, ExerciseStyle::European, 365)
//!     .with_barrier(barrier);
//!
//! let contract = spec.anchor(Date::from_ymd(2024, 1, 2).unwrap()).unwrap();
//! assert_eq!(contract.payoff().value(100.0), 10.0);
//! assert!(contract.shape().has_barrier);
//! ```

mod barrier;
mod contract;
mod error;
mod exercise;
mod payoff;

pub use barrier::{Barrier, BarrierType};
pub use contract::{ContractShape, ContractSpec, OptionContract};
pub use error::InstrumentError;
pub use exercise::{Exercise, ExerciseStyle};
pub use payoff::{OptionType, PlainVanillaPayoff};
