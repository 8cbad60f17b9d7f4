//! # pricer_core: Market Foundation for the Option Pricer
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core is the bottom layer of the workspace, providing:
//! - Time types: `Date`, `DayCountConvention` (`types::time`)
//! - Error types: `PricingError`, `DateError` (`types::error`)
//! - Shared quotes with scoped restore: `SimpleQuote`, `QuoteBump` (`market_data::quote`)
//! - Quote-linked flat term structures: `FlatForward`, `BlackConstantVol`
//! - Per-request market state: `MarketSnapshot`
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other pricer_* crates, with minimal external dependencies:
//! - num-traits: Traits for generic numerical computation
//! - chrono: Date arithmetic
//! - thiserror: Market data errors
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::market_data::MarketSnapshot;
//! use pricer_core::types::{Date, DayCountConvention};
//!
//! let start = Date::from_ymd(2024, 1, 1).unwrap();
//! let end = Date::from_ymd(2024, 7, 1).unwrap();
//! let year_fraction = DayCountConvention::Actual365Fixed.year_fraction(start, end);
//! assert!((year_fraction - 182.0 / 365.0).abs() < 1e-12);
//!
//! let snapshot = MarketSnapshot::new(start, 100.0, 0.2, 0.05);
//! {
//!     let _bump = snapshot.spot().bump(101.0);
//!     assert_eq!(snapshot.spot().value(), 101.0);
//! }
//! assert_eq!(snapshot.spot().value(), 100.0);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for Date and DayCountConvention

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod market_data;
pub mod types;
