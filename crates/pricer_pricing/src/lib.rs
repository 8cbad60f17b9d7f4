//! # Pricer Pricing (Layer 3: Engines and Valuation)
//!
//! ## Layer 3 Role
//!
//! pricer_pricing turns a contract and a market snapshot into a result set:
//! - Five pricing engines behind the [`engines::PricingEngine`] trait
//! - Method selection by name with contract-shape checks ([`method`])
//! - Single-call valuation with per-quantity fallbacks ([`valuation`])
//! - Bump-and-reprice Greeks for whatever an engine leaves out ([`greeks`])
//! - Request dispatch from a flat field set ([`request`])
//!
//! ## Engines
//!
//! | Method | Engine | Shapes |
//! |--------|--------|--------|
//! | Analytical | [`engines::AnalyticEuropeanEngine`] | European vanilla |
//! | AnalyticalBinary | [`engines::AnalyticBarrierEngine`] | European barrier |
//! | FiniteDifferenceGrid | [`engines::FdBlackScholesEngine`] | all |
//! | MonteCarlo | [`engines::MonteCarloEngine`] | European vanilla and barrier |
//! | BinomialTree | [`engines::BinomialEngine`] | all |
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_pricing::greeks::{Quantity, QuantityValue};
//! use pricer_pricing::{price_request, EngineSettings, PricingRequest};
//!
//! let request: PricingRequest = serde_json::from_str(r#"{
//!     "spot": 100.0, "strike": 100.0, "volatility": 0.2, "riskFreeRate": 0.05,
//!     "maturity": 365, "optionType": "Put", "exerciseStyle": "American",
//!     "pricingMethod": "Binomial", "valuationDate": "2024-01-02"
//! }"#).unwrap();
//!
//! let results = price_request(&request, &EngineSettings::default()).unwrap();
//! assert!(results.npv() > 5.57);
//! assert!(matches!(results.get(Quantity::Delta), QuantityValue::Engine(_)));
//! assert!(matches!(results.get(Quantity::Vega), QuantityValue::Bumped(_)));
//! ```
//!
//! ## Threading
//!
//! Market quotes are single-threaded shared cells. Build one snapshot per
//! worker from the (`Send`) [`PricingRequest`].
//!
//! ## Feature Flags
//!
//! - `serde` (default): request deserialisation, settings and result set serialisation

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod engines;
pub mod error;
pub mod greeks;
pub mod method;
pub mod request;
pub mod rng;
pub mod settings;
pub mod valuation;

// Re-export commonly used items for convenience
pub use error::{ConfigError, ValuationError};
pub use greeks::ResultSet;
pub use method::{select_method, MethodKind, PricingMethod};
pub use request::{price_request, PricingRequest, RequestRoute};
pub use settings::EngineSettings;
pub use valuation::value_contract;
