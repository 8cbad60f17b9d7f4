//! # Pricer Models (L2: Business Logic)
//!
//! Option contracts, the Black-Scholes process and closed-form formulas.
//!
//! This crate provides:
//! - Contract definitions: option type, exercise, barrier terms, [`instruments::ContractSpec`]
//! - The quote-linked [`models::BlackScholesProcess`]
//! - Analytical formulas: Black-Scholes-Merton with Greeks, Reiner-Rubinstein barriers
//!
//! ## Design Principles
//!
//! - **Closed enums** for every enumerated field, parsed once with `FromStr`
//! - **Validated construction**: invalid strikes, maturities and barriers fail early
//! - **Generic closed forms** over `T: Float`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod instruments;
pub mod models;
