//! # Core Types
//!
//! The shared vocabulary of the screener: universe snapshot rows, ranked
//! candidates, daily price bars and the per-candidate risk score that ends up
//! in the result set.
//!
//! This crate has no knowledge of providers, configuration or scoring. Every
//! other crate in the workspace depends on it.

pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{AdjustMode, Exchange};
pub use error::CoreError;
pub use structs::{Candidate, PriceBar, QualifiedSymbol, RiskScore, UniverseEntry};
