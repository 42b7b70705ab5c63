//! # Universe Screening
//!
//! Narrows the provider's full ETF snapshot down to a bounded, ranked candidate
//! set and decides which exchange each candidate's history is requested from.
//!
//! - `UniverseFilter`: liquidity and price-validity predicates, order preserving.
//! - `CandidateRanker`: stable sort by change percent, descending, then truncation.
//! - `ExchangeResolver`: symbol to exchange lookup, either the leading-digit
//!   heuristic (`PrefixResolver`) or an explicit table (`TableResolver`).

pub mod error;
pub mod exchange;
pub mod filter;
pub mod ranker;

pub use error::ScreenerError;
pub use exchange::{ExchangeResolver, PrefixResolver, TableResolver, create_resolver};
pub use filter::UniverseFilter;
pub use ranker::CandidateRanker;
