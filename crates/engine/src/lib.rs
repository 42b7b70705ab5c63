//! # Screening Engine
//!
//! Orchestrates one screening run. The engine pulls the ETF universe from a
//! `MarketDataProvider`, narrows it with the screener, scores every candidate
//! with the risk metric engine and resolves the run into a `ResultEnvelope`.
//!
//! Failures are split into two tiers:
//!
//! - A single candidate's failure is a `SkipReason`. It is logged and the run
//!   continues.
//! - An empty universe, no qualifying candidates, or an empty scored pool is a
//!   `PipelineError` and produces the error envelope.

pub mod aggregate;
pub mod error;
pub mod outcome;
pub mod pipeline;

pub use aggregate::{ScreeningReport, StageCounts, aggregate};
pub use error::PipelineError;
pub use outcome::{CandidateOutcome, SkipReason, SkippedCandidate};
pub use pipeline::ScreeningPipeline;
