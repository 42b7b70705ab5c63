//! # Result Envelope
//!
//! This crate defines the one structure a screening run hands to its consumer:
//! a `ResultEnvelope` that is either a success with scored candidates or a
//! normalized error. It also provides the JSON sink that writes it out.
//!
//! It depends only on `core-types` and is the definitive wire contract for
//! downstream processes.

// Declare the modules that make up this crate.
pub mod envelope;
pub mod error;
pub mod sink;

// Re-export the core types to provide a clean public API.
pub use envelope::{ErrorEnvelope, ResultEnvelope, SuccessEnvelope, TIMESTAMP_FORMAT, local_now};
pub use error::EventsError;
pub use sink::{JsonSink, ResultSink};
