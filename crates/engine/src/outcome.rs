use core_types::{RiskScore, UniverseEntry};
use std::fmt;

/// Why a candidate was left out of the result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The exchange lookup could not place the symbol.
    ResolutionFailed { message: String },

    /// Fewer bars came back than the scoring floor requires.
    InsufficientHistory { bars: usize, required: usize },

    /// The history request itself failed.
    ProviderFailure { message: String },

    /// The bars were returned but could not be scored.
    InvalidSeries { message: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::ResolutionFailed { message } => {
                write!(f, "exchange resolution failed: {}", message)
            }
            SkipReason::InsufficientHistory { bars, required } => {
                write!(f, "insufficient history: {} bars, {} required", bars, required)
            }
            SkipReason::ProviderFailure { message } => {
                write!(f, "history fetch failed: {}", message)
            }
            SkipReason::InvalidSeries { message } => write!(f, "invalid price series: {}", message),
        }
    }
}

/// Diagnostic record of a skipped candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedCandidate {
    pub symbol: String,
    pub name: String,
    pub reason: SkipReason,
}

impl SkippedCandidate {
    pub fn new(entry: &UniverseEntry, reason: SkipReason) -> Self {
        Self {
            symbol: entry.symbol.clone(),
            name: entry.name.clone(),
            reason,
        }
    }
}

/// The result of processing one ranked candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateOutcome {
    Scored(RiskScore),
    Skipped(SkippedCandidate),
}

impl CandidateOutcome {
    pub fn is_scored(&self) -> bool {
        matches!(self, CandidateOutcome::Scored(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_history_names_both_counts() {
        let reason = SkipReason::InsufficientHistory {
            bars: 19,
            required: 20,
        };
        assert_eq!(reason.to_string(), "insufficient history: 19 bars, 20 required");
    }
}
