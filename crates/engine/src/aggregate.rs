use crate::error::PipelineError;
use crate::outcome::{CandidateOutcome, SkippedCandidate};
use chrono::NaiveDateTime;
use core_types::RiskScore;
use events::ResultEnvelope;

/// Sizes of the universe at each narrowing stage of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageCounts {
    pub universe_size: usize,
    pub filtered_size: usize,
    pub candidate_count: usize,
}

/// Everything a successful run produced, before it is flattened into an envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreeningReport {
    /// Scored candidates in ranked order.
    pub scores: Vec<RiskScore>,
    pub skipped: Vec<SkippedCandidate>,
    pub universe_size: usize,
    pub filtered_size: usize,
    pub candidate_count: usize,
}

impl ScreeningReport {
    pub fn into_envelope(self, timestamp: NaiveDateTime) -> ResultEnvelope {
        ResultEnvelope::success(self.scores, timestamp)
    }
}

/// Splits per-candidate outcomes into scores and skips, keeping input order.
///
/// Fails with `EmptyCandidatePool` when nothing was scored. This is the only
/// place a run is judged fatal after scoring has started.
pub fn aggregate(
    outcomes: Vec<CandidateOutcome>,
    counts: StageCounts,
) -> Result<ScreeningReport, PipelineError> {
    let mut scores = Vec::with_capacity(outcomes.len());
    let mut skipped = Vec::new();

    for outcome in outcomes {
        match outcome {
            CandidateOutcome::Scored(score) => scores.push(score),
            CandidateOutcome::Skipped(skip) => skipped.push(skip),
        }
    }

    if scores.is_empty() {
        return Err(PipelineError::EmptyCandidatePool {
            skipped: skipped.len(),
        });
    }

    Ok(ScreeningReport {
        scores,
        skipped,
        universe_size: counts.universe_size,
        filtered_size: counts.filtered_size,
        candidate_count: counts.candidate_count,
    })
}
