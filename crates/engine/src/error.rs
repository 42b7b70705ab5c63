use thiserror::Error;

/// Failures that abort a whole screening run.
///
/// Per-candidate problems never appear here; they become a `SkipReason`.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Market data provider error: {0}")]
    Provider(#[from] api_client::error::ApiError),

    #[error(transparent)]
    Screener(#[from] screener::ScreenerError),

    #[error("Risk metric error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),

    #[error(
        "Candidate pool is empty: every candidate was skipped during scoring ({skipped} skipped)"
    )]
    EmptyCandidatePool { skipped: usize },
}
