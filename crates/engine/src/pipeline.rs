use crate::aggregate::{ScreeningReport, StageCounts, aggregate};
use crate::error::PipelineError;
use crate::outcome::{CandidateOutcome, SkipReason, SkippedCandidate};
use analytics::{RiskMetricEngine, RiskReport};
use api_client::MarketDataProvider;
use configuration::Settings;
use core_types::{AdjustMode, Candidate, QualifiedSymbol, RiskScore, UniverseEntry};
use events::{ResultEnvelope, local_now};
use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use screener::{CandidateRanker, ExchangeResolver, UniverseFilter};
use std::sync::Arc;

/// The end-to-end screening run: universe, filter, rank, score, aggregate.
pub struct ScreeningPipeline {
    provider: Arc<dyn MarketDataProvider>,
    resolver: Arc<dyn ExchangeResolver>,
    filter: UniverseFilter,
    ranker: CandidateRanker,
    metrics: RiskMetricEngine,
    adjust: AdjustMode,
    concurrency: usize,
    progress: Option<ProgressBar>,
}

impl ScreeningPipeline {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        resolver: Arc<dyn ExchangeResolver>,
        settings: &Settings,
    ) -> Self {
        Self {
            provider,
            resolver,
            filter: UniverseFilter::new(settings.universe.clone()),
            ranker: CandidateRanker::new(settings.ranking.clone()),
            metrics: RiskMetricEngine::new(settings.risk_metric.clone()),
            adjust: settings.provider.adjust,
            concurrency: settings.pipeline.concurrency.max(1),
            progress: None,
        }
    }

    /// Reports each processed candidate on the given bar.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Runs the pipeline and normalizes the outcome into an envelope.
    ///
    /// Never fails: any run-level error becomes the error form, stamped with
    /// the local time at which the run ended.
    pub async fn run(&self) -> ResultEnvelope {
        match self.try_run().await {
            Ok(report) => {
                tracing::info!(
                    universe = report.universe_size,
                    filtered = report.filtered_size,
                    candidates = report.candidate_count,
                    scored = report.scores.len(),
                    skipped = report.skipped.len(),
                    "Screening run complete."
                );
                report.into_envelope(local_now())
            }
            Err(e) => {
                tracing::error!(error = %e, "Screening run failed.");
                ResultEnvelope::error(e.to_string(), local_now())
            }
        }
    }

    /// Runs the pipeline, surfacing run-level failures as `PipelineError`.
    pub async fn try_run(&self) -> Result<ScreeningReport, PipelineError> {
        let universe = self.provider.fetch_universe_snapshot().await?;
        let universe_size = universe.len();
        tracing::info!(
            universe = universe_size,
            provider = self.provider.name(),
            "Universe snapshot received."
        );

        let filtered = self.filter.apply(universe)?;
        let filtered_size = filtered.len();

        let ranked = self.ranker.rank(filtered, universe_size)?;
        let counts = StageCounts {
            universe_size,
            filtered_size,
            candidate_count: ranked.len(),
        };

        if let Some(progress) = &self.progress {
            progress.set_length(counts.candidate_count as u64);
        }

        // `buffered` yields in submission order, so ranked order survives any
        // level of concurrency.
        let outcomes: Vec<CandidateOutcome> = stream::iter(ranked)
            .map(|entry| self.process_entry(entry))
            .buffered(self.concurrency)
            .collect()
            .await;

        if let Some(progress) = &self.progress {
            progress.finish_and_clear();
        }

        aggregate(outcomes, counts)
    }

    /// Resolves, fetches and scores a single symbol, returning the full report.
    ///
    /// Unlike a pipeline run, no history floor is applied and every failure is
    /// returned to the caller.
    pub async fn inspect(
        &self,
        symbol: &str,
    ) -> Result<(QualifiedSymbol, RiskReport), PipelineError> {
        let exchange = self.resolver.resolve(symbol)?;
        let qualified = QualifiedSymbol::new(exchange, symbol.trim());
        let bars = self.provider.fetch_history(&qualified, self.adjust).await?;
        let report = self.metrics.evaluate(&bars)?;
        Ok((qualified, report))
    }

    async fn process_entry(&self, entry: UniverseEntry) -> CandidateOutcome {
        let outcome = match self.resolver.qualify(entry.clone()) {
            Ok(candidate) => self.score_candidate(&candidate).await,
            Err(e) => CandidateOutcome::Skipped(SkippedCandidate::new(
                &entry,
                SkipReason::ResolutionFailed {
                    message: e.to_string(),
                },
            )),
        };

        if let CandidateOutcome::Skipped(skip) = &outcome {
            tracing::warn!(
                symbol = %skip.symbol,
                name = %skip.name,
                reason = %skip.reason,
                "Skipping candidate."
            );
        }
        if let Some(progress) = &self.progress {
            progress.inc(1);
        }

        outcome
    }

    /// Fetches one candidate's history and scores it.
    ///
    /// Every failure is absorbed into a `Skipped` outcome.
    pub async fn score_candidate(&self, candidate: &Candidate) -> CandidateOutcome {
        let entry = &candidate.entry;
        let symbol = &candidate.qualified_symbol;

        let bars = match self.provider.fetch_history(symbol, self.adjust).await {
            Ok(bars) => bars,
            Err(e) => {
                return CandidateOutcome::Skipped(SkippedCandidate::new(
                    entry,
                    SkipReason::ProviderFailure {
                        message: e.to_string(),
                    },
                ));
            }
        };

        if !self.metrics.has_sufficient_history(&bars) {
            return CandidateOutcome::Skipped(SkippedCandidate::new(
                entry,
                SkipReason::InsufficientHistory {
                    bars: bars.len(),
                    required: self.metrics.params().min_history_bars,
                },
            ));
        }

        match self.metrics.evaluate(&bars) {
            Ok(report) => {
                tracing::debug!(
                    symbol = %symbol,
                    bars = report.bar_count,
                    sharpe = %report.sharpe,
                    guard = ?report.guard,
                    "Scored candidate."
                );
                CandidateOutcome::Scored(RiskScore::new(entry, report.sharpe))
            }
            Err(e) => CandidateOutcome::Skipped(SkippedCandidate::new(
                entry,
                SkipReason::InvalidSeries {
                    message: e.to_string(),
                },
            )),
        }
    }
}
