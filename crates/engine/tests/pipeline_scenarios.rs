use api_client::MarketDataProvider;
use api_client::error::ApiError;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use configuration::{ResolverKind, Settings};
use core_types::{AdjustMode, PriceBar, QualifiedSymbol, UniverseEntry};
use engine::{PipelineError, ScreeningPipeline, SkipReason};
use events::ResultEnvelope;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use screener::create_resolver;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

enum History {
    Bars(Vec<PriceBar>),
    Fails,
}

/// In-memory provider keyed by qualified symbol (`sh510300`).
struct FakeProvider {
    universe: Option<Vec<UniverseEntry>>,
    histories: HashMap<String, History>,
    delays_ms: HashMap<String, u64>,
    requested: Mutex<Vec<String>>,
}

impl FakeProvider {
    fn new(universe: Vec<UniverseEntry>) -> Self {
        Self {
            universe: Some(universe),
            histories: HashMap::new(),
            delays_ms: HashMap::new(),
            requested: Mutex::new(Vec::new()),
        }
    }

    fn unavailable() -> Self {
        Self {
            universe: None,
            ..Self::new(Vec::new())
        }
    }

    fn with_history(mut self, qualified: &str, history: History) -> Self {
        self.histories.insert(qualified.to_string(), history);
        self
    }

    fn with_delay(mut self, qualified: &str, millis: u64) -> Self {
        self.delays_ms.insert(qualified.to_string(), millis);
        self
    }
}

#[async_trait]
impl MarketDataProvider for FakeProvider {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn fetch_universe_snapshot(&self) -> Result<Vec<UniverseEntry>, ApiError> {
        self.universe.clone().ok_or(ApiError::HttpStatus(503))
    }

    async fn fetch_history(
        &self,
        symbol: &QualifiedSymbol,
        adjust: AdjustMode,
    ) -> Result<Vec<PriceBar>, ApiError> {
        assert_eq!(adjust, AdjustMode::Front);
        let key = symbol.to_string();
        self.requested.lock().unwrap().push(key.clone());

        if let Some(millis) = self.delays_ms.get(&key) {
            tokio::time::sleep(std::time::Duration::from_millis(*millis)).await;
        }

        match self.histories.get(&key) {
            Some(History::Bars(bars)) => Ok(bars.clone()),
            Some(History::Fails) => Err(ApiError::HttpStatus(500)),
            None => Err(ApiError::NotFound(key)),
        }
    }
}

fn entry(symbol: &str, change: Decimal, turnover: Decimal, price: Decimal) -> UniverseEntry {
    UniverseEntry {
        symbol: symbol.to_string(),
        name: format!("{} ETF", symbol),
        last_price: price,
        change_percent: change,
        turnover_amount: turnover,
    }
}

fn liquid(symbol: &str, change: Decimal) -> UniverseEntry {
    entry(symbol, change, dec!(25000), dec!(1.234))
}

/// `count` daily bars with strictly rising closes and uneven steps.
fn rising_bars(count: usize) -> Vec<PriceBar> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let mut close = dec!(1.000);
    (0..count)
        .map(|i| {
            let step = if i % 2 == 0 { dec!(0.010) } else { dec!(0.004) };
            close += step;
            PriceBar {
                date: start + Duration::days(i as i64),
                close,
            }
        })
        .collect()
}

fn flat_bars(count: usize) -> Vec<PriceBar> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    (0..count)
        .map(|i| PriceBar {
            date: start + Duration::days(i as i64),
            close: dec!(2.5),
        })
        .collect()
}

fn pipeline(provider: FakeProvider, settings: &Settings) -> (ScreeningPipeline, Arc<FakeProvider>) {
    let provider = Arc::new(provider);
    let resolver = create_resolver(&settings.exchange);
    (
        ScreeningPipeline::new(provider.clone(), resolver, settings),
        provider,
    )
}

fn error_message(envelope: ResultEnvelope) -> String {
    match envelope {
        ResultEnvelope::Error(e) => e.error,
        ResultEnvelope::Success(s) => panic!("expected an error envelope, got {} scores", s.count),
    }
}

#[tokio::test]
async fn empty_universe_produces_empty_universe_error() {
    let (pipeline, _) = pipeline(FakeProvider::new(vec![]), &Settings::default());

    let message = error_message(pipeline.run().await);
    assert!(message.contains("universe snapshot is empty"), "{message}");
}

#[tokio::test]
async fn unqualified_universe_produces_no_candidates_error() {
    let universe = vec![
        entry("510300", dec!(1.2), dec!(1000), dec!(3.9)),
        entry("159915", dec!(0.4), dec!(80000), dec!(0)),
        entry("512880", dec!(2.0), dec!(12), dec!(1.1)),
    ];
    let (pipeline, provider) = pipeline(FakeProvider::new(universe), &Settings::default());

    let message = error_message(pipeline.run().await);
    assert!(message.contains("No qualifying candidates"), "{message}");
    assert!(provider.requested.lock().unwrap().is_empty());
}

#[tokio::test]
async fn sole_candidate_with_nineteen_bars_empties_the_pool() {
    let provider = FakeProvider::new(vec![liquid("510300", dec!(1.5))])
        .with_history("sh510300", History::Bars(rising_bars(19)));
    let (pipeline, _) = pipeline(provider, &Settings::default());

    let err = pipeline.try_run().await.unwrap_err();
    assert!(matches!(err, PipelineError::EmptyCandidatePool { skipped: 1 }));

    let message = error_message(pipeline.run().await);
    assert!(message.contains("Candidate pool is empty"), "{message}");
}

#[tokio::test]
async fn rising_series_scores_a_positive_rounded_sharpe() {
    let provider = FakeProvider::new(vec![liquid("159915", dec!(0.8))])
        .with_history("sz159915", History::Bars(rising_bars(25)));
    let (pipeline, _) = pipeline(provider, &Settings::default());

    let envelope = pipeline.run().await;
    let ResultEnvelope::Success(success) = envelope else {
        panic!("expected a success envelope");
    };

    assert_eq!(success.count, 1);
    let score = &success.data[0];
    assert_eq!(score.symbol, "159915");
    assert!(score.sharpe > Decimal::ZERO);
    assert!(score.sharpe.scale() <= 4);
    assert_eq!(score.last_price, dec!(1.234));
}

#[tokio::test]
async fn one_bad_candidate_never_aborts_the_run() {
    let universe = vec![
        liquid("510300", dec!(3.0)),
        liquid("159915", dec!(2.0)),
        liquid("512880", dec!(1.0)),
        liquid("588000", dec!(0.5)),
    ];
    let provider = FakeProvider::new(universe)
        .with_history("sh510300", History::Fails)
        .with_history("sz159915", History::Bars(rising_bars(22)))
        .with_history("sh512880", History::Bars(rising_bars(5)))
        .with_history("sh588000", History::Bars(flat_bars(20)));
    let (pipeline, _) = pipeline(provider, &Settings::default());

    let report = pipeline.try_run().await.unwrap();

    let symbols: Vec<_> = report.scores.iter().map(|s| s.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["159915", "588000"]);
    // Flat prices are scored, not skipped.
    assert_eq!(report.scores[1].sharpe, Decimal::ZERO);

    assert_eq!(report.skipped.len(), 2);
    assert!(matches!(report.skipped[0].reason, SkipReason::ProviderFailure { .. }));
    assert_eq!(
        report.skipped[1].reason,
        SkipReason::InsufficientHistory {
            bars: 5,
            required: 20
        }
    );
    assert_eq!(report.candidate_count, 4);
}

#[tokio::test]
async fn output_follows_ranked_order_and_respects_the_bound() {
    let universe = vec![
        liquid("510050", dec!(0.1)),
        liquid("510300", dec!(2.5)),
        liquid("159915", dec!(2.5)),
        liquid("512880", dec!(-1.0)),
    ];
    let mut provider = FakeProvider::new(universe);
    for key in ["sh510050", "sh510300", "sz159915", "sh512880"] {
        provider = provider.with_history(key, History::Bars(rising_bars(21)));
    }
    let mut settings = Settings::default();
    settings.ranking.max_candidates = 3;
    let (pipeline, provider) = pipeline(provider, &settings);

    let report = pipeline.try_run().await.unwrap();

    let symbols: Vec<_> = report.scores.iter().map(|s| s.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["510300", "159915", "510050"]);
    assert_eq!(
        *provider.requested.lock().unwrap(),
        vec!["sh510300", "sz159915", "sh510050"]
    );
}

#[tokio::test]
async fn concurrent_fetches_keep_ranked_order() {
    let universe = vec![
        liquid("510300", dec!(3.0)),
        liquid("159915", dec!(2.0)),
        liquid("512880", dec!(1.0)),
    ];
    let provider = FakeProvider::new(universe)
        .with_history("sh510300", History::Bars(rising_bars(20)))
        .with_history("sz159915", History::Bars(rising_bars(20)))
        .with_history("sh512880", History::Bars(rising_bars(20)))
        .with_delay("sh510300", 60)
        .with_delay("sz159915", 30);
    let mut settings = Settings::default();
    settings.pipeline.concurrency = 3;
    let (pipeline, _) = pipeline(provider, &settings);

    let report = pipeline.try_run().await.unwrap();

    let symbols: Vec<_> = report.scores.iter().map(|s| s.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["510300", "159915", "512880"]);
}

#[tokio::test]
async fn table_lookup_without_fallback_skips_unknown_symbols() {
    let universe = vec![liquid("510300", dec!(1.0)), liquid("501018", dec!(0.5))];
    let provider = FakeProvider::new(universe)
        .with_history("sz510300", History::Bars(rising_bars(20)))
        .with_history("sh501018", History::Bars(rising_bars(20)));

    let mut settings = Settings::default();
    settings.exchange.resolver = ResolverKind::Table;
    settings.exchange.fallback_to_prefix = false;
    settings
        .exchange
        .table
        .insert("510300".to_string(), core_types::Exchange::Sz);
    let (pipeline, _) = pipeline(provider, &settings);

    let report = pipeline.try_run().await.unwrap();

    assert_eq!(report.scores.len(), 1);
    assert_eq!(report.scores[0].symbol, "510300");
    assert!(matches!(
        report.skipped[0].reason,
        SkipReason::ResolutionFailed { .. }
    ));
}

#[tokio::test]
async fn unavailable_universe_is_a_provider_error() {
    let (pipeline, _) = pipeline(FakeProvider::unavailable(), &Settings::default());

    let err = pipeline.try_run().await.unwrap_err();
    assert!(matches!(err, PipelineError::Provider(ApiError::HttpStatus(503))));
    assert!(!pipeline.run().await.is_success());
}

#[tokio::test]
async fn inspect_reports_the_breakdown_for_one_symbol() {
    let provider =
        FakeProvider::new(vec![]).with_history("sh510300", History::Bars(rising_bars(12)));
    let (pipeline, _) = pipeline(provider, &Settings::default());

    let (qualified, report) = pipeline.inspect("510300").await.unwrap();

    assert_eq!(qualified.to_string(), "sh510300");
    assert_eq!(report.bar_count, 12);
    assert_eq!(report.return_count, 11);
    assert!(report.guard.is_none());
}
