use crate::error::ConfigError;
use core_types::{AdjustMode, Exchange};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::collections::HashMap;

// ==============================================================================
// Numeric Contract
// ==============================================================================
// These are the defaults every section falls back to. An empty configuration
// reproduces the screening contract exactly.

/// Minimum turnover, in ten-thousand currency units. Entries must be strictly above it.
pub const MIN_TURNOVER: Decimal = dec!(1000);
/// Entries must have a last price strictly above this.
pub const MIN_PRICE: Decimal = Decimal::ZERO;
/// Upper bound on the ranked candidate set.
pub const MAX_CANDIDATES: usize = 50;
/// Candidates with fewer history bars than this are skipped.
pub const MIN_HISTORY_BARS: usize = 20;
/// Below this many daily returns the Sharpe score is defined as zero.
pub const MIN_RETURN_SAMPLES: usize = 10;
/// Annualization factor for daily volatility.
pub const TRADING_DAYS_PER_YEAR: u32 = 252;
/// Risk-free rate subtracted from the cumulative return.
pub const RISK_FREE_RATE: Decimal = Decimal::ZERO;
/// Fractional digits kept on the stored Sharpe score.
pub const SHARPE_DECIMAL_PLACES: u32 = 4;
/// Bars requested per history fetch (roughly one month of sessions).
pub const HISTORY_WINDOW: usize = 30;

const EASTMONEY_UNIVERSE_URL: &str = "https://push2.eastmoney.com/api/qt/clist/get";
const EASTMONEY_HISTORY_URL: &str = "https://push2his.eastmoney.com/api/qt/stock/kline/get";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)";

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub universe: UniverseConfig,
    pub ranking: RankingConfig,
    pub risk_metric: RiskMetricConfig,
    pub provider: ProviderConfig,
    pub exchange: ExchangeConfig,
    pub pipeline: PipelineConfig,
}

/// Liquidity and price-validity predicates for the universe filter.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UniverseConfig {
    pub min_turnover: Decimal,
    pub min_price: Decimal,
}

/// Bounds on the ranked candidate set.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub max_candidates: usize,
}

/// Parameters of the per-candidate risk metric.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RiskMetricConfig {
    pub min_history_bars: usize,
    pub min_return_samples: usize,
    pub trading_days_per_year: u32,
    pub risk_free_rate: Decimal,
    pub decimal_places: u32,
}

/// Endpoints and request shaping for the market data provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub universe_url: String,
    pub history_url: String,
    /// Number of daily bars requested per symbol.
    pub history_window: usize,
    /// Rows requested per universe page.
    pub page_size: usize,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub adjust: AdjustMode,
}

/// Which symbol-to-exchange lookup to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ResolverKind {
    /// Infer the exchange from the symbol's leading characters.
    #[default]
    Prefix,
    /// Look the symbol up in an explicit table.
    Table,
}

/// Settings for the exchange lookup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    pub resolver: ResolverKind,
    /// Leading characters that mark a Shanghai listing. Anything else is Shenzhen.
    pub shanghai_prefixes: Vec<String>,
    /// Authoritative symbol to exchange mapping, used by the table resolver.
    pub table: HashMap<String, Exchange>,
    /// Whether the table resolver falls back to the prefix rule for unknown symbols.
    pub fallback_to_prefix: bool,
}

/// Execution settings for the per-candidate scoring loop.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum number of history requests in flight. 1 means strictly sequential.
    pub concurrency: usize,
}

// --- Default Implementations ---
// This allows a user to omit any section from their toml and still get the
// standard screening behavior.

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            min_turnover: MIN_TURNOVER,
            min_price: MIN_PRICE,
        }
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            max_candidates: MAX_CANDIDATES,
        }
    }
}

impl Default for RiskMetricConfig {
    fn default() -> Self {
        Self {
            min_history_bars: MIN_HISTORY_BARS,
            min_return_samples: MIN_RETURN_SAMPLES,
            trading_days_per_year: TRADING_DAYS_PER_YEAR,
            risk_free_rate: RISK_FREE_RATE,
            decimal_places: SHARPE_DECIMAL_PLACES,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            universe_url: EASTMONEY_UNIVERSE_URL.to_string(),
            history_url: EASTMONEY_HISTORY_URL.to_string(),
            history_window: HISTORY_WINDOW,
            page_size: 500,
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            adjust: AdjustMode::Front,
        }
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            resolver: ResolverKind::Prefix,
            shanghai_prefixes: vec!["5".to_string()],
            table: HashMap::new(),
            fallback_to_prefix: true,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { concurrency: 1 }
    }
}

impl Settings {
    /// Checks cross-field and range constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::ValidationError(msg.to_string()));

        if self.ranking.max_candidates == 0 {
            return invalid("ranking.max_candidates must be at least 1");
        }
        if self.risk_metric.min_history_bars < 2 {
            return invalid("risk_metric.min_history_bars must be at least 2");
        }
        if self.risk_metric.min_return_samples < 2 {
            return invalid("risk_metric.min_return_samples must be at least 2");
        }
        if self.risk_metric.trading_days_per_year == 0 {
            return invalid("risk_metric.trading_days_per_year must be greater than 0");
        }
        if self.risk_metric.decimal_places > 28 {
            return invalid("risk_metric.decimal_places cannot exceed 28");
        }
        if self.provider.history_window < self.risk_metric.min_history_bars {
            return Err(ConfigError::ValidationError(format!(
                "provider.history_window ({}) is smaller than risk_metric.min_history_bars ({}); every candidate would be skipped",
                self.provider.history_window, self.risk_metric.min_history_bars
            )));
        }
        if self.provider.page_size == 0 {
            return invalid("provider.page_size must be at least 1");
        }
        if self.pipeline.concurrency == 0 {
            return invalid("pipeline.concurrency must be at least 1");
        }
        if self.exchange.resolver == ResolverKind::Prefix
            && self.exchange.shanghai_prefixes.is_empty()
        {
            tracing::warn!(
                "exchange.shanghai_prefixes is empty; every symbol will resolve to Shenzhen"
            );
        }
        Ok(())
    }
}
