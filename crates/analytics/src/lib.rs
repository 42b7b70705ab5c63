//! # Risk Metric Analytics
//!
//! The numeric core of candidate scoring: daily returns, cumulative return,
//! annualized volatility and the zero-risk-free-rate Sharpe variant.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** No knowledge of providers or the pipeline. It takes a price
//!   series and produces a `RiskReport`.
//! - **Explicit Guards:** Short samples and zero volatility are not errors. They
//!   are recorded as a `SharpeGuard` on the report and the score is zero.
//!
//! ## Public API
//!
//! - `RiskMetricEngine`: evaluates a `PriceBar` series.
//! - `RiskReport` / `SharpeGuard`: the result and which fallback, if any, applied.
//! - `AnalyticsError`: malformed input or arithmetic failure.

pub mod engine;
pub mod error;
pub mod report;

pub use engine::{RiskMetricEngine, daily_returns};
pub use error::AnalyticsError;
pub use report::{RiskReport, SharpeGuard};

// The numeric contract lives with the configuration defaults; re-export it so
// the scoring rules can be audited from one place.
pub use configuration::settings::{
    MIN_HISTORY_BARS, MIN_RETURN_SAMPLES, RISK_FREE_RATE, SHARPE_DECIMAL_PLACES,
    TRADING_DAYS_PER_YEAR,
};
