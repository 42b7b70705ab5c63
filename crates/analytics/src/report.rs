use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which fallback forced the Sharpe score to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SharpeGuard {
    /// Fewer daily returns than the configured minimum.
    InsufficientReturnSample,
    /// The returns have zero standard deviation.
    ZeroVolatility,
}

/// The breakdown behind a single candidate's Sharpe score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    pub bar_count: usize,
    pub return_count: usize,
    /// `None` when the short-sample guard applied before it was computed.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub cumulative_return: Option<Decimal>,
    /// Annualized sample standard deviation of daily returns.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub volatility: Option<Decimal>,
    /// Rounded score. Zero whenever `guard` is set.
    #[serde(with = "rust_decimal::serde::float")]
    pub sharpe: Decimal,
    pub guard: Option<SharpeGuard>,
}

impl RiskReport {
    pub(crate) fn guarded(bar_count: usize, return_count: usize, guard: SharpeGuard) -> Self {
        Self {
            bar_count,
            return_count,
            cumulative_return: None,
            volatility: None,
            sharpe: Decimal::ZERO,
            guard: Some(guard),
        }
    }
}
