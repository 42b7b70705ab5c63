use crate::error::AnalyticsError;
use crate::report::{RiskReport, SharpeGuard};
use configuration::RiskMetricConfig;
use core_types::PriceBar;
use rust_decimal::Decimal;
use rust_decimal::prelude::*;

/// A stateless calculator for the risk-adjusted score of one price series.
#[derive(Debug, Clone, Default)]
pub struct RiskMetricEngine {
    params: RiskMetricConfig,
}

impl RiskMetricEngine {
    pub fn new(params: RiskMetricConfig) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &RiskMetricConfig {
        &self.params
    }

    /// Whether a series is deep enough to be scored at all.
    ///
    /// Candidates failing this check are skipped rather than scored zero.
    pub fn has_sufficient_history(&self, bars: &[PriceBar]) -> bool {
        bars.len() >= self.params.min_history_bars
    }

    /// Computes the Sharpe breakdown for a chronologically ascending series.
    ///
    /// # Arguments
    ///
    /// * `bars` - Daily bars, oldest first, one per trading session.
    ///
    /// # Returns
    ///
    /// A `RiskReport` whose `sharpe` is rounded to the configured number of
    /// places. Short samples and zero volatility yield a zero score with the
    /// matching `SharpeGuard`; only malformed input or arithmetic overflow is
    /// an `AnalyticsError`.
    pub fn evaluate(&self, bars: &[PriceBar]) -> Result<RiskReport, AnalyticsError> {
        validate_series(bars)?;

        let returns = daily_returns(bars)?;
        if returns.len() < self.params.min_return_samples {
            tracing::debug!(
                returns = returns.len(),
                required = self.params.min_return_samples,
                "Return sample too short, Sharpe set to zero."
            );
            return Ok(RiskReport::guarded(
                bars.len(),
                returns.len(),
                SharpeGuard::InsufficientReturnSample,
            ));
        }

        let cumulative_return = cumulative_return(&returns)?;
        let volatility = self.annualized_volatility(&returns)?;

        if volatility.is_zero() {
            tracing::debug!(returns = returns.len(), "Zero volatility, Sharpe set to zero.");
            return Ok(RiskReport {
                bar_count: bars.len(),
                return_count: returns.len(),
                cumulative_return: Some(cumulative_return),
                volatility: Some(volatility),
                sharpe: Decimal::ZERO,
                guard: Some(SharpeGuard::ZeroVolatility),
            });
        }

        let excess_return = cumulative_return
            .checked_sub(self.params.risk_free_rate)
            .ok_or_else(|| AnalyticsError::Calculation("excess return overflowed".to_string()))?;
        let sharpe = excess_return
            .checked_div(volatility)
            .ok_or_else(|| AnalyticsError::DivisionByZero("sharpe".to_string()))?
            .round_dp(self.params.decimal_places);

        Ok(RiskReport {
            bar_count: bars.len(),
            return_count: returns.len(),
            cumulative_return: Some(cumulative_return),
            volatility: Some(volatility),
            sharpe,
            guard: None,
        })
    }

    /// Shorthand for `evaluate(bars)?.sharpe`.
    pub fn sharpe_ratio(&self, bars: &[PriceBar]) -> Result<Decimal, AnalyticsError> {
        Ok(self.evaluate(bars)?.sharpe)
    }

    /// Sample standard deviation of the returns, scaled by the square root of
    /// the trading days in a year.
    fn annualized_volatility(&self, returns: &[Decimal]) -> Result<Decimal, AnalyticsError> {
        let count = Decimal::from(returns.len());
        let mean = returns
            .iter()
            .try_fold(Decimal::ZERO, |acc, r| acc.checked_add(*r))
            .and_then(|sum| sum.checked_div(count))
            .ok_or_else(|| AnalyticsError::Calculation("mean return overflowed".to_string()))?;

        let squared_deviations = returns
            .iter()
            .try_fold(Decimal::ZERO, |acc, r| {
                let deviation = *r - mean;
                deviation
                    .checked_mul(deviation)
                    .and_then(|sq| acc.checked_add(sq))
            })
            .ok_or_else(|| AnalyticsError::Calculation("variance overflowed".to_string()))?;

        // Sample variance: divide by n - 1.
        let variance = squared_deviations
            .checked_div(count - Decimal::ONE)
            .ok_or_else(|| AnalyticsError::DivisionByZero("variance".to_string()))?;

        if variance.is_zero() {
            return Ok(Decimal::ZERO);
        }

        let std_dev = variance.sqrt().ok_or_else(|| {
            AnalyticsError::Calculation("Failed to calculate square root for variance".to_string())
        })?;
        let annualization = Decimal::from(self.params.trading_days_per_year)
            .sqrt()
            .ok_or_else(|| {
                AnalyticsError::Calculation("Failed to calculate annualization factor".to_string())
            })?;

        std_dev
            .checked_mul(annualization)
            .ok_or_else(|| AnalyticsError::Calculation("volatility overflowed".to_string()))
    }
}

/// Daily returns `close[i] / close[i-1] - 1`, one fewer than the bar count.
pub fn daily_returns(bars: &[PriceBar]) -> Result<Vec<Decimal>, AnalyticsError> {
    bars.windows(2)
        .map(|w| {
            w[1].close
                .checked_div(w[0].close)
                .and_then(|ratio| ratio.checked_sub(Decimal::ONE))
                .ok_or_else(|| AnalyticsError::Calculation("daily return overflowed".to_string()))
        })
        .collect()
}

/// Compounded return over the whole sample: `prod(1 + r) - 1`.
fn cumulative_return(returns: &[Decimal]) -> Result<Decimal, AnalyticsError> {
    returns
        .iter()
        .try_fold(Decimal::ONE, |growth, r| {
            (Decimal::ONE + *r).checked_mul(growth)
        })
        .map(|growth| growth - Decimal::ONE)
        .ok_or_else(|| AnalyticsError::Calculation("cumulative return overflowed".to_string()))
}

/// Rejects series that are out of order or carry a non-positive close.
fn validate_series(bars: &[PriceBar]) -> Result<(), AnalyticsError> {
    if let Some(bar) = bars.iter().find(|b| b.close <= Decimal::ZERO) {
        return Err(AnalyticsError::InvalidSeries(format!(
            "non-positive close {} on {}",
            bar.close, bar.date
        )));
    }
    if let Some(w) = bars.windows(2).find(|w| w[1].date <= w[0].date) {
        return Err(AnalyticsError::InvalidSeries(format!(
            "bars are not in ascending date order ({} followed by {})",
            w[0].date, w[1].date
        )));
    }
    Ok(())
}
