use chrono::NaiveDate;
use core_types::{PriceBar, UniverseEntry};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::str::FromStr;

use crate::error::ApiError;

// Field codes follow the provider's naming: f2 = latest price, f3 = change %,
// f6 = turnover in currency units, f12 = code, f14 = name.

/// Envelope of the paged ETF list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct UniversePageResponse {
    pub rc: i64,
    pub data: Option<UniversePage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UniversePage {
    pub total: usize,
    #[serde(default)]
    pub diff: Vec<UniverseRow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UniverseRow {
    #[serde(default)]
    pub f2: Option<NumericField>,
    #[serde(default)]
    pub f3: Option<NumericField>,
    #[serde(default)]
    pub f6: Option<NumericField>,
    #[serde(default)]
    pub f12: Option<String>,
    #[serde(default)]
    pub f14: Option<String>,
}

/// A numeric cell that may come back as a number, a numeric string or a
/// placeholder such as `"-"` when the fund did not trade.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumericField {
    Number(serde_json::Number),
    Text(String),
}

impl NumericField {
    pub fn to_decimal(&self) -> Option<Decimal> {
        let text = match self {
            NumericField::Number(n) => n.to_string(),
            NumericField::Text(s) => s.trim().to_string(),
        };
        Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .ok()
    }
}

fn decimal_or_zero(field: &Option<NumericField>) -> Decimal {
    field
        .as_ref()
        .and_then(NumericField::to_decimal)
        .unwrap_or(Decimal::ZERO)
}

impl UniverseRow {
    /// Converts a row into a universe entry, with turnover in ten-thousands.
    ///
    /// Missing numbers become zero, which the universe filter rejects. Rows
    /// without a code are dropped.
    pub fn into_entry(self) -> Option<UniverseEntry> {
        let symbol = self.f12.as_deref().map(str::trim).filter(|s| !s.is_empty())?.to_string();
        let name = self.f14.as_deref().map(str::trim).unwrap_or_default().to_string();

        Some(UniverseEntry {
            symbol,
            name,
            last_price: decimal_or_zero(&self.f2),
            change_percent: decimal_or_zero(&self.f3),
            turnover_amount: decimal_or_zero(&self.f6) / dec!(10000),
        })
    }
}

/// Envelope of the daily kline endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct KlineResponse {
    pub rc: i64,
    pub data: Option<KlineData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KlineData {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub klines: Vec<String>,
}

/// Parses one `date,open,close,high,low,...` kline line.
pub fn parse_kline(line: &str) -> Result<PriceBar, ApiError> {
    let mut parts = line.split(',');
    let (Some(date), Some(_open), Some(close)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ApiError::InvalidData(format!("Truncated kline: '{}'", line)));
    };

    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|e| ApiError::InvalidData(format!("Invalid kline date '{}': {}", date, e)))?;
    let close = Decimal::from_str(close.trim())
        .map_err(|e| ApiError::Deserialization(format!("Invalid close '{}': {}", close, e)))?;

    Ok(PriceBar { date, close })
}
