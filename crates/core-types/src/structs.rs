use crate::enums::Exchange;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of the provider's full-universe ETF snapshot.
///
/// `turnover_amount` is expressed in ten-thousand currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniverseEntry {
    pub symbol: String,
    pub name: String,
    pub last_price: Decimal,
    pub change_percent: Decimal,
    pub turnover_amount: Decimal,
}

/// A raw symbol paired with the exchange it trades on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedSymbol {
    pub exchange: Exchange,
    pub symbol: String,
}

impl QualifiedSymbol {
    pub fn new(exchange: Exchange, symbol: impl Into<String>) -> Self {
        Self {
            exchange,
            symbol: symbol.into(),
        }
    }
}

impl fmt::Display for QualifiedSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.exchange.prefix(), self.symbol)
    }
}

/// A universe entry that survived filtering and ranking, ready for scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub entry: UniverseEntry,
    pub qualified_symbol: QualifiedSymbol,
}

impl Candidate {
    pub fn new(entry: UniverseEntry, exchange: Exchange) -> Self {
        let qualified_symbol = QualifiedSymbol::new(exchange, entry.symbol.clone());
        Self {
            entry,
            qualified_symbol,
        }
    }
}

/// A single daily bar. Only the close is needed for scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub close: Decimal,
}

/// The scored result for one candidate, as delivered to the result sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScore {
    pub symbol: String,
    pub name: String,
    #[serde(rename = "price", with = "rust_decimal::serde::float")]
    pub last_price: Decimal,
    #[serde(rename = "change", with = "rust_decimal::serde::float")]
    pub change_percent: Decimal,
    #[serde(rename = "turnover", with = "rust_decimal::serde::float")]
    pub turnover_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub sharpe: Decimal,
}

impl RiskScore {
    pub fn new(entry: &UniverseEntry, sharpe: Decimal) -> Self {
        Self {
            symbol: entry.symbol.clone(),
            name: entry.name.clone(),
            last_price: entry.last_price,
            change_percent: entry.change_percent,
            turnover_amount: entry.turnover_amount,
            sharpe,
        }
    }
}
