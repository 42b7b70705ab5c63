use crate::MarketDataProvider;
use crate::error::ApiError;
use crate::responses::{KlineResponse, UniversePageResponse, UniverseRow, parse_kline};
use async_trait::async_trait;
use configuration::ProviderConfig;
use core_types::{AdjustMode, Exchange, PriceBar, QualifiedSymbol, UniverseEntry};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Board filter selecting every exchange-traded fund on both exchanges.
const ETF_BOARDS: &str = "b:MK0021,b:MK0022,b:MK0023,b:MK0024";
const UNIVERSE_FIELDS: &str = "f2,f3,f6,f12,f14";
/// Daily bars.
const KLINE_DAILY: &str = "101";
/// Upper bound on universe pages, in case the reported total never converges.
const MAX_UNIVERSE_PAGES: usize = 200;

/// Market data client for the Eastmoney quote endpoints.
///
/// No API key is required. The universe comes from the paged fund list and
/// history from the daily kline endpoint.
#[derive(Clone)]
pub struct EastmoneyClient {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl EastmoneyClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::HttpStatus(status.as_u16()));
        }

        serde_json::from_str::<T>(&text).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    /// Requests one page of the fund list. Returns the reported total and the
    /// rows on this page (empty once past the end).
    async fn fetch_universe_page(
        &self,
        page: usize,
    ) -> Result<(usize, Vec<UniverseRow>), ApiError> {
        let query = [
            ("pn", page.to_string()),
            ("pz", self.config.page_size.to_string()),
            ("po", "1".to_string()),
            ("np", "1".to_string()),
            ("fltt", "2".to_string()),
            ("invt", "2".to_string()),
            ("fid", "f3".to_string()),
            ("fs", ETF_BOARDS.to_string()),
            ("fields", UNIVERSE_FIELDS.to_string()),
        ];

        let response: UniversePageResponse =
            self.get_json(&self.config.universe_url, &query).await?;
        if response.rc != 0 {
            return Err(ApiError::ApiError(response.rc));
        }

        Ok(response
            .data
            .map(|data| (data.total, data.diff))
            .unwrap_or_default())
    }
}

/// Eastmoney's market code for a qualified symbol: `1.<code>` for Shanghai,
/// `0.<code>` for Shenzhen.
pub fn to_secid(symbol: &QualifiedSymbol) -> String {
    let market = match symbol.exchange {
        Exchange::Sh => "1",
        Exchange::Sz => "0",
    };
    format!("{}.{}", market, symbol.symbol)
}

/// The `fqt` parameter for an adjustment mode.
fn adjust_param(adjust: AdjustMode) -> &'static str {
    match adjust {
        AdjustMode::None => "0",
        AdjustMode::Front => "1",
        AdjustMode::Back => "2",
    }
}

#[async_trait]
impl MarketDataProvider for EastmoneyClient {
    fn name(&self) -> &'static str {
        "eastmoney"
    }

    async fn fetch_universe_snapshot(&self) -> Result<Vec<UniverseEntry>, ApiError> {
        let mut entries = Vec::new();
        let mut rows_seen = 0;

        for page in 1..=MAX_UNIVERSE_PAGES {
            let (total, rows) = self.fetch_universe_page(page).await?;
            if rows.is_empty() {
                break;
            }
            rows_seen += rows.len();
            entries.extend(rows.into_iter().filter_map(|row| row.into_entry()));

            tracing::debug!(page, rows_seen, total, "Fetched universe page.");
            if rows_seen >= total {
                break;
            }
        }

        tracing::info!(
            entries = entries.len(),
            provider = self.name(),
            "Fetched ETF universe snapshot."
        );
        Ok(entries)
    }

    async fn fetch_history(
        &self,
        symbol: &QualifiedSymbol,
        adjust: AdjustMode,
    ) -> Result<Vec<PriceBar>, ApiError> {
        let query = [
            ("secid", to_secid(symbol)),
            ("klt", KLINE_DAILY.to_string()),
            ("fqt", adjust_param(adjust).to_string()),
            ("end", "20500101".to_string()),
            ("lmt", self.config.history_window.to_string()),
            ("fields1", "f1,f2,f3,f4,f5,f6".to_string()),
            ("fields2", "f51,f52,f53,f54,f55,f56,f57".to_string()),
        ];

        tracing::debug!(symbol = %symbol, %adjust, "Fetching daily history.");
        let response: KlineResponse = self.get_json(&self.config.history_url, &query).await?;
        if response.rc != 0 {
            return Err(ApiError::ApiError(response.rc));
        }
        let data = response
            .data
            .ok_or_else(|| ApiError::NotFound(symbol.to_string()))?;

        let mut bars = data
            .klines
            .iter()
            .map(|line| parse_kline(line))
            .collect::<Result<Vec<PriceBar>, ApiError>>()?;
        bars.sort_by_key(|bar| bar.date);

        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secid_uses_market_codes() {
        assert_eq!(to_secid(&QualifiedSymbol::new(Exchange::Sh, "510300")), "1.510300");
        assert_eq!(to_secid(&QualifiedSymbol::new(Exchange::Sz, "159915")), "0.159915");
    }

    #[test]
    fn front_adjustment_maps_to_fqt_one() {
        assert_eq!(adjust_param(AdjustMode::Front), "1");
        assert_eq!(adjust_param(AdjustMode::None), "0");
        assert_eq!(adjust_param(AdjustMode::Back), "2");
    }
}
