use crate::error::ApiError;
use async_trait::async_trait;
use core_types::{AdjustMode, PriceBar, QualifiedSymbol, UniverseEntry};

pub mod eastmoney;
pub mod error;
pub mod responses;
// --- Public API ---
pub use eastmoney::EastmoneyClient;

/// The abstract interface to a source of ETF market data.
/// The screening pipeline only depends on this trait, allowing the
/// underlying implementation (live HTTP or an in-memory fake) to be swapped out.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// A short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Fetches the full universe of tradable ETFs with current price,
    /// change and turnover. Fails only when the universe is unavailable as a whole.
    async fn fetch_universe_snapshot(&self) -> Result<Vec<UniverseEntry>, ApiError>;

    /// Fetches recent daily bars for one symbol, oldest first.
    ///
    /// May return fewer bars than the configured window.
    async fn fetch_history(
        &self,
        symbol: &QualifiedSymbol,
        adjust: AdjustMode,
    ) -> Result<Vec<PriceBar>, ApiError>;
}
