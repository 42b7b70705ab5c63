use crate::error::ScreenerError;
use configuration::UniverseConfig;
use core_types::UniverseEntry;

/// Applies the liquidity floor and price-validity check to a universe snapshot.
#[derive(Debug, Clone, Default)]
pub struct UniverseFilter {
    config: UniverseConfig,
}

impl UniverseFilter {
    pub fn new(config: UniverseConfig) -> Self {
        Self { config }
    }

    /// Whether a single entry is liquid enough and carries a valid price.
    pub fn passes(&self, entry: &UniverseEntry) -> bool {
        entry.turnover_amount > self.config.min_turnover && entry.last_price > self.config.min_price
    }

    /// Keeps the entries that pass, in input order.
    ///
    /// An empty snapshot is a provider-level failure and is reported as
    /// `EmptyUniverse`. A non-empty snapshot where nothing passes returns an
    /// empty vector; the ranker decides what that means.
    pub fn apply(&self, entries: Vec<UniverseEntry>) -> Result<Vec<UniverseEntry>, ScreenerError> {
        if entries.is_empty() {
            return Err(ScreenerError::EmptyUniverse);
        }

        let total = entries.len();
        let kept: Vec<UniverseEntry> = entries.into_iter().filter(|e| self.passes(e)).collect();

        tracing::info!(
            universe = total,
            kept = kept.len(),
            min_turnover = %self.config.min_turnover,
            "Applied universe filter."
        );

        Ok(kept)
    }
}
