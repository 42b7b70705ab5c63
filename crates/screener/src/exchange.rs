use crate::error::ScreenerError;
use configuration::{ExchangeConfig, ResolverKind};
use core_types::{Candidate, Exchange, UniverseEntry};
use std::collections::HashMap;
use std::sync::Arc;

/// Maps a raw ETF symbol to the exchange its history must be requested from.
///
/// The pipeline only talks to this trait, so a wrong mapping can be fixed by
/// swapping the lookup without touching the scoring loop.
pub trait ExchangeResolver: Send + Sync {
    fn resolve(&self, symbol: &str) -> Result<Exchange, ScreenerError>;

    /// Turns a ranked universe entry into a scoreable candidate.
    fn qualify(&self, entry: UniverseEntry) -> Result<Candidate, ScreenerError> {
        let exchange = self.resolve(&entry.symbol)?;
        Ok(Candidate::new(entry, exchange))
    }
}

/// Leading-character heuristic: Shanghai ETF codes start with `5`, the rest
/// are treated as Shenzhen.
///
/// This is not authoritative. Use `TableResolver` for symbols it gets wrong.
#[derive(Debug, Clone)]
pub struct PrefixResolver {
    shanghai_prefixes: Vec<String>,
}

impl PrefixResolver {
    pub fn new(shanghai_prefixes: Vec<String>) -> Self {
        Self { shanghai_prefixes }
    }
}

impl Default for PrefixResolver {
    fn default() -> Self {
        Self::new(vec!["5".to_string()])
    }
}

impl ExchangeResolver for PrefixResolver {
    fn resolve(&self, symbol: &str) -> Result<Exchange, ScreenerError> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(ScreenerError::UnresolvedSymbol(symbol.to_string()));
        }
        let shanghai = self
            .shanghai_prefixes
            .iter()
            .any(|prefix| symbol.starts_with(prefix.as_str()));
        Ok(if shanghai { Exchange::Sh } else { Exchange::Sz })
    }
}

/// Explicit symbol to exchange table with an optional fallback lookup.
pub struct TableResolver {
    table: HashMap<String, Exchange>,
    fallback: Option<Arc<dyn ExchangeResolver>>,
}

impl TableResolver {
    pub fn new(table: HashMap<String, Exchange>) -> Self {
        Self {
            table,
            fallback: None,
        }
    }

    /// Symbols missing from the table are handed to `fallback`.
    pub fn with_fallback(mut self, fallback: Arc<dyn ExchangeResolver>) -> Self {
        self.fallback = Some(fallback);
        self
    }
}

impl ExchangeResolver for TableResolver {
    fn resolve(&self, symbol: &str) -> Result<Exchange, ScreenerError> {
        let symbol = symbol.trim();
        match (self.table.get(symbol), &self.fallback) {
            (Some(exchange), _) => Ok(*exchange),
            (None, Some(fallback)) => {
                tracing::debug!(symbol, "Symbol not in exchange table, using fallback.");
                fallback.resolve(symbol)
            }
            (None, None) => Err(ScreenerError::UnresolvedSymbol(symbol.to_string())),
        }
    }
}

/// Builds the lookup selected in configuration.
pub fn create_resolver(config: &ExchangeConfig) -> Arc<dyn ExchangeResolver> {
    let prefix = PrefixResolver::new(config.shanghai_prefixes.clone());
    match config.resolver {
        ResolverKind::Prefix => Arc::new(prefix),
        ResolverKind::Table => {
            let table = TableResolver::new(config.table.clone());
            if config.fallback_to_prefix {
                Arc::new(table.with_fallback(Arc::new(prefix)))
            } else {
                Arc::new(table)
            }
        }
    }
}
