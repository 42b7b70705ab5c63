use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScreenerError {
    #[error("ETF universe snapshot is empty: the market data provider returned no entries")]
    EmptyUniverse,

    #[error("No qualifying candidates: none of the {universe_size} ETFs passed the turnover and price filters")]
    NoCandidates { universe_size: usize },

    #[error("Cannot determine the exchange for symbol '{0}'")]
    UnresolvedSymbol(String),
}
