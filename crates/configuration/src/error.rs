use thiserror::Error;

/// Errors raised while assembling `Settings` from file and environment layers.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read screener configuration (file or ETF_SCREENER__* environment): {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Invalid screener configuration: {0}")]
    ValidationError(String),
}
