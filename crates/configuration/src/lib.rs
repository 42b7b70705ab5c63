use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    ExchangeConfig, PipelineConfig, ProviderConfig, RankingConfig, ResolverKind, RiskMetricConfig,
    Settings, UniverseConfig,
};

/// The file read when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Prefix for environment variable overrides, e.g. `ETF_SCREENER__RANKING__MAX_CANDIDATES`.
pub const ENV_PREFIX: &str = "ETF_SCREENER";

/// Loads and validates the application configuration.
///
/// With `None`, `config.toml` in the working directory is read if it exists.
/// An explicit path must exist. Environment variables are layered on top of the
/// file, and any value missing from both falls back to its default.
pub fn load_config(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    Ok(settings)
}

/// Parses and validates configuration from an in-memory TOML document.
pub fn load_config_from_str(toml: &str) -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?
        .try_deserialize::<Settings>()?;
    settings.validate()?;

    Ok(settings)
}
