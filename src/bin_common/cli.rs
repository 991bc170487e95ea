//! CLI utilities for binaries
//!
//! Handles configuration path resolution and loading for the ticker
//! executables.

use std::path::PathBuf;

use ticker::infrastructure::config::TickerConfig;

/// Type of configuration to load
#[derive(Debug, Clone)]
pub enum ConfigType {
    /// Ticker configuration (ticker_config.yaml)
    Ticker,
    /// Custom path
    Custom(String),
}

impl ConfigType {
    /// Get the default path for this config type
    pub fn default_path(&self) -> &str {
        match self {
            ConfigType::Ticker => "config/ticker_config.yaml",
            ConfigType::Custom(path) => path,
        }
    }

    /// Get the environment variable name for this config type
    pub fn env_var_name(&self) -> &str {
        "TICKER_CONFIG_PATH"
    }
}

/// Load configuration path from environment or use default
///
/// # Examples
/// ```
/// use crypto_ticker::bin_common::{load_config_from_env, ConfigType};
///
/// let path = load_config_from_env(ConfigType::Ticker);
/// ```
pub fn load_config_from_env(config_type: ConfigType) -> PathBuf {
    std::env::var(config_type.env_var_name())
        .unwrap_or_else(|_| config_type.default_path().to_string())
        .into()
}

/// Resolve the config path and load it, using defaults when the file is missing
///
/// A path given as the first command line argument wins over the environment.
pub fn load_ticker_config() -> anyhow::Result<TickerConfig> {
    let path = match parse_args().into_iter().next() {
        Some(arg) => PathBuf::from(arg),
        None => load_config_from_env(ConfigType::Ticker),
    };
    let config = TickerConfig::load_or_default(&path)
        .map_err(|e| anyhow::anyhow!("failed to load {}: {}", path.display(), e))?;
    Ok(config)
}

/// Parse command line arguments for a binary
///
/// Returns a vector of arguments (excluding the program name)
pub fn parse_args() -> Vec<String> {
    std::env::args().skip(1).collect()
}
