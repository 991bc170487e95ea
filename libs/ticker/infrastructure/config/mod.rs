use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::domain::{default_assets, Asset};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Environment variable overriding the feed RNG seed
pub const SEED_ENV_VAR: &str = "TICKER_SEED";

/// Ticker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerConfig {
    #[serde(default)]
    pub feed: FeedSettings,
    #[serde(default)]
    pub display: DisplaySettings,
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Instruments to seed the store with, in display order
    #[serde(default = "default_assets")]
    pub assets: Vec<Asset>,
}

/// Synthetic feed cadence and random-walk bands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedSettings {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Max absolute price move per tick, in percent
    #[serde(default = "default_price_band")]
    pub price_band_pct: f64,
    /// Max absolute volume move per tick, in percent
    #[serde(default = "default_volume_band")]
    pub volume_band_pct: f64,
    /// Max absolute step of each change field per tick, in percentage points
    #[serde(default = "default_change_band")]
    pub change_band_pct: f64,
    /// Fixed RNG seed for reproducible runs
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// How long a changed cell stays highlighted
    #[serde(default = "default_flash_ms")]
    pub flash_ms: u64,
    #[serde(default)]
    pub theme: Theme,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_interval_ms() -> u64 {
    2000
}

fn default_price_band() -> f64 {
    0.5
}

fn default_volume_band() -> f64 {
    0.1
}

fn default_change_band() -> f64 {
    0.5
}

fn default_flash_ms() -> u64 {
    400
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            price_band_pct: default_price_band(),
            volume_band_pct: default_volume_band(),
            change_band_pct: default_change_band(),
            seed: None,
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            flash_ms: default_flash_ms(),
            theme: Theme::default(),
        }
    }
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            feed: FeedSettings::default(),
            display: DisplaySettings::default(),
            log_level: default_log_level(),
            assets: default_assets(),
        }
    }
}

impl TickerConfig {
    /// Load configuration from YAML file
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        let yaml_content = std::fs::read_to_string(config_path)?;
        Self::from_yaml(&yaml_content)
    }

    /// Load from YAML file, falling back to built-in defaults when the file is absent
    pub fn load_or_default(config_path: impl AsRef<Path>) -> Result<Self> {
        let path = config_path.as_ref();
        if !path.exists() {
            info!("Config file {} not found, using defaults", path.display());
            let mut config = Self::default();
            config.apply_env_overrides()?;
            config.validate()?;
            return Ok(config);
        }
        Self::load(path)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let mut config: TickerConfig = serde_yaml::from_str(yaml)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        // Override RNG seed from environment if present
        if let Ok(seed) = std::env::var(SEED_ENV_VAR) {
            let seed = seed.trim().parse::<u64>().map_err(|_| {
                ConfigError::ValidationError(format!("{} must be an unsigned integer", SEED_ENV_VAR))
            })?;
            info!("Overriding feed seed from environment variable");
            self.feed.seed = Some(seed);
        }
        Ok(())
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.feed.interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "feed.interval_ms must be greater than 0".to_string(),
            ));
        }

        let bands = [
            ("price_band_pct", self.feed.price_band_pct),
            ("volume_band_pct", self.feed.volume_band_pct),
            ("change_band_pct", self.feed.change_band_pct),
        ];
        for (name, band) in bands {
            if !band.is_finite() || band < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "feed.{} must be a non-negative number",
                    name
                )));
            }
        }

        if self.display.flash_ms == 0 {
            return Err(ConfigError::ValidationError(
                "display.flash_ms must be greater than 0".to_string(),
            ));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "log_level must be one of: {}",
                valid_levels.join(", ")
            )));
        }

        if self.assets.is_empty() {
            return Err(ConfigError::ValidationError(
                "assets must not be empty".to_string(),
            ));
        }

        let mut ids = HashSet::new();
        for asset in &self.assets {
            if !ids.insert(asset.id) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate asset id {}",
                    asset.id
                )));
            }
            if asset.price < 0.0 || asset.volume_24h < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "asset {} has a negative price or volume",
                    asset.symbol
                )));
            }
        }

        Ok(())
    }

    /// Log configuration summary
    pub fn log(&self) {
        info!("Configuration loaded:");
        info!("  Feed interval: {} ms", self.feed.interval_ms);
        info!(
            "  Bands: price ±{}%, volume ±{}%, change ±{}",
            self.feed.price_band_pct, self.feed.volume_band_pct, self.feed.change_band_pct
        );
        info!("  Seed: {:?}", self.feed.seed);
        info!("  Flash duration: {} ms", self.display.flash_ms);
        info!("  Assets: {}", self.assets.len());
        info!("  Log level: {}", self.log_level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = TickerConfig::default();
        assert_eq!(config.feed.interval_ms, 2000);
        assert_eq!(config.feed.price_band_pct, 0.5);
        assert_eq!(config.feed.volume_band_pct, 0.1);
        assert_eq!(config.display.flash_ms, 400);
        assert_eq!(config.display.theme, Theme::Dark);
        assert_eq!(config.assets.len(), 5);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config = TickerConfig::from_yaml("feed:\n  interval_ms: 500\n").unwrap();
        assert_eq!(config.feed.interval_ms, 500);
        assert_eq!(config.feed.change_band_pct, 0.5);
        assert_eq!(config.display.flash_ms, 400);
        assert_eq!(config.assets.len(), 5);
    }

    #[test]
    fn test_custom_assets() {
        let yaml = r#"
display:
  theme: light
assets:
  - id: 7
    name: Dogecoin
    symbol: DOGE
    price: 0.1
    change_1h: 0.0
    change_24h: 1.0
    change_7d: -2.0
    market_cap: 14000000000
    volume_24h: 900000000
    circulating_supply: 140000000000
"#;
        let config = TickerConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.display.theme, Theme::Light);
        assert_eq!(config.assets.len(), 1);
        assert_eq!(config.assets[0].symbol, "DOGE");
        assert_eq!(config.assets[0].max_supply, None);
        assert!(config.assets[0].logo_ref.is_empty());
    }

    #[test]
    fn test_rejects_zero_interval() {
        let err = TickerConfig::from_yaml("feed:\n  interval_ms: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_rejects_negative_band() {
        let err = TickerConfig::from_yaml("feed:\n  price_band_pct: -1.0\n").unwrap_err();
        assert!(err.to_string().contains("price_band_pct"));
    }

    #[test]
    fn test_rejects_empty_assets() {
        let err = TickerConfig::from_yaml("assets: []\n").unwrap_err();
        assert!(err.to_string().contains("assets"));
    }

    #[test]
    fn test_rejects_bad_log_level() {
        let err = TickerConfig::from_yaml("log_level: loud\n").unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "display:\n  flash_ms: 250").unwrap();

        let config = TickerConfig::load(file.path()).unwrap();
        assert_eq!(config.display.flash_ms, 250);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = TickerConfig::load_or_default(dir.path().join("missing.yaml")).unwrap();
        assert_eq!(config.feed.interval_ms, 2000);
    }

    #[test]
    fn test_invalid_yaml() {
        let err = TickerConfig::from_yaml("feed: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::YamlError(_)));
    }

    #[test]
    fn test_theme_toggle() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
    }
}
