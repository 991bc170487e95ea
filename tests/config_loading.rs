//! Integration test: Configuration utilities
//!
//! Tests the bin_common config path resolution and ticker config loading.

use crypto_ticker::bin_common::{load_config_from_env, ConfigType};
use crypto_ticker::ticker::infrastructure::config::{TickerConfig, Theme};
use std::env;
use std::io::Write;

#[test]
fn test_ticker_config_default_path() {
    // Clear env var to test default
    env::remove_var("TICKER_CONFIG_PATH");

    let config_path = load_config_from_env(ConfigType::Ticker);
    assert_eq!(config_path.to_str().unwrap(), "config/ticker_config.yaml");
}

#[test]
fn test_custom_config() {
    let custom = ConfigType::Custom("custom/path.yaml".to_string());
    assert_eq!(custom.default_path(), "custom/path.yaml");
}

#[test]
fn test_shipped_config_parses() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/ticker_config.yaml");
    let config = TickerConfig::load(path).unwrap();

    assert_eq!(config.feed.interval_ms, 2000);
    assert_eq!(config.display.flash_ms, 400);
    assert_eq!(config.display.theme, Theme::Dark);
    assert_eq!(config.assets.len(), 5);
    assert_eq!(config.assets[0].symbol, "BTC");
    assert_eq!(config.assets[1].max_supply, None);
}

#[test]
fn test_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = TickerConfig::load_or_default(dir.path().join("absent.yaml")).unwrap();

    assert_eq!(config.feed.interval_ms, 2000);
    assert_eq!(config.assets.len(), 5);
}

#[test]
fn test_invalid_interval_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "feed:\n  interval_ms: 0").unwrap();

    assert!(TickerConfig::load(file.path()).is_err());
}
