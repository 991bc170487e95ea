//! Asset records tracked by the ticker

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// AssetId
// =============================================================================

/// Stable identifier of a tracked asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(pub u32);

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// Asset
// =============================================================================

/// One tracked instrument with its market fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Unique id, never changes after seeding
    pub id: AssetId,
    pub name: String,
    pub symbol: String,

    /// Quoted price in USD
    pub price: f64,

    /// Percentage change over the last hour
    pub change_1h: f64,
    /// Percentage change over the last 24 hours
    pub change_24h: f64,
    /// Percentage change over the last 7 days
    pub change_7d: f64,

    pub market_cap: f64,
    pub volume_24h: f64,

    pub circulating_supply: f64,
    /// `None` means uncapped supply
    #[serde(default)]
    pub max_supply: Option<f64>,

    /// Logo image URI
    #[serde(default)]
    pub logo_ref: String,
    /// 7d sparkline URI
    #[serde(default)]
    pub chart_ref: String,
}

impl Asset {
    /// Merge a partial update into this asset, leaving omitted fields untouched
    pub fn apply(&mut self, update: &AssetUpdate) {
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(change) = update.change_1h {
            self.change_1h = change;
        }
        if let Some(change) = update.change_24h {
            self.change_24h = change;
        }
        if let Some(change) = update.change_7d {
            self.change_7d = change;
        }
        if let Some(cap) = update.market_cap {
            self.market_cap = cap;
        }
        if let Some(volume) = update.volume_24h {
            self.volume_24h = volume;
        }
    }

    /// Whether supply is uncapped
    pub fn is_uncapped(&self) -> bool {
        self.max_supply.is_none()
    }
}

// =============================================================================
// AssetUpdate
// =============================================================================

/// Partial set of numeric fields to merge into an asset
///
/// Identity and supply fields are not part of the update path.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AssetUpdate {
    pub price: Option<f64>,
    pub change_1h: Option<f64>,
    pub change_24h: Option<f64>,
    pub change_7d: Option<f64>,
    pub market_cap: Option<f64>,
    pub volume_24h: Option<f64>,
}

impl AssetUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn changes(mut self, change_1h: f64, change_24h: f64, change_7d: f64) -> Self {
        self.change_1h = Some(change_1h);
        self.change_24h = Some(change_24h);
        self.change_7d = Some(change_7d);
        self
    }

    pub fn market_cap(mut self, market_cap: f64) -> Self {
        self.market_cap = Some(market_cap);
        self
    }

    pub fn volume_24h(mut self, volume: f64) -> Self {
        self.volume_24h = Some(volume);
        self
    }

    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// =============================================================================
// Seed data
// =============================================================================

const LOGO_BASE: &str = "https://s2.coinmarketcap.com/static/img/coins/64x64";
const SPARKLINE_BASE: &str = "https://s3.coinmarketcap.com/generated/sparklines/web/7d/2781";

#[allow(clippy::too_many_arguments)]
fn seed_asset(
    id: u32,
    cmc_id: u32,
    name: &str,
    symbol: &str,
    price: f64,
    changes: (f64, f64, f64),
    market_cap: f64,
    volume_24h: f64,
    circulating_supply: f64,
    max_supply: Option<f64>,
) -> Asset {
    Asset {
        id: AssetId(id),
        name: name.to_string(),
        symbol: symbol.to_string(),
        price,
        change_1h: changes.0,
        change_24h: changes.1,
        change_7d: changes.2,
        market_cap,
        volume_24h,
        circulating_supply,
        max_supply,
        logo_ref: format!("{}/{}.png", LOGO_BASE, cmc_id),
        chart_ref: format!("{}/{}.svg", SPARKLINE_BASE, cmc_id),
    }
}

/// The instruments loaded at startup when no asset list is configured
pub fn default_assets() -> Vec<Asset> {
    vec![
        seed_asset(1, 1, "Bitcoin", "BTC", 50_000.0, (0.5, 2.3, 5.7), 950e9, 25e9, 19e6, Some(21e6)),
        seed_asset(2, 1027, "Ethereum", "ETH", 3_000.0, (-0.2, 1.5, 3.2), 350e9, 15e9, 120e6, None),
        seed_asset(3, 825, "Tether", "USDT", 1.0, (0.01, 0.02, 0.05), 80e9, 50e9, 80e9, None),
        seed_asset(4, 1839, "BNB", "BNB", 400.0, (0.8, 3.1, 7.2), 60e9, 2e9, 150e6, Some(170e6)),
        seed_asset(5, 5426, "Solana", "SOL", 100.0, (-1.2, 4.5, 12.3), 40e9, 3e9, 400e6, None),
    ]
}
