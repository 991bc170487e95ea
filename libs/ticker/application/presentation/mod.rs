//! Delta-aware presentation state
//!
//! View-side memory of what each table cell last showed. It is fed from
//! store snapshots and never writes back to the store.
//!
//! - [`FlashCell`]: one (asset, field) cell's flash state machine
//! - [`FlashBoard`]: all cells of the table, independent of each other
//! - [`Direction`]: stateless sign glyph for the change columns
//! - [`format`]: number formatting for display

pub mod direction;
pub mod flash;
pub mod format;

pub use direction::Direction;
pub use flash::{classify, DeltaKind, FlashCell, FlashState, DEFAULT_FLASH_DURATION};

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::domain::{Asset, AssetId};

/// Numeric columns that flash on change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Price,
    Change1h,
    Change24h,
    Change7d,
    MarketCap,
    Volume24h,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Price,
        Field::Change1h,
        Field::Change24h,
        Field::Change7d,
        Field::MarketCap,
        Field::Volume24h,
    ];

    pub fn value_of(self, asset: &Asset) -> f64 {
        match self {
            Field::Price => asset.price,
            Field::Change1h => asset.change_1h,
            Field::Change24h => asset.change_24h,
            Field::Change7d => asset.change_7d,
            Field::MarketCap => asset.market_cap,
            Field::Volume24h => asset.volume_24h,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Price => "Price",
            Field::Change1h => "1h %",
            Field::Change24h => "24h %",
            Field::Change7d => "7d %",
            Field::MarketCap => "Market Cap",
            Field::Volume24h => "24h Volume",
        }
    }

    /// Percentage columns carry a direction glyph
    pub fn is_change(self) -> bool {
        matches!(self, Field::Change1h | Field::Change24h | Field::Change7d)
    }
}

// =============================================================================
// FlashBoard
// =============================================================================

/// Flash cells for every (asset, field) pair shown in the table
#[derive(Debug, Clone)]
pub struct FlashBoard {
    duration: Duration,
    cells: HashMap<(AssetId, Field), FlashCell>,
}

impl FlashBoard {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            cells: HashMap::new(),
        }
    }

    /// Feed one value into its cell, creating the cell on first sight
    pub fn observe(&mut self, id: AssetId, field: Field, value: f64, now: Instant) -> DeltaKind {
        let duration = self.duration;
        self.cells
            .entry((id, field))
            .or_insert_with(|| FlashCell::new(duration))
            .observe(value, now)
    }

    /// Feed every numeric field of an asset snapshot
    ///
    /// Returns the fields that moved.
    pub fn observe_asset(&mut self, asset: &Asset, now: Instant) -> Vec<(Field, DeltaKind)> {
        Field::ALL
            .iter()
            .filter_map(|&field| {
                let delta = self.observe(asset.id, field, field.value_of(asset), now);
                (delta != DeltaKind::Unchanged).then_some((field, delta))
            })
            .collect()
    }

    /// Feed a whole table snapshot
    pub fn observe_all<'a>(&mut self, assets: impl IntoIterator<Item = &'a Asset>, now: Instant) {
        for asset in assets {
            self.observe_asset(asset, now);
        }
    }

    pub fn state(&self, id: AssetId, field: Field, now: Instant) -> FlashState {
        self.cells
            .get(&(id, field))
            .map(|cell| cell.state_at(now))
            .unwrap_or_default()
    }

    /// Clear expired flashes, returning how many cells went neutral
    pub fn poll(&mut self, now: Instant) -> usize {
        self.cells
            .values_mut()
            .map(|cell| cell.poll(now))
            .filter(|cleared| *cleared)
            .count()
    }

    /// Cells currently showing a flash
    pub fn active_count(&self, now: Instant) -> usize {
        self.cells
            .values()
            .filter(|cell| cell.state_at(now).is_active())
            .count()
    }

    /// Earliest pending expiry, for scheduling the next redraw
    pub fn next_expiry(&self) -> Option<Instant> {
        self.cells.values().filter_map(FlashCell::expires_at).min()
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Default for FlashBoard {
    fn default() -> Self {
        Self::new(DEFAULT_FLASH_DURATION)
    }
}
