//! Crypto Ticker
//!
//! Synthetic real-time market table: an observable asset store, a
//! randomized feed that perturbs it on a fixed cadence, and a delta-aware
//! presentation layer that flashes cells as values move.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod utils;

// Re-export commonly used items
pub use application::{
    feed::{FeedConfig, FeedState, SyntheticFeed},
    presentation::{DeltaKind, Direction, Field, FlashBoard, FlashCell, FlashState},
};
pub use domain::{
    Asset, AssetId, AssetStore, AssetUpdate, SharedAssetStore, StoreError, StoreEvent,
    StoreStatus, Subscription,
};
pub use infrastructure::{
    config::{ConfigError, TickerConfig},
    scheduler::{ManualScheduler, Scheduler, TimerHandle, TokioScheduler},
};
pub use utils::{init_tracing, init_tracing_with_level, Heartbeat, ShutdownManager};
