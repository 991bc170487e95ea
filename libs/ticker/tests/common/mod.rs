//! Common test utilities for ticker integration tests

#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;
use ticker::application::feed::{FeedConfig, SyntheticFeed};
use ticker::domain::{Asset, AssetStore, SharedAssetStore, StoreEvent, Subscription};
use ticker::infrastructure::scheduler::ManualScheduler;

/// Macro for verbose test output (controlled by TEST_VERBOSE env var)
#[macro_export]
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if std::env::var("TEST_VERBOSE").is_ok() {
            println!($($arg)*);
        }
    };
}

/// Store, virtual clock and a stopped feed over the default assets
pub struct Harness {
    pub store: SharedAssetStore,
    pub scheduler: ManualScheduler,
    pub feed: SyntheticFeed,
}

impl Harness {
    pub fn new(config: FeedConfig) -> Self {
        let store = AssetStore::with_default_assets().shared();
        let scheduler = ManualScheduler::new();
        let feed = SyntheticFeed::new(Arc::clone(&store), Arc::new(scheduler.clone()), config);
        Self {
            store,
            scheduler,
            feed,
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(FeedConfig::default().with_seed(seed))
    }
}

/// Listener that keeps every event it sees
pub struct Recorder {
    events: Arc<Mutex<Vec<StoreEvent>>>,
    _subscription: Subscription,
}

impl Recorder {
    pub fn attach(store: &AssetStore) -> Self {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let subscription = store.subscribe(move |event| sink.lock().push(event.clone()));
        Self {
            events,
            _subscription: subscription,
        }
    }

    pub fn events(&self) -> Vec<StoreEvent> {
        self.events.lock().clone()
    }

    /// Post-merge snapshots from `AssetUpdated` events, in delivery order
    pub fn asset_updates(&self) -> Vec<Asset> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                StoreEvent::AssetUpdated(asset) => Some(asset.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}
