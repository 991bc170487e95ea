//! Observable asset store
//!
//! Single source of truth for the tracked assets. All writes go through
//! [`AssetStore::update_fields`]; registered listeners are called
//! synchronously after each committed mutation, once the write lock has been
//! released, so a listener may read the store freely.

use parking_lot::{Mutex, RwLock};
use std::collections::HashSet;
use std::sync::{Arc, Weak};
use thiserror::Error;
use tracing::{debug, trace};

use super::asset::{default_assets, Asset, AssetId, AssetUpdate};

#[derive(Error, Debug, PartialEq)]
pub enum StoreError {
    #[error("Duplicate asset id: {0}")]
    DuplicateId(AssetId),
}

/// Shared store handle used by the feed and the presentation layer
pub type SharedAssetStore = Arc<AssetStore>;

/// Callback registered through [`AssetStore::subscribe`]
pub type Listener = Arc<dyn Fn(&StoreEvent) + Send + Sync>;

// =============================================================================
// StoreEvent / StoreStatus
// =============================================================================

/// Notification delivered to listeners after a committed mutation
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// An asset was merged; carries the full post-merge record
    AssetUpdated(Asset),
    LoadingChanged(bool),
    ErrorChanged(Option<String>),
}

/// Feed status flags kept alongside the assets
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreStatus {
    pub loading: bool,
    pub error: Option<String>,
}

// =============================================================================
// Listener registry
// =============================================================================

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

/// Handle returned by [`AssetStore::subscribe`]
///
/// Dropping it keeps the listener registered; call [`Subscription::unsubscribe`]
/// to remove it.
#[must_use = "keep the subscription to be able to unsubscribe later"]
pub struct Subscription {
    id: u64,
    listeners: Weak<Mutex<Listeners>>,
}

impl Subscription {
    /// Remove the listener from the store. No-op if the store is gone.
    pub fn unsubscribe(self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.lock().entries.retain(|(id, _)| *id != self.id);
        }
    }
}

// =============================================================================
// AssetStore
// =============================================================================

pub struct AssetStore {
    assets: RwLock<Vec<Asset>>,
    status: RwLock<StoreStatus>,
    listeners: Arc<Mutex<Listeners>>,
}

impl AssetStore {
    /// Create a store seeded with the given assets, in display order
    pub fn new(assets: Vec<Asset>) -> Result<Self, StoreError> {
        let mut seen = HashSet::with_capacity(assets.len());
        for asset in &assets {
            if !seen.insert(asset.id) {
                return Err(StoreError::DuplicateId(asset.id));
            }
        }

        debug!("[Store] Seeded with {} assets", assets.len());

        Ok(Self {
            assets: RwLock::new(assets),
            status: RwLock::new(StoreStatus::default()),
            listeners: Arc::new(Mutex::new(Listeners::default())),
        })
    }

    /// Create a store seeded with the built-in instruments
    pub fn with_default_assets() -> Self {
        Self {
            assets: RwLock::new(default_assets()),
            status: RwLock::new(StoreStatus::default()),
            listeners: Arc::new(Mutex::new(Listeners::default())),
        }
    }

    /// Wrap into a shared handle
    pub fn shared(self) -> SharedAssetStore {
        Arc::new(self)
    }

    /// Snapshot of all assets in display order
    pub fn get_all(&self) -> Vec<Asset> {
        self.assets.read().clone()
    }

    /// Snapshot of a single asset
    pub fn get(&self, id: AssetId) -> Option<Asset> {
        self.assets.read().iter().find(|a| a.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.assets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.read().is_empty()
    }

    /// Merge `update` into the asset with `id` and notify listeners once
    ///
    /// Returns `false` without notifying when the id is unknown.
    pub fn update_fields(&self, id: AssetId, update: AssetUpdate) -> bool {
        let updated = {
            let mut assets = self.assets.write();
            let Some(asset) = assets.iter_mut().find(|a| a.id == id) else {
                trace!("[Store] Ignoring update for unknown asset {}", id);
                return false;
            };
            asset.apply(&update);
            asset.clone()
        };

        self.notify(&StoreEvent::AssetUpdated(updated));
        true
    }

    pub fn status(&self) -> StoreStatus {
        self.status.read().clone()
    }

    pub fn set_loading(&self, loading: bool) {
        self.status.write().loading = loading;
        self.notify(&StoreEvent::LoadingChanged(loading));
    }

    pub fn set_error(&self, error: Option<String>) {
        self.status.write().error = error.clone();
        self.notify(&StoreEvent::ErrorChanged(error));
    }

    /// Register a listener called after every committed mutation
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&StoreEvent) + Send + Sync + 'static,
    {
        let mut listeners = self.listeners.lock();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push((id, Arc::new(listener)));

        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.lock().entries.len()
    }

    fn notify(&self, event: &StoreEvent) {
        // Clone the list so listeners can (un)subscribe while being called
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(event);
        }
    }
}

impl Default for AssetStore {
    fn default() -> Self {
        Self::with_default_assets()
    }
}
