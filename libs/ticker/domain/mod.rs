//! Domain Layer
//!
//! Asset records and the observable store that holds them.
//! This layer has no dependencies on infrastructure or application layers.

pub mod asset;
pub mod store;

pub use asset::{default_assets, Asset, AssetId, AssetUpdate};
pub use store::{
    AssetStore, Listener, SharedAssetStore, StoreError, StoreEvent, StoreStatus, Subscription,
};
