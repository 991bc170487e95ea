//! Application layer
//!
//! - [`feed`]: synthetic market feed mutating the store on a timer
//! - [`presentation`]: flash and formatting state for rendered cells
//! - [`visualizer`]: terminal table wired to the store

pub mod feed;
pub mod presentation;
pub mod visualizer;

pub use feed::{compute_update, FeedConfig, FeedState, SyntheticFeed};
pub use presentation::{DeltaKind, Direction, Field, FlashBoard, FlashCell, FlashState};
pub use visualizer::App;
