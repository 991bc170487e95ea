//! Ticker table
//!
//! Terminal UI that renders the asset store as a live market table.
//! Rows follow store events; numeric cells flash on change.

pub mod app;
pub mod ui;

pub use app::App;
