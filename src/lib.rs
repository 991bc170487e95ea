//! Crypto Ticker - Main Library
//!
//! Root package for the ticker workspace. Re-exports the `ticker` library
//! and hosts the shared helpers used by the binaries.
//!
//! ## Architecture
//!
//! - **bin_common**: Common utilities for binary executables (CLI, runners)
//! - **ticker**: Store, feed and presentation logic (re-exported from workspace)
//!
//! ## Usage in Binaries
//!
//! ```rust
//! use crypto_ticker::bin_common::{load_config_from_env, ConfigType};
//! use crypto_ticker::ticker::application::visualizer::App;
//! ```

// Re-export workspace libraries for convenience
pub use ticker;

// Binary common utilities
pub mod bin_common {
    //! Common utilities for binary executables

    pub mod cli;
    pub mod runner;

    pub use cli::{load_config_from_env, load_ticker_config, parse_args, ConfigType};
    pub use runner::{BinaryRunner, RunConfig};
}
