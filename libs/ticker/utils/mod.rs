//! Common utilities for ticker binaries

mod heartbeat;
mod logging;
mod shutdown;

pub use heartbeat::Heartbeat;
pub use logging::{init_tracing, init_tracing_with_level};
pub use shutdown::ShutdownManager;
