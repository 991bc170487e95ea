//! Infrastructure Layer
//!
//! Timers and configuration loading.
//! This layer depends on the domain layer but not on the application layer.

pub mod config;
pub mod scheduler;

pub use config::{ConfigError, DisplaySettings, FeedSettings, Theme, TickerConfig};
pub use scheduler::{ManualScheduler, Scheduler, Task, TimerHandle, TokioScheduler};
