//! Binary runner utilities
//!
//! Provides a standardized way to run binaries with proper
//! logging, heartbeat, and graceful shutdown.

use tracing::info;

/// Configuration for running a binary application
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Name of the binary (for logging)
    pub name: String,
    /// Heartbeat interval in seconds
    pub heartbeat_interval_secs: u64,
    /// Stop after this many feed ticks (runs until Ctrl+C when unset)
    pub max_ticks: Option<u64>,
    /// `label: value` lines shown under the startup banner
    pub details: Vec<(String, String)>,
}

impl RunConfig {
    /// Create a new run configuration
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            heartbeat_interval_secs: 30,
            max_ticks: None,
            details: Vec::new(),
        }
    }

    /// Add a line to the startup banner
    pub fn with_detail(mut self, label: impl Into<String>, value: impl ToString) -> Self {
        self.details.push((label.into(), value.to_string()));
        self
    }

    /// Set heartbeat interval
    pub fn with_heartbeat(mut self, secs: u64) -> Self {
        self.heartbeat_interval_secs = secs;
        self
    }

    /// Stop after a fixed number of ticks
    pub fn with_max_ticks(mut self, ticks: u64) -> Self {
        self.max_ticks = Some(ticks);
        self
    }
}

/// Trait for binary applications
pub trait BinaryRunner {
    /// Run the application main loop
    async fn run(&mut self) -> anyhow::Result<()>;

    /// Get the run configuration
    fn config(&self) -> &RunConfig;

    /// One-line summary printed with the shutdown banner
    fn stats(&self) -> Option<String> {
        None
    }

    /// Startup banner with the configured details
    fn print_banner(&self) {
        let config = self.config();
        info!("==== {} ====", config.name);
        for (label, value) in &config.details {
            info!("  {:<10} {}", label, value);
        }
        match config.max_ticks {
            Some(max) => info!("  Stopping after {} ticks (or Ctrl+C)", max),
            None => info!("  Running until Ctrl+C"),
        }
    }

    /// Shutdown line, with the runner's stats when it has any
    fn print_shutdown(&self, stats: Option<&str>) {
        let config = self.config();
        match stats {
            Some(stats) => info!("==== {} stopped | {} ====", config.name, stats),
            None => info!("==== {} stopped ====", config.name),
        }
    }

    /// Execute the binary with proper initialization and cleanup
    async fn execute(&mut self) -> anyhow::Result<()> {
        self.print_banner();
        let result = self.run().await;
        self.print_shutdown(self.stats().as_deref());
        result
    }
}
