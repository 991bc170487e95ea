//! Ticker Feed - headless synthetic market feed
//!
//! Runs the feed against the asset store without a terminal UI, logging a
//! summary line per tick and a periodic heartbeat.
//!
//! Usage: ticker-feed [config path]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use crypto_ticker::bin_common::{load_ticker_config, BinaryRunner, RunConfig};
use ticker::application::feed::{FeedConfig, SyntheticFeed};
use ticker::application::presentation::format::{format_percentage, format_usd};
use ticker::domain::{AssetStore, SharedAssetStore, StoreEvent, Subscription};
use ticker::infrastructure::config::TickerConfig;
use ticker::infrastructure::scheduler::TokioScheduler;
use ticker::utils::{init_tracing_with_level, Heartbeat, ShutdownManager};

/// Environment variable capping the number of ticks before exit
const MAX_TICKS_ENV_VAR: &str = "TICKER_MAX_TICKS";

struct FeedRunner {
    run_config: RunConfig,
    store: SharedAssetStore,
    feed: SyntheticFeed,
    shutdown: ShutdownManager,
    updates: Arc<AtomicU64>,
    subscription: Option<Subscription>,
}

impl FeedRunner {
    fn new(config: &TickerConfig, run_config: RunConfig) -> Result<Self> {
        let scheduler = TokioScheduler::try_current()
            .ok_or_else(|| anyhow::anyhow!("ticker-feed must run inside a tokio runtime"))?;

        let store = AssetStore::new(config.assets.clone())?.shared();
        let feed = SyntheticFeed::new(Arc::clone(&store), Arc::new(scheduler), FeedConfig::from(&config.feed));

        let updates = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&updates);
        let subscription = store.subscribe(move |event| match event {
            StoreEvent::AssetUpdated(_) => {
                counter.fetch_add(1, Ordering::Relaxed);
            }
            StoreEvent::LoadingChanged(loading) => debug!("[Store] Loading: {}", loading),
            StoreEvent::ErrorChanged(error) => debug!("[Store] Error: {:?}", error),
        });

        Ok(Self {
            run_config,
            store,
            feed,
            shutdown: ShutdownManager::new(),
            updates,
            subscription: Some(subscription),
        })
    }

    fn log_tick(&self, tick: u64) {
        let summary: Vec<String> = self
            .store
            .get_all()
            .iter()
            .map(|asset| {
                format!(
                    "{} {} ({})",
                    asset.symbol,
                    format_usd(asset.price, 2),
                    format_percentage(asset.change_24h)
                )
            })
            .collect();
        info!("[Feed] Tick {}: {}", tick, summary.join(" | "));
    }

    fn log_heartbeat(&self, heartbeat: &Heartbeat) {
        info!(
            "[Heartbeat] #{} | ticks: {} | updates: {} | running: {}",
            heartbeat.count(),
            self.feed.ticks(),
            self.updates.load(Ordering::Relaxed),
            self.feed.is_running()
        );

        match serde_json::to_string(&self.store.get_all()) {
            Ok(snapshot) => debug!("[Heartbeat] Snapshot: {}", snapshot),
            Err(e) => debug!("[Heartbeat] Failed to serialize snapshot: {}", e),
        }
    }
}

impl BinaryRunner for FeedRunner {
    async fn run(&mut self) -> Result<()> {
        self.shutdown.spawn_signal_handler();

        let mut heartbeat = Heartbeat::new(self.run_config.heartbeat_interval_secs);
        let poll_interval = self.feed.config().interval / 4;
        let mut last_logged = 0;

        self.feed.start();

        while self.shutdown.is_running() {
            self.shutdown.interruptible_sleep(poll_interval).await;

            let ticks = self.feed.ticks();
            if ticks > last_logged {
                self.log_tick(ticks);
                last_logged = ticks;
            }

            if heartbeat.should_beat() {
                heartbeat.beat();
                self.log_heartbeat(&heartbeat);
            }

            if self.run_config.max_ticks.is_some_and(|max| ticks >= max) {
                info!("[Feed] Reached {} ticks, stopping", ticks);
                self.shutdown.trigger();
            }
        }

        self.feed.stop();
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        Ok(())
    }

    fn config(&self) -> &RunConfig {
        &self.run_config
    }

    fn stats(&self) -> Option<String> {
        Some(format!(
            "Ticks: {} | Asset updates: {}",
            self.feed.ticks(),
            self.updates.load(Ordering::Relaxed)
        ))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    let config = load_ticker_config()?;
    init_tracing_with_level(&config.log_level);
    config.log();

    let mut run_config = RunConfig::new("Ticker Feed")
        .with_detail("Interval", format!("{} ms", config.feed.interval_ms))
        .with_detail("Assets", config.assets.len())
        .with_detail("Seed", config.feed.seed.map_or("entropy".to_string(), |s| s.to_string()));
    if let Ok(max) = std::env::var(MAX_TICKS_ENV_VAR) {
        let max = max
            .trim()
            .parse::<u64>()
            .map_err(|_| anyhow::anyhow!("{} must be an unsigned integer", MAX_TICKS_ENV_VAR))?;
        run_config = run_config.with_max_ticks(max);
    }

    let mut runner = FeedRunner::new(&config, run_config)?;
    runner.execute().await
}
