//! Synthetic Feed Driver
//!
//! The only writer of market fields. On every tick it reads the store,
//! draws a bounded random step for each asset and writes all numeric fields
//! of that asset back in one `update_fields` call, so observers never see a
//! half-updated asset.
//!
//! ```text
//!   Scheduler ──tick──> SyntheticFeed ──update_fields(id, AssetUpdate)──> AssetStore
//!                                                                  └──notify──> listeners
//! ```
//!
//! The change fields are cumulative random walks, not rolling windows: they
//! drift without bound over long runs. Market cap is left untouched.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

use crate::domain::{Asset, AssetId, AssetUpdate, SharedAssetStore};
use crate::infrastructure::config::FeedSettings;
use crate::infrastructure::scheduler::{Scheduler, TimerHandle};

// =============================================================================
// Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct FeedConfig {
    /// Time between ticks
    pub interval: Duration,
    /// Price moves by up to ± this percent per tick
    pub price_band_pct: f64,
    /// Volume moves by up to ± this percent per tick
    pub volume_band_pct: f64,
    /// Each change field steps by up to ± this many points per tick
    pub change_band_pct: f64,
    /// Fixed RNG seed; entropy-seeded when `None`
    pub seed: Option<u64>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self::from(&FeedSettings::default())
    }
}

impl From<&FeedSettings> for FeedConfig {
    fn from(settings: &FeedSettings) -> Self {
        Self {
            interval: Duration::from_millis(settings.interval_ms),
            price_band_pct: settings.price_band_pct,
            volume_band_pct: settings.volume_band_pct,
            change_band_pct: settings.change_band_pct,
            seed: settings.seed,
        }
    }
}

impl FeedConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

// =============================================================================
// Random walk
// =============================================================================

/// Uniform draw in `[lo, hi]`
pub fn random_percent<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    rng.gen_range(lo..=hi)
}

/// Round to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Next values for one asset: price, volume and the three change fields
pub fn compute_update<R: Rng + ?Sized>(asset: &Asset, config: &FeedConfig, rng: &mut R) -> AssetUpdate {
    let price_band = config.price_band_pct;
    let volume_band = config.volume_band_pct;
    let change_band = config.change_band_pct;

    let price_delta = asset.price * (random_percent(rng, -price_band, price_band) / 100.0);
    let volume_delta = asset.volume_24h * (random_percent(rng, -volume_band, volume_band) / 100.0);

    let change_1h = round2(asset.change_1h + random_percent(rng, -change_band, change_band));
    let change_24h = round2(asset.change_24h + random_percent(rng, -change_band, change_band));
    let change_7d = round2(asset.change_7d + random_percent(rng, -change_band, change_band));

    AssetUpdate::new()
        .price(round2(asset.price + price_delta))
        .changes(change_1h, change_24h, change_7d)
        .volume_24h(round2(asset.volume_24h + volume_delta))
}

// =============================================================================
// SyntheticFeed
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedState {
    Stopped,
    Running,
}

struct FeedInner {
    store: SharedAssetStore,
    rng: Mutex<Box<dyn RngCore + Send>>,
    config: FeedConfig,
    ticks: AtomicU64,
    /// Set by `start`, cleared by the first tick after it
    awaiting_first_tick: AtomicBool,
    /// Bumped by every `start` and `stop`; a scheduled tick only runs while
    /// the epoch it was scheduled under is still current
    epoch: AtomicU64,
    /// Held for the whole of a tick so `stop` can wait one out
    tick_lock: Mutex<()>,
}

impl FeedInner {
    fn tick(&self) -> usize {
        let _guard = self.tick_lock.lock();
        self.tick_locked()
    }

    /// Timer entry point: skips the tick once `stop` (or a restart) has
    /// moved the epoch on
    fn scheduled_tick(&self, epoch: u64) {
        let _guard = self.tick_lock.lock();
        if self.epoch.load(Ordering::Acquire) != epoch {
            trace!("[Feed] Dropping tick from stale timer");
            return;
        }
        self.tick_locked();
    }

    fn tick_locked(&self) -> usize {
        let assets = self.store.get_all();

        // Draw everything first so no lock is held while listeners run
        let updates: Vec<(AssetId, AssetUpdate)> = {
            let mut rng = self.rng.lock();
            assets
                .iter()
                .map(|asset| (asset.id, compute_update(asset, &self.config, &mut **rng)))
                .collect()
        };

        let mut applied = 0;
        for (id, update) in updates {
            if self.store.update_fields(id, update) {
                applied += 1;
            }
        }

        let tick = self.ticks.fetch_add(1, Ordering::Relaxed) + 1;
        trace!("[Feed] Tick {} updated {} assets", tick, applied);

        if self.awaiting_first_tick.swap(false, Ordering::AcqRel) {
            self.store.set_loading(false);
        }

        applied
    }
}

/// Owned feed driver with an explicit start/stop lifecycle
pub struct SyntheticFeed {
    inner: Arc<FeedInner>,
    scheduler: Arc<dyn Scheduler>,
    timer: Mutex<Option<TimerHandle>>,
}

impl SyntheticFeed {
    /// Create a stopped feed; the RNG comes from `config.seed` or entropy
    pub fn new(store: SharedAssetStore, scheduler: Arc<dyn Scheduler>, config: FeedConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(store, scheduler, config, rng)
    }

    /// Create a stopped feed drawing from the given RNG
    pub fn with_rng(
        store: SharedAssetStore,
        scheduler: Arc<dyn Scheduler>,
        config: FeedConfig,
        rng: impl RngCore + Send + 'static,
    ) -> Self {
        Self {
            inner: Arc::new(FeedInner {
                store,
                rng: Mutex::new(Box::new(rng)),
                config,
                ticks: AtomicU64::new(0),
                awaiting_first_tick: AtomicBool::new(false),
                epoch: AtomicU64::new(0),
                tick_lock: Mutex::new(()),
            }),
            scheduler,
            timer: Mutex::new(None),
        }
    }

    /// Begin ticking. No-op while already running.
    ///
    /// A zero interval is refused and leaves the feed stopped.
    pub fn start(&self) {
        let interval = self.inner.config.interval;
        if interval.is_zero() {
            warn!("[Feed] Refusing to start with a zero interval");
            return;
        }

        let mut timer = self.timer.lock();
        if timer.is_some() {
            debug!("[Feed] Already running");
            return;
        }

        let epoch = self.inner.epoch.fetch_add(1, Ordering::AcqRel) + 1;
        let inner = Arc::clone(&self.inner);
        let task = Box::new(move || inner.scheduled_tick(epoch));
        *timer = Some(self.scheduler.schedule_repeating(interval, task));
        drop(timer);

        self.inner.awaiting_first_tick.store(true, Ordering::Release);
        self.inner.store.set_loading(true);

        info!(
            "[Feed] Started (interval: {:?}, assets: {})",
            interval,
            self.inner.store.len()
        );
    }

    /// Cancel future ticks. No-op while stopped.
    ///
    /// Returns only after a tick already in progress has finished, so the
    /// store is not written once this returns. Must not be called from a
    /// store listener.
    pub fn stop(&self) {
        let Some(handle) = self.timer.lock().take() else {
            debug!("[Feed] Already stopped");
            return;
        };
        self.inner.epoch.fetch_add(1, Ordering::AcqRel);
        handle.cancel();

        // Wait out an in-flight tick
        drop(self.inner.tick_lock.lock());

        if self.inner.awaiting_first_tick.swap(false, Ordering::AcqRel) {
            self.inner.store.set_loading(false);
        }

        info!("[Feed] Stopped after {} ticks", self.ticks());
    }

    /// Run one tick immediately, independent of the schedule
    ///
    /// Returns the number of assets updated.
    pub fn tick(&self) -> usize {
        self.inner.tick()
    }

    pub fn state(&self) -> FeedState {
        if self.timer.lock().is_some() {
            FeedState::Running
        } else {
            FeedState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == FeedState::Running
    }

    /// Ticks executed since creation
    pub fn ticks(&self) -> u64 {
        self.inner.ticks.load(Ordering::Relaxed)
    }

    pub fn config(&self) -> &FeedConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &SharedAssetStore {
        &self.inner.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{default_assets, AssetStore, StoreEvent, Subscription};
    use crate::infrastructure::scheduler::ManualScheduler;
    use rand::rngs::mock::StepRng;
    use std::sync::atomic::AtomicUsize;

    fn setup(seed: u64) -> (SharedAssetStore, ManualScheduler, SyntheticFeed) {
        let store = AssetStore::with_default_assets().shared();
        let scheduler = ManualScheduler::new();
        let feed = SyntheticFeed::new(
            Arc::clone(&store),
            Arc::new(scheduler.clone()),
            FeedConfig::default().with_seed(seed),
        );
        (store, scheduler, feed)
    }

    fn count_asset_updates(store: &AssetStore) -> (Arc<AtomicUsize>, Subscription) {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let sub = store.subscribe(move |event| {
            if matches!(event, StoreEvent::AssetUpdated(_)) {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        (count, sub)
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(1.235_1), 1.24);
        assert_eq!(round2(-0.004), -0.0);
        assert_eq!(round2(50_000.0), 50_000.0);
    }

    #[test]
    fn test_random_percent_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = random_percent(&mut rng, -0.5, 0.5);
            assert!((-0.5..=0.5).contains(&v));
        }
    }

    #[test]
    fn test_compute_update_leaves_market_cap() {
        let asset = default_assets().remove(0);
        let mut rng = StdRng::seed_from_u64(1);
        let update = compute_update(&asset, &FeedConfig::default(), &mut rng);

        assert!(update.price.is_some());
        assert!(update.volume_24h.is_some());
        assert!(update.change_1h.is_some() && update.change_24h.is_some() && update.change_7d.is_some());
        assert_eq!(update.market_cap, None);
    }

    #[test]
    fn test_compute_update_max_draw() {
        let asset = default_assets().remove(0);
        let mut rng = StepRng::new(u64::MAX, 0);
        let update = compute_update(&asset, &FeedConfig::default(), &mut rng);

        // Upper edge of every band
        assert_eq!(update.price, Some(50_250.0));
        assert_eq!(update.volume_24h, Some(25_025_000_000.0));
        assert_eq!(update.change_1h, Some(1.0));
        assert_eq!(update.change_24h, Some(2.8));
        assert_eq!(update.change_7d, Some(6.2));
    }

    #[test]
    fn test_zero_bands_keep_values() {
        let asset = default_assets().remove(3);
        let config = FeedConfig {
            price_band_pct: 0.0,
            volume_band_pct: 0.0,
            change_band_pct: 0.0,
            ..FeedConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        let update = compute_update(&asset, &config, &mut rng);

        assert_eq!(update.price, Some(asset.price));
        assert_eq!(update.volume_24h, Some(asset.volume_24h));
        assert_eq!(update.change_24h, Some(asset.change_24h));
    }

    #[test]
    fn test_start_is_idempotent() {
        let (store, scheduler, feed) = setup(1);
        let (updates, _sub) = count_asset_updates(&store);

        feed.start();
        feed.start();
        assert_eq!(scheduler.active_timers(), 1);
        assert_eq!(feed.state(), FeedState::Running);

        scheduler.advance(Duration::from_millis(2000));
        assert_eq!(updates.load(Ordering::SeqCst), store.len());
        assert_eq!(feed.ticks(), 1);
    }

    #[test]
    fn test_stop_halts_mutation() {
        let (store, scheduler, feed) = setup(2);

        feed.start();
        scheduler.advance(Duration::from_millis(4000));
        assert_eq!(feed.ticks(), 2);

        feed.stop();
        let frozen = store.get_all();
        scheduler.advance(Duration::from_secs(60));

        assert_eq!(store.get_all(), frozen);
        assert_eq!(feed.ticks(), 2);
        assert_eq!(scheduler.active_timers(), 0);
        assert_eq!(feed.state(), FeedState::Stopped);
    }

    #[test]
    fn test_stop_when_stopped_is_noop() {
        let (_store, scheduler, feed) = setup(3);
        feed.stop();
        assert_eq!(feed.state(), FeedState::Stopped);

        feed.start();
        feed.stop();
        feed.stop();
        assert_eq!(scheduler.active_timers(), 0);
    }

    #[test]
    fn test_restart_after_stop() {
        let (_store, scheduler, feed) = setup(4);
        feed.start();
        feed.stop();
        feed.start();

        scheduler.advance(Duration::from_millis(2000));
        assert_eq!(feed.ticks(), 1);
        assert_eq!(scheduler.active_timers(), 1);
    }

    #[test]
    fn test_drop_cancels_timer() {
        let (_store, scheduler, feed) = setup(5);
        feed.start();
        drop(feed);
        assert_eq!(scheduler.active_timers(), 0);
    }

    #[test]
    fn test_zero_interval_refuses_to_start() {
        let store = AssetStore::with_default_assets().shared();
        let scheduler = ManualScheduler::new();
        let feed = SyntheticFeed::new(
            Arc::clone(&store),
            Arc::new(scheduler.clone()),
            FeedConfig::default().with_interval(Duration::ZERO),
        );

        feed.start();

        assert_eq!(feed.state(), FeedState::Stopped);
        assert_eq!(scheduler.active_timers(), 0);
        assert!(!store.status().loading);
        scheduler.advance(Duration::from_secs(10));
        assert_eq!(feed.ticks(), 0);
    }

    #[test]
    fn test_stale_timer_tick_is_skipped() {
        let (store, _scheduler, feed) = setup(8);
        feed.start();
        let epoch = feed.inner.epoch.load(Ordering::Acquire);
        feed.stop();

        // A timer task that fires after stop() sees a moved epoch
        let frozen = store.get_all();
        feed.inner.scheduled_tick(epoch);

        assert_eq!(store.get_all(), frozen);
        assert_eq!(feed.ticks(), 0);
    }

    #[test]
    fn test_loading_flag_cleared_by_first_tick() {
        let (store, scheduler, feed) = setup(6);

        feed.start();
        assert!(store.status().loading);

        scheduler.advance(Duration::from_millis(2000));
        assert!(!store.status().loading);
    }

    #[test]
    fn test_single_tick_bounds() {
        let (store, _scheduler, feed) = setup(11);
        let before = store.get_all();

        feed.tick();

        for (old, new) in before.iter().zip(store.get_all()) {
            let price_bound = old.price * 0.005 + 0.005;
            assert!((new.price - old.price).abs() <= price_bound, "{} price", old.symbol);

            let volume_bound = old.volume_24h * 0.001 + 0.005;
            assert!((new.volume_24h - old.volume_24h).abs() <= volume_bound, "{} volume", old.symbol);

            assert!((new.change_24h - old.change_24h).abs() <= 0.5 + 0.005);
            assert_eq!(new.market_cap, old.market_cap);
            assert_eq!(new.max_supply, old.max_supply);
        }
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let (store_a, _sa, feed_a) = setup(42);
        let (store_b, _sb, feed_b) = setup(42);

        for _ in 0..10 {
            feed_a.tick();
            feed_b.tick();
        }

        assert_eq!(store_a.get_all(), store_b.get_all());
    }
}
