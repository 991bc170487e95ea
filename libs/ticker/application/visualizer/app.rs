//! Main application state and logic for the ticker table

use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use crossbeam_channel::{Receiver, TryRecvError};
use tracing::{debug, info};

use crate::application::feed::SyntheticFeed;
use crate::application::presentation::FlashBoard;
use crate::domain::{Asset, SharedAssetStore, StoreEvent, StoreStatus, Subscription};
use crate::infrastructure::config::{DisplaySettings, Theme};

/// Main application state
pub struct App {
    /// Canonical asset store
    store: SharedAssetStore,
    /// Feed mutating the store
    feed: SyntheticFeed,
    /// Store subscription forwarding events into `events`
    subscription: Option<Subscription>,
    events: Receiver<StoreEvent>,
    /// Rows as last rendered, in display order
    pub rows: Vec<Asset>,
    /// Per-cell flash memory
    pub flashes: FlashBoard,
    /// Loading / error flags mirrored from the store
    pub status: StoreStatus,
    /// Currently selected row
    pub selected_index: usize,
    pub theme: Theme,
    /// Whether to quit
    pub should_quit: bool,
    /// Status message to show in footer
    pub status_message: Option<String>,
    /// Wall-clock time of the last applied asset update
    pub last_update: Option<DateTime<Local>>,
    updates_seen: u64,
}

impl App {
    /// Build the app around a store and a (stopped) feed
    pub fn new(store: SharedAssetStore, feed: SyntheticFeed, display: &DisplaySettings) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        let subscription = store.subscribe(move |event| {
            // Receiver gone means the app is shutting down
            let _ = tx.send(event.clone());
        });

        let rows = store.get_all();
        let mut flashes = FlashBoard::new(Duration::from_millis(display.flash_ms));
        flashes.observe_all(&rows, Instant::now());

        Self {
            status: store.status(),
            store,
            feed,
            subscription: Some(subscription),
            events: rx,
            rows,
            flashes,
            selected_index: 0,
            theme: display.theme,
            should_quit: false,
            status_message: None,
            last_update: None,
            updates_seen: 0,
        }
    }

    /// Start the feed (table mounted)
    pub fn start(&mut self) {
        self.feed.start();
    }

    /// Apply pending store events and expire flashes
    ///
    /// Returns true when something visible changed.
    pub fn sync(&mut self, now: Instant) -> bool {
        let mut changed = false;

        loop {
            match self.events.try_recv() {
                Ok(event) => {
                    self.apply_event(event, now);
                    changed = true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        changed |= self.flashes.poll(now) > 0;
        changed
    }

    fn apply_event(&mut self, event: StoreEvent, now: Instant) {
        match event {
            StoreEvent::AssetUpdated(asset) => {
                self.flashes.observe_asset(&asset, now);
                if let Some(row) = self.rows.iter_mut().find(|row| row.id == asset.id) {
                    *row = asset;
                }
                self.updates_seen += 1;
                self.last_update = Some(Local::now());
            }
            StoreEvent::LoadingChanged(loading) => self.status.loading = loading,
            StoreEvent::ErrorChanged(error) => self.status.error = error,
        }
    }

    /// Navigate to next row
    pub fn next_row(&mut self) {
        if !self.rows.is_empty() {
            self.selected_index = (self.selected_index + 1) % self.rows.len();
        }
    }

    /// Navigate to previous row
    pub fn prev_row(&mut self) {
        if !self.rows.is_empty() {
            self.selected_index = if self.selected_index == 0 {
                self.rows.len() - 1
            } else {
                self.selected_index - 1
            };
        }
    }

    pub fn get_selected_asset(&self) -> Option<&Asset> {
        self.rows.get(self.selected_index)
    }

    /// Pause or resume the feed
    pub fn toggle_feed(&mut self) {
        if self.feed.is_running() {
            self.feed.stop();
            self.status_message = Some("Feed paused".to_string());
        } else {
            self.feed.start();
            self.status_message = Some("Feed resumed".to_string());
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    pub fn is_feed_running(&self) -> bool {
        self.feed.is_running()
    }

    pub fn tick_count(&self) -> u64 {
        self.feed.ticks()
    }

    /// Asset updates applied to the table so far
    pub fn updates_seen(&self) -> u64 {
        self.updates_seen
    }

    pub fn store(&self) -> &SharedAssetStore {
        &self.store
    }

    /// Stop the feed and detach from the store (table unmounted)
    pub fn shutdown(&mut self) {
        info!("[Ticker] Shutting down...");
        self.feed.stop();
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        debug!("[Ticker] Applied {} asset updates", self.updates_seen);
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if self.subscription.is_some() {
            self.shutdown();
        }
    }
}
