//! Per-cell flash state machine
//!
//! Each displayed numeric cell remembers the last value it rendered. A new
//! value above it flashes `Up`, below it flashes `Down`; the flash clears
//! itself `duration` after the most recent triggering value. Time is always
//! passed in by the caller so the machine stays deterministic.

use std::time::{Duration, Instant};

/// Default highlight duration
pub const DEFAULT_FLASH_DURATION: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaKind {
    Increase,
    Decrease,
    Unchanged,
}

/// Compare a new value against the last rendered one
pub fn classify(previous: f64, current: f64) -> DeltaKind {
    if current > previous {
        DeltaKind::Increase
    } else if current < previous {
        DeltaKind::Decrease
    } else {
        DeltaKind::Unchanged
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlashState {
    #[default]
    Neutral,
    Up,
    Down,
}

impl FlashState {
    pub fn is_active(self) -> bool {
        self != FlashState::Neutral
    }
}

#[derive(Debug, Clone)]
pub struct FlashCell {
    last_value: Option<f64>,
    state: FlashState,
    expires_at: Option<Instant>,
    duration: Duration,
}

impl FlashCell {
    /// Empty cell; the first observed value is recorded without flashing
    pub fn new(duration: Duration) -> Self {
        Self {
            last_value: None,
            state: FlashState::Neutral,
            expires_at: None,
            duration,
        }
    }

    /// Cell that already rendered `value`
    pub fn with_value(value: f64, duration: Duration) -> Self {
        Self {
            last_value: Some(value),
            ..Self::new(duration)
        }
    }

    /// Record a newly rendered value and classify it
    ///
    /// A triggering value restarts the flash; an unchanged value leaves any
    /// running flash alone.
    pub fn observe(&mut self, value: f64, now: Instant) -> DeltaKind {
        let delta = match self.last_value {
            Some(previous) => classify(previous, value),
            None => DeltaKind::Unchanged,
        };
        self.last_value = Some(value);

        let triggered = match delta {
            DeltaKind::Increase => FlashState::Up,
            DeltaKind::Decrease => FlashState::Down,
            DeltaKind::Unchanged => return delta,
        };

        self.state = triggered;
        self.expires_at = Some(now + self.duration);
        delta
    }

    /// Visual state as of `now`
    pub fn state_at(&self, now: Instant) -> FlashState {
        match self.expires_at {
            Some(deadline) if now < deadline => self.state,
            _ => FlashState::Neutral,
        }
    }

    /// Drop an expired flash. Returns true if the cell went back to neutral.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.expires_at {
            Some(deadline) if now >= deadline => {
                self.state = FlashState::Neutral;
                self.expires_at = None;
                true
            }
            _ => false,
        }
    }

    pub fn last_value(&self) -> Option<f64> {
        self.last_value
    }

    /// When the running flash ends, if any
    pub fn expires_at(&self) -> Option<Instant> {
        self.expires_at
    }
}
