//! Heartbeat logging for long-running processes

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Tracks heartbeat intervals for periodic status logging
pub struct Heartbeat {
    interval: Duration,
    last_beat: DateTime<Utc>,
    beats: u64,
}

impl Heartbeat {
    /// Create a new heartbeat with the given interval in seconds
    pub fn new(interval_secs: u64) -> Self {
        Self {
            interval: Duration::from_secs(interval_secs),
            last_beat: Utc::now(),
            beats: 0,
        }
    }

    /// Check if enough time has passed since the last beat
    pub fn should_beat(&self) -> bool {
        let elapsed = Utc::now().signed_duration_since(self.last_beat);
        elapsed.to_std().unwrap_or_default() >= self.interval
    }

    /// Record a heartbeat at the current time
    pub fn beat(&mut self) {
        self.last_beat = Utc::now();
        self.beats += 1;
    }

    /// Number of beats recorded so far
    pub fn count(&self) -> u64 {
        self.beats
    }

    /// Wall-clock time of the last beat (or creation)
    pub fn last_beat(&self) -> DateTime<Utc> {
        self.last_beat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_interval_always_beats() {
        let mut heartbeat = Heartbeat::new(0);
        assert!(heartbeat.should_beat());
        heartbeat.beat();
        assert!(heartbeat.should_beat());
        assert_eq!(heartbeat.count(), 1);
    }

    #[test]
    fn test_long_interval_waits() {
        let heartbeat = Heartbeat::new(3600);
        assert!(!heartbeat.should_beat());
        assert_eq!(heartbeat.count(), 0);
    }
}
