//! Pacing for held keys.
//!
//! A key that stays down is reported on every poll. The gate lets a new
//! chord through immediately and then repeats it no faster than once per
//! interval. `EXIT` is never held back.

use crate::clock::Clock;
use crate::keys::Keys;
use tracing::trace;

/// Rate limiter for repeated key snapshots.
#[derive(Debug, Clone)]
pub struct RepeatGate {
    interval_ms: u64,
    last_keys: Keys,
    last_fire: Option<u64>,
}

impl RepeatGate {
    /// Gate with a minimum repeat interval. Zero lets every poll through.
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_keys: Keys::empty(),
            last_fire: None,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Change the repeat interval.
    pub fn set_interval(&mut self, interval_ms: u64) {
        self.interval_ms = interval_ms;
    }

    /// Filter one poll: returns the keys to act on, possibly empty.
    pub fn filter(&mut self, keys: Keys, clock: &dyn Clock) -> Keys {
        if keys.contains(Keys::EXIT) {
            return keys;
        }
        if keys.is_empty() {
            self.last_keys = Keys::empty();
            self.last_fire = None;
            return keys;
        }

        let now = clock.now_ms();
        let due = match self.last_fire {
            _ if keys != self.last_keys => true,
            None => true,
            Some(last) => now.saturating_sub(last) >= self.interval_ms,
        };
        if !due {
            trace!("Throttling repeated keys: {}", keys);
            return Keys::empty();
        }

        self.last_keys = keys;
        self.last_fire = Some(now);
        keys
    }
}

impl Default for RepeatGate {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    #[test]
    fn test_zero_interval_passes_everything() {
        let clock = ManualClock::default();
        let mut gate = RepeatGate::default();
        for _ in 0..3 {
            assert_eq!(gate.filter(Keys::RIGHT, &clock), Keys::RIGHT);
        }
    }

    #[test]
    fn test_release_rearms() {
        let clock = ManualClock::default();
        let mut gate = RepeatGate::new(100);
        assert_eq!(gate.filter(Keys::UP, &clock), Keys::UP);
        assert_eq!(gate.filter(Keys::empty(), &clock), Keys::empty());
        assert_eq!(gate.filter(Keys::UP, &clock), Keys::UP);
    }
}
