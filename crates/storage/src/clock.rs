//! Cell timestamp allocation.
//!
//! Timestamps are wall-clock milliseconds, bumped when needed so that two
//! writes never share one. A put immediately followed by another put to the
//! same column therefore always produces two versions.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Strictly increasing millisecond clock.
#[derive(Debug, Default)]
pub struct Clock {
    last: AtomicU64,
}

impl Clock {
    /// Create a clock; the first tick is the current time.
    pub fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    /// Current wall-clock time in milliseconds, without allocating a tick.
    pub fn now_millis() -> u64 {
        Utc::now().timestamp_millis().max(0) as u64
    }

    /// Allocate the next timestamp.
    pub fn tick(&self) -> u64 {
        let now = Self::now_millis();
        let mut last = self.last.load(Ordering::Acquire);
        loop {
            let next = now.max(last + 1);
            match self
                .last
                .compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return next,
                Err(current) => last = current,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_strictly_increase() {
        let clock = Clock::new();
        let mut prev = clock.tick();
        for _ in 0..1000 {
            let next = clock.tick();
            assert!(next > prev);
            prev = next;
        }
    }

    #[test]
    fn test_tick_tracks_wall_clock() {
        let clock = Clock::new();
        let before = Clock::now_millis();
        assert!(clock.tick() >= before);
    }
}
