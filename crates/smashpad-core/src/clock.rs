//! Monotonic time sources for cooldowns, timers, and idle tracking.
//!
//! Every time-dependent decision in the core reads a single millisecond
//! timestamp from a [`Clock`] at the start of the event being processed.
//! Two implementations exist:
//!
//! - [`SystemClock`] -- real monotonic time since construction.
//! - [`ManualClock`] -- externally driven time for tests and deterministic
//!   script replay. Clones share the same underlying counter.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Milliseconds on a monotonic timeline with an arbitrary origin.
pub type Millis = u64;

/// A monotonic millisecond time source.
pub trait Clock: Send + Sync + core::fmt::Debug {
    /// Current time in milliseconds. Never decreases.
    fn now_ms(&self) -> Millis;
}

/// Wall-independent monotonic clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock whose zero is the moment of construction.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> Millis {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a manual clock starting at `start_ms`.
    pub fn new(start_ms: Millis) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    /// Move the clock forward by `delta_ms` and return the new time.
    ///
    /// Saturates at `u64::MAX`.
    pub fn advance(&self, delta_ms: Millis) -> Millis {
        let previous = self
            .now
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |t| {
                Some(t.saturating_add(delta_ms))
            })
            .unwrap_or_else(|t| t);
        previous.saturating_add(delta_ms)
    }

    /// Jump to `at_ms`. Requests to move backwards are ignored so the clock
    /// stays monotonic.
    pub fn set(&self, at_ms: Millis) {
        self.now.fetch_max(at_ms, Ordering::AcqRel);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Millis {
        self.now.load(Ordering::Acquire)
    }
}

/// Milliseconds elapsed from `since` to `now`, zero if `now` is earlier.
pub const fn elapsed_ms(now: Millis, since: Millis) -> Millis {
    now.saturating_sub(since)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_starts_where_told() {
        let clock = ManualClock::new(1_000);
        assert_eq!(clock.now_ms(), 1_000);
    }

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new(0);
        assert_eq!(clock.advance(16), 16);
        assert_eq!(clock.advance(16), 32);
        assert_eq!(clock.now_ms(), 32);
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(0);
        let other = clock.clone();
        clock.advance(250);
        assert_eq!(other.now_ms(), 250);
    }

    #[test]
    fn manual_clock_never_goes_backwards() {
        let clock = ManualClock::new(500);
        clock.set(100);
        assert_eq!(clock.now_ms(), 500);
        clock.set(900);
        assert_eq!(clock.now_ms(), 900);
    }

    #[test]
    fn manual_clock_saturates() {
        let clock = ManualClock::new(u64::MAX - 1);
        assert_eq!(clock.advance(10), u64::MAX);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }

    #[test]
    fn elapsed_saturates_at_zero() {
        assert_eq!(elapsed_ms(100, 40), 60);
        assert_eq!(elapsed_ms(40, 100), 0);
    }
}
