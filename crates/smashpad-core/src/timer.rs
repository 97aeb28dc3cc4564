//! Cancellable scheduled tasks driven by the frame tick.
//!
//! The queue never sleeps or spawns anything. The host calls
//! [`TimerQueue::drain_due`] once per frame with the current time and gets
//! back every task whose deadline has passed, in deadline order. A task can
//! be cancelled through its [`TimerHandle`] at any point before it fires.

use std::collections::BTreeMap;

use crate::clock::Millis;

/// Handle to one scheduled task. Handles are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(u64);

impl core::fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// A deadline-ordered set of pending tasks carrying payload `T`.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    next_id: u64,
    /// Keyed by `(deadline, handle)` so equal deadlines fire in scheduling
    /// order.
    pending: BTreeMap<(Millis, TimerHandle), T>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    /// Create an empty queue.
    pub const fn new() -> Self {
        Self {
            next_id: 0,
            pending: BTreeMap::new(),
        }
    }

    /// Schedule `payload` to fire at `at_ms`.
    pub fn schedule(&mut self, at_ms: Millis, payload: T) -> TimerHandle {
        self.next_id = self.next_id.wrapping_add(1);
        let handle = TimerHandle(self.next_id);
        self.pending.insert((at_ms, handle), payload);
        handle
    }

    /// Cancel a pending task. Returns `false` if it already fired or was
    /// cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let key = self.pending.keys().find(|(_, h)| *h == handle).copied();
        key.is_some_and(|k| self.pending.remove(&k).is_some())
    }

    /// Whether `handle` is still waiting to fire.
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.keys().any(|(_, h)| *h == handle)
    }

    /// Remove and return every task due at or before `now`, earliest first.
    pub fn drain_due(&mut self, now: Millis) -> Vec<(TimerHandle, T)> {
        let not_due = match now.checked_add(1) {
            Some(bound) => self.pending.split_off(&(bound, TimerHandle(0))),
            None => BTreeMap::new(),
        };
        let due = std::mem::replace(&mut self.pending, not_due);
        due.into_iter()
            .map(|((_, handle), payload)| (handle, payload))
            .collect()
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is scheduled.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Deadline of the earliest pending task.
    pub fn next_deadline(&self) -> Option<Millis> {
        self.pending.keys().next().map(|(at, _)| *at)
    }
}
