//! Narration generations.
//!
//! Each narration sequence gets a [`NarrationToken`] carrying a monotonic
//! generation. The speech port hands the token back when speech ends; the
//! tracker only accepts the token of the narration that is still current.
//! Cancelling or superseding a narration bumps the generation, so a late
//! completion from the old sequence is recognised as stale and dropped.

use smashpad_types::{NarrationToken, ObjectId};

/// Issues and validates narration tokens.
#[derive(Debug, Clone, Default)]
pub struct NarrationTracker {
    generation: u64,
    current: Option<NarrationToken>,
}

impl NarrationTracker {
    /// Create a tracker with no narration in flight.
    pub const fn new() -> Self {
        Self {
            generation: 0,
            current: None,
        }
    }

    /// Start a narration for `object`, superseding any current one.
    pub const fn begin(&mut self, object: ObjectId) -> NarrationToken {
        self.generation = self.generation.wrapping_add(1);
        let token = NarrationToken {
            object,
            generation: self.generation,
        };
        self.current = Some(token);
        token
    }

    /// Accept a completion. Returns `true` exactly once for the current
    /// token; stale or repeated completions return `false`.
    pub fn complete(&mut self, token: NarrationToken) -> bool {
        if self.current == Some(token) {
            self.current = None;
            true
        } else {
            false
        }
    }

    /// Invalidate the current narration, returning it if there was one.
    ///
    /// The generation moves on, so the cancelled token can never complete.
    pub const fn cancel(&mut self) -> Option<NarrationToken> {
        self.generation = self.generation.wrapping_add(1);
        self.current.take()
    }

    /// The narration still in flight.
    pub const fn current(&self) -> Option<NarrationToken> {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_token_completes_once() {
        let mut tracker = NarrationTracker::new();
        let token = tracker.begin(ObjectId::new());
        assert!(tracker.complete(token));
        assert!(!tracker.complete(token));
        assert_eq!(tracker.current(), None);
    }

    #[test]
    fn superseded_token_is_stale() {
        let mut tracker = NarrationTracker::new();
        let old = tracker.begin(ObjectId::new());
        let new = tracker.begin(ObjectId::new());
        assert!(!tracker.complete(old));
        assert_eq!(tracker.current(), Some(new));
        assert!(tracker.complete(new));
    }

    #[test]
    fn cancelled_token_is_stale() {
        let mut tracker = NarrationTracker::new();
        let token = tracker.begin(ObjectId::new());
        assert_eq!(tracker.cancel(), Some(token));
        assert!(!tracker.complete(token));
    }

    #[test]
    fn same_object_new_generation_is_distinct() {
        let mut tracker = NarrationTracker::new();
        let object = ObjectId::new();
        let first = tracker.begin(object);
        tracker.cancel();
        let second = tracker.begin(object);
        assert_ne!(first, second);
        assert!(second.generation > first.generation);
        assert!(!tracker.complete(first));
        assert!(tracker.complete(second));
    }
}
