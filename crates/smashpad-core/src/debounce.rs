//! Cooldown windows guarding spawn-versus-move decisions.
//!
//! Two independent windows share one duration:
//!
//! - **post-movement**: a spawn is suppressed until `cooldown_ms` after the
//!   last move, so a move is never misread as a fresh spawn location.
//! - **post-spawn**: a move is suppressed until `cooldown_ms` after the last
//!   spawn *and* until the input that caused the spawn has been released.
//!   Time alone never clears the release requirement.
//!
//! The guard never reads a clock. Callers sample the time once per event
//! and pass it in, which keeps every check tied to the state as it was
//! immediately before that event.

use crate::clock::{Millis, elapsed_ms};

/// Debounce state: last spawn, last move, and the release flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebounceGuard {
    cooldown_ms: Millis,
    last_spawn_ms: Option<Millis>,
    last_move_ms: Option<Millis>,
    awaiting_spawn_input_release: bool,
}

impl DebounceGuard {
    /// Create a guard with both windows set to `cooldown_ms`.
    pub const fn new(cooldown_ms: Millis) -> Self {
        Self {
            cooldown_ms,
            last_spawn_ms: None,
            last_move_ms: None,
            awaiting_spawn_input_release: false,
        }
    }

    /// Whether a spawn is allowed: no move yet, or the post-movement window
    /// has elapsed.
    pub fn can_spawn_after_movement(&self, now: Millis) -> bool {
        self.last_move_ms
            .is_none_or(|at| elapsed_ms(now, at) >= self.cooldown_ms)
    }

    /// Whether a move is allowed: the spawning input has been released
    /// *and* the post-spawn window has elapsed.
    pub fn can_move_after_spawn(&self, now: Millis) -> bool {
        !self.awaiting_spawn_input_release
            && self
                .last_spawn_ms
                .is_none_or(|at| elapsed_ms(now, at) >= self.cooldown_ms)
    }

    /// Record a spawn at `now`. Sets the release flag in the same step.
    pub const fn record_spawn(&mut self, now: Millis) {
        self.last_spawn_ms = Some(now);
        self.awaiting_spawn_input_release = true;
    }

    /// Record a move at `now`.
    pub const fn record_move(&mut self, now: Millis) {
        self.last_move_ms = Some(now);
    }

    /// Record that the input which caused the last spawn was released.
    pub const fn record_input_release(&mut self) {
        self.awaiting_spawn_input_release = false;
    }

    /// Whether the last spawn's input is still held.
    pub const fn awaiting_spawn_input_release(&self) -> bool {
        self.awaiting_spawn_input_release
    }

    /// Time of the last spawn, if any.
    pub const fn last_spawn_ms(&self) -> Option<Millis> {
        self.last_spawn_ms
    }

    /// Time of the last move, if any.
    pub const fn last_move_ms(&self) -> Option<Millis> {
        self.last_move_ms
    }
}
