//! A cloneable, mutex-guarded handle to the interaction core.
//!
//! Hosts that feed input from one task and tick frames from another share
//! the core through [`SharedInteractionCore`]. Every call takes the lock for
//! its whole decide-and-apply step, so a debounce check and the mutation it
//! guards are never split by another event.

use std::sync::Arc;

use smashpad_types::{InputOutcome, NarrationToken, ObjectId};
use tokio::sync::{Mutex, MutexGuard};

use crate::interaction::{InteractionCore, TickReport};

/// Shared ownership of an [`InteractionCore`].
#[derive(Debug, Clone)]
pub struct SharedInteractionCore {
    inner: Arc<Mutex<InteractionCore>>,
}

impl SharedInteractionCore {
    /// Wrap a core for sharing.
    pub fn new(core: InteractionCore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(core)),
        }
    }

    /// Lock the core for several calls in a row (e.g. a snapshot).
    pub async fn lock(&self) -> MutexGuard<'_, InteractionCore> {
        self.inner.lock().await
    }

    /// See [`InteractionCore::on_pointer_down`].
    pub async fn pointer_down(&self, x: f64, y: f64) -> InputOutcome {
        self.inner.lock().await.on_pointer_down(x, y)
    }

    /// See [`InteractionCore::on_pointer_move`].
    pub async fn pointer_move(&self, x: f64, y: f64) -> InputOutcome {
        self.inner.lock().await.on_pointer_move(x, y)
    }

    /// See [`InteractionCore::on_pointer_up`].
    pub async fn pointer_up(&self, x: f64, y: f64) -> InputOutcome {
        self.inner.lock().await.on_pointer_up(x, y)
    }

    /// See [`InteractionCore::on_key_down`].
    pub async fn key_down(&self, code: &str) -> InputOutcome {
        self.inner.lock().await.on_key_down(code)
    }

    /// See [`InteractionCore::on_key_up`].
    pub async fn key_up(&self, code: &str) -> InputOutcome {
        self.inner.lock().await.on_key_up(code)
    }

    /// See [`InteractionCore::on_gamepad_button_down`].
    pub async fn gamepad_button_down(&self, index: u32) -> InputOutcome {
        self.inner.lock().await.on_gamepad_button_down(index)
    }

    /// See [`InteractionCore::on_gamepad_button_up`].
    pub async fn gamepad_button_up(&self, index: u32) -> InputOutcome {
        self.inner.lock().await.on_gamepad_button_up(index)
    }

    /// See [`InteractionCore::tick`].
    pub async fn tick(&self) -> TickReport {
        self.inner.lock().await.tick()
    }

    /// See [`InteractionCore::on_narration_done`].
    pub async fn narration_done(&self, token: NarrationToken) -> bool {
        self.inner.lock().await.on_narration_done(token)
    }

    /// See [`InteractionCore::destroy_object`].
    pub async fn destroy_object(&self, object: ObjectId) -> bool {
        self.inner.lock().await.destroy_object(object)
    }
}
