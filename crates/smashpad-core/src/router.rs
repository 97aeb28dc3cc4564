//! Input routing: the pointer state machine and press classification.
//!
//! The router decides and the core applies. Every method here reads the
//! speech lock, the debounce guard, and the registry through a
//! [`RouterView`], updates only the router's own [`PointerPhase`], and
//! returns a [`Decision`]. The interaction core then carries the decision
//! out through each component's API. Deciding and applying happen inside a
//! single `&mut` call on the core, so no other event can slip in between a
//! debounce check and the mutation it guards.
//!
//! # Press classification
//!
//! For a pointer-down (and, minus the hit test, a key or gamepad press):
//!
//! 1. An object under the pointer starts a drag. The narrating object is
//!    left out of the hit test because it owns presses while it speaks.
//! 2. Otherwise, if narration is locked, the speaking object teleports to
//!    the press, unless the post-spawn window (including "spawn input not
//!    yet released") or the post-movement window is still open. Once both
//!    windows have passed, a key or gamepad press on a speaking object the
//!    pointer still holds is ignored.
//! 3. Otherwise a new object spawns, unless the post-movement window is
//!    still open.

use smashpad_types::{ObjectId, Position};
use tracing::{debug, warn};

use crate::clock::Millis;
use crate::config::InteractionConfig;
use crate::debounce::DebounceGuard;
use crate::registry::ObjectRegistry;
use crate::speech_lock::SpeechLock;
use crate::timer::TimerHandle;

/// Where the pointer is in its press-move-release cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum PointerPhase {
    /// No pointer interaction in progress.
    #[default]
    Idle,
    /// The pointer spawned `object` and is still down.
    AwaitingSpawnRelease {
        /// The object the press spawned.
        object: ObjectId,
        /// Where the press landed.
        origin: Position,
        /// Pending hold timer; `None` once cancelled by pointer travel.
        hold_timer: Option<TimerHandle>,
    },
    /// The pointer stayed still past the hold threshold; the next move
    /// drags `object`.
    Holding {
        /// The held object.
        object: ObjectId,
    },
    /// The pointer is dragging `object`.
    Dragging {
        /// The dragged object.
        object: ObjectId,
    },
    /// The pointer teleported the speaking object and is still down; moves
    /// keep teleporting it.
    Following {
        /// The followed (speaking) object.
        object: ObjectId,
    },
}

impl PointerPhase {
    /// The object this phase is interacting with.
    pub const fn object(&self) -> Option<ObjectId> {
        match *self {
            Self::Idle => None,
            Self::AwaitingSpawnRelease { object, .. }
            | Self::Holding { object }
            | Self::Dragging { object }
            | Self::Following { object } => Some(object),
        }
    }

    /// Short label for logs.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AwaitingSpawnRelease { .. } => "awaiting_spawn_release",
            Self::Holding { .. } => "holding",
            Self::Dragging { .. } => "dragging",
            Self::Following { .. } => "following",
        }
    }
}

/// Which cooldown suppressed a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceReason {
    /// The input that caused the last spawn is still held.
    AwaitingRelease,
    /// The post-spawn window is still open.
    SpawnWindow,
    /// The post-movement window is still open.
    MoveWindow,
}

/// Why an event was dropped without acting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Nothing to act on in the current phase.
    NoInteraction,
    /// The lock names an object the registry no longer has.
    StaleLock,
    /// The object the phase refers to has been destroyed.
    MissingObject,
    /// The followed object no longer owns the speech lock.
    LockMoved,
    /// The speaking object is held by the pointer.
    ObjectBusy,
}

/// What the core should do with one input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    /// Begin dragging `object`.
    StartDrag {
        /// The object under the pointer.
        object: ObjectId,
    },
    /// Smoothly move the speaking object to `to`.
    Teleport {
        /// The speaking object.
        object: ObjectId,
        /// Destination.
        to: Position,
    },
    /// Create a new object at `at` and narrate it.
    Spawn {
        /// Spawn point.
        at: Position,
    },
    /// Put the dragged object directly under the pointer.
    DragTo {
        /// The dragged object.
        object: ObjectId,
        /// New position.
        to: Position,
        /// Whether this move turns a hold into a drag.
        begins: bool,
    },
    /// Immediately move the followed speaking object to the pointer.
    Follow {
        /// The speaking object.
        object: ObjectId,
        /// New position.
        to: Position,
    },
    /// The pointer travelled too far; cancel the pending hold timer.
    CancelHold {
        /// The timer to cancel.
        timer: TimerHandle,
    },
    /// Suppressed by a cooldown.
    Debounced {
        /// The window that was still open.
        reason: DebounceReason,
    },
    /// Dropped.
    Ignore {
        /// Why.
        reason: IgnoreReason,
    },
}

/// Read-only state the router consults for one event.
#[derive(Debug, Clone, Copy)]
pub struct RouterView<'a> {
    /// Speech lock.
    pub lock: &'a SpeechLock,
    /// Cooldown windows.
    pub debounce: &'a DebounceGuard,
    /// Live objects.
    pub registry: &'a ObjectRegistry,
    /// Tunables.
    pub config: &'a InteractionConfig,
    /// Event time, sampled once before routing.
    pub now: Millis,
}

/// The pointer state machine.
#[derive(Debug, Clone, Default)]
pub struct InputRouter {
    phase: PointerPhase,
}

impl InputRouter {
    /// A router in [`PointerPhase::Idle`].
    pub const fn new() -> Self {
        Self {
            phase: PointerPhase::Idle,
        }
    }

    /// Current pointer phase.
    pub const fn phase(&self) -> &PointerPhase {
        &self.phase
    }

    /// Reset to idle, returning the phase that was interrupted.
    pub fn take_phase(&mut self) -> PointerPhase {
        std::mem::take(&mut self.phase)
    }

    /// Classify a pointer-down at `at` and move into the matching phase.
    ///
    /// The caller must have finished any previous interaction (see
    /// [`take_phase`](Self::take_phase)). A spawn leaves the phase idle
    /// until the core reports the new object through
    /// [`await_spawn_release`](Self::await_spawn_release).
    pub fn pointer_down(&mut self, at: Position, view: &RouterView<'_>) -> Decision {
        let decision = self.classify_press(at, view, true);
        match decision {
            Decision::StartDrag { object } => self.phase = PointerPhase::Dragging { object },
            Decision::Teleport { object, .. } => self.phase = PointerPhase::Following { object },
            _ => {}
        }
        debug!(x = at.x, y = at.y, phase = self.phase.label(), ?decision, "Pointer down routed");
        decision
    }

    /// Classify a key or gamepad press at a catalog-chosen point.
    ///
    /// No hit test runs and the pointer phase is left alone.
    pub fn press(&self, at: Position, view: &RouterView<'_>) -> Decision {
        let decision = self.classify_press(at, view, false);
        debug!(x = at.x, y = at.y, ?decision, "Press routed");
        decision
    }

    /// Record the object a pointer-down just spawned.
    pub const fn await_spawn_release(
        &mut self,
        object: ObjectId,
        origin: Position,
        hold_timer: TimerHandle,
    ) {
        self.phase = PointerPhase::AwaitingSpawnRelease {
            object,
            origin,
            hold_timer: Some(hold_timer),
        };
    }

    /// The hold timer `timer` fired. Returns the now-held object if the
    /// timer still belongs to the current press.
    pub fn hold_elapsed(&mut self, timer: TimerHandle) -> Option<ObjectId> {
        match self.phase {
            PointerPhase::AwaitingSpawnRelease {
                object,
                hold_timer: Some(pending),
                ..
            } if pending == timer => {
                self.phase = PointerPhase::Holding { object };
                debug!(%object, "Hold threshold reached; drag primed");
                Some(object)
            }
            _ => None,
        }
    }

    /// Classify a pointer-move to `to`.
    pub fn pointer_move(&mut self, to: Position, view: &RouterView<'_>) -> Decision {
        match self.phase {
            PointerPhase::Idle => Decision::Ignore {
                reason: IgnoreReason::NoInteraction,
            },
            PointerPhase::Dragging { object } => {
                if view.registry.contains(object) {
                    Decision::DragTo {
                        object,
                        to,
                        begins: false,
                    }
                } else {
                    warn!(%object, "Dragged object vanished; ending drag");
                    self.phase = PointerPhase::Idle;
                    Decision::Ignore {
                        reason: IgnoreReason::MissingObject,
                    }
                }
            }
            PointerPhase::Holding { object } => {
                if view.registry.contains(object) {
                    self.phase = PointerPhase::Dragging { object };
                    Decision::DragTo {
                        object,
                        to,
                        begins: true,
                    }
                } else {
                    warn!(%object, "Held object vanished; dropping hold");
                    self.phase = PointerPhase::Idle;
                    Decision::Ignore {
                        reason: IgnoreReason::MissingObject,
                    }
                }
            }
            PointerPhase::Following { object } => {
                if view.lock.is_held_by(object) && view.registry.contains(object) {
                    Decision::Follow { object, to }
                } else {
                    Decision::Ignore {
                        reason: IgnoreReason::LockMoved,
                    }
                }
            }
            PointerPhase::AwaitingSpawnRelease {
                object,
                origin,
                hold_timer,
            } => match hold_timer {
                Some(timer) if origin.distance_to(to) > view.config.hold_slop_px => {
                    self.phase = PointerPhase::AwaitingSpawnRelease {
                        object,
                        origin,
                        hold_timer: None,
                    };
                    Decision::CancelHold { timer }
                }
                _ => Decision::Ignore {
                    reason: IgnoreReason::NoInteraction,
                },
            },
        }
    }

    fn classify_press(&self, at: Position, view: &RouterView<'_>, hit_test: bool) -> Decision {
        let speaking = view.lock.current_object_id();

        if hit_test
            && let Some(object) = view.registry.hit_test(at, view.config.hit_radius_px, speaking)
        {
            return Decision::StartDrag { object };
        }

        if let Some(object) = speaking {
            if !view.registry.contains(object) {
                warn!(%object, "Speech lock names a missing object; ignoring press");
                return Decision::Ignore {
                    reason: IgnoreReason::StaleLock,
                };
            }
            if let Some(reason) = move_blocked(view) {
                return Decision::Debounced { reason };
            }
            if self.phase.object() == Some(object) {
                return Decision::Ignore {
                    reason: IgnoreReason::ObjectBusy,
                };
            }
            return Decision::Teleport { object, to: at };
        }

        if !view.debounce.can_spawn_after_movement(view.now) {
            return Decision::Debounced {
                reason: DebounceReason::MoveWindow,
            };
        }
        Decision::Spawn { at }
    }
}

/// Which window, if any, blocks moving the speaking object right now.
fn move_blocked(view: &RouterView<'_>) -> Option<DebounceReason> {
    if view.debounce.awaiting_spawn_input_release() {
        Some(DebounceReason::AwaitingRelease)
    } else if !view.debounce.can_move_after_spawn(view.now) {
        Some(DebounceReason::SpawnWindow)
    } else if !view.debounce.can_spawn_after_movement(view.now) {
        Some(DebounceReason::MoveWindow)
    } else {
        None
    }
}
