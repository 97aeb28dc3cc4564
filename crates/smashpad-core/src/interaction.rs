//! The interaction core: one object that owns every piece of arbitration
//! state and exposes the input, frame, narration, and lifecycle entry
//! points to the host.
//!
//! # Atomicity
//!
//! Each entry point samples the clock once, asks the [`InputRouter`] for a
//! [`Decision`], and applies it, all inside one `&mut self` call. Hosts that
//! drive the core from several threads wrap it in a
//! [`SharedInteractionCore`](crate::shared::SharedInteractionCore), which
//! serializes those calls behind a mutex.
//!
//! # Side effects
//!
//! Port calls happen after the state change they report and their results
//! are only logged. A failing speech backend is the one special case: if
//! `speak` fails the narration counts as finished on the spot, otherwise the
//! speech lock would never be released.

use std::sync::Arc;

use smashpad_types::{
    GameObject, InputAction, InputOutcome, InputSource, NarrationToken, ObjectId, Position,
};
use tracing::{debug, info, warn};

use crate::catalog::{CatalogEntry, ObjectCatalog};
use crate::clock::{Clock, Millis};
use crate::config::{ConfigError, ToyConfig};
use crate::debounce::DebounceGuard;
use crate::movement::MovementScheduler;
use crate::narration::NarrationTracker;
use crate::ports::{Ports, effect};
use crate::registry::{ObjectRegistry, RegistryError};
use crate::router::{Decision, InputRouter, PointerPhase, RouterView};
use crate::speech_lock::SpeechLock;
use crate::timer::{TimerHandle, TimerQueue};

/// Work scheduled on the core's timer queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerTask {
    /// The hold threshold for a freshly spawned object elapsed.
    HoldElapsed,
}

/// What one frame tick did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Frame counter after this tick.
    pub frame: u64,
    /// Timers that fired.
    pub timers_fired: usize,
    /// Objects whose tween advanced.
    pub moved: usize,
    /// Tweens that reached their target.
    pub arrived: usize,
    /// Objects removed by the idle sweep.
    pub removed: Vec<ObjectId>,
}

/// Which device a press came from, with the detail the catalog needs.
#[derive(Debug, Clone, Copy)]
enum Press<'a> {
    Pointer,
    Key(&'a str),
    Gamepad(u32),
}

impl Press<'_> {
    const fn source(self) -> InputSource {
        match self {
            Self::Pointer => InputSource::Pointer,
            Self::Key(_) => InputSource::Keyboard,
            Self::Gamepad(_) => InputSource::Gamepad,
        }
    }
}

/// Owns the arbitration state and drives the ports.
#[derive(Debug)]
pub struct InteractionCore {
    config: ToyConfig,
    clock: Arc<dyn Clock>,
    speech_lock: SpeechLock,
    narration: NarrationTracker,
    debounce: DebounceGuard,
    registry: ObjectRegistry,
    movement: MovementScheduler,
    timers: TimerQueue<TimerTask>,
    router: InputRouter,
    catalog: ObjectCatalog,
    ports: Ports,
    frame: u64,
}

impl InteractionCore {
    /// Build a core from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the configuration fails
    /// validation.
    pub fn new(
        config: ToyConfig,
        clock: Arc<dyn Clock>,
        catalog: ObjectCatalog,
        ports: Ports,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let debounce = DebounceGuard::new(config.interaction.cooldown_ms);
        info!(
            cooldown_ms = config.interaction.cooldown_ms,
            hold_duration_ms = config.interaction.hold_duration_ms,
            lerp_speed = config.interaction.lerp_speed,
            hit_radius_px = config.interaction.hit_radius_px,
            "Interaction core ready"
        );
        Ok(Self {
            config,
            clock,
            speech_lock: SpeechLock::new(),
            narration: NarrationTracker::new(),
            debounce,
            registry: ObjectRegistry::new(),
            movement: MovementScheduler::new(),
            timers: TimerQueue::new(),
            router: InputRouter::new(),
            catalog,
            ports,
            frame: 0,
        })
    }

    // -----------------------------------------------------------------------
    // Pointer input
    // -----------------------------------------------------------------------

    /// A pointer (mouse, pen, touch) went down at `(x, y)`.
    pub fn on_pointer_down(&mut self, x: f64, y: f64) -> InputOutcome {
        let now = self.clock.now_ms();
        let at = Position::new(x, y);

        // A second press without a release (multi-touch, lost pointer-up)
        // ends whatever the previous press was doing.
        let interrupted = self.router.take_phase();
        if interrupted != PointerPhase::Idle {
            debug!(phase = interrupted.label(), "New press interrupts pointer interaction");
            self.finish_phase(interrupted);
        }

        let view = RouterView {
            lock: &self.speech_lock,
            debounce: &self.debounce,
            registry: &self.registry,
            config: &self.config.interaction,
            now,
        };
        let decision = self.router.pointer_down(at, &view);
        self.apply_press(decision, Press::Pointer, now)
    }

    /// The pointer moved to `(x, y)`.
    pub fn on_pointer_move(&mut self, x: f64, y: f64) -> InputOutcome {
        let now = self.clock.now_ms();
        let to = Position::new(x, y);
        let view = RouterView {
            lock: &self.speech_lock,
            debounce: &self.debounce,
            registry: &self.registry,
            config: &self.config.interaction,
            now,
        };
        match self.router.pointer_move(to, &view) {
            Decision::DragTo { object, to, begins } => {
                if begins {
                    self.movement.cancel(object);
                    debug!(%object, "Held object now dragging");
                }
                self.place(object, to, now);
                InputOutcome::on(InputAction::DragMoved, object)
            }
            Decision::Follow { object, to } => {
                self.move_object_at(object, to, false, now);
                InputOutcome::on(InputAction::Followed, object)
            }
            Decision::CancelHold { timer } => {
                self.timers.cancel(timer);
                debug!(%timer, "Pointer travelled; hold cancelled");
                InputOutcome::bare(InputAction::Ignored)
            }
            _ => InputOutcome::bare(InputAction::Ignored),
        }
    }

    /// The pointer was released at `(x, y)`.
    pub fn on_pointer_up(&mut self, x: f64, y: f64) -> InputOutcome {
        let now = self.clock.now_ms();
        self.debounce.record_input_release();
        let previous = self.router.take_phase();
        let outcome = match previous {
            PointerPhase::Dragging { object } if self.registry.contains(object) => {
                self.place(object, Position::new(x, y), now);
                debug!(%object, x, y, "Drag ended");
                InputOutcome::on(InputAction::DragEnded, object)
            }
            _ => InputOutcome::bare(InputAction::Released),
        };
        self.finish_phase(previous);
        outcome
    }

    // -----------------------------------------------------------------------
    // Keyboard and gamepad input
    // -----------------------------------------------------------------------

    /// A key went down. `code` is the physical key code (`KeyA`, `Digit3`).
    pub fn on_key_down(&mut self, code: &str) -> InputOutcome {
        self.on_press(Press::Key(code))
    }

    /// A key was released.
    pub fn on_key_up(&mut self, code: &str) -> InputOutcome {
        self.debounce.record_input_release();
        debug!(code, "Key released");
        InputOutcome::bare(InputAction::Released)
    }

    /// A gamepad button went down.
    pub fn on_gamepad_button_down(&mut self, index: u32) -> InputOutcome {
        self.on_press(Press::Gamepad(index))
    }

    /// A gamepad button was released.
    pub fn on_gamepad_button_up(&mut self, index: u32) -> InputOutcome {
        self.debounce.record_input_release();
        debug!(button = index, "Gamepad button released");
        InputOutcome::bare(InputAction::Released)
    }

    fn on_press(&mut self, press: Press<'_>) -> InputOutcome {
        let now = self.clock.now_ms();
        let at = self.catalog.random_position(&self.config.viewport);
        let view = RouterView {
            lock: &self.speech_lock,
            debounce: &self.debounce,
            registry: &self.registry,
            config: &self.config.interaction,
            now,
        };
        let decision = self.router.press(at, &view);
        self.apply_press(decision, press, now)
    }

    fn apply_press(&mut self, decision: Decision, press: Press<'_>, now: Millis) -> InputOutcome {
        match decision {
            Decision::StartDrag { object } => {
                self.movement.cancel(object);
                self.set_active(object, true);
                info!(%object, "Drag started");
                InputOutcome::on(InputAction::Dragged, object)
            }
            Decision::Teleport { object, to } => {
                if !self.move_object_at(object, to, true, now) {
                    return InputOutcome::bare(InputAction::Ignored);
                }
                effect("burst", self.ports.effects.burst(to));
                info!(
                    %object,
                    x = to.x,
                    y = to.y,
                    source = ?press.source(),
                    "Speaking object teleported"
                );
                InputOutcome::on(InputAction::Teleported, object)
            }
            Decision::Spawn { at } => {
                let entry = match press {
                    Press::Pointer => self.catalog.for_pointer(),
                    Press::Key(code) => self.catalog.for_key(code),
                    Press::Gamepad(index) => self.catalog.for_gamepad(index),
                };
                let object = self.spawn_object(&entry, at, now);
                if matches!(press, Press::Pointer) && self.registry.contains(object) {
                    let at_ms = now.saturating_add(self.config.interaction.hold_duration_ms);
                    let timer = self.timers.schedule(at_ms, TimerTask::HoldElapsed);
                    self.router.await_spawn_release(object, at, timer);
                    self.refresh_activity(object);
                }
                InputOutcome::on(InputAction::Spawned, object)
            }
            Decision::Debounced { reason } => {
                debug!(?reason, source = ?press.source(), "Press debounced");
                InputOutcome::bare(InputAction::IgnoredDebounce)
            }
            _ => InputOutcome::bare(InputAction::Ignored),
        }
    }

    // -----------------------------------------------------------------------
    // Movement
    // -----------------------------------------------------------------------

    /// Move `object` to `to`, smoothly (tweened over frame ticks) or at
    /// once. Either way the move counts for debounce purposes the moment it
    /// is requested.
    ///
    /// Returns `false` (and logs) if the object does not exist or belongs
    /// to the pointer interaction in progress.
    pub fn move_object_to(&mut self, object: ObjectId, to: Position, smooth: bool) -> bool {
        if self.router.phase().object() == Some(object) {
            warn!(
                %object,
                phase = self.router.phase().label(),
                "Move refused; the pointer owns this object"
            );
            return false;
        }
        let now = self.clock.now_ms();
        self.move_object_at(object, to, smooth, now)
    }

    fn move_object_at(
        &mut self,
        object: ObjectId,
        to: Position,
        smooth: bool,
        now: Millis,
    ) -> bool {
        let Some(from) = self.registry.position(object) else {
            warn!(%object, "Move requested for unknown object");
            return false;
        };
        self.debounce.record_move(now);
        if smooth {
            self.movement.start(object, from, to);
            self.set_active(object, true);
        } else {
            self.movement.cancel(object);
            self.place(object, to, now);
        }
        true
    }

    /// Write a position to the registry and mirror it to the renderer and,
    /// for the speaking object, the tone.
    fn place(&mut self, object: ObjectId, to: Position, now: Millis) {
        if let Err(error) = self.registry.set_position(object, to, now) {
            warn!(error = %error, "Position update dropped");
            return;
        }
        effect("move_visual", self.ports.renderer.move_visual(object, to));
        if self.speech_lock.is_held_by(object) {
            effect("update_position", self.ports.audio.update_position(object, to));
        }
    }

    // -----------------------------------------------------------------------
    // Frame tick
    // -----------------------------------------------------------------------

    /// Run one frame: fire due timers, advance tweens, sweep idle objects.
    pub fn tick(&mut self) -> TickReport {
        let now = self.clock.now_ms();
        self.frame = self.frame.saturating_add(1);
        let mut report = TickReport {
            frame: self.frame,
            ..TickReport::default()
        };

        report.timers_fired = self.fire_timers_at(now);

        for step in self.movement.advance(self.config.interaction.lerp_speed) {
            if !self.registry.contains(step.object) {
                warn!(object = %step.object, "Tween advanced for a missing object");
                continue;
            }
            self.place(step.object, step.position, now);
            report.moved = report.moved.saturating_add(1);
            if step.finished {
                report.arrived = report.arrived.saturating_add(1);
                self.refresh_activity(step.object);
            }
        }

        report.removed = self.sweep_idle(now);
        report
    }

    /// Fire every timer due by now without advancing tweens.
    ///
    /// Hosts that deliver input with finer timing than their frame rate call
    /// this before each event, so a hold threshold that elapsed between two
    /// frames is seen before the event that follows it. Returns how many
    /// timers fired.
    pub fn fire_due_timers(&mut self) -> usize {
        let now = self.clock.now_ms();
        self.fire_timers_at(now)
    }

    fn fire_timers_at(&mut self, now: Millis) -> usize {
        if self.timers.next_deadline().is_none_or(|at| at > now) {
            return 0;
        }
        let mut fired = 0_usize;
        for (timer, task) in self.timers.drain_due(now) {
            fired = fired.saturating_add(1);
            match task {
                TimerTask::HoldElapsed => {
                    if self.router.hold_elapsed(timer).is_none() {
                        debug!(%timer, "Hold timer fired for a finished press");
                    }
                }
            }
        }
        fired
    }

    // -----------------------------------------------------------------------
    // Narration
    // -----------------------------------------------------------------------

    /// The speech port finished speaking `token`.
    ///
    /// Releases the speech lock if `token` is the current narration.
    /// Completions from cancelled or superseded narrations are discarded and
    /// return `false`.
    pub fn on_narration_done(&mut self, token: NarrationToken) -> bool {
        if !self.narration.complete(token) {
            debug!(
                object = %token.object,
                generation = token.generation,
                "Stale narration completion discarded"
            );
            return false;
        }
        self.end_narration(token.object);
        info!(object = %token.object, "Narration finished");
        true
    }

    /// Cancel the narration in flight, releasing the lock exactly once.
    ///
    /// Returns `false` if nothing was being narrated.
    pub fn cancel_narration(&mut self) -> bool {
        let Some(token) = self.narration.cancel() else {
            return false;
        };
        effect("cancel", self.ports.speech.cancel());
        self.end_narration(token.object);
        info!(object = %token.object, "Narration cancelled");
        true
    }

    fn end_narration(&mut self, object: ObjectId) {
        if self.speech_lock.is_held_by(object) {
            self.speech_lock.release();
        }
        effect("stop", self.ports.audio.stop(object));
        self.refresh_activity(object);
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    fn spawn_object(&mut self, entry: &CatalogEntry, at: Position, now: Millis) -> ObjectId {
        self.make_room();
        self.debounce.record_spawn(now);
        let object = self
            .registry
            .spawn(entry.kind, &entry.symbol, &entry.name, at, now);
        if let Some(previous) = self.speech_lock.lock(object) {
            warn!(%previous, "Spawn superseded a lock that was still held");
        }
        let token = self.narration.begin(object);

        if let Some(visual) = self.registry.get(object) {
            effect("spawn_visual", self.ports.renderer.spawn_visual(visual));
        }
        effect("start_tone", self.ports.audio.start_tone(object, at));
        effect("burst", self.ports.effects.burst(at));
        info!(
            %object,
            kind = %entry.kind,
            name = %entry.name,
            x = at.x,
            y = at.y,
            "Object spawned"
        );

        if !effect("speak", self.ports.speech.speak(&entry.name, token)) {
            // No speech backend: the narration is over before it started.
            self.narration.complete(token);
            self.end_narration(object);
        }
        object
    }

    /// Keep the live object count under `cleanup.max_objects` by evicting the
    /// oldest inactive object.
    fn make_room(&mut self) {
        let cap = self.config.cleanup.max_objects;
        if cap == 0 || self.registry.len() < cap {
            return;
        }
        match self.registry.oldest_inactive() {
            Some(oldest) => {
                debug!(object = %oldest, cap, "Object cap reached; evicting oldest");
                self.destroy_object(oldest);
            }
            None => warn!(cap, "Object cap reached but every object is active"),
        }
    }

    fn sweep_idle(&mut self, now: Millis) -> Vec<ObjectId> {
        let idle_ms = self.config.cleanup.idle_ms;
        if idle_ms == 0 {
            return Vec::new();
        }
        let idle = self.registry.idle_objects(now, idle_ms);
        for &object in &idle {
            debug!(%object, idle_ms, "Removing idle object");
            self.destroy_object(object);
        }
        idle
    }

    /// Add an object built by an external collaborator (e.g. a restored
    /// session).
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] if the id is already live.
    pub fn register_object(&mut self, object: GameObject) -> Result<ObjectId, RegistryError> {
        let id = self.registry.insert(object)?;
        self.refresh_activity(id);
        if let Some(visual) = self.registry.get(id) {
            effect("spawn_visual", self.ports.renderer.spawn_visual(visual));
        }
        info!(object = %id, "Object registered");
        Ok(id)
    }

    /// Remove an object and everything attached to it: its tween, its
    /// narration if it is speaking, and any pointer interaction on it.
    ///
    /// Unknown ids are logged and ignored; returns whether anything was
    /// removed.
    pub fn destroy_object(&mut self, object: ObjectId) -> bool {
        if let Err(error) = self.registry.remove(object) {
            warn!(error = %error, "Destroy requested for unknown object");
            return false;
        }
        self.movement.cancel(object);

        if self.router.phase().object() == Some(object) {
            let phase = self.router.take_phase();
            self.finish_phase(phase);
        }

        if self.speech_lock.is_held_by(object) {
            self.narration.cancel();
            effect("cancel", self.ports.speech.cancel());
            self.speech_lock.release();
            effect("stop", self.ports.audio.stop(object));
        }

        effect("remove_visual", self.ports.renderer.remove_visual(object));
        info!(%object, "Object destroyed");
        true
    }

    /// Tidy up after a pointer interaction ends or is interrupted.
    fn finish_phase(&mut self, phase: PointerPhase) {
        if let PointerPhase::AwaitingSpawnRelease {
            hold_timer: Some(timer),
            ..
        } = phase
        {
            self.timers.cancel(timer);
        }
        if let Some(object) = phase.object() {
            self.refresh_activity(object);
        }
    }

    /// Recompute `active` from the lock, tweens, and pointer phase.
    fn refresh_activity(&mut self, object: ObjectId) {
        if !self.registry.contains(object) {
            return;
        }
        let active = self.speech_lock.is_held_by(object)
            || self.movement.is_moving(object)
            || self.router.phase().object() == Some(object);
        self.set_active(object, active);
    }

    fn set_active(&mut self, object: ObjectId, active: bool) {
        if let Err(error) = self.registry.set_active(object, active) {
            warn!(error = %error, "Activity update dropped");
        }
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    /// Live objects.
    pub const fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    /// Speech lock state.
    pub const fn speech_lock(&self) -> &SpeechLock {
        &self.speech_lock
    }

    /// The narration in flight, if any.
    pub const fn current_narration(&self) -> Option<NarrationToken> {
        self.narration.current()
    }

    /// Debounce state.
    pub const fn debounce(&self) -> &DebounceGuard {
        &self.debounce
    }

    /// In-flight tweens.
    pub const fn movement(&self) -> &MovementScheduler {
        &self.movement
    }

    /// Current pointer phase.
    pub const fn phase(&self) -> &PointerPhase {
        self.router.phase()
    }

    /// Active configuration.
    pub const fn config(&self) -> &ToyConfig {
        &self.config
    }

    /// Whether a hold timer is pending.
    pub fn is_timer_pending(&self, timer: TimerHandle) -> bool {
        self.timers.is_pending(timer)
    }
}
