//! The frame loop that replays a script through the interaction core.
//!
//! Time is a [`ManualClock`] advanced in 16 ms frames. Each frame
//! dispatches the script events due by then, hands finished utterances
//! back to the core, and runs one core tick. Every event runs with the
//! clock at its own timestamp, after the utterances and timers that
//! finished by that instant, so sub-frame ordering matches a live host. The replay ends once the script is exhausted
//! and the core has settled: nothing being spoken, nothing in motion.

use std::collections::BTreeMap;
use std::time::Duration;

use smashpad_core::InteractionCore;
use smashpad_core::clock::{Clock, ManualClock, Millis};
use tracing::{debug, info, warn};

use crate::ports::SpeechQueue;
use crate::script::ScriptEvent;

/// Frame length.
pub const FRAME_MS: Millis = 16;

/// Why the replay stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayEndReason {
    /// Every event ran and the core settled.
    Settled,
    /// The core was still busy when the settle allowance ran out.
    SettleTimeout,
}

/// Replay options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayOptions {
    /// Pace frames against the wall clock.
    pub realtime: bool,
    /// How long to keep ticking after the last event while the core is
    /// still busy.
    pub settle_ms: Millis,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            realtime: false,
            settle_ms: 30_000,
        }
    }
}

/// What a replay did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayResult {
    /// Why it stopped.
    pub end_reason: ReplayEndReason,
    /// Frames ticked.
    pub frames: u64,
    /// Events dispatched.
    pub events: usize,
    /// Events that changed the object registry.
    pub effective: usize,
    /// Outcome counts keyed by action name.
    pub actions: BTreeMap<String, usize>,
    /// Narrations that completed and released the lock.
    pub narrations_completed: usize,
    /// Objects alive at the end.
    pub objects_remaining: usize,
    /// Replay clock at the end.
    pub ended_at_ms: Millis,
}

impl ReplayResult {
    /// How many events resolved to `action` (by its snake-case name).
    pub fn count(&self, action: &str) -> usize {
        self.actions.get(action).copied().unwrap_or(0)
    }
}

/// Replay `events` through `core`.
///
/// `clock` must be the clock the core was built with, and `speech` the
/// queue its speech port reports into.
pub async fn run_replay(
    core: &mut InteractionCore,
    clock: &ManualClock,
    speech: &SpeechQueue,
    events: &[ScriptEvent],
    options: ReplayOptions,
) -> ReplayResult {
    let start = clock.now_ms();
    let last_event = events.last().map_or(start, |e| e.at_ms.max(start));
    let deadline = last_event.saturating_add(options.settle_ms);

    info!(
        events = events.len(),
        realtime = options.realtime,
        settle_ms = options.settle_ms,
        "Replay starting"
    );

    let mut interval = options
        .realtime
        .then(|| tokio::time::interval(Duration::from_millis(FRAME_MS)));

    let mut result = ReplayResult {
        end_reason: ReplayEndReason::Settled,
        frames: 0,
        events: 0,
        effective: 0,
        actions: BTreeMap::new(),
        narrations_completed: 0,
        objects_remaining: 0,
        ended_at_ms: start,
    };
    let mut next = 0_usize;
    let mut frame_at = start;

    loop {
        if let Some(interval) = interval.as_mut() {
            interval.tick().await;
        }

        while let Some(scripted) = events.get(next)
            && scripted.at_ms <= frame_at
        {
            clock.set(scripted.at_ms);
            result.narrations_completed = result
                .narrations_completed
                .saturating_add(complete_finished(core, speech, scripted.at_ms));
            core.fire_due_timers();

            let outcome = scripted.event.apply(core);
            info!(
                at_ms = scripted.at_ms,
                event = scripted.event.label(),
                action = %outcome.action,
                object = ?outcome.object,
                "Event resolved"
            );
            let count = result.actions.entry(outcome.action.to_string()).or_insert(0);
            *count = count.saturating_add(1);
            if outcome.action.is_effective() {
                result.effective = result.effective.saturating_add(1);
            }
            result.events = result.events.saturating_add(1);
            next = next.saturating_add(1);
        }

        clock.set(frame_at);
        result.narrations_completed = result
            .narrations_completed
            .saturating_add(complete_finished(core, speech, frame_at));

        let report = core.tick();
        result.frames = result.frames.saturating_add(1);
        if report.arrived > 0 || !report.removed.is_empty() {
            debug!(
                frame = report.frame,
                arrived = report.arrived,
                removed = report.removed.len(),
                "Frame"
            );
        }

        let script_done = next >= events.len();
        if script_done && speech.is_idle() && core.movement().is_empty() {
            break;
        }
        if frame_at >= deadline {
            warn!(at_ms = frame_at, "Core still busy at end of settle time");
            result.end_reason = ReplayEndReason::SettleTimeout;
            break;
        }
        frame_at = frame_at.saturating_add(FRAME_MS);
    }

    result.objects_remaining = core.registry().len();
    result.ended_at_ms = frame_at;
    result
}

/// Hand utterances finished by `now` back to the core. Returns how many
/// released the lock.
fn complete_finished(core: &mut InteractionCore, speech: &SpeechQueue, now: Millis) -> usize {
    speech
        .take_finished(now)
        .into_iter()
        .filter(|&token| core.on_narration_done(token))
        .count()
}

/// Log the end-of-replay summary.
pub fn log_replay_end(result: &ReplayResult) {
    info!(
        reason = ?result.end_reason,
        frames = result.frames,
        events = result.events,
        effective = result.effective,
        spawned = result.count("spawned"),
        debounced = result.count("ignored_debounce"),
        narrations_completed = result.narrations_completed,
        objects_remaining = result.objects_remaining,
        ended_at_ms = result.ended_at_ms,
        "Replay ended"
    );
    for (action, count) in &result.actions {
        info!(action, count, "Outcome count");
    }
}
