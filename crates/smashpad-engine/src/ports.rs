//! Port adapters for the headless engine.
//!
//! Rendering, tones, and effects become `tracing` events. Speech is
//! simulated: every utterance finishes after a duration proportional to its
//! length, and the replay loop hands finished tokens back to the core.

use std::sync::{Arc, Mutex, PoisonError};

use smashpad_core::clock::{Clock, ManualClock, Millis};
use smashpad_core::ports::{AudioPort, EffectsPort, PortError, Ports, Renderer, SpeechPort};
use smashpad_types::{GameObject, NarrationToken, ObjectId, Position};
use tracing::{debug, info};

/// Fixed lead-in before the first word.
const SPEECH_BASE_MS: Millis = 300;

/// Per-character speaking time.
const SPEECH_MS_PER_CHAR: Millis = 80;

/// How long the simulated voice takes to say `text`.
pub fn speech_duration_ms(text: &str) -> Millis {
    let chars = u64::try_from(text.chars().count()).unwrap_or(u64::MAX);
    SPEECH_BASE_MS.saturating_add(chars.saturating_mul(SPEECH_MS_PER_CHAR))
}

/// Logs renderer, audio, and effects calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogPort;

impl Renderer for LogPort {
    fn spawn_visual(&mut self, object: &GameObject) -> Result<(), PortError> {
        info!(
            object = %object.id,
            kind = %object.kind,
            symbol = %object.symbol,
            at = %object.position,
            "render: spawn"
        );
        Ok(())
    }

    fn move_visual(&mut self, object: ObjectId, position: Position) -> Result<(), PortError> {
        debug!(%object, at = %position, "render: move");
        Ok(())
    }

    fn remove_visual(&mut self, object: ObjectId) -> Result<(), PortError> {
        info!(%object, "render: remove");
        Ok(())
    }
}

impl AudioPort for LogPort {
    fn start_tone(&mut self, object: ObjectId, position: Position) -> Result<(), PortError> {
        debug!(%object, at = %position, "audio: tone on");
        Ok(())
    }

    fn update_position(
        &mut self,
        object: ObjectId,
        position: Position,
    ) -> Result<(), PortError> {
        debug!(%object, at = %position, "audio: tone moved");
        Ok(())
    }

    fn stop(&mut self, object: ObjectId) -> Result<(), PortError> {
        debug!(%object, "audio: tone off");
        Ok(())
    }
}

impl EffectsPort for LogPort {
    fn burst(&mut self, position: Position) -> Result<(), PortError> {
        debug!(at = %position, "effects: burst");
        Ok(())
    }
}

/// An utterance in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Utterance {
    token: NarrationToken,
    done_at: Millis,
}

/// Utterances shared between the speech port and the replay loop.
#[derive(Debug, Clone, Default)]
pub struct SpeechQueue {
    pending: Arc<Mutex<Vec<Utterance>>>,
}

impl SpeechQueue {
    /// Remove and return every token whose utterance has finished by `now`.
    pub fn take_finished(&self, now: Millis) -> Vec<NarrationToken> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let mut finished = Vec::new();
        pending.retain(|u| {
            if u.done_at <= now {
                finished.push(u.token);
                false
            } else {
                true
            }
        });
        finished
    }

    /// Whether anything is still being spoken.
    pub fn is_idle(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    fn push(&self, utterance: Utterance) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(utterance);
    }

    fn clear(&self) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

/// Speech port that "speaks" on the replay clock.
#[derive(Debug, Clone)]
pub struct SimulatedSpeech {
    clock: ManualClock,
    queue: SpeechQueue,
}

impl SimulatedSpeech {
    /// Speech timed against `clock`, reporting into `queue`.
    pub const fn new(clock: ManualClock, queue: SpeechQueue) -> Self {
        Self { clock, queue }
    }
}

impl SpeechPort for SimulatedSpeech {
    fn speak(&mut self, text: &str, token: NarrationToken) -> Result<(), PortError> {
        let duration = speech_duration_ms(text);
        let done_at = self.clock.now_ms().saturating_add(duration);
        info!(object = %token.object, text, duration_ms = duration, "speech: say");
        self.queue.push(Utterance { token, done_at });
        Ok(())
    }

    fn cancel(&mut self) -> Result<(), PortError> {
        info!("speech: cancel");
        self.queue.clear();
        Ok(())
    }
}

/// Build the engine's port set.
pub fn engine_ports(clock: &ManualClock, queue: &SpeechQueue) -> Ports {
    Ports::new(
        Box::new(LogPort),
        Box::new(LogPort),
        Box::new(SimulatedSpeech::new(clock.clone(), queue.clone())),
        Box::new(LogPort),
    )
}
