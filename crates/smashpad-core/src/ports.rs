//! Outward-facing ports: rendering, tones, speech, and particle effects.
//!
//! The interaction core calls these as observable consequences of its
//! decisions and never reads anything back from them. Every call returns a
//! `Result`, but a failure only ever means "effect skipped": the core logs
//! it through [`effect`] and carries on, so the state machine behaves the
//! same whether the backends work, fail, or are no-ops.

use smashpad_types::{GameObject, NarrationToken, ObjectId, Position};
use tracing::warn;

/// Errors reported by port implementations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// The backend API is not available on this host (e.g. no speech
    /// synthesis in the browser).
    #[error("{port} backend unavailable: {reason}")]
    Unavailable {
        /// Which port failed.
        port: &'static str,
        /// Why it is unavailable.
        reason: String,
    },

    /// The backend accepted the call but failed while running it.
    #[error("{port} backend failed: {message}")]
    Failed {
        /// Which port failed.
        port: &'static str,
        /// Description of the failure.
        message: String,
    },
}

/// Draws objects.
pub trait Renderer: Send {
    /// Show a newly spawned object.
    fn spawn_visual(&mut self, object: &GameObject) -> Result<(), PortError>;

    /// Move an object's visual to `position`.
    fn move_visual(&mut self, object: ObjectId, position: Position) -> Result<(), PortError>;

    /// Remove an object's visual.
    fn remove_visual(&mut self, object: ObjectId) -> Result<(), PortError>;
}

/// Plays a positional tone per speaking object.
pub trait AudioPort: Send {
    /// Start the tone for `object` at `position`.
    fn start_tone(&mut self, object: ObjectId, position: Position) -> Result<(), PortError>;

    /// Move the tone's source to follow the object.
    fn update_position(&mut self, object: ObjectId, position: Position)
    -> Result<(), PortError>;

    /// Stop the tone for `object`.
    fn stop(&mut self, object: ObjectId) -> Result<(), PortError>;
}

/// Text-to-speech.
///
/// `speak` must eventually lead to exactly one call of
/// `InteractionCore::on_narration_done` with the same token, unless the
/// narration is cancelled first. Late completions are harmless: the core
/// discards tokens that are no longer current.
pub trait SpeechPort: Send {
    /// Start speaking `text`.
    fn speak(&mut self, text: &str, token: NarrationToken) -> Result<(), PortError>;

    /// Stop whatever is being spoken.
    fn cancel(&mut self) -> Result<(), PortError>;
}

/// One-shot visual flourishes.
pub trait EffectsPort: Send {
    /// Emit a particle burst at `position`.
    fn burst(&mut self, position: Position) -> Result<(), PortError>;
}

/// A port that does nothing. Implements every port trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPort;

impl Renderer for NoopPort {
    fn spawn_visual(&mut self, _object: &GameObject) -> Result<(), PortError> {
        Ok(())
    }

    fn move_visual(&mut self, _object: ObjectId, _position: Position) -> Result<(), PortError> {
        Ok(())
    }

    fn remove_visual(&mut self, _object: ObjectId) -> Result<(), PortError> {
        Ok(())
    }
}

impl AudioPort for NoopPort {
    fn start_tone(&mut self, _object: ObjectId, _position: Position) -> Result<(), PortError> {
        Ok(())
    }

    fn update_position(
        &mut self,
        _object: ObjectId,
        _position: Position,
    ) -> Result<(), PortError> {
        Ok(())
    }

    fn stop(&mut self, _object: ObjectId) -> Result<(), PortError> {
        Ok(())
    }
}

impl SpeechPort for NoopPort {
    fn speak(&mut self, _text: &str, _token: NarrationToken) -> Result<(), PortError> {
        Ok(())
    }

    fn cancel(&mut self) -> Result<(), PortError> {
        Ok(())
    }
}

impl EffectsPort for NoopPort {
    fn burst(&mut self, _position: Position) -> Result<(), PortError> {
        Ok(())
    }
}

/// The four ports the core drives.
pub struct Ports {
    /// Object visuals.
    pub renderer: Box<dyn Renderer>,
    /// Positional tones.
    pub audio: Box<dyn AudioPort>,
    /// Text-to-speech.
    pub speech: Box<dyn SpeechPort>,
    /// Particle effects.
    pub effects: Box<dyn EffectsPort>,
}

impl Ports {
    /// Bundle four port implementations.
    pub fn new(
        renderer: Box<dyn Renderer>,
        audio: Box<dyn AudioPort>,
        speech: Box<dyn SpeechPort>,
        effects: Box<dyn EffectsPort>,
    ) -> Self {
        Self {
            renderer,
            audio,
            speech,
            effects,
        }
    }

    /// Ports that do nothing.
    pub fn noop() -> Self {
        Self::new(
            Box::new(NoopPort),
            Box::new(NoopPort),
            Box::new(NoopPort),
            Box::new(NoopPort),
        )
    }
}

impl Default for Ports {
    fn default() -> Self {
        Self::noop()
    }
}

impl core::fmt::Debug for Ports {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Ports").finish_non_exhaustive()
    }
}

/// Swallow a port failure, logging it as a skipped effect.
///
/// Returns whether the effect ran.
pub fn effect(operation: &'static str, result: Result<(), PortError>) -> bool {
    match result {
        Ok(()) => true,
        Err(error) => {
            warn!(operation, error = %error, "Port call failed; effect skipped");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_reports_success() {
        assert!(effect("burst", Ok(())));
    }

    #[test]
    fn effect_swallows_failure() {
        let failure = Err(PortError::Unavailable {
            port: "speech",
            reason: "no synthesis voices".to_owned(),
        });
        assert!(!effect("speak", failure));
    }

    #[test]
    fn noop_ports_always_succeed() {
        let mut ports = Ports::noop();
        let id = ObjectId::new();
        let at = Position::new(1.0, 2.0);
        assert!(ports.audio.start_tone(id, at).is_ok());
        assert!(ports.renderer.move_visual(id, at).is_ok());
        assert!(ports.effects.burst(at).is_ok());
        assert!(ports.speech.cancel().is_ok());
    }

    #[test]
    fn port_error_messages_name_the_port() {
        let error = PortError::Failed {
            port: "audio",
            message: "context suspended".to_owned(),
        };
        assert_eq!(error.to_string(), "audio backend failed: context suspended");
    }
}
