//! Shared fixtures for interaction tests: recording ports and a harness
//! around a core driven by a manual clock.

#![allow(clippy::unwrap_used, dead_code)]

use std::sync::{Arc, Mutex};

use smashpad_core::InteractionCore;
use smashpad_core::catalog::ObjectCatalog;
use smashpad_core::clock::ManualClock;
use smashpad_core::config::ToyConfig;
use smashpad_core::ports::{AudioPort, EffectsPort, PortError, Ports, Renderer, SpeechPort};
use smashpad_types::{GameObject, NarrationToken, ObjectId, Position};

/// One observed port call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SpawnVisual(ObjectId),
    MoveVisual(ObjectId, Position),
    RemoveVisual(ObjectId),
    StartTone(ObjectId, Position),
    UpdateTone(ObjectId, Position),
    StopTone(ObjectId),
    Speak(String, NarrationToken),
    CancelSpeech,
    Burst(Position),
}

/// Implements every port and records the calls it receives.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<Call>>>,
    fail_speech: bool,
    fail_audio: bool,
}

impl Recorder {
    pub fn failing_speech() -> Self {
        Self {
            fail_speech: true,
            ..Self::default()
        }
    }

    pub fn failing_audio() -> Self {
        Self {
            fail_audio: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    pub fn last_speech_token(&self) -> Option<NarrationToken> {
        self.calls.lock().unwrap().iter().rev().find_map(|c| match c {
            Call::Speak(_, token) => Some(*token),
            _ => None,
        })
    }

    fn push(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn ports(&self) -> Ports {
        Ports::new(
            Box::new(self.clone()),
            Box::new(self.clone()),
            Box::new(self.clone()),
            Box::new(self.clone()),
        )
    }
}

impl Renderer for Recorder {
    fn spawn_visual(&mut self, object: &GameObject) -> Result<(), PortError> {
        self.push(Call::SpawnVisual(object.id));
        Ok(())
    }

    fn move_visual(&mut self, object: ObjectId, position: Position) -> Result<(), PortError> {
        self.push(Call::MoveVisual(object, position));
        Ok(())
    }

    fn remove_visual(&mut self, object: ObjectId) -> Result<(), PortError> {
        self.push(Call::RemoveVisual(object));
        Ok(())
    }
}

impl AudioPort for Recorder {
    fn start_tone(&mut self, object: ObjectId, position: Position) -> Result<(), PortError> {
        if self.fail_audio {
            return Err(PortError::Unavailable {
                port: "audio",
                reason: "no audio context".to_owned(),
            });
        }
        self.push(Call::StartTone(object, position));
        Ok(())
    }

    fn update_position(
        &mut self,
        object: ObjectId,
        position: Position,
    ) -> Result<(), PortError> {
        if self.fail_audio {
            return Err(PortError::Unavailable {
                port: "audio",
                reason: "no audio context".to_owned(),
            });
        }
        self.push(Call::UpdateTone(object, position));
        Ok(())
    }

    fn stop(&mut self, object: ObjectId) -> Result<(), PortError> {
        if self.fail_audio {
            return Err(PortError::Unavailable {
                port: "audio",
                reason: "no audio context".to_owned(),
            });
        }
        self.push(Call::StopTone(object));
        Ok(())
    }
}

impl SpeechPort for Recorder {
    fn speak(&mut self, text: &str, token: NarrationToken) -> Result<(), PortError> {
        if self.fail_speech {
            return Err(PortError::Unavailable {
                port: "speech",
                reason: "speechSynthesis missing".to_owned(),
            });
        }
        self.push(Call::Speak(text.to_owned(), token));
        Ok(())
    }

    fn cancel(&mut self) -> Result<(), PortError> {
        self.push(Call::CancelSpeech);
        Ok(())
    }
}

impl EffectsPort for Recorder {
    fn burst(&mut self, position: Position) -> Result<(), PortError> {
        self.push(Call::Burst(position));
        Ok(())
    }
}

/// A core on a manual clock with recording ports.
pub struct Harness {
    pub core: InteractionCore,
    pub clock: ManualClock,
    pub recorder: Recorder,
}

/// Default configuration with the idle sweep turned off so long test
/// timelines do not lose objects.
pub fn test_config() -> ToyConfig {
    let mut config = ToyConfig::default();
    config.cleanup.idle_ms = 0;
    config
}

impl Harness {
    pub fn new() -> Self {
        Self::with(test_config(), Recorder::default())
    }

    pub fn with(config: ToyConfig, recorder: Recorder) -> Self {
        let clock = ManualClock::new(1_000);
        let core = InteractionCore::new(
            config,
            Arc::new(clock.clone()),
            ObjectCatalog::seeded(42),
            recorder.ports(),
        )
        .unwrap();
        Self {
            core,
            clock,
            recorder,
        }
    }

    pub fn advance(&self, ms: u64) {
        self.clock.advance(ms);
    }

    pub fn ticks(&mut self, n: usize) {
        for _ in 0..n {
            self.core.tick();
        }
    }

    pub fn position(&self, object: ObjectId) -> Position {
        self.core.registry().position(object).unwrap()
    }

    /// Finish the narration currently in flight.
    pub fn finish_narration(&mut self) -> bool {
        let token = self.core.current_narration().unwrap();
        self.core.on_narration_done(token)
    }

    /// Spawn with a pointer click (down + up) and finish its narration,
    /// leaving the core unlocked. Advances past the cooldown afterwards.
    pub fn spawn_quiet(&mut self, x: f64, y: f64) -> ObjectId {
        let outcome = self.core.on_pointer_down(x, y);
        let object = outcome.object.unwrap();
        self.core.on_pointer_up(x, y);
        assert!(self.finish_narration());
        self.advance(300);
        object
    }
}
