//! Concurrent access through the shared handle.

#![allow(clippy::unwrap_used)]

mod common;

use std::sync::Arc;

use common::{Recorder, test_config};
use smashpad_core::catalog::ObjectCatalog;
use smashpad_core::clock::ManualClock;
use smashpad_core::{InteractionCore, SharedInteractionCore};
use smashpad_types::InputAction;

fn shared(recorder: &Recorder) -> (SharedInteractionCore, ManualClock) {
    let clock = ManualClock::new(1_000);
    let core = InteractionCore::new(
        test_config(),
        Arc::new(clock.clone()),
        ObjectCatalog::seeded(7),
        recorder.ports(),
    )
    .unwrap();
    (SharedInteractionCore::new(core), clock)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn simultaneous_presses_spawn_once() {
    let recorder = Recorder::default();
    let (core, _clock) = shared(&recorder);

    let mut handles = Vec::new();
    for i in 0..16_u32 {
        let core = core.clone();
        handles.push(tokio::spawn(async move {
            let x = f64::from(i).mul_add(70.0, 100.0);
            core.pointer_down(x, 300.0).await
        }));
    }

    let mut spawned = 0;
    for handle in handles {
        match handle.await.unwrap().action {
            InputAction::Spawned => spawned += 1,
            InputAction::IgnoredDebounce | InputAction::Dragged => {}
            other => panic!("unexpected outcome {other}"),
        }
    }
    assert_eq!(spawned, 1);
    assert_eq!(core.lock().await.registry().len(), 1);
}

#[tokio::test]
async fn narration_completion_from_another_task() {
    let recorder = Recorder::default();
    let (core, clock) = shared(&recorder);

    let object = core.pointer_down(200.0, 200.0).await.object.unwrap();
    core.pointer_up(200.0, 200.0).await;
    let token = recorder.last_speech_token().unwrap();

    let speech = core.clone();
    let done = tokio::spawn(async move { speech.narration_done(token).await });
    assert!(done.await.unwrap());
    assert!(!core.lock().await.speech_lock().is_locked());

    clock.advance(250);
    assert_eq!(core.pointer_down(200.0, 200.0).await.action, InputAction::Dragged);
    core.pointer_up(220.0, 200.0).await;
    assert!(core.destroy_object(object).await);
    assert_eq!(core.tick().await.frame, 1);
}

#[tokio::test]
async fn key_and_gamepad_through_the_handle() {
    let recorder = Recorder::default();
    let (core, clock) = shared(&recorder);

    assert_eq!(core.key_down("Digit4").await.action, InputAction::Spawned);
    assert_eq!(core.key_up("Digit4").await.action, InputAction::Released);
    clock.advance(250);
    assert_eq!(
        core.gamepad_button_down(0).await.action,
        InputAction::Teleported
    );
    assert_eq!(core.gamepad_button_up(0).await.action, InputAction::Released);
    assert_eq!(core.pointer_move(1.0, 1.0).await.action, InputAction::Ignored);
}
