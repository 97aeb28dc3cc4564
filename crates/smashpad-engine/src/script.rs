//! Input scripts: one timestamped event per line, as JSON.
//!
//! ```text
//! {"at_ms": 0,   "event": {"type": "pointer_down", "x": 100.0, "y": 100.0}}
//! {"at_ms": 40,  "event": {"type": "pointer_up", "x": 100.0, "y": 100.0}}
//! {"at_ms": 400, "event": {"type": "key_down", "code": "KeyA"}}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. Events are replayed
//! in `at_ms` order; ties keep their file order.

use serde::Deserialize;
use smashpad_core::InteractionCore;
use smashpad_types::InputOutcome;

use crate::error::EngineError;

/// One raw input event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// Pointer pressed.
    PointerDown {
        /// Viewport x.
        x: f64,
        /// Viewport y.
        y: f64,
    },
    /// Pointer moved.
    PointerMove {
        /// Viewport x.
        x: f64,
        /// Viewport y.
        y: f64,
    },
    /// Pointer released.
    PointerUp {
        /// Viewport x.
        x: f64,
        /// Viewport y.
        y: f64,
    },
    /// Key pressed.
    KeyDown {
        /// Physical key code, e.g. `KeyA`.
        code: String,
    },
    /// Key released.
    KeyUp {
        /// Physical key code.
        code: String,
    },
    /// Gamepad button pressed.
    GamepadDown {
        /// Button index.
        button: u32,
    },
    /// Gamepad button released.
    GamepadUp {
        /// Button index.
        button: u32,
    },
}

impl InputEvent {
    /// Feed the event to the core.
    pub fn apply(&self, core: &mut InteractionCore) -> InputOutcome {
        match self {
            Self::PointerDown { x, y } => core.on_pointer_down(*x, *y),
            Self::PointerMove { x, y } => core.on_pointer_move(*x, *y),
            Self::PointerUp { x, y } => core.on_pointer_up(*x, *y),
            Self::KeyDown { code } => core.on_key_down(code),
            Self::KeyUp { code } => core.on_key_up(code),
            Self::GamepadDown { button } => core.on_gamepad_button_down(*button),
            Self::GamepadUp { button } => core.on_gamepad_button_up(*button),
        }
    }

    /// Short label for logs.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::PointerDown { .. } => "pointer_down",
            Self::PointerMove { .. } => "pointer_move",
            Self::PointerUp { .. } => "pointer_up",
            Self::KeyDown { .. } => "key_down",
            Self::KeyUp { .. } => "key_up",
            Self::GamepadDown { .. } => "gamepad_down",
            Self::GamepadUp { .. } => "gamepad_up",
        }
    }
}

/// A timestamped event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptEvent {
    /// Milliseconds from the start of the replay.
    pub at_ms: u64,
    /// The event.
    pub event: InputEvent,
}

/// Parse a whole script.
pub fn parse_script(text: &str) -> Result<Vec<ScriptEvent>, EngineError> {
    let mut events = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let event: ScriptEvent =
            serde_json::from_str(line).map_err(|source| EngineError::Script {
                line: index.saturating_add(1),
                source,
            })?;
        events.push(event);
    }
    events.sort_by_key(|e| e.at_ms);
    Ok(events)
}
