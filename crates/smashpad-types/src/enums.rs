//! Enumeration types shared between the interaction core and its hosts.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Objects
// ---------------------------------------------------------------------------

/// What an on-screen object depicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ObjectKind {
    /// A single emoji glyph (animal, food, vehicle, ...).
    Emoji,
    /// A coloured geometric shape.
    Shape,
    /// An uppercase Latin letter.
    Letter,
    /// A single decimal digit.
    Number,
}

impl ObjectKind {
    /// All kinds, in catalog order.
    pub const ALL: [Self; 4] = [Self::Emoji, Self::Shape, Self::Letter, Self::Number];
}

impl core::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            Self::Emoji => "emoji",
            Self::Shape => "shape",
            Self::Letter => "letter",
            Self::Number => "number",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// The device family an input event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum InputSource {
    /// Mouse, pen, or touch.
    Pointer,
    /// Physical or on-screen keyboard.
    Keyboard,
    /// Gamepad buttons.
    Gamepad,
}

/// The action the router resolved for one raw input event.
///
/// Every input entry point returns exactly one of these so hosts and tests
/// can observe how an event was arbitrated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum InputAction {
    /// A new object was created and narration started on it.
    Spawned,
    /// The speaking object was moved to the input location.
    Teleported,
    /// A drag started on the object under the pointer.
    Dragged,
    /// The dragged object followed the pointer.
    DragMoved,
    /// The drag finished because the pointer was released.
    DragEnded,
    /// The speaking object followed a held pointer.
    Followed,
    /// The input was released with no drag in progress.
    Released,
    /// The event fell inside a cooldown window and was suppressed.
    IgnoredDebounce,
    /// The event had nothing to act on.
    Ignored,
}

impl InputAction {
    /// Whether the event changed anything in the object registry.
    pub const fn is_effective(self) -> bool {
        !matches!(self, Self::Released | Self::IgnoredDebounce | Self::Ignored)
    }
}

impl core::fmt::Display for InputAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            Self::Spawned => "spawned",
            Self::Teleported => "teleported",
            Self::Dragged => "dragged",
            Self::DragMoved => "drag_moved",
            Self::DragEnded => "drag_ended",
            Self::Followed => "followed",
            Self::Released => "released",
            Self::IgnoredDebounce => "ignored_debounce",
            Self::Ignored => "ignored",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_serializes_snake_case() {
        let json = serde_json::to_string(&InputAction::IgnoredDebounce).ok();
        assert_eq!(json.as_deref(), Some("\"ignored_debounce\""));
    }

    #[test]
    fn action_display_matches_serde() {
        for action in [
            InputAction::Spawned,
            InputAction::Teleported,
            InputAction::DragMoved,
            InputAction::IgnoredDebounce,
        ] {
            let json = serde_json::to_string(&action).unwrap_or_default();
            assert_eq!(json.trim_matches('"'), action.to_string());
        }
    }

    #[test]
    fn ignored_actions_are_not_effective() {
        assert!(InputAction::Spawned.is_effective());
        assert!(InputAction::Followed.is_effective());
        assert!(!InputAction::IgnoredDebounce.is_effective());
        assert!(!InputAction::Released.is_effective());
    }
}
