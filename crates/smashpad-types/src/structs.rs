//! Core data structs: positions, on-screen objects, narration tokens, and
//! input outcomes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{InputAction, ObjectKind};
use crate::ids::ObjectId;

/// A point in viewport pixel coordinates (origin top-left).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Position {
    /// Horizontal coordinate in pixels.
    pub x: f64,
    /// Vertical coordinate in pixels.
    pub y: f64,
}

impl Position {
    /// Create a position from its coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    pub fn distance_to(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Linear interpolation from `self` towards `target`.
    ///
    /// `t` is not clamped; callers snap to the target themselves when the
    /// interpolation completes.
    pub fn lerp(self, target: Self, t: f64) -> Self {
        Self {
            x: (target.x - self.x).mul_add(t, self.x),
            y: (target.y - self.y).mul_add(t, self.y),
        }
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// A live on-screen object.
///
/// Owned exclusively by the object registry in `smashpad-core`; hosts only
/// ever see copies of it (render payloads, snapshots).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameObject {
    /// Stable identifier.
    pub id: ObjectId,
    /// What the object depicts.
    pub kind: ObjectKind,
    /// The glyph or label drawn on screen (e.g. "🐶", "A", "7").
    pub symbol: String,
    /// The phrase spoken when the object is narrated (e.g. "puppy").
    pub name: String,
    /// Authoritative position in viewport pixels.
    pub position: Position,
    /// Whether the object is currently speaking, dragged, or moving.
    pub active: bool,
    /// Monotonic timestamp (ms) of the last spawn, move, or drag.
    #[ts(type = "number")]
    pub last_touched_ms: u64,
    /// Wall-clock creation time, for diagnostics.
    pub created_at: DateTime<Utc>,
}

/// Identifies one narration sequence.
///
/// The core hands a token to the speech port with every `speak` call; the
/// host hands it back when speech finishes. Tokens from superseded or
/// cancelled narrations are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NarrationToken {
    /// The object being narrated.
    pub object: ObjectId,
    /// Monotonic narration generation.
    #[ts(type = "number")]
    pub generation: u64,
}

/// The resolved result of one input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct InputOutcome {
    /// What the router decided.
    pub action: InputAction,
    /// The object the action applied to, if any.
    pub object: Option<ObjectId>,
}

impl InputOutcome {
    /// An outcome that touched a specific object.
    pub const fn on(action: InputAction, object: ObjectId) -> Self {
        Self {
            action,
            object: Some(object),
        }
    }

    /// An outcome with no object attached.
    pub const fn bare(action: InputAction) -> Self {
        Self {
            action,
            object: None,
        }
    }
}
