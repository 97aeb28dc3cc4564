//! Input arbitration core for the Smashpad toy.
//!
//! Pointer, keyboard, and gamepad input spawns, moves, and narrates
//! on-screen objects. This crate decides, for every raw input event,
//! whether it spawns a new object, teleports the object currently being
//! narrated, drags an existing object, or is ignored, while narration,
//! tweened movement, and cooldown windows run alongside.
//!
//! # Modules
//!
//! - [`clock`] -- Monotonic millisecond clocks (system and manual).
//! - [`config`] -- Configuration loading from `smashpad-config.yaml`.
//! - [`speech_lock`] -- Which object owns narration.
//! - [`narration`] -- Generation tokens that discard stale completions.
//! - [`debounce`] -- Post-spawn and post-movement cooldown windows.
//! - [`timer`] -- Cancellable tasks fired from the frame tick.
//! - [`registry`] -- Live objects, positions, and hit testing.
//! - [`movement`] -- Per-object tweens advanced once per frame.
//! - [`catalog`] -- What to spawn for each input, and where.
//! - [`ports`] -- Renderer, audio, speech, and effects ports.
//! - [`router`] -- The pointer state machine and press classification.
//! - [`interaction`] -- [`InteractionCore`], the facade hosts drive.
//! - [`shared`] -- [`SharedInteractionCore`], a mutex-guarded handle.
//!
//! [`InteractionCore`]: interaction::InteractionCore
//! [`SharedInteractionCore`]: shared::SharedInteractionCore

pub mod catalog;
pub mod clock;
pub mod config;
pub mod debounce;
pub mod interaction;
pub mod movement;
pub mod narration;
pub mod ports;
pub mod registry;
pub mod router;
pub mod shared;
pub mod speech_lock;
pub mod timer;

pub use interaction::{InteractionCore, TickReport};
pub use shared::SharedInteractionCore;
