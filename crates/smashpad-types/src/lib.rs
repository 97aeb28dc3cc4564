//! Shared type definitions for the Smashpad interaction core.
//!
//! Types defined here are used by the core, the headless engine, and (via
//! `ts-rs`) the browser front end that renders objects and plays audio.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for object identifiers
//! - [`enums`] -- Object kinds, input sources, and resolved input actions
//! - [`structs`] -- Positions, on-screen objects, narration tokens, outcomes

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{InputAction, InputSource, ObjectKind};
pub use ids::ObjectId;
pub use structs::{GameObject, InputOutcome, NarrationToken, Position};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // Files are written to `bindings/` relative to the crate root.
        use ts_rs::TS;

        let _ = crate::ids::ObjectId::export_all();
        let _ = crate::enums::ObjectKind::export_all();
        let _ = crate::enums::InputSource::export_all();
        let _ = crate::enums::InputAction::export_all();
        let _ = crate::structs::Position::export_all();
        let _ = crate::structs::GameObject::export_all();
        let _ = crate::structs::NarrationToken::export_all();
        let _ = crate::structs::InputOutcome::export_all();
    }
}
