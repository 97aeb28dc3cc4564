//! The speech lock: which object, if any, currently owns narration.
//!
//! While an object is locked, pointer-downs on empty space move that object
//! instead of spawning a new one. The lock is pure state; the caller talks
//! to the speech port separately.

use smashpad_types::ObjectId;

/// Mutual-exclusion marker binding narration to a single object.
///
/// The owner is stored as an [`Option`], so "speaking with no owner" is not
/// representable and at most one object can be locked at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpeechLock {
    speaking: Option<ObjectId>,
}

impl SpeechLock {
    /// Create an unlocked speech lock.
    pub const fn new() -> Self {
        Self { speaking: None }
    }

    /// Lock narration onto `object`.
    ///
    /// Locking while already locked overwrites the previous owner: a new
    /// narration always supersedes the old one. Returns the superseded
    /// owner, if any.
    pub const fn lock(&mut self, object: ObjectId) -> Option<ObjectId> {
        self.speaking.replace(object)
    }

    /// Clear the lock, returning the object that held it.
    pub const fn release(&mut self) -> Option<ObjectId> {
        self.speaking.take()
    }

    /// Whether any object is currently narrating.
    pub const fn is_locked(&self) -> bool {
        self.speaking.is_some()
    }

    /// The object currently narrating.
    pub const fn current_object_id(&self) -> Option<ObjectId> {
        self.speaking
    }

    /// Whether `object` is the current owner.
    pub fn is_held_by(&self, object: ObjectId) -> bool {
        self.speaking == Some(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unlocked() {
        let lock = SpeechLock::new();
        assert!(!lock.is_locked());
        assert_eq!(lock.current_object_id(), None);
    }

    #[test]
    fn lock_and_release() {
        let mut lock = SpeechLock::new();
        let id = ObjectId::new();
        assert_eq!(lock.lock(id), None);
        assert!(lock.is_locked());
        assert!(lock.is_held_by(id));
        assert_eq!(lock.release(), Some(id));
        assert!(!lock.is_locked());
    }

    #[test]
    fn relock_supersedes_previous_owner() {
        let mut lock = SpeechLock::new();
        let first = ObjectId::new();
        let second = ObjectId::new();
        lock.lock(first);
        assert_eq!(lock.lock(second), Some(first));
        assert_eq!(lock.current_object_id(), Some(second));
        assert!(!lock.is_held_by(first));
    }

    #[test]
    fn double_release_is_harmless() {
        let mut lock = SpeechLock::new();
        lock.lock(ObjectId::new());
        assert!(lock.release().is_some());
        assert_eq!(lock.release(), None);
    }
}
