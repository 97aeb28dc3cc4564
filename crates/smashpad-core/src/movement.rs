//! Smooth movement: per-object linear tweens advanced once per frame.
//!
//! Progress advances by a fixed step per tick (`lerp_speed`), not by
//! elapsed time, so animation speed follows the host's frame rate. A tween
//! that reaches the end snaps exactly onto its target and is dropped.
//!
//! The scheduler never touches the registry. [`MovementScheduler::advance`]
//! returns the new positions and the core writes them back, so each object
//! position still has a single writer.

use std::collections::BTreeMap;

use smashpad_types::{ObjectId, Position};

/// One in-flight interpolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementTween {
    /// Where the object was when the tween started.
    pub start: Position,
    /// Where the object is headed.
    pub target: Position,
    /// Completion fraction in `[0, 1]`.
    pub progress: f64,
}

impl MovementTween {
    /// Position at the current progress.
    pub fn position(&self) -> Position {
        if self.progress >= 1.0 {
            self.target
        } else {
            self.start.lerp(self.target, self.progress)
        }
    }
}

/// The result of advancing one tween by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenStep {
    /// The object that moved.
    pub object: ObjectId,
    /// Its new position.
    pub position: Position,
    /// Whether the tween reached its target and was removed.
    pub finished: bool,
}

/// Holds at most one tween per object.
#[derive(Debug, Clone, Default)]
pub struct MovementScheduler {
    tweens: BTreeMap<ObjectId, MovementTween>,
}

impl MovementScheduler {
    /// Create an empty scheduler.
    pub const fn new() -> Self {
        Self {
            tweens: BTreeMap::new(),
        }
    }

    /// Start moving `object` from `from` to `to`.
    ///
    /// An existing tween for the same object is discarded, not blended:
    /// `from` should be the object's live position so the new path starts
    /// where the object actually is. Returns the replaced tween, if any.
    pub fn start(
        &mut self,
        object: ObjectId,
        from: Position,
        to: Position,
    ) -> Option<MovementTween> {
        self.tweens.insert(
            object,
            MovementTween {
                start: from,
                target: to,
                progress: 0.0,
            },
        )
    }

    /// Drop the tween for `object`. Returns it if one was in flight.
    pub fn cancel(&mut self, object: ObjectId) -> Option<MovementTween> {
        self.tweens.remove(&object)
    }

    /// Whether `object` has a tween in flight.
    pub fn is_moving(&self, object: ObjectId) -> bool {
        self.tweens.contains_key(&object)
    }

    /// The tween for `object`, if any.
    pub fn tween(&self, object: ObjectId) -> Option<&MovementTween> {
        self.tweens.get(&object)
    }

    /// Advance every tween by `lerp_speed` and report new positions.
    pub fn advance(&mut self, lerp_speed: f64) -> Vec<TweenStep> {
        let mut steps = Vec::with_capacity(self.tweens.len());
        self.tweens.retain(|&object, tween| {
            tween.progress = (tween.progress + lerp_speed).min(1.0);
            let finished = tween.progress >= 1.0;
            steps.push(TweenStep {
                object,
                position: tween.position(),
                finished,
            });
            !finished
        });
        steps
    }

    /// Number of tweens in flight.
    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    /// Whether nothing is moving.
    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }
}
