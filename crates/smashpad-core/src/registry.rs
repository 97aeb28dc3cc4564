//! The object registry: every live on-screen object and its authoritative
//! position.
//!
//! Objects are kept in insertion (spawn) order. That order is observable:
//! hit testing breaks distance ties in favour of the earliest object, and
//! the cap-driven cleanup evicts the oldest inactive object first.
//!
//! Only the interaction core writes to the registry. The router reads it to
//! decide; the movement scheduler hands back positions that the core then
//! writes here.

use chrono::Utc;
use smashpad_types::{GameObject, ObjectId, ObjectKind, Position};

use crate::clock::{Millis, elapsed_ms};

/// Errors from registry operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    /// No live object has this id.
    #[error("object not found: {0}")]
    NotFound(ObjectId),

    /// An object with this id is already registered.
    #[error("duplicate object id: {0}")]
    Duplicate(ObjectId),
}

/// The set of live objects, in spawn order.
#[derive(Debug, Clone, Default)]
pub struct ObjectRegistry {
    objects: Vec<GameObject>,
}

impl ObjectRegistry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Create and insert a new object at `position`, returning its id.
    ///
    /// The object starts active because it is about to be narrated.
    pub fn spawn(
        &mut self,
        kind: ObjectKind,
        symbol: &str,
        name: &str,
        position: Position,
        now: Millis,
    ) -> ObjectId {
        let id = ObjectId::new();
        self.objects.push(GameObject {
            id,
            kind,
            symbol: symbol.to_owned(),
            name: name.to_owned(),
            position,
            active: true,
            last_touched_ms: now,
            created_at: Utc::now(),
        });
        id
    }

    /// Insert an object built elsewhere.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] if the id is already live.
    pub fn insert(&mut self, object: GameObject) -> Result<ObjectId, RegistryError> {
        if self.contains(object.id) {
            return Err(RegistryError::Duplicate(object.id));
        }
        let id = object.id;
        self.objects.push(object);
        Ok(id)
    }

    /// Remove an object, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if the id is not live.
    pub fn remove(&mut self, id: ObjectId) -> Result<GameObject, RegistryError> {
        let index = self
            .objects
            .iter()
            .position(|o| o.id == id)
            .ok_or(RegistryError::NotFound(id))?;
        Ok(self.objects.remove(index))
    }

    /// Look up an object.
    pub fn get(&self, id: ObjectId) -> Option<&GameObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Whether `id` is live.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    /// Current position of an object.
    pub fn position(&self, id: ObjectId) -> Option<Position> {
        self.get(id).map(|o| o.position)
    }

    /// Move an object and mark it touched.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if the id is not live.
    pub fn set_position(
        &mut self,
        id: ObjectId,
        position: Position,
        now: Millis,
    ) -> Result<(), RegistryError> {
        let object = self.get_mut(id)?;
        object.position = position;
        object.last_touched_ms = now;
        Ok(())
    }

    /// Set an object's active flag.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if the id is not live.
    pub fn set_active(&mut self, id: ObjectId, active: bool) -> Result<(), RegistryError> {
        self.get_mut(id)?.active = active;
        Ok(())
    }

    /// Nearest object whose centre lies within `radius` of `point`.
    ///
    /// Ties go to the earliest-spawned object. `exclude` is skipped, which
    /// lets the caller keep the narrating object out of the hit test.
    pub fn hit_test(
        &self,
        point: Position,
        radius: f64,
        exclude: Option<ObjectId>,
    ) -> Option<ObjectId> {
        let mut best: Option<(ObjectId, f64)> = None;
        for object in &self.objects {
            if Some(object.id) == exclude {
                continue;
            }
            let distance = object.position.distance_to(point);
            if distance > radius {
                continue;
            }
            // Strictly closer only: equal distances keep the earlier object.
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((object.id, distance));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Inactive objects untouched for at least `idle_ms`, in spawn order.
    pub fn idle_objects(&self, now: Millis, idle_ms: Millis) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|o| !o.active && elapsed_ms(now, o.last_touched_ms) >= idle_ms)
            .map(|o| o.id)
            .collect()
    }

    /// The earliest-spawned inactive object.
    pub fn oldest_inactive(&self) -> Option<ObjectId> {
        self.objects.iter().find(|o| !o.active).map(|o| o.id)
    }

    /// Iterate objects in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &GameObject> {
        self.objects.iter()
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether there are no live objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn get_mut(&mut self, id: ObjectId) -> Result<&mut GameObject, RegistryError> {
        self.objects
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(RegistryError::NotFound(id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn spawn_at(registry: &mut ObjectRegistry, x: f64, y: f64) -> ObjectId {
        registry.spawn(ObjectKind::Emoji, "🐶", "puppy", Position::new(x, y), 0)
    }

    #[test]
    fn spawn_inserts_active_object() {
        let mut registry = ObjectRegistry::new();
        let id = spawn_at(&mut registry, 100.0, 100.0);
        let object = registry.get(id).unwrap();
        assert!(object.active);
        assert_eq!(object.position, Position::new(100.0, 100.0));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn insert_rejects_duplicates() {
        let mut registry = ObjectRegistry::new();
        let id = spawn_at(&mut registry, 0.0, 0.0);
        let copy = registry.get(id).unwrap().clone();
        assert_eq!(registry.insert(copy), Err(RegistryError::Duplicate(id)));
    }

    #[test]
    fn remove_unknown_is_not_found() {
        let mut registry = ObjectRegistry::new();
        let ghost = ObjectId::new();
        assert_eq!(registry.remove(ghost), Err(RegistryError::NotFound(ghost)));
    }

    #[test]
    fn set_position_touches_object() {
        let mut registry = ObjectRegistry::new();
        let id = spawn_at(&mut registry, 0.0, 0.0);
        registry
            .set_position(id, Position::new(5.0, 6.0), 1_234)
            .unwrap();
        let object = registry.get(id).unwrap();
        assert_eq!(object.position, Position::new(5.0, 6.0));
        assert_eq!(object.last_touched_ms, 1_234);
    }

    #[test]
    fn hit_test_respects_radius() {
        let mut registry = ObjectRegistry::new();
        let id = spawn_at(&mut registry, 100.0, 100.0);
        assert_eq!(
            registry.hit_test(Position::new(130.0, 100.0), 40.0, None),
            Some(id)
        );
        assert_eq!(registry.hit_test(Position::new(150.0, 100.0), 40.0, None), None);
    }

    #[test]
    fn hit_test_picks_nearest() {
        let mut registry = ObjectRegistry::new();
        let _far = spawn_at(&mut registry, 100.0, 100.0);
        let near = spawn_at(&mut registry, 120.0, 100.0);
        assert_eq!(
            registry.hit_test(Position::new(118.0, 100.0), 60.0, None),
            Some(near)
        );
    }

    #[test]
    fn hit_test_tie_goes_to_earliest() {
        let mut registry = ObjectRegistry::new();
        let first = spawn_at(&mut registry, 90.0, 100.0);
        let _second = spawn_at(&mut registry, 110.0, 100.0);
        assert_eq!(
            registry.hit_test(Position::new(100.0, 100.0), 60.0, None),
            Some(first)
        );
    }

    #[test]
    fn hit_test_skips_excluded() {
        let mut registry = ObjectRegistry::new();
        let speaking = spawn_at(&mut registry, 100.0, 100.0);
        assert_eq!(
            registry.hit_test(Position::new(100.0, 100.0), 60.0, Some(speaking)),
            None
        );
    }

    #[test]
    fn idle_objects_only_reports_inactive_and_old() {
        let mut registry = ObjectRegistry::new();
        let idle = spawn_at(&mut registry, 0.0, 0.0);
        let busy = spawn_at(&mut registry, 10.0, 0.0);
        let fresh = spawn_at(&mut registry, 20.0, 0.0);
        registry.set_active(idle, false).unwrap();
        registry.set_active(fresh, false).unwrap();
        registry
            .set_position(fresh, Position::new(20.0, 0.0), 9_000)
            .unwrap();
        let stale = registry.idle_objects(10_000, 5_000);
        assert_eq!(stale, vec![idle]);
        assert!(!stale.contains(&busy));
    }

    #[test]
    fn oldest_inactive_follows_spawn_order() {
        let mut registry = ObjectRegistry::new();
        let a = spawn_at(&mut registry, 0.0, 0.0);
        let b = spawn_at(&mut registry, 0.0, 0.0);
        assert_eq!(registry.oldest_inactive(), None);
        registry.set_active(b, false).unwrap();
        registry.set_active(a, false).unwrap();
        assert_eq!(registry.oldest_inactive(), Some(a));
    }
}
