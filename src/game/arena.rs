//! Arena Storage
//!
//! `Arena<T>` pairs an `EntityAllocator` with a sparse slot array, so values
//! get stable generational ids that survive unrelated inserts and removals.
//! Ids can be reserved ahead of insertion; that is how the static-model
//! collection hands out an id for a model that is still queued.

use super::entity::{Entity, EntityAllocator};

/// Sparse, generation-checked storage.
#[derive(Debug)]
pub struct Arena<T> {
    allocator: EntityAllocator,
    /// Sparse array indexed by entity.index()
    slots: Vec<Option<T>>,
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            allocator: EntityAllocator::new(),
            slots: Vec::new(),
        }
    }

    fn ensure_capacity(&mut self, index: usize) {
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, || None);
        }
    }

    /// Insert a value under a freshly allocated id.
    pub fn insert(&mut self, value: T) -> Entity {
        let id = self.reserve();
        self.fill(id, value);
        id
    }

    /// Allocate an id without storing anything yet.
    /// `get` returns `None` for it until `fill` is called.
    pub fn reserve(&mut self) -> Entity {
        self.allocator.allocate()
    }

    /// Store a value under a reserved id. Ignored if the id is stale.
    pub fn fill(&mut self, id: Entity, value: T) -> bool {
        if !self.allocator.is_alive(id) {
            return false;
        }
        let idx = id.index() as usize;
        self.ensure_capacity(idx);
        self.slots[idx] = Some(value);
        true
    }

    /// Remove a value and free its id.
    pub fn remove(&mut self, id: Entity) -> Option<T> {
        if !self.allocator.free(id) {
            return None;
        }
        self.slots.get_mut(id.index() as usize).and_then(Option::take)
    }

    pub fn get(&self, id: Entity) -> Option<&T> {
        if !self.allocator.is_alive(id) {
            return None;
        }
        self.slots.get(id.index() as usize).and_then(|slot| slot.as_ref())
    }

    pub fn get_mut(&mut self, id: Entity) -> Option<&mut T> {
        if !self.allocator.is_alive(id) {
            return None;
        }
        self.slots.get_mut(id.index() as usize).and_then(|slot| slot.as_mut())
    }

    pub fn contains(&self, id: Entity) -> bool {
        self.get(id).is_some()
    }

    /// Iterate over all stored (id, value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> + '_ {
        self.slots.iter().enumerate().filter_map(move |(idx, slot)| {
            let value = slot.as_ref()?;
            Some((self.id_at(idx)?, value))
        })
    }

    /// Iterate mutably over all stored (id, value) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> + '_ {
        let allocator = &self.allocator;
        self.slots.iter_mut().enumerate().filter_map(move |(idx, slot)| {
            let value = slot.as_mut()?;
            let generation = allocator.generation_of(idx as u32)?;
            Some((Entity::new(idx as u32, generation), value))
        })
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn id_at(&self, idx: usize) -> Option<Entity> {
        let generation = self.allocator.generation_of(idx as u32)?;
        Some(Entity::new(idx as u32, generation))
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut arena: Arena<i32> = Arena::new();
        let id = arena.insert(42);
        assert_eq!(arena.get(id), Some(&42));
        assert!(arena.contains(id));
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn test_remove_invalidates_id() {
        let mut arena: Arena<i32> = Arena::new();
        let old = arena.insert(100);
        assert_eq!(arena.remove(old), Some(100));
        assert!(!arena.contains(old));

        // Slot reuse gets a new generation; the old id stays dead
        let new = arena.insert(7);
        assert_eq!(new.index(), old.index());
        assert_eq!(arena.get(old), None);
        assert_eq!(arena.get(new), Some(&7));
        assert_eq!(arena.remove(old), None);
    }

    #[test]
    fn test_reserved_id_is_empty_until_filled() {
        let mut arena: Arena<&str> = Arena::new();
        let id = arena.reserve();
        assert!(arena.get(id).is_none());
        assert!(arena.is_empty());

        assert!(arena.fill(id, "ready"));
        assert_eq!(arena.get(id), Some(&"ready"));
    }

    #[test]
    fn test_iteration_reports_current_ids() {
        let mut arena: Arena<&str> = Arena::new();
        let a = arena.insert("a");
        let b = arena.insert("b");
        arena.remove(a);
        let c = arena.insert("c");

        let mut items: Vec<_> = arena.iter().collect();
        items.sort_by_key(|(id, _)| id.index());
        assert_eq!(items, vec![(c, &"c"), (b, &"b")]);

        for (_, value) in arena.iter_mut() {
            *value = "x";
        }
        assert_eq!(arena.get(b), Some(&"x"));
    }
}
