//! Generational Ids
//!
//! Dynamic entities and static models are addressed by `Entity` ids: a slot
//! index plus the generation of that slot. Freeing a slot bumps its
//! generation, so an id kept past disposal (say, by the view registry)
//! stops matching anything instead of aliasing whatever reuses the slot.

/// Slot index + generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

#[derive(Debug, Clone, Copy)]
struct SlotState {
    generation: u32,
    live: bool,
}

/// Hands out ids, recycling freed slots (most recently freed first).
#[derive(Debug, Default)]
pub struct EntityAllocator {
    slots: Vec<SlotState>,
    recycled: Vec<u32>,
    live: u32,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> Entity {
        self.live += 1;
        let index = match self.recycled.pop() {
            Some(index) => index,
            None => {
                self.slots.push(SlotState { generation: 0, live: false });
                self.slots.len() as u32 - 1
            }
        };
        let slot = &mut self.slots[index as usize];
        slot.live = true;
        Entity::new(index, slot.generation)
    }

    /// Release `entity`'s slot. False if it was already stale.
    pub fn free(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        let slot = &mut self.slots[entity.index as usize];
        slot.live = false;
        slot.generation = slot.generation.wrapping_add(1);
        self.recycled.push(entity.index);
        self.live -= 1;
        true
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.slots
            .get(entity.index as usize)
            .is_some_and(|slot| slot.live && slot.generation == entity.generation)
    }

    /// Generation currently stored in slot `index`.
    pub fn generation_of(&self, index: u32) -> Option<u32> {
        self.slots.get(index as usize).map(|slot| slot.generation)
    }

    pub fn alive_count(&self) -> u32 {
        self.live
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_is_checked() {
        let mut ids = EntityAllocator::new();
        let a = ids.allocate();
        let b = ids.allocate();
        assert_eq!(ids.alive_count(), 2);

        assert!(ids.free(a));
        assert!(!ids.is_alive(a));
        assert!(ids.is_alive(b));
        assert!(!ids.free(a));
        assert_eq!(ids.alive_count(), 1);
    }

    #[test]
    fn test_recycled_slot_gets_new_generation() {
        let mut ids = EntityAllocator::new();
        let old = ids.allocate();
        ids.free(old);

        let new = ids.allocate();
        assert_eq!(new.index(), old.index());
        assert_eq!(new.generation(), old.generation() + 1);
        assert!(ids.is_alive(new));
        assert!(!ids.is_alive(old));
        assert_eq!(ids.generation_of(1), None);
    }

    #[test]
    fn test_freed_slot_is_not_alive_at_next_generation() {
        let mut ids = EntityAllocator::new();
        let e = ids.allocate();
        ids.free(e);
        // Not handed out yet
        assert!(!ids.is_alive(Entity::new(e.index(), 1)));
        assert_eq!(ids.generation_of(e.index()), Some(1));
        assert_eq!(ids.generation_of(5), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Entity::new(3, 2).to_string(), "3v2");
    }
}
