//! Dynamic models
//!
//! Entities released by static models. They wander around the map while
//! active, go dormant after their lifespan (their spawner may wake them
//! again) and are disposed once they have been dormant for too long.

use macroquad::math::Vec2;

use super::static_model::StaticModelId;
use crate::game::{Arena, Entity};

/// Where an entity is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activity {
    #[default]
    Active,
    /// Pooled: hidden, waiting to be woken by its spawner
    Dormant,
    /// Finished; its view must be released
    Disposed,
}

/// A moving entity, positions in tile units.
#[derive(Debug, Clone)]
pub struct DynamicModel {
    owner: StaticModelId,
    position: Vec2,
    velocity: Vec2,
    /// Seconds active since spawn or last wake
    age: f32,
    /// Seconds spent dormant
    dormant_for: f32,
    lifespan: f32,
    dormant_limit: f32,
    activity: Activity,
}

impl DynamicModel {
    pub fn new(owner: StaticModelId, position: Vec2, velocity: Vec2, lifespan: f32, dormant_limit: f32) -> Self {
        Self {
            owner,
            position,
            velocity,
            age: 0.0,
            dormant_for: 0.0,
            lifespan,
            dormant_limit,
            activity: Activity::Active,
        }
    }

    pub fn owner(&self) -> StaticModelId {
        self.owner
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    pub fn is_active(&self) -> bool {
        self.activity == Activity::Active
    }

    pub fn is_dormant(&self) -> bool {
        self.activity == Activity::Dormant
    }

    pub fn is_disposed(&self) -> bool {
        self.activity == Activity::Disposed
    }

    /// Seconds since spawn or last wake.
    pub fn age(&self) -> f32 {
        self.age
    }

    /// Bring a dormant entity back at `position`.
    pub fn wake(&mut self, position: Vec2, velocity: Vec2) {
        self.position = position;
        self.velocity = velocity;
        self.age = 0.0;
        self.dormant_for = 0.0;
        self.activity = Activity::Active;
    }

    pub fn dispose(&mut self) {
        self.activity = Activity::Disposed;
    }

    /// Advance one frame inside a `bounds` (width, height) tile area.
    pub fn tick(&mut self, dt: f32, bounds: Vec2) {
        match self.activity {
            Activity::Active => {
                self.position += self.velocity * dt;
                self.bounce(bounds);
                self.age += dt;
                if self.age >= self.lifespan {
                    self.activity = Activity::Dormant;
                }
            }
            Activity::Dormant => {
                self.dormant_for += dt;
                if self.dormant_for >= self.dormant_limit {
                    self.activity = Activity::Disposed;
                }
            }
            Activity::Disposed => {}
        }
    }

    fn bounce(&mut self, bounds: Vec2) {
        if self.position.x < 0.0 || self.position.x > bounds.x {
            self.velocity.x = -self.velocity.x;
            self.position.x = self.position.x.clamp(0.0, bounds.x);
        }
        if self.position.y < 0.0 || self.position.y > bounds.y {
            self.velocity.y = -self.velocity.y;
            self.position.y = self.position.y.clamp(0.0, bounds.y);
        }
    }
}

/// All dynamic entities of a grid.
#[derive(Debug, Default)]
pub struct DynamicModels {
    arena: Arena<DynamicModel>,
}

impl DynamicModels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, model: DynamicModel) -> Entity {
        self.arena.insert(model)
    }

    pub fn get(&self, entity: Entity) -> Option<&DynamicModel> {
        self.arena.get(entity)
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut DynamicModel> {
        self.arena.get_mut(entity)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Entity, &DynamicModel)> + '_ {
        self.arena.iter()
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn tick(&mut self, dt: f32, bounds: Vec2) {
        for (_, model) in self.arena.iter_mut() {
            model.tick(dt, bounds);
        }
    }

    /// Drop disposed entities from the arena. Call at the start of a frame,
    /// after the registry had one tick to release their views.
    pub fn flush_disposed(&mut self) -> Vec<Entity> {
        let disposed: Vec<Entity> = self
            .arena
            .iter()
            .filter(|(_, model)| model.is_disposed())
            .map(|(entity, _)| entity)
            .collect();
        for entity in &disposed {
            self.arena.remove(*entity);
        }
        disposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroquad::math::vec2;

    fn owner() -> StaticModelId {
        StaticModelId::from_entity(Entity::new(0, 0))
    }

    #[test]
    fn test_lifecycle() {
        let mut model = DynamicModel::new(owner(), vec2(1.0, 1.0), vec2(1.0, 0.0), 1.0, 2.0);
        model.tick(0.5, vec2(10.0, 10.0));
        assert!(model.is_active());
        assert_eq!(model.position(), vec2(1.5, 1.0));

        model.tick(0.5, vec2(10.0, 10.0));
        assert!(model.is_dormant());

        // Dormant entities stay put
        model.tick(1.0, vec2(10.0, 10.0));
        assert_eq!(model.position(), vec2(2.0, 1.0));
        assert!(model.is_dormant());

        model.tick(1.0, vec2(10.0, 10.0));
        assert!(model.is_disposed());
    }

    #[test]
    fn test_wake_resets_age() {
        let mut model = DynamicModel::new(owner(), vec2(0.0, 0.0), vec2(0.0, 0.0), 1.0, 5.0);
        model.tick(1.0, vec2(4.0, 4.0));
        assert!(model.is_dormant());

        model.wake(vec2(3.0, 3.0), vec2(0.0, 1.0));
        assert!(model.is_active());
        assert_eq!(model.age(), 0.0);
        assert_eq!(model.position(), vec2(3.0, 3.0));
    }

    #[test]
    fn test_bounces_off_map_edge() {
        let mut model = DynamicModel::new(owner(), vec2(3.5, 1.0), vec2(2.0, 0.0), 10.0, 1.0);
        model.tick(1.0, vec2(4.0, 4.0));
        assert_eq!(model.position().x, 4.0);
        assert!(model.velocity().x < 0.0);
    }

    #[test]
    fn test_flush_disposed() {
        let mut models = DynamicModels::new();
        let keep = models.spawn(DynamicModel::new(owner(), vec2(0.0, 0.0), vec2(0.0, 0.0), 10.0, 1.0));
        let gone = models.spawn(DynamicModel::new(owner(), vec2(0.0, 0.0), vec2(0.0, 0.0), 10.0, 1.0));
        if let Some(model) = models.get_mut(gone) {
            model.dispose();
        }

        assert_eq!(models.flush_disposed(), vec![gone]);
        assert!(models.get(gone).is_none());
        assert!(models.get(keep).is_some());
        assert_eq!(models.len(), 1);
    }
}
