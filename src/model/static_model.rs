//! Static models
//!
//! Terrain-anchored spawners. Each one keeps a small pool of dynamic
//! children: on every interval it wakes a dormant child if it has one,
//! otherwise it spawns a new child while under capacity. Both cases are
//! announced on the model's own event queue.
//!
//! `StaticModels` stores them in an arena. Models added while events are
//! being routed wait in a pending queue until the next grid tick flushes
//! them, so the arena is never appended to mid-iteration.

use macroquad::math::{vec2, Vec2};
use serde::{Deserialize, Serialize};

use super::dynamic::{DynamicModel, DynamicModels};
use super::selection::TilePoint;
use crate::game::{Arena, Entity, EventQueue, StaticModelEvent};

/// Angle between consecutive release directions (golden angle).
const RELEASE_ANGLE_STEP: f32 = 2.399_963;

/// Stable id of a static model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StaticModelId(Entity);

impl StaticModelId {
    pub(crate) fn from_entity(entity: Entity) -> Self {
        Self(entity)
    }

    pub fn entity(&self) -> Entity {
        self.0
    }
}

impl std::fmt::Display for StaticModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "static#{}", self.0)
    }
}

/// How a static model releases dynamic entities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerSettings {
    /// Seconds between releases
    pub interval: f32,
    /// Maximum number of children (active + dormant)
    pub capacity: usize,
    /// Seconds a child stays active before going dormant
    pub lifespan: f32,
    /// Seconds a child may stay dormant before it is disposed
    pub dormant_limit: f32,
    /// Child speed in tiles per second
    pub speed: f32,
}

impl Default for SpawnerSettings {
    fn default() -> Self {
        Self {
            interval: 1.5,
            capacity: 4,
            lifespan: 4.0,
            dormant_limit: 10.0,
            speed: 1.5,
        }
    }
}

#[derive(Debug)]
pub struct StaticModel {
    tile: TilePoint,
    settings: SpawnerSettings,
    timer: f32,
    releases: u32,
    children: Vec<Entity>,
    events: EventQueue<StaticModelEvent>,
}

impl StaticModel {
    pub fn new(tile: TilePoint, settings: SpawnerSettings) -> Self {
        Self {
            tile,
            settings,
            timer: 0.0,
            releases: 0,
            children: Vec::new(),
            events: EventQueue::new(),
        }
    }

    pub fn tile(&self) -> TilePoint {
        self.tile
    }

    pub fn settings(&self) -> &SpawnerSettings {
        &self.settings
    }

    pub fn children(&self) -> &[Entity] {
        &self.children
    }

    pub fn events_mut(&mut self) -> &mut EventQueue<StaticModelEvent> {
        &mut self.events
    }

    /// Center of the anchor tile, in tile units.
    pub fn origin(&self) -> Vec2 {
        vec2(self.tile.x as f32 + 0.5, self.tile.y as f32 + 0.5)
    }

    pub fn tick(&mut self, id: StaticModelId, dt: f32, dynamics: &mut DynamicModels) {
        // Forget children that were disposed and flushed
        self.children
            .retain(|&child| dynamics.get(child).is_some_and(|model| !model.is_disposed()));

        if self.settings.interval <= 0.0 {
            return;
        }
        let interval = self.settings.interval;
        self.timer += dt;
        if !self.timer.is_finite() {
            self.timer = 0.0;
            return;
        }
        if self.timer < interval {
            return;
        }
        // A long frame releases at most one full pool's worth
        let due = ((self.timer / interval) as usize).min(self.settings.capacity.max(1));
        self.timer %= interval;
        for _ in 0..due {
            self.release(id, dynamics);
        }
    }

    fn release(&mut self, id: StaticModelId, dynamics: &mut DynamicModels) {
        let angle = self.releases as f32 * RELEASE_ANGLE_STEP;
        let velocity = vec2(angle.cos(), angle.sin()) * self.settings.speed;
        let origin = self.origin();

        let dormant = self
            .children
            .iter()
            .copied()
            .find(|&child| dynamics.get(child).is_some_and(DynamicModel::is_dormant));

        if let Some(child) = dormant {
            if let Some(model) = dynamics.get_mut(child) {
                model.wake(origin, velocity);
                self.releases += 1;
                self.events.send(StaticModelEvent::Woken(child));
            }
        } else if self.children.len() < self.settings.capacity {
            let child = dynamics.spawn(DynamicModel::new(
                id,
                origin,
                velocity,
                self.settings.lifespan,
                self.settings.dormant_limit,
            ));
            self.children.push(child);
            self.releases += 1;
            self.events.send(StaticModelEvent::Spawned(child));
        }
    }
}

/// Arena of static models with a pending-insertion queue.
#[derive(Debug, Default)]
pub struct StaticModels {
    arena: Arena<StaticModel>,
    pending: Vec<(StaticModelId, StaticModel)>,
}

impl StaticModels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a model for insertion. The id is valid immediately; the model
    /// becomes reachable through `get` after the next `flush_pending`.
    pub fn add(&mut self, model: StaticModel) -> StaticModelId {
        let id = StaticModelId(self.arena.reserve());
        self.pending.push((id, model));
        id
    }

    /// Move queued models into the arena, returning their ids.
    pub fn flush_pending(&mut self) -> Vec<StaticModelId> {
        let pending = std::mem::take(&mut self.pending);
        let mut flushed = Vec::with_capacity(pending.len());
        for (id, model) in pending {
            if self.arena.fill(id.0, model) {
                flushed.push(id);
            }
        }
        flushed
    }

    pub fn get(&self, id: StaticModelId) -> Option<&StaticModel> {
        self.arena.get(id.0)
    }

    pub fn get_mut(&mut self, id: StaticModelId) -> Option<&mut StaticModel> {
        self.arena.get_mut(id.0)
    }

    /// Remove a flushed model. Its children stay in `DynamicModels`.
    pub fn remove(&mut self, id: StaticModelId) -> Option<StaticModel> {
        self.arena.remove(id.0)
    }

    pub fn is_pending(&self, id: StaticModelId) -> bool {
        self.pending.iter().any(|(pending, _)| *pending == id)
    }

    /// Is a queued (not yet flushed) model anchored at `tile`?
    pub fn pending_at(&self, tile: TilePoint) -> bool {
        self.pending.iter().any(|(_, model)| model.tile == tile)
    }

    pub fn iter(&self) -> impl Iterator<Item = (StaticModelId, &StaticModel)> + '_ {
        self.arena.iter().map(|(entity, model)| (StaticModelId(entity), model))
    }

    /// Number of flushed models.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Tick every flushed model. Queued models wait for the next flush.
    pub fn tick(&mut self, dt: f32, dynamics: &mut DynamicModels) {
        for (entity, model) in self.arena.iter_mut() {
            model.tick(StaticModelId(entity), dt, dynamics);
        }
    }
}
