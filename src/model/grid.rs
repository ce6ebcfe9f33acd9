//! Grid model
//!
//! Authoritative state of the tile world: the terrain map, the static
//! models standing on it and the dynamic entities they release, the scroll
//! offset and the selection being dragged. Changes are announced through
//! `GridModelEvent`s; the model never talks to views or the editor itself.
//!
//! The map is generated progressively, a few rows per tick, so the view can
//! show a progress bar for large maps.

use macroquad::math::{vec2, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::dynamic::DynamicModels;
use super::selection::{Selection, TilePoint};
use super::static_model::StaticModels;
use super::tile_map::{Terrain, TileMap};
use crate::config::{GridSettings, MapSettings};
use crate::game::{EventQueue, GridModelEvent};

/// Fills the map a few rows at a time from a seeded RNG.
#[derive(Debug)]
struct MapGenerator {
    rng: StdRng,
    settings: MapSettings,
    next_row: u32,
}

impl MapGenerator {
    fn new(settings: &MapSettings) -> Self {
        Self {
            rng: StdRng::seed_from_u64(settings.seed),
            settings: settings.clone(),
            next_row: 0,
        }
    }

    fn roll(&mut self) -> Terrain {
        let roll: f32 = self.rng.gen();
        let s = &self.settings;
        if roll < s.water_chance {
            Terrain::Water
        } else if roll < s.water_chance + s.rock_chance {
            Terrain::Rock
        } else if roll < s.water_chance + s.rock_chance + s.sand_chance {
            Terrain::Sand
        } else {
            s.base_terrain
        }
    }

    /// Generate the next batch of rows. Returns progress in 0.0..=1.0.
    fn step(&mut self, map: &mut TileMap) -> f32 {
        let end = (self.next_row + self.settings.rows_per_tick.max(1)).min(map.height());
        for y in self.next_row..end {
            let Some(row) = map.row_mut(y) else { break };
            for tile in row.iter_mut() {
                let terrain = self.roll();
                // Tiles something was already built on keep their terrain
                if tile.model.is_none() {
                    tile.terrain = terrain;
                }
            }
        }
        self.next_row = end;
        if map.height() == 0 {
            1.0
        } else {
            self.next_row as f32 / map.height() as f32
        }
    }

    fn is_done(&self, map: &TileMap) -> bool {
        self.next_row >= map.height()
    }
}

#[derive(Debug)]
pub struct GridModel {
    settings: GridSettings,
    map: TileMap,
    generator: Option<MapGenerator>,
    /// Scroll offset in pixels
    offset: Vec2,
    static_models: StaticModels,
    dynamic_models: DynamicModels,
    selection: Option<Selection>,
    events: EventQueue<GridModelEvent>,
    /// Visible state changed since the last `Update`
    dirty: bool,
}

impl GridModel {
    pub fn new(grid: &GridSettings, map: &MapSettings) -> Self {
        Self {
            settings: grid.clone(),
            map: TileMap::filled(grid.width, grid.height, map.base_terrain),
            generator: Some(MapGenerator::new(map)),
            offset: Vec2::ZERO,
            static_models: StaticModels::new(),
            dynamic_models: DynamicModels::new(),
            selection: None,
            events: EventQueue::new(),
            dirty: true,
        }
    }

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    pub fn map(&self) -> &TileMap {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut TileMap {
        &mut self.map
    }

    pub fn static_models(&self) -> &StaticModels {
        &self.static_models
    }

    pub fn static_models_mut(&mut self) -> &mut StaticModels {
        &mut self.static_models
    }

    pub fn dynamic_models(&self) -> &DynamicModels {
        &self.dynamic_models
    }

    pub fn events_mut(&mut self) -> &mut EventQueue<GridModelEvent> {
        &mut self.events
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Has progressive generation finished?
    pub fn is_ready(&self) -> bool {
        self.generator.is_none()
    }

    /// Map size in tiles.
    pub fn bounds(&self) -> Vec2 {
        vec2(self.map.width() as f32, self.map.height() as f32)
    }

    /// Map size in pixels.
    pub fn pixel_size(&self) -> Vec2 {
        self.bounds() * self.settings.tile_size
    }

    /// Can a new static model be anchored at `tile`?
    pub fn is_tile_free(&self, tile: TilePoint) -> bool {
        self.map
            .get(tile)
            .is_some_and(|t| t.terrain.is_buildable() && t.model.is_none())
            && !self.static_models.pending_at(tile)
    }

    /// Advance the world by one frame.
    pub fn tick(&mut self, dt: f32) {
        self.dynamic_models.flush_disposed();

        let mut map_changed = false;
        for id in self.static_models.flush_pending() {
            let Some(tile) = self.static_models.get(id).map(|model| model.tile()) else {
                continue;
            };
            match self.map.get_mut(tile) {
                Some(slot) if slot.model.is_none() => {
                    slot.model = Some(id);
                    map_changed = true;
                }
                _ => {
                    tracing::warn!("dropping static model {}: tile {:?} is taken", id, tile);
                    self.static_models.remove(id);
                }
            }
        }

        if let Some(generator) = self.generator.as_mut() {
            let progress = generator.step(&mut self.map);
            self.events.send(GridModelEvent::Progress(progress));
            if generator.is_done(&self.map) {
                self.generator = None;
                map_changed = true;
                tracing::info!("map generated ({}x{})", self.map.width(), self.map.height());
            }
        }

        if map_changed {
            self.events.send(GridModelEvent::RefreshMap);
        }

        self.static_models.tick(dt, &mut self.dynamic_models);
        let bounds = self.bounds();
        self.dynamic_models.tick(dt, bounds);

        if self.dirty || !self.dynamic_models.is_empty() {
            self.dirty = false;
            self.events.send(GridModelEvent::Update);
        }
    }

    /// Scroll by a pixel delta, clamped to the map extent.
    pub fn scroll_by(&mut self, dx: f32, dy: f32) {
        let offset = (self.offset + vec2(dx, dy)).clamp(Vec2::ZERO, self.pixel_size());
        if offset != self.offset {
            self.offset = offset;
            self.dirty = true;
        }
    }

    // =========================================================================
    // Selection commands (driven by the control model)
    // =========================================================================

    pub fn begin_selection(&mut self, tile: TilePoint) {
        let selection = Selection::single(tile).clamped(self.map.width(), self.map.height());
        self.selection = Some(selection);
        self.dirty = true;
        self.events.send(GridModelEvent::SelectionChange(Some(selection)));
    }

    pub fn extend_selection(&mut self, tile: TilePoint) {
        let Some(current) = self.selection else { return };
        let extended = Selection::new(current.anchor, tile).clamped(self.map.width(), self.map.height());
        if extended != current {
            self.selection = Some(extended);
            self.dirty = true;
            self.events.send(GridModelEvent::SelectionChange(Some(extended)));
        }
    }

    /// Commit the dragged selection, if any.
    pub fn commit_selection(&mut self) -> Option<Selection> {
        let selection = self.selection.take()?;
        self.dirty = true;
        self.events.send(GridModelEvent::Selection(selection));
        Some(selection)
    }

    pub fn cancel_selection(&mut self) {
        if self.selection.take().is_some() {
            self.dirty = true;
            self.events.send(GridModelEvent::SelectionChange(None));
        }
    }

    /// Announce a tap on a single tile.
    pub fn point(&mut self, tile: TilePoint) {
        if self.map.contains(tile) {
            self.events.send(GridModelEvent::Point(tile));
        }
    }
}
