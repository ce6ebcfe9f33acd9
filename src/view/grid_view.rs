//! Grid view
//!
//! Renderable side of the tile world. Keeps a snapshot of the map taken on
//! `on_refresh_map` (so drawing never borrows the model), the camera taken
//! on `on_update`, and the pool of entity views the registry hands out.
//!
//! Picking a tile with a static model raises `SelectItem`; picking an empty
//! tile while something is selected raises `UnselectItem`.

use macroquad::math::Vec2;

use super::entity_view::ViewPool;
use super::viewport::Viewport;
use crate::config::ViewSettings;
use crate::game::{EventQueue, GridViewEvent, ItemRef};
use crate::model::{GridModel, Selection, Tile, TilePoint};

#[derive(Debug)]
pub struct GridView {
    viewport: Viewport,
    min_scale: f32,
    max_scale: f32,
    /// Map snapshot from the last refresh
    tiles: Vec<Tile>,
    map_width: u32,
    map_height: u32,
    /// Selection being dragged, for highlighting
    selection: Option<Selection>,
    selected_item: Option<ItemRef>,
    entities: ViewPool,
    update_count: u64,
    refresh_count: u64,
    events: EventQueue<GridViewEvent>,
}

impl GridView {
    pub fn new(settings: &ViewSettings, tile_size: f32) -> Self {
        Self {
            viewport: Viewport::new(tile_size, settings.initial_scale),
            min_scale: settings.min_scale,
            max_scale: settings.max_scale,
            tiles: Vec::new(),
            map_width: 0,
            map_height: 0,
            selection: None,
            selected_item: None,
            entities: ViewPool::with_capacity(settings.view_pool_size),
            update_count: 0,
            refresh_count: 0,
            events: EventQueue::new(),
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn scale(&self) -> f32 {
        self.viewport.scale
    }

    /// Set zoom, clamped to the configured limits.
    pub fn set_scale(&mut self, scale: f32) {
        self.viewport.scale = scale.clamp(self.min_scale, self.max_scale);
    }

    pub fn events_mut(&mut self) -> &mut EventQueue<GridViewEvent> {
        &mut self.events
    }

    pub fn entity_layer(&self) -> &ViewPool {
        &self.entities
    }

    pub fn entity_layer_mut(&mut self) -> &mut ViewPool {
        &mut self.entities
    }

    /// Number of `Update`s received.
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Number of `RefreshMap`s received.
    pub fn refresh_count(&self) -> u64 {
        self.refresh_count
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn selected_item(&self) -> Option<ItemRef> {
        self.selected_item
    }

    pub fn map_size(&self) -> (u32, u32) {
        (self.map_width, self.map_height)
    }

    /// Tile from the last map snapshot.
    pub fn tile(&self, point: TilePoint) -> Option<&Tile> {
        if point.x < 0 || point.y < 0 || point.x as u32 >= self.map_width || point.y as u32 >= self.map_height {
            return None;
        }
        self.tiles.get(point.y as usize * self.map_width as usize + point.x as usize)
    }

    /// Grid state changed: sync camera and selection highlight.
    pub fn on_update(&mut self, grid: &GridModel) {
        self.viewport.offset = grid.offset();
        self.selection = grid.selection();
        self.update_count += 1;
    }

    /// Terrain or static models changed: re-snapshot the map.
    pub fn on_refresh_map(&mut self, grid: &GridModel) {
        let map = grid.map();
        self.tiles.clear();
        self.tiles.extend_from_slice(map.tiles());
        self.map_width = map.width();
        self.map_height = map.height();
        self.refresh_count += 1;
    }

    /// Hit-test a screen position against static models.
    pub fn pick(&mut self, screen: Vec2) {
        let tile = self.viewport.screen_to_tile(screen);
        match self.tile(tile).and_then(|t| t.model) {
            Some(model) => {
                let item = ItemRef { model, tile };
                self.selected_item = Some(item);
                self.events.send(GridViewEvent::SelectItem(item));
            }
            None => {
                if self.selected_item.take().is_some() {
                    self.events.send(GridViewEvent::UnselectItem);
                }
            }
        }
    }
}
