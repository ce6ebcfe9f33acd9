//! Screen <-> tile conversion for the grid view.

use macroquad::math::{vec2, Vec2};

use crate::model::TilePoint;

/// Camera of the grid view: scroll offset (map pixels) and zoom scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Map pixel shown at the top-left corner of the view
    pub offset: Vec2,
    pub scale: f32,
    /// Tile edge in map pixels
    pub tile_size: f32,
}

impl Viewport {
    pub fn new(tile_size: f32, scale: f32) -> Self {
        Self {
            offset: Vec2::ZERO,
            scale,
            tile_size,
        }
    }

    /// Screen position to map pixels.
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen / self.scale + self.offset
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        (world - self.offset) * self.scale
    }

    pub fn screen_to_tile(&self, screen: Vec2) -> TilePoint {
        let world = self.screen_to_world(screen) / self.tile_size;
        TilePoint::new(world.x.floor() as i32, world.y.floor() as i32)
    }

    /// Screen position of a tile's top-left corner.
    pub fn tile_to_screen(&self, tile: TilePoint) -> Vec2 {
        self.world_to_screen(vec2(tile.x as f32, tile.y as f32) * self.tile_size)
    }

    /// Screen position of a point given in tile units.
    pub fn tile_units_to_screen(&self, position: Vec2) -> Vec2 {
        self.world_to_screen(position * self.tile_size)
    }

    /// On-screen edge length of one tile.
    pub fn tile_screen_size(&self) -> f32 {
        self.tile_size * self.scale
    }
}
