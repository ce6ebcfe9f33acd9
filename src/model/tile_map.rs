//! Dense tile storage
//!
//! One `Tile` per cell, row-major. Each tile has a terrain type and at most
//! one static model standing on it.

use serde::{Deserialize, Serialize};

use super::selection::TilePoint;
use super::static_model::StaticModelId;

/// Terrain painted onto a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Terrain {
    #[default]
    Grass,
    Sand,
    Water,
    Rock,
}

impl Terrain {
    pub const ALL: [Terrain; 4] = [Terrain::Grass, Terrain::Sand, Terrain::Water, Terrain::Rock];

    /// Can a static model be placed on this terrain?
    pub fn is_buildable(self) -> bool {
        matches!(self, Terrain::Grass | Terrain::Sand)
    }

    pub fn label(self) -> &'static str {
        match self {
            Terrain::Grass => "Grass",
            Terrain::Sand => "Sand",
            Terrain::Water => "Water",
            Terrain::Rock => "Rock",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tile {
    pub terrain: Terrain,
    /// Static model occupying this tile
    pub model: Option<StaticModelId>,
}

/// Row-major grid of tiles.
#[derive(Debug, Clone)]
pub struct TileMap {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl TileMap {
    /// Create a map filled with `terrain`.
    pub fn filled(width: u32, height: u32, terrain: Terrain) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile { terrain, model: None }; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, point: TilePoint) -> bool {
        point.x >= 0 && point.y >= 0 && (point.x as u32) < self.width && (point.y as u32) < self.height
    }

    fn index(&self, point: TilePoint) -> Option<usize> {
        self.contains(point)
            .then(|| point.y as usize * self.width as usize + point.x as usize)
    }

    pub fn get(&self, point: TilePoint) -> Option<&Tile> {
        self.index(point).map(|idx| &self.tiles[idx])
    }

    pub fn get_mut(&mut self, point: TilePoint) -> Option<&mut Tile> {
        self.index(point).map(|idx| &mut self.tiles[idx])
    }

    /// Set terrain, returning true if the tile actually changed.
    pub fn set_terrain(&mut self, point: TilePoint, terrain: Terrain) -> bool {
        match self.get_mut(point) {
            Some(tile) if tile.terrain != terrain => {
                tile.terrain = terrain;
                true
            }
            _ => false,
        }
    }

    /// One row of tiles, for incremental generation and rendering.
    pub fn row_mut(&mut self, y: u32) -> Option<&mut [Tile]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.width as usize;
        Some(&mut self.tiles[start..start + self.width as usize])
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }
}
