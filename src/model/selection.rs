//! Tile coordinates and selection regions
//!
//! A `Selection` is an inclusive rectangle between the tile where a drag
//! started and the tile it currently covers. The orchestrator never looks
//! inside one; it only hands them from the control model to the grid model
//! and on to the editor.

use serde::{Deserialize, Serialize};

/// Integer tile coordinate (column, row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TilePoint {
    pub x: i32,
    pub y: i32,
}

impl TilePoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Rectangular tile selection, corners inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Tile where the selection started
    pub anchor: TilePoint,
    /// Tile the selection currently extends to
    pub cursor: TilePoint,
}

impl Selection {
    pub fn new(anchor: TilePoint, cursor: TilePoint) -> Self {
        Self { anchor, cursor }
    }

    /// Selection covering exactly one tile.
    pub fn single(point: TilePoint) -> Self {
        Self::new(point, point)
    }

    /// Top-left corner.
    pub fn min(&self) -> TilePoint {
        TilePoint::new(self.anchor.x.min(self.cursor.x), self.anchor.y.min(self.cursor.y))
    }

    /// Bottom-right corner.
    pub fn max(&self) -> TilePoint {
        TilePoint::new(self.anchor.x.max(self.cursor.x), self.anchor.y.max(self.cursor.y))
    }

    pub fn width(&self) -> u32 {
        (self.max().x - self.min().x) as u32 + 1
    }

    pub fn height(&self) -> u32 {
        (self.max().y - self.min().y) as u32 + 1
    }

    /// Number of tiles covered.
    pub fn tile_count(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    pub fn contains(&self, point: TilePoint) -> bool {
        let (min, max) = (self.min(), self.max());
        (min.x..=max.x).contains(&point.x) && (min.y..=max.y).contains(&point.y)
    }

    /// Every tile in the selection, row by row.
    pub fn tiles(&self) -> impl Iterator<Item = TilePoint> {
        let (min, max) = (self.min(), self.max());
        (min.y..=max.y).flat_map(move |y| (min.x..=max.x).map(move |x| TilePoint::new(x, y)))
    }

    /// Clip both corners into a `width` x `height` map.
    pub fn clamped(&self, width: u32, height: u32) -> Self {
        let clamp = |p: TilePoint| {
            TilePoint::new(
                p.x.clamp(0, width.saturating_sub(1) as i32),
                p.y.clamp(0, height.saturating_sub(1) as i32),
            )
        };
        Self::new(clamp(self.anchor), clamp(self.cursor))
    }
}
