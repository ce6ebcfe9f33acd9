//! Game configuration
//!
//! Everything `Game::new` needs, grouped per collaborator. Stored as RON,
//! like levels and songs elsewhere in the engine:
//!
//! ```ron
//! (
//!     grid: (width: 48, height: 32, tile_size: 24.0),
//!     map: (seed: 42, rows_per_tick: 2),
//!     editor: (tool: Paint(Water)),
//!     view: (initial_scale: 1.5),
//! )
//! ```
//!
//! Missing fields fall back to their defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Terrain, Tool};

/// Error type for config loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Grid dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Columns
    pub width: u32,
    /// Rows
    pub height: u32,
    /// Tile edge in pixels at scale 1.0
    pub tile_size: f32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            width: 32,
            height: 24,
            tile_size: 32.0,
        }
    }
}

/// Terrain generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    pub seed: u64,
    /// Terrain of every tile not rolled as something else
    pub base_terrain: Terrain,
    pub water_chance: f32,
    pub rock_chance: f32,
    pub sand_chance: f32,
    /// Rows generated per tick; one progress event per batch
    pub rows_per_tick: u32,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            seed: 0x6772_6964,
            base_terrain: Terrain::Grass,
            water_chance: 0.08,
            rock_chance: 0.04,
            sand_chance: 0.10,
            rows_per_tick: 4,
        }
    }
}

/// Editor tool state at startup.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub tool: Tool,
}

/// View layer limits and input tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    pub initial_scale: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Pointer travel in pixels before a press turns into a drag
    pub drag_threshold: f32,
    /// Scale factor applied per wheel notch
    pub zoom_step: f32,
    /// Entity views available before the pool grows
    pub view_pool_size: usize,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            initial_scale: 1.0,
            min_scale: 0.25,
            max_scale: 4.0,
            drag_threshold: 6.0,
            zoom_step: 1.1,
            view_pool_size: 32,
        }
    }
}

/// Configuration bundle handed to `Game::new`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid: GridSettings,
    pub map: MapSettings,
    pub editor: EditorSettings,
    pub view: ViewSettings,
}

impl GameConfig {
    /// Load and validate a config from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_ron_str(&contents)
    }

    /// Parse and validate a config from a RON string
    pub fn from_ron_str(s: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = ron::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Save as pretty RON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .indentor("  ".to_string());
        let contents = ron::ser::to_string_pretty(self, pretty)?;
        fs::write(path.as_ref(), contents)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if self.grid.width == 0 || self.grid.height == 0 {
            return invalid("grid must be at least 1x1");
        }
        if !(self.grid.tile_size > 0.0) {
            return invalid("tile_size must be positive");
        }
        if self.map.rows_per_tick == 0 {
            return invalid("rows_per_tick must be at least 1");
        }
        let chances = [self.map.water_chance, self.map.rock_chance, self.map.sand_chance];
        if chances.iter().any(|c| !(0.0..=1.0).contains(c)) {
            return invalid("terrain chances must be within 0.0..=1.0");
        }
        let v = &self.view;
        if !(v.min_scale > 0.0 && v.min_scale <= v.initial_scale && v.initial_scale <= v.max_scale) {
            return invalid("scales must satisfy 0 < min_scale <= initial_scale <= max_scale");
        }
        if !(v.zoom_step > 1.0) {
            return invalid("zoom_step must be greater than 1.0");
        }
        if let Tool::Place(spawner) = &self.editor.tool {
            if !(spawner.interval > 0.0) {
                return invalid("spawner interval must be positive");
            }
        }
        Ok(())
    }
}
