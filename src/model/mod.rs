//! Models
//!
//! Simulation-side collaborators of the orchestrator:
//! - `GridModel`: terrain, static models, dynamic entities, scroll, selection
//! - `GridEditor`: applies the active tool to selections
//! - `GridControlModel`: turns gestures into selection commands
//!
//! None of them hold references to each other. They buffer events and the
//! orchestrator routes them.

pub mod control;
pub mod dynamic;
pub mod editor;
pub mod grid;
pub mod selection;
pub mod static_model;
pub mod tile_map;

pub use control::GridControlModel;
pub use dynamic::{Activity, DynamicModel, DynamicModels};
pub use editor::{GridEditor, Tool};
pub use grid::GridModel;
pub use selection::{Selection, TilePoint};
pub use static_model::{SpawnerSettings, StaticModel, StaticModelId, StaticModels};
pub use tile_map::{Terrain, Tile, TileMap};
