//! GRIDWEAVE: model-view orchestration for an editable tile world
//!
//! - `model`: grid, terrain, static spawners, dynamic entities, editor tools
//! - `view`: grid view, pointer gestures, entity view pool, drawing
//! - `game`: event routing between them and the frame driver
//! - `config`: RON configuration

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod game;
pub mod model;
pub mod view;

pub use config::{ConfigError, GameConfig};
pub use game::{Game, GameError, GameEvent};
