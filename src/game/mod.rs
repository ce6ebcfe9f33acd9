//! Game Foundation Module
//!
//! Wiring between the models and the views of the tile world.
//!
//! Key concepts:
//! - Entity: Generational index for safe references to dynamic entities
//! - Arena: Slot storage keyed by those indices, with reserve-then-fill
//! - Event: Per-source queues, drained and routed by the orchestrator
//! - Registry: Which view draws which entity
//! - Game: Owns everything and drives the frame
//!
//! Design philosophy:
//! - Components never call each other; only `Game` routes
//! - Every route is one `match` arm, so the compiler checks it is bound
//! - Fixed frame order: grid model, then registry

pub mod arena;
pub mod entity;
pub mod event;
pub mod orchestrator;
pub mod registry;

// Re-export main types
pub use arena::Arena;
pub use entity::{Entity, EntityAllocator};
pub use event::{
    ControlModelEvent, ControlViewEvent, EditorEvent, EventQueue, GameEvent, GridModelEvent,
    GridViewEvent, ItemRef, SelectionCount, StaticModelEvent, WorldViewEvent,
};
pub use orchestrator::{progress_percent, Game, GameError};
pub use registry::{EntityCategory, EntityRegistry, Registration, RegistryError};
