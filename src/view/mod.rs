//! Views
//!
//! Render-side collaborators. `WorldView` owns a `GridView` (map snapshot,
//! camera, entity view pool) and a `GridControlView` (pointer → gestures).
//! Views hold no model references; the orchestrator passes models in when
//! routing `Update`/`RefreshMap`.

pub mod control_view;
pub mod draw;
pub mod entity_view;
pub mod grid_view;
pub mod viewport;
pub mod world_view;

pub use control_view::{GridControlView, PointerState};
pub use entity_view::{EntityView, ViewId, ViewPool};
pub use grid_view::GridView;
pub use viewport::Viewport;
pub use world_view::WorldView;
