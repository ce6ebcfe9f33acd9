//! Event System
//!
//! Components never call each other directly. Each one buffers what happened
//! in an `EventQueue` of its own event type, and the orchestrator drains the
//! queues and routes every event to its destination.
//!
//! Example flow:
//! 1. Control view sees the pointer released → queues `ControlViewEvent::End`
//! 2. Orchestrator routes it to the control model, which commits the
//!    selection on the grid model → `GridModelEvent::Selection`
//! 3. Orchestrator routes that to the editor, which paints tiles →
//!    `EditorEvent::RefreshMap`
//! 4. Orchestrator routes that to the grid view
//!
//! Each source has a closed enum so routing is an exhaustive `match`.

use macroquad::math::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use crate::model::{Selection, StaticModel, StaticModelId, TilePoint};

/// Pending events from one source, in the order they were raised.
#[derive(Debug)]
pub struct EventQueue<T> {
    pending: Vec<T>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self { pending: Vec::new() }
    }

    pub fn send(&mut self, event: T) {
        self.pending.push(event);
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.pending.iter()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.pending.drain(..)
    }

    /// Detach everything queued so far. The router uses this so handlers can
    /// borrow the source again (and queue more) while the batch is routed.
    pub fn take(&mut self) -> Vec<T> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Payloads
// =============================================================================

/// Size of the current selection as the active tool sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionCount {
    /// Tiles covered by the selection
    pub total: usize,
    /// Tiles the tool would actually change
    pub changed: usize,
}

/// A static model picked in the grid view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemRef {
    pub model: StaticModelId,
    pub tile: TilePoint,
}

// =============================================================================
// Event Types (one enum per source)
// =============================================================================

/// Raised by the grid model.
#[derive(Debug, Clone, PartialEq)]
pub enum GridModelEvent {
    /// Visible state changed (scroll offset, dynamic models)
    Update,
    /// Terrain or static models changed; the map must be redrawn
    RefreshMap,
    /// The selection being dragged changed; `None` once it is cancelled
    SelectionChange(Option<Selection>),
    /// A drag selection was committed
    Selection(Selection),
    /// Map generation progress, 0.0..=1.0
    Progress(f32),
    /// A single tile was tapped
    Point(TilePoint),
}

/// Raised by the grid editor.
#[derive(Debug)]
pub enum EditorEvent {
    RefreshMap,
    /// A newly authored static model, to be appended to the grid model
    AddModel(StaticModel),
    /// `None` once there is no selection to count
    SelectionCount(Option<SelectionCount>),
}

/// Raised by the grid control model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlModelEvent {
    /// A single-tile selection made by tapping
    Selection(Selection),
}

/// Raised by the world view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldViewEvent {
    /// Camera moved by a pixel delta
    ChangeOffset { dx: f32, dy: f32 },
}

/// Gestures raised by the grid control view, in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlViewEvent {
    Start(Vec2),
    Drag(Vec2),
    End(Vec2),
    Select(Vec2),
    SelectCancel,
    /// Absolute scale requested by a pinch/zoom gesture
    Pinch(f32),
}

/// Raised by the grid view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridViewEvent {
    SelectItem(ItemRef),
    UnselectItem,
}

/// Lifecycle signals a static model raises about its dynamic children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticModelEvent {
    /// A new dynamic entity appeared and needs a view
    Spawned(Entity),
    /// A dormant entity is active again and its view must be reactivated
    Woken(Entity),
}

/// The orchestrator's public event surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    SelectionCount(Option<SelectionCount>),
    SelectionEnd,
    SelectItem(ItemRef),
    UnselectItem,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_keeps_order() {
        let mut queue = EventQueue::new();
        queue.send(WorldViewEvent::ChangeOffset { dx: 1.0, dy: 0.0 });
        queue.send(WorldViewEvent::ChangeOffset { dx: 0.0, dy: 2.0 });
        assert_eq!(queue.len(), 2);

        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(drained[1], WorldViewEvent::ChangeOffset { dx: 0.0, dy: 2.0 });
        assert!(queue.is_empty());
    }

    #[test]
    fn test_take_leaves_queue_usable() {
        let mut queue = EventQueue::new();
        queue.send(GameEvent::SelectionEnd);

        let taken = queue.take();
        assert_eq!(taken, vec![GameEvent::SelectionEnd]);
        assert!(queue.is_empty());

        queue.send(GameEvent::UnselectItem);
        assert_eq!(queue.iter().count(), 1);
    }
}
