//! World view
//!
//! Root of the view hierarchy: owns the grid view and the control view
//! layered over it, the map-generation progress indicator, and camera
//! panning (which it only announces; the grid model owns the offset).

use super::control_view::GridControlView;
use super::grid_view::GridView;
use crate::config::GameConfig;
use crate::game::{EventQueue, WorldViewEvent};

#[derive(Debug)]
pub struct WorldView {
    grid_view: GridView,
    control_view: GridControlView,
    /// Map generation progress in percent, `None` before the first report
    progress: Option<u8>,
    events: EventQueue<WorldViewEvent>,
}

impl WorldView {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            grid_view: GridView::new(&config.view, config.grid.tile_size),
            control_view: GridControlView::new(&config.view),
            progress: None,
            events: EventQueue::new(),
        }
    }

    pub fn grid_view(&self) -> &GridView {
        &self.grid_view
    }

    pub fn grid_view_mut(&mut self) -> &mut GridView {
        &mut self.grid_view
    }

    pub fn grid_control_view(&self) -> &GridControlView {
        &self.control_view
    }

    pub fn grid_control_view_mut(&mut self) -> &mut GridControlView {
        &mut self.control_view
    }

    pub fn events_mut(&mut self) -> &mut EventQueue<WorldViewEvent> {
        &mut self.events
    }

    pub fn progress(&self) -> Option<u8> {
        self.progress
    }

    /// Show generation progress, 0..=100.
    pub fn set_progress(&mut self, percent: u8) {
        self.progress = Some(percent.min(100));
    }

    /// Is the progress bar still showing?
    pub fn is_loading(&self) -> bool {
        self.progress.is_some_and(|p| p < 100)
    }

    /// Move the camera by a pixel delta (screen space).
    pub fn pan(&mut self, dx: f32, dy: f32) {
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        // Screen pixels to map pixels
        let scale = self.grid_view.scale();
        self.events.send(WorldViewEvent::ChangeOffset {
            dx: dx / scale,
            dy: dy / scale,
        });
    }
}
