//! Grid control model
//!
//! Interprets gestures from the control view. Drags become selection
//! commands on the grid model (which announces the selection itself);
//! taps become single-tile selections raised here.

use macroquad::math::Vec2;

use super::grid::GridModel;
use super::selection::Selection;
use crate::game::{ControlModelEvent, EventQueue};
use crate::view::Viewport;

#[derive(Debug, Default)]
pub struct GridControlModel {
    /// A drag selection is in progress
    dragging: bool,
    events: EventQueue<ControlModelEvent>,
}

impl GridControlModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn events_mut(&mut self) -> &mut EventQueue<ControlModelEvent> {
        &mut self.events
    }

    pub fn on_start(&mut self, pos: Vec2, viewport: &Viewport, grid: &mut GridModel) {
        grid.begin_selection(viewport.screen_to_tile(pos));
        self.dragging = true;
    }

    pub fn on_drag(&mut self, pos: Vec2, viewport: &Viewport, grid: &mut GridModel) {
        if self.dragging {
            grid.extend_selection(viewport.screen_to_tile(pos));
        }
    }

    pub fn on_end(&mut self, pos: Vec2, viewport: &Viewport, grid: &mut GridModel) {
        if !self.dragging {
            return;
        }
        self.dragging = false;
        grid.extend_selection(viewport.screen_to_tile(pos));
        grid.commit_selection();
    }

    /// A tap: announce the tile and select just that tile.
    pub fn on_select(&mut self, pos: Vec2, viewport: &Viewport, grid: &mut GridModel) {
        let tile = viewport.screen_to_tile(pos);
        if !grid.map().contains(tile) {
            return;
        }
        grid.point(tile);
        self.events.send(ControlModelEvent::Selection(Selection::single(tile)));
    }

    pub fn on_select_cancel(&mut self, grid: &mut GridModel) {
        self.dragging = false;
        grid.cancel_selection();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GridSettings, MapSettings};
    use crate::game::GridModelEvent;
    use crate::model::TilePoint;
    use macroquad::math::vec2;

    fn setup() -> (GridControlModel, Viewport, GridModel) {
        let grid = GridModel::new(
            &GridSettings { width: 8, height: 8, tile_size: 10.0 },
            &MapSettings::default(),
        );
        (GridControlModel::new(), Viewport::new(10.0, 1.0), grid)
    }

    #[test]
    fn test_drag_commits_selection_on_grid() {
        let (mut control, viewport, mut grid) = setup();

        control.on_start(vec2(5.0, 5.0), &viewport, &mut grid);
        assert!(control.is_dragging());
        control.on_drag(vec2(25.0, 15.0), &viewport, &mut grid);
        control.on_end(vec2(35.0, 15.0), &viewport, &mut grid);
        assert!(!control.is_dragging());

        let expected = Selection::new(TilePoint::new(0, 0), TilePoint::new(3, 1));
        assert_eq!(grid.events_mut().take().last(), Some(&GridModelEvent::Selection(expected)));
        assert!(control.events_mut().is_empty());
    }

    #[test]
    fn test_drag_without_start_is_ignored() {
        let (mut control, viewport, mut grid) = setup();
        control.on_drag(vec2(25.0, 15.0), &viewport, &mut grid);
        control.on_end(vec2(25.0, 15.0), &viewport, &mut grid);
        assert!(grid.events_mut().is_empty());
    }

    #[test]
    fn test_tap_selects_single_tile() {
        let (mut control, viewport, mut grid) = setup();
        control.on_select(vec2(42.0, 17.0), &viewport, &mut grid);

        let tile = TilePoint::new(4, 1);
        assert_eq!(
            control.events_mut().take(),
            vec![ControlModelEvent::Selection(Selection::single(tile))]
        );
        assert_eq!(grid.events_mut().take(), vec![GridModelEvent::Point(tile)]);

        // Off the map: nothing
        control.on_select(vec2(500.0, 5.0), &viewport, &mut grid);
        assert!(control.events_mut().is_empty());
    }

    #[test]
    fn test_cancel_drops_selection() {
        let (mut control, viewport, mut grid) = setup();
        control.on_start(vec2(5.0, 5.0), &viewport, &mut grid);
        control.on_select_cancel(&mut grid);
        control.on_end(vec2(35.0, 15.0), &viewport, &mut grid);

        let events = grid.events_mut().take();
        assert_eq!(events.last(), Some(&GridModelEvent::SelectionChange(None)));
        assert!(!events.iter().any(|e| matches!(e, GridModelEvent::Selection(_))));
    }
}
