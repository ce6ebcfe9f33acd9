//! Grid control view
//!
//! Interaction surface over the grid. Turns per-frame pointer state into
//! gestures:
//! - press, then travel past the drag threshold → `Start` + `Drag`
//! - further movement while held → `Drag`
//! - release while dragging → `End`
//! - release without dragging → `Select` (a tap)
//! - secondary button while dragging → `SelectCancel`
//! - wheel → `Pinch` with the new absolute scale

use macroquad::math::Vec2;

use crate::config::ViewSettings;
use crate::game::{ControlViewEvent, EventQueue};

/// Pointer state sampled once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub position: Vec2,
    pub primary_down: bool,
    /// Just pressed this frame
    pub primary_pressed: bool,
    /// Just released this frame
    pub primary_released: bool,
    pub secondary_pressed: bool,
    /// Wheel notches, positive zooms in
    pub wheel: f32,
}

#[derive(Debug)]
pub struct GridControlView {
    drag_threshold: f32,
    zoom_step: f32,
    min_scale: f32,
    max_scale: f32,
    /// Scale last requested through `Pinch`
    scale: f32,
    /// Where the primary button went down
    press: Option<Vec2>,
    last_position: Vec2,
    dragging: bool,
    events: EventQueue<ControlViewEvent>,
}

impl GridControlView {
    pub fn new(settings: &ViewSettings) -> Self {
        Self {
            drag_threshold: settings.drag_threshold,
            zoom_step: settings.zoom_step,
            min_scale: settings.min_scale,
            max_scale: settings.max_scale,
            scale: settings.initial_scale,
            press: None,
            last_position: Vec2::ZERO,
            dragging: false,
            events: EventQueue::new(),
        }
    }

    pub fn events_mut(&mut self) -> &mut EventQueue<ControlViewEvent> {
        &mut self.events
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn handle_pointer(&mut self, pointer: &PointerState) {
        if pointer.wheel != 0.0 {
            let factor = self.zoom_step.powf(pointer.wheel);
            let scale = (self.scale * factor).clamp(self.min_scale, self.max_scale);
            if scale != self.scale {
                self.scale = scale;
                self.events.send(ControlViewEvent::Pinch(scale));
            }
        }

        if pointer.primary_pressed {
            self.press = Some(pointer.position);
            self.last_position = pointer.position;
            self.dragging = false;
        }

        let Some(origin) = self.press else { return };

        if pointer.secondary_pressed && self.dragging {
            self.press = None;
            self.dragging = false;
            self.events.send(ControlViewEvent::SelectCancel);
            return;
        }

        if pointer.primary_down || pointer.primary_released {
            if !self.dragging && pointer.position.distance(origin) > self.drag_threshold {
                self.dragging = true;
                self.events.send(ControlViewEvent::Start(origin));
                self.events.send(ControlViewEvent::Drag(pointer.position));
            } else if self.dragging && pointer.position != self.last_position {
                self.events.send(ControlViewEvent::Drag(pointer.position));
            }
            self.last_position = pointer.position;
        }

        if pointer.primary_released {
            if self.dragging {
                self.events.send(ControlViewEvent::End(pointer.position));
            } else {
                self.events.send(ControlViewEvent::Select(pointer.position));
            }
            self.press = None;
            self.dragging = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroquad::math::vec2;

    fn press(x: f32, y: f32) -> PointerState {
        PointerState {
            position: vec2(x, y),
            primary_down: true,
            primary_pressed: true,
            ..PointerState::default()
        }
    }

    fn hold(x: f32, y: f32) -> PointerState {
        PointerState {
            position: vec2(x, y),
            primary_down: true,
            ..PointerState::default()
        }
    }

    fn release(x: f32, y: f32) -> PointerState {
        PointerState {
            position: vec2(x, y),
            primary_released: true,
            ..PointerState::default()
        }
    }

    fn view() -> GridControlView {
        GridControlView::new(&ViewSettings::default())
    }

    #[test]
    fn test_tap_is_select() {
        let mut view = view();
        view.handle_pointer(&press(10.0, 10.0));
        view.handle_pointer(&hold(11.0, 10.0));
        view.handle_pointer(&release(11.0, 10.0));
        assert_eq!(view.events_mut().take(), vec![ControlViewEvent::Select(vec2(11.0, 10.0))]);
    }

    #[test]
    fn test_drag_sequence() {
        let mut view = view();
        view.handle_pointer(&press(10.0, 10.0));
        view.handle_pointer(&hold(30.0, 10.0));
        view.handle_pointer(&hold(30.0, 10.0));
        view.handle_pointer(&hold(40.0, 20.0));
        view.handle_pointer(&release(40.0, 20.0));

        assert_eq!(
            view.events_mut().take(),
            vec![
                ControlViewEvent::Start(vec2(10.0, 10.0)),
                ControlViewEvent::Drag(vec2(30.0, 10.0)),
                ControlViewEvent::Drag(vec2(40.0, 20.0)),
                ControlViewEvent::End(vec2(40.0, 20.0)),
            ]
        );
        assert!(!view.is_dragging());
    }

    #[test]
    fn test_secondary_button_cancels_drag() {
        let mut view = view();
        view.handle_pointer(&press(0.0, 0.0));
        view.handle_pointer(&hold(50.0, 0.0));
        view.handle_pointer(&PointerState { secondary_pressed: true, ..hold(50.0, 0.0) });
        view.handle_pointer(&release(50.0, 0.0));

        let events = view.events_mut().take();
        assert_eq!(events.last(), Some(&ControlViewEvent::SelectCancel));
        assert!(!events.iter().any(|e| matches!(e, ControlViewEvent::End(_))));
    }

    #[test]
    fn test_wheel_pinches_within_limits() {
        let settings = ViewSettings::default();
        let mut view = view();
        view.handle_pointer(&PointerState { wheel: 1.0, ..PointerState::default() });
        assert_eq!(
            view.events_mut().take(),
            vec![ControlViewEvent::Pinch(settings.initial_scale * settings.zoom_step)]
        );

        // Far past the limit: clamps once, then stays quiet
        view.handle_pointer(&PointerState { wheel: 100.0, ..PointerState::default() });
        view.handle_pointer(&PointerState { wheel: 1.0, ..PointerState::default() });
        assert_eq!(view.events_mut().take(), vec![ControlViewEvent::Pinch(settings.max_scale)]);
    }
}
