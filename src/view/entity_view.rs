//! Entity views
//!
//! Sprites standing in for dynamic entities. Views are pooled: releasing one
//! returns it to the free list and the next registration reuses it, so
//! entities churning through spawn/dispose don't allocate every time.

use macroquad::color::Color;
use macroquad::math::Vec2;

/// Frames in the walk cycle.
pub const ANIMATION_FRAMES: u32 = 4;
/// Seconds per animation frame.
pub const FRAME_TIME: f32 = 0.15;

/// Index of a view in its pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(usize);

impl ViewId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntityView {
    /// Position in tile units
    pub position: Vec2,
    pub visible: bool,
    pub tint: Color,
    /// Current animation frame, 0..ANIMATION_FRAMES
    pub frame: u32,
    anim_time: f32,
}

impl EntityView {
    fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            visible: false,
            tint: Color::new(1.0, 1.0, 1.0, 1.0),
            frame: 0,
            anim_time: 0.0,
        }
    }

    /// Advance the walk cycle.
    pub fn animate(&mut self, dt: f32) {
        self.anim_time += dt;
        if !self.anim_time.is_finite() {
            self.anim_time = 0.0;
            return;
        }
        if self.anim_time >= FRAME_TIME {
            let steps = (self.anim_time / FRAME_TIME) as u64 % ANIMATION_FRAMES as u64;
            self.frame = (self.frame + steps as u32) % ANIMATION_FRAMES;
            self.anim_time %= FRAME_TIME;
        }
    }

    /// Back to the first frame.
    pub fn restart_animation(&mut self) {
        self.frame = 0;
        self.anim_time = 0.0;
    }
}

/// Pool of entity views owned by the grid view.
#[derive(Debug, Default)]
pub struct ViewPool {
    views: Vec<EntityView>,
    in_use: Vec<bool>,
    free: Vec<usize>,
}

impl ViewPool {
    /// Pool with `capacity` views ready to hand out.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            views: (0..capacity).map(|_| EntityView::new()).collect(),
            in_use: vec![false; capacity],
            // Reversed so acquisition starts at index 0
            free: (0..capacity).rev().collect(),
        }
    }

    /// Take a hidden, reset view from the pool, growing it if empty.
    pub fn acquire(&mut self) -> ViewId {
        let index = match self.free.pop() {
            Some(index) => {
                self.views[index] = EntityView::new();
                index
            }
            None => {
                self.views.push(EntityView::new());
                self.in_use.push(false);
                self.views.len() - 1
            }
        };
        self.in_use[index] = true;
        ViewId(index)
    }

    /// Hide a view and return it to the pool.
    pub fn release(&mut self, id: ViewId) -> bool {
        match self.in_use.get_mut(id.0) {
            Some(used) if *used => {
                *used = false;
                self.views[id.0].visible = false;
                self.free.push(id.0);
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, id: ViewId) -> Option<&EntityView> {
        self.is_in_use(id).then(|| &self.views[id.0])
    }

    pub fn get_mut(&mut self, id: ViewId) -> Option<&mut EntityView> {
        if self.is_in_use(id) {
            Some(&mut self.views[id.0])
        } else {
            None
        }
    }

    pub fn is_in_use(&self, id: ViewId) -> bool {
        self.in_use.get(id.0).copied().unwrap_or(false)
    }

    /// Views currently handed out.
    pub fn active_count(&self) -> usize {
        self.in_use.iter().filter(|used| **used).count()
    }

    /// Total views allocated (in use + free).
    pub fn capacity(&self) -> usize {
        self.views.len()
    }

    /// Views that are handed out and visible, for drawing.
    pub fn visible(&self) -> impl Iterator<Item = &EntityView> {
        self.views
            .iter()
            .zip(self.in_use.iter())
            .filter(|(view, used)| **used && view.visible)
            .map(|(view, _)| view)
    }
}
