//! Drawing
//!
//! Immediate-mode macroquad drawing of the view hierarchy. Reads view state
//! only; must be called from inside the macroquad window loop.

use macroquad::prelude::*;

use super::entity_view::ANIMATION_FRAMES;
use super::grid_view::GridView;
use super::world_view::WorldView;
use crate::model::{Terrain, TilePoint};

const BACKGROUND: Color = Color::new(0.08, 0.08, 0.1, 1.0);
const SELECTION: Color = Color::new(1.0, 0.85, 0.2, 0.35);
const PICKED: Color = Color::new(1.0, 1.0, 1.0, 1.0);

fn terrain_color(terrain: Terrain) -> Color {
    match terrain {
        Terrain::Grass => Color::from_rgba(70, 130, 60, 255),
        Terrain::Sand => Color::from_rgba(200, 180, 110, 255),
        Terrain::Water => Color::from_rgba(50, 90, 170, 255),
        Terrain::Rock => Color::from_rgba(110, 105, 100, 255),
    }
}

/// Draw the whole world view.
pub fn draw_world(view: &WorldView) {
    clear_background(BACKGROUND);
    let grid = view.grid_view();
    draw_tiles(grid);
    draw_selection(grid);
    draw_entities(grid);
    if let Some(percent) = view.progress().filter(|p| *p < 100) {
        draw_progress(percent);
    }
}

fn draw_tiles(grid: &GridView) {
    let viewport = grid.viewport();
    let size = viewport.tile_screen_size();
    let (width, height) = grid.map_size();

    // Only the tiles on screen
    let first = viewport.screen_to_tile(Vec2::ZERO);
    let last = viewport.screen_to_tile(vec2(screen_width(), screen_height()));
    let x_range = first.x.max(0)..=last.x.min(width as i32 - 1);
    let y_range = first.y.max(0)..=last.y.min(height as i32 - 1);

    for y in y_range {
        for x in x_range.clone() {
            let point = TilePoint::new(x, y);
            let Some(tile) = grid.tile(point) else { continue };
            let corner = viewport.tile_to_screen(point);
            draw_rectangle(corner.x, corner.y, size - 1.0, size - 1.0, terrain_color(tile.terrain));
            if tile.model.is_some() {
                let inset = size * 0.2;
                draw_rectangle(corner.x + inset, corner.y + inset, size - inset * 2.0, size - inset * 2.0, DARKBROWN);
            }
        }
    }

    if let Some(item) = grid.selected_item() {
        let corner = viewport.tile_to_screen(item.tile);
        draw_rectangle_lines(corner.x, corner.y, size, size, 2.0, PICKED);
    }
}

fn draw_selection(grid: &GridView) {
    let Some(selection) = grid.selection() else { return };
    let viewport = grid.viewport();
    let corner = viewport.tile_to_screen(selection.min());
    let size = viewport.tile_screen_size();
    draw_rectangle(
        corner.x,
        corner.y,
        selection.width() as f32 * size,
        selection.height() as f32 * size,
        SELECTION,
    );
}

fn draw_entities(grid: &GridView) {
    let viewport = grid.viewport();
    let radius = viewport.tile_screen_size() * 0.25;
    for view in grid.entity_layer().visible() {
        let center = viewport.tile_units_to_screen(view.position);
        // Bob with the walk cycle
        let bob = (view.frame as f32 / ANIMATION_FRAMES as f32 * std::f32::consts::TAU).sin() * radius * 0.2;
        draw_circle(center.x, center.y + bob, radius, view.tint);
    }
}

fn draw_progress(percent: u8) {
    let w = screen_width() * 0.5;
    let x = (screen_width() - w) * 0.5;
    let y = screen_height() * 0.5;
    draw_rectangle(x, y, w, 12.0, DARKGRAY);
    draw_rectangle(x, y, w * percent as f32 / 100.0, 12.0, GREEN);
    draw_text(&format!("Generating map {}%", percent), x, y - 8.0, 20.0, WHITE);
}
