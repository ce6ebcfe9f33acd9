//! Grid editor
//!
//! Applies the active tool to selections coming from the grid model or the
//! control model. While a selection is being dragged it reports how many
//! tiles the tool would touch (`SelectionCount`), so UI panels can show
//! "12 tiles, 5 changed" before the user lets go.

use serde::{Deserialize, Serialize};

use super::grid::GridModel;
use super::selection::Selection;
use super::static_model::{SpawnerSettings, StaticModel};
use super::tile_map::Terrain;
use crate::config::EditorSettings;
use crate::game::{EditorEvent, EventQueue, SelectionCount};

/// What applying a selection does.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Tool {
    /// Paint terrain on every tile without a static model
    Paint(Terrain),
    /// Anchor a spawner on every free, buildable tile
    Place(SpawnerSettings),
    /// Selections change nothing
    Inspect,
}

impl Default for Tool {
    fn default() -> Self {
        Tool::Paint(Terrain::Sand)
    }
}

impl Tool {
    pub fn label(&self) -> String {
        match self {
            Tool::Paint(terrain) => format!("Paint {}", terrain.label()),
            Tool::Place(_) => "Place spawner".to_string(),
            Tool::Inspect => "Inspect".to_string(),
        }
    }
}

#[derive(Debug)]
pub struct GridEditor {
    tool: Tool,
    /// Last count reported, to avoid repeating identical events
    last_count: Option<SelectionCount>,
    events: EventQueue<EditorEvent>,
}

impl GridEditor {
    pub fn new(settings: &EditorSettings) -> Self {
        Self {
            tool: settings.tool,
            last_count: None,
            events: EventQueue::new(),
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn set_tool(&mut self, tool: Tool) {
        tracing::debug!("editor tool: {}", tool.label());
        self.tool = tool;
    }

    pub fn events_mut(&mut self) -> &mut EventQueue<EditorEvent> {
        &mut self.events
    }

    /// Tiles in `selection` the active tool would change.
    pub fn count(&self, selection: &Selection, grid: &GridModel) -> SelectionCount {
        let changed = match self.tool {
            Tool::Paint(terrain) => selection
                .tiles()
                .filter(|&p| {
                    grid.map()
                        .get(p)
                        .is_some_and(|tile| tile.model.is_none() && tile.terrain != terrain)
                })
                .count(),
            Tool::Place(_) => selection.tiles().filter(|&p| grid.is_tile_free(p)).count(),
            Tool::Inspect => 0,
        };
        SelectionCount {
            total: selection.tile_count(),
            changed,
        }
    }

    pub fn on_selection_change(&mut self, selection: Option<&Selection>, grid: &GridModel) {
        let count = selection.map(|sel| self.count(sel, grid));
        self.report(count);
    }

    pub fn on_selection_apply(&mut self, selection: &Selection, grid: &mut GridModel) {
        match self.tool {
            Tool::Paint(terrain) => {
                let mut changed = 0;
                for p in selection.tiles() {
                    let paintable = grid.map().get(p).is_some_and(|tile| tile.model.is_none());
                    if paintable && grid.map_mut().set_terrain(p, terrain) {
                        changed += 1;
                    }
                }
                if changed > 0 {
                    tracing::debug!("painted {} tiles with {}", changed, terrain.label());
                    self.events.send(EditorEvent::RefreshMap);
                }
            }
            Tool::Place(settings) => {
                let free: Vec<_> = selection.tiles().filter(|&p| grid.is_tile_free(p)).collect();
                if free.is_empty() {
                    tracing::warn!("no free tile to place a spawner in {:?}", selection);
                }
                for tile in free {
                    self.events.send(EditorEvent::AddModel(StaticModel::new(tile, settings)));
                }
            }
            Tool::Inspect => {}
        }
        self.report(None);
    }

    fn report(&mut self, count: Option<SelectionCount>) {
        if count != self.last_count {
            self.last_count = count;
            self.events.send(EditorEvent::SelectionCount(count));
        }
    }
}
