//! Orchestrator
//!
//! `Game` owns every collaborator and is the only place they meet. Each
//! component buffers its own typed events; `Game` pumps all queues until
//! they are empty and routes every event through one `match` arm, so each
//! route exists exactly once and nothing can be left unbound.
//!
//! Routing (source → destination):
//! - world view `ChangeOffset` → grid model scroll
//! - editor `RefreshMap` → grid view, `AddModel` → static models (and its
//!   spawn/wake signals → registry), `SelectionCount` → external
//! - grid model `Update`/`RefreshMap` → grid view, `SelectionChange` and
//!   `Selection` → editor, `Progress` → world view, `Point` → point hook
//! - control model `Selection` → editor
//! - control view gestures → control model (`End` also external), `Pinch`
//!   → grid view scale
//! - grid view `SelectItem`/`UnselectItem` → external
//!
//! Per frame the grid model ticks first, then the registry syncs views.

use macroquad::math::Vec2;
use thiserror::Error;

use super::event::{
    ControlModelEvent, ControlViewEvent, EditorEvent, EventQueue, GameEvent, GridModelEvent,
    GridViewEvent, StaticModelEvent, WorldViewEvent,
};
use super::registry::{EntityCategory, EntityRegistry, RegistryError};
use crate::config::{ConfigError, GameConfig};
use crate::model::{GridControlModel, GridEditor, GridModel, StaticModelId, TilePoint};
use crate::view::{GridControlView, GridView, PointerState, WorldView};

#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
    #[error("frame delta {0} is not finite")]
    NonFiniteDelta(f32),
}

/// Convert generation progress (0.0..=1.0) into a whole percentage.
pub fn progress_percent(progress: f32) -> u8 {
    (progress.clamp(0.0, 1.0) * 100.0).floor() as u8
}

type PointHook = Box<dyn FnMut(TilePoint)>;

pub struct Game {
    world_view: WorldView,
    grid: GridModel,
    editor: GridEditor,
    control: GridControlModel,
    registry: EntityRegistry,
    /// Static models whose spawn/wake signals feed the registry
    spawners: Vec<StaticModelId>,
    events: EventQueue<GameEvent>,
    point_hook: Option<PointHook>,
}

impl Game {
    pub fn new(config: &GameConfig) -> Result<Self, GameError> {
        config.validate()?;

        // Views first, then everything that feeds them
        let mut world_view = WorldView::new(config);
        let grid = GridModel::new(&config.grid, &config.map);
        let editor = GridEditor::new(&config.editor);
        let control = GridControlModel::new();
        let registry = EntityRegistry::new();

        world_view.grid_view_mut().on_refresh_map(&grid);
        world_view.grid_view_mut().on_update(&grid);
        tracing::info!(
            "game ready: {}x{} tiles, tool {}",
            config.grid.width,
            config.grid.height,
            editor.tool().label()
        );

        Ok(Self {
            world_view,
            grid,
            editor,
            control,
            registry,
            spawners: Vec::new(),
            events: EventQueue::new(),
            point_hook: None,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn editor(&self) -> &GridEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut GridEditor {
        &mut self.editor
    }

    pub fn grid_view(&self) -> &GridView {
        self.world_view.grid_view()
    }

    pub fn grid_control_view(&self) -> &GridControlView {
        self.world_view.grid_control_view()
    }

    pub fn grid_model(&self) -> &GridModel {
        &self.grid
    }

    pub fn world_view(&self) -> &WorldView {
        &self.world_view
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Called with every tapped tile.
    pub fn set_point_hook(&mut self, hook: impl FnMut(TilePoint) + 'static) {
        self.point_hook = Some(Box::new(hook));
    }

    /// External events raised since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.take()
    }

    // =========================================================================
    // Frame driver and input
    // =========================================================================

    /// Advance one frame: grid model, then everything it raised, then views.
    ///
    /// Views are synced even when routing failed; the first routing error is
    /// returned afterwards.
    pub fn tick(&mut self, dt: f32) -> Result<(), GameError> {
        if !dt.is_finite() {
            return Err(GameError::NonFiniteDelta(dt));
        }
        self.grid.tick(dt);
        let routed = self.dispatch_pending();

        let dropped = self.registry.tick(
            dt,
            self.grid.dynamic_models(),
            self.world_view.grid_view_mut().entity_layer_mut(),
        );
        if dropped > 0 {
            tracing::debug!("registry dropped {} disposed entities", dropped);
        }
        routed
    }

    /// Feed one frame of pointer state to the control view.
    pub fn pointer(&mut self, pointer: &PointerState) -> Result<(), GameError> {
        self.world_view.grid_control_view_mut().handle_pointer(pointer);
        self.dispatch_pending()
    }

    /// Move the camera by a screen-space delta.
    pub fn pan(&mut self, dx: f32, dy: f32) -> Result<(), GameError> {
        self.world_view.pan(dx, dy);
        self.dispatch_pending()
    }

    /// Select the static model under a screen position, if any.
    pub fn pick_item(&mut self, screen: Vec2) -> Result<(), GameError> {
        self.world_view.grid_view_mut().pick(screen);
        self.dispatch_pending()
    }

    // =========================================================================
    // Routing
    // =========================================================================

    /// Route queued events until every queue is empty. A failing route does
    /// not stop the others; the first error is returned once all are quiet.
    fn dispatch_pending(&mut self) -> Result<(), GameError> {
        let mut first_error = None;
        loop {
            let mut routed = 0;

            for event in self.world_view.events_mut().take() {
                routed += 1;
                self.route_world_view(event);
            }
            for event in self.world_view.grid_control_view_mut().events_mut().take() {
                routed += 1;
                self.route_control_view(event);
            }
            for event in self.control.events_mut().take() {
                routed += 1;
                self.route_control_model(event);
            }
            for event in self.grid.events_mut().take() {
                routed += 1;
                self.route_grid_model(event);
            }
            for event in self.editor.events_mut().take() {
                routed += 1;
                self.route_editor(event);
            }
            for event in self.world_view.grid_view_mut().events_mut().take() {
                routed += 1;
                self.route_grid_view(event);
            }
            for event in self.take_lifecycle_events() {
                routed += 1;
                if let Err(e) = self.route_static_model(event) {
                    tracing::warn!("{}", e);
                    first_error.get_or_insert(e);
                }
            }

            if routed == 0 {
                return first_error.map_or(Ok(()), Err);
            }
        }
    }

    /// Collect spawn/wake signals from every bound static model, forgetting
    /// models that no longer exist.
    fn take_lifecycle_events(&mut self) -> Vec<StaticModelEvent> {
        let statics = self.grid.static_models_mut();
        let mut events = Vec::new();
        self.spawners.retain(|&id| match statics.get_mut(id) {
            Some(model) => {
                events.extend(model.events_mut().drain());
                true
            }
            None => statics.is_pending(id),
        });
        events
    }

    fn route_world_view(&mut self, event: WorldViewEvent) {
        match event {
            WorldViewEvent::ChangeOffset { dx, dy } => self.grid.scroll_by(dx, dy),
        }
    }

    fn route_control_view(&mut self, event: ControlViewEvent) {
        let viewport = *self.world_view.grid_view().viewport();
        match event {
            ControlViewEvent::Start(pos) => self.control.on_start(pos, &viewport, &mut self.grid),
            ControlViewEvent::Drag(pos) => self.control.on_drag(pos, &viewport, &mut self.grid),
            ControlViewEvent::End(pos) => {
                self.control.on_end(pos, &viewport, &mut self.grid);
                self.events.send(GameEvent::SelectionEnd);
            }
            ControlViewEvent::Select(pos) => self.control.on_select(pos, &viewport, &mut self.grid),
            ControlViewEvent::SelectCancel => self.control.on_select_cancel(&mut self.grid),
            ControlViewEvent::Pinch(scale) => self.world_view.grid_view_mut().set_scale(scale),
        }
    }

    fn route_control_model(&mut self, event: ControlModelEvent) {
        match event {
            ControlModelEvent::Selection(selection) => {
                self.editor.on_selection_apply(&selection, &mut self.grid)
            }
        }
    }

    fn route_grid_model(&mut self, event: GridModelEvent) {
        match event {
            GridModelEvent::Update => self.world_view.grid_view_mut().on_update(&self.grid),
            GridModelEvent::RefreshMap => self.world_view.grid_view_mut().on_refresh_map(&self.grid),
            GridModelEvent::SelectionChange(selection) => {
                self.editor.on_selection_change(selection.as_ref(), &self.grid)
            }
            GridModelEvent::Selection(selection) => {
                self.editor.on_selection_apply(&selection, &mut self.grid)
            }
            GridModelEvent::Progress(progress) => {
                self.world_view.set_progress(progress_percent(progress))
            }
            GridModelEvent::Point(tile) => match self.point_hook.as_mut() {
                Some(hook) => hook(tile),
                None => tracing::trace!("point at {:?}", tile),
            },
        }
    }

    fn route_editor(&mut self, event: EditorEvent) {
        match event {
            EditorEvent::RefreshMap => self.world_view.grid_view_mut().on_refresh_map(&self.grid),
            EditorEvent::AddModel(model) => {
                let tile = model.tile();
                let id = self.grid.static_models_mut().add(model);
                self.spawners.push(id);
                tracing::debug!("added {} at {:?}", id, tile);
            }
            EditorEvent::SelectionCount(count) => self.events.send(GameEvent::SelectionCount(count)),
        }
    }

    fn route_grid_view(&mut self, event: GridViewEvent) {
        match event {
            GridViewEvent::SelectItem(item) => self.events.send(GameEvent::SelectItem(item)),
            GridViewEvent::UnselectItem => self.events.send(GameEvent::UnselectItem),
        }
    }

    fn route_static_model(&mut self, event: StaticModelEvent) -> Result<(), GameError> {
        let models = self.grid.dynamic_models();
        let views = self.world_view.grid_view_mut().entity_layer_mut();
        match event {
            StaticModelEvent::Spawned(entity) => {
                self.registry.register(entity, EntityCategory::Dynamic, models, views)?;
            }
            StaticModelEvent::Woken(entity) => self.registry.reactivate(entity, models, views)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GridSettings, MapSettings};
    use crate::game::{Entity, SelectionCount};
    use crate::model::{Selection, SpawnerSettings, Terrain, Tool};
    use macroquad::math::vec2;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// 6x6 grass map of 10px tiles, generated in a single tick.
    fn test_config() -> GameConfig {
        GameConfig {
            grid: GridSettings { width: 6, height: 6, tile_size: 10.0 },
            map: MapSettings {
                water_chance: 0.0,
                rock_chance: 0.0,
                sand_chance: 0.0,
                rows_per_tick: 6,
                ..MapSettings::default()
            },
            ..GameConfig::default()
        }
    }

    fn spawner() -> SpawnerSettings {
        SpawnerSettings {
            interval: 0.5,
            capacity: 1,
            lifespan: 10.0,
            dormant_limit: 10.0,
            speed: 0.0,
        }
    }

    fn tap(game: &mut Game, x: f32, y: f32) {
        let position = vec2(x, y);
        game.pointer(&PointerState {
            position,
            primary_down: true,
            primary_pressed: true,
            ..PointerState::default()
        })
        .unwrap();
        game.pointer(&PointerState {
            position,
            primary_released: true,
            ..PointerState::default()
        })
        .unwrap();
    }

    /// Generated map with a spawner placed on tile (1, 1) by tapping it.
    fn game_with_spawner() -> Game {
        let mut game = Game::new(&test_config()).unwrap();
        game.tick(0.0).unwrap();
        game.editor_mut().set_tool(Tool::Place(spawner()));
        tap(&mut game, 15.0, 15.0);
        game
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(progress_percent(0.567), 56);
        assert_eq!(progress_percent(0.0), 0);
        assert_eq!(progress_percent(1.0), 100);
        for i in 0..=1000 {
            assert!(progress_percent(i as f32 / 1000.0) <= 100);
        }
    }

    #[test]
    fn test_new_binds_grid_view() {
        let mut game = Game::new(&GameConfig::default()).unwrap();
        let refreshes = game.grid_view().refresh_count();
        let updates = game.grid_view().update_count();
        assert_eq!(game.grid_view().map_size(), (32, 24));

        game.tick(0.016).unwrap();
        assert_eq!(game.grid_view().update_count(), updates + 1);
        // 4 of 24 rows generated
        assert_eq!(game.world_view().progress(), Some(16));

        let mut small = Game::new(&test_config()).unwrap();
        small.tick(0.016).unwrap();
        assert_eq!(small.grid_view().refresh_count(), refreshes + 1);
        assert_eq!(small.world_view().progress(), Some(100));
    }

    #[test]
    fn test_spawn_registers_once_and_shows_same_tick() {
        let mut game = game_with_spawner();
        assert_eq!(game.spawners.len(), 1);
        assert!(game.registry().is_empty());

        game.tick(0.5).unwrap();
        let (entity, _) = game.grid_model().dynamic_models().iter().next().unwrap();
        let record = game.registry().get(entity).copied().unwrap();
        assert_eq!(record.category, EntityCategory::Dynamic);
        // Synced by the registry tick that followed the grid tick
        assert!(game.grid_view().entity_layer().get(record.view).unwrap().visible);

        for _ in 0..4 {
            game.tick(0.5).unwrap();
        }
        assert_eq!(game.registry().len(), 1);
        assert_eq!(game.grid_view().entity_layer().active_count(), 1);
    }

    #[test]
    fn test_wake_without_registration_fails_tick() {
        let mut game = game_with_spawner();
        game.tick(0.1).unwrap();
        let id = game.spawners[0];
        let ghost = Entity::new(99, 0);
        game.grid
            .static_models_mut()
            .get_mut(id)
            .unwrap()
            .events_mut()
            .send(StaticModelEvent::Woken(ghost));

        match game.tick(0.0) {
            Err(GameError::Registry(RegistryError::NotRegistered(entity))) => assert_eq!(entity, ghost),
            other => panic!("expected NotRegistered, got {:?}", other),
        }
    }

    #[test]
    fn test_selection_count_passes_through() {
        let mut game = Game::new(&test_config()).unwrap();
        let count = SelectionCount { total: 5, changed: 2 };
        game.editor.events_mut().send(EditorEvent::SelectionCount(Some(count)));
        game.dispatch_pending().unwrap();
        assert_eq!(game.drain_events(), vec![GameEvent::SelectionCount(Some(count))]);
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn test_drag_paints_and_ends_selection() {
        let mut game = Game::new(&test_config()).unwrap();
        game.tick(0.0).unwrap();
        for x in 1..=3 {
            game.grid.map_mut().set_terrain(TilePoint::new(x, 0), Terrain::Water);
        }
        game.editor_mut().set_tool(Tool::Paint(Terrain::Water));

        let press = PointerState {
            position: vec2(5.0, 5.0),
            primary_down: true,
            primary_pressed: true,
            ..PointerState::default()
        };
        game.pointer(&press).unwrap();
        game.pointer(&PointerState { position: vec2(45.0, 5.0), primary_down: true, ..PointerState::default() })
            .unwrap();
        assert!(game.grid_control_view().is_dragging());
        assert_eq!(
            game.drain_events(),
            vec![
                GameEvent::SelectionCount(Some(SelectionCount { total: 1, changed: 1 })),
                GameEvent::SelectionCount(Some(SelectionCount { total: 5, changed: 2 })),
            ]
        );

        game.pointer(&PointerState { position: vec2(45.0, 5.0), primary_released: true, ..PointerState::default() })
            .unwrap();
        assert_eq!(
            game.drain_events(),
            vec![GameEvent::SelectionEnd, GameEvent::SelectionCount(None)]
        );
        for x in 0..=4 {
            let terrain = game.grid_view().tile(TilePoint::new(x, 0)).map(|t| t.terrain);
            assert_eq!(terrain, Some(Terrain::Water));
        }
    }

    #[test]
    fn test_pinch_scales_grid_view() {
        let mut game = Game::new(&test_config()).unwrap();
        game.pointer(&PointerState { wheel: 1.0, ..PointerState::default() }).unwrap();
        assert_eq!(game.grid_view().scale(), 1.1);
    }

    #[test]
    fn test_pan_scrolls_on_next_update() {
        let mut game = Game::new(&test_config()).unwrap();
        game.tick(0.0).unwrap();
        game.pan(10.0, 20.0).unwrap();
        assert_eq!(game.grid_model().offset(), vec2(10.0, 20.0));
        assert_eq!(game.grid_view().viewport().offset, Vec2::ZERO);

        game.tick(0.0).unwrap();
        assert_eq!(game.grid_view().viewport().offset, vec2(10.0, 20.0));
    }

    #[test]
    fn test_pick_item() {
        let mut game = game_with_spawner();
        game.tick(0.0).unwrap();

        game.pick_item(vec2(15.0, 15.0)).unwrap();
        let events = game.drain_events();
        assert!(matches!(
            events.as_slice(),
            [GameEvent::SelectItem(item)] if item.tile == TilePoint::new(1, 1)
        ));

        game.pick_item(vec2(55.0, 55.0)).unwrap();
        assert_eq!(game.drain_events(), vec![GameEvent::UnselectItem]);
    }

    #[test]
    fn test_point_hook_receives_taps() {
        let mut game = Game::new(&test_config()).unwrap();
        game.tick(0.0).unwrap();
        game.editor_mut().set_tool(Tool::Inspect);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        game.set_point_hook(move |tile| sink.borrow_mut().push(tile));

        tap(&mut game, 32.0, 21.0);
        assert_eq!(*seen.borrow(), vec![TilePoint::new(3, 2)]);
    }

    #[test]
    fn test_failed_wake_does_not_drop_spawn() {
        let mut game = game_with_spawner();
        game.tick(0.1).unwrap();
        let id = game.spawners[0];
        let ghost = Entity::new(99, 0);
        game.grid
            .static_models_mut()
            .get_mut(id)
            .unwrap()
            .events_mut()
            .send(StaticModelEvent::Woken(ghost));

        // Timer reaches the interval: a real spawn queues behind the bad wake
        assert!(matches!(
            game.tick(0.5),
            Err(GameError::Registry(RegistryError::NotRegistered(_)))
        ));
        let spawned: Vec<_> = game.grid_model().dynamic_models().iter().map(|(e, _)| e).collect();
        assert_eq!(spawned.len(), 1);
        let record = game.registry().get(spawned[0]).copied().unwrap();
        assert!(game.grid_view().entity_layer().get(record.view).unwrap().visible);

        game.tick(0.1).unwrap();
    }

    #[test]
    fn test_tick_rejects_non_finite_delta() {
        let mut game = game_with_spawner();
        assert!(matches!(game.tick(f32::INFINITY), Err(GameError::NonFiniteDelta(_))));
        assert!(matches!(game.tick(f32::NAN), Err(GameError::NonFiniteDelta(_))));
        // Nothing advanced: the spawner is still queued
        assert!(game.grid_model().static_models().is_empty());

        game.tick(1.0e9).unwrap();
        assert_eq!(game.registry().len(), 1);
    }

    #[test]
    fn test_drag_highlight_reaches_grid_view() {
        let mut game = Game::new(&test_config()).unwrap();
        game.tick(0.0).unwrap();
        game.editor_mut().set_tool(Tool::Inspect);

        game.pointer(&PointerState {
            position: vec2(5.0, 5.0),
            primary_down: true,
            primary_pressed: true,
            ..PointerState::default()
        })
        .unwrap();
        game.pointer(&PointerState { position: vec2(45.0, 5.0), primary_down: true, ..PointerState::default() })
            .unwrap();
        game.tick(0.0).unwrap();

        let expected = Selection::new(TilePoint::new(0, 0), TilePoint::new(4, 0));
        assert_eq!(game.grid_model().selection(), Some(expected));
        assert_eq!(game.grid_view().selection(), Some(expected));

        game.pointer(&PointerState { position: vec2(45.0, 5.0), primary_released: true, ..PointerState::default() })
            .unwrap();
        game.tick(0.0).unwrap();
        assert_eq!(game.grid_view().selection(), None);
    }

    #[test]
    fn test_every_spawner_registers_each_child() {
        let mut game = Game::new(&test_config()).unwrap();
        game.tick(0.0).unwrap();
        game.editor_mut().set_tool(Tool::Place(SpawnerSettings { capacity: 2, ..spawner() }));

        // Drag across tiles (0, 0)..=(3, 0): four spawners
        game.pointer(&PointerState {
            position: vec2(5.0, 5.0),
            primary_down: true,
            primary_pressed: true,
            ..PointerState::default()
        })
        .unwrap();
        game.pointer(&PointerState { position: vec2(35.0, 5.0), primary_down: true, ..PointerState::default() })
            .unwrap();
        game.pointer(&PointerState { position: vec2(35.0, 5.0), primary_released: true, ..PointerState::default() })
            .unwrap();
        assert_eq!(game.spawners.len(), 4);

        for _ in 0..4 {
            game.tick(0.5).unwrap();
        }
        let dynamics = game.grid_model().dynamic_models();
        assert_eq!(dynamics.len(), 8);
        assert_eq!(game.registry().len(), dynamics.len());
        assert!(dynamics.iter().all(|(entity, _)| game.registry().contains(entity)));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = test_config();
        config.grid.tile_size = 0.0;
        assert!(matches!(
            Game::new(&config),
            Err(GameError::Config(ConfigError::Invalid(_)))
        ));

        let mut config = test_config();
        config.view.min_scale = 5.0;
        assert!(matches!(
            Game::new(&config),
            Err(GameError::Config(ConfigError::Invalid(_)))
        ));
    }
}
