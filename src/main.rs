//! GRIDWEAVE demo: an editable tile world
//!
//! Drag to select, release to apply the active tool:
//! - 1-4: paint grass, sand, water, rock
//! - 5: place spawners
//! - 6: inspect (taps only)
//! - arrows: scroll, wheel: zoom, right click: pick a spawner / cancel a drag

use std::path::PathBuf;

use clap::Parser;
use macroquad::prelude::*;

use gridweave::model::{SpawnerSettings, Terrain, Tool};
use gridweave::view::{draw::draw_world, PointerState};
use gridweave::{Game, GameConfig, GameError, VERSION};

/// Scroll speed for the arrow keys, screen pixels per second
const PAN_SPEED: f32 = 480.0;

#[derive(Parser)]
#[command(name = "gridweave")]
#[command(about = "Editable tile world demo")]
struct Args {
    /// RON config file (defaults are used when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "gridweave=trace" (overrides RUST_LOG)
    #[arg(long)]
    log: Option<String>,
}

fn window_conf() -> Conf {
    Conf {
        window_title: format!("GRIDWEAVE v{}", VERSION),
        window_width: 1280,
        window_height: 800,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

fn init_logging(filter: Option<&str>) {
    let filter = match filter {
        Some(directives) => tracing_subscriber::EnvFilter::new(directives),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    };
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    // No system clock in the browser
    #[cfg(target_arch = "wasm32")]
    let subscriber = subscriber.without_time();
    subscriber.init();
}

fn load_config(path: Option<&PathBuf>) -> GameConfig {
    let Some(path) = path else {
        return GameConfig::default();
    };
    match GameConfig::load(path) {
        Ok(config) => {
            tracing::info!("loaded config from {}", path.display());
            config
        }
        Err(e) => {
            tracing::error!("failed to load {}: {}; using defaults", path.display(), e);
            GameConfig::default()
        }
    }
}

fn read_pointer() -> PointerState {
    let (x, y) = mouse_position();
    let (_, wheel) = mouse_wheel();
    PointerState {
        position: vec2(x, y),
        primary_down: is_mouse_button_down(MouseButton::Left),
        primary_pressed: is_mouse_button_pressed(MouseButton::Left),
        primary_released: is_mouse_button_released(MouseButton::Left),
        secondary_pressed: is_mouse_button_pressed(MouseButton::Right),
        // Platforms disagree on wheel units; one notch per frame
        wheel: if wheel == 0.0 { 0.0 } else { wheel.signum() },
    }
}

fn tool_for_key() -> Option<Tool> {
    let tools = [
        (KeyCode::Key1, Tool::Paint(Terrain::Grass)),
        (KeyCode::Key2, Tool::Paint(Terrain::Sand)),
        (KeyCode::Key3, Tool::Paint(Terrain::Water)),
        (KeyCode::Key4, Tool::Paint(Terrain::Rock)),
        (KeyCode::Key5, Tool::Place(SpawnerSettings::default())),
        (KeyCode::Key6, Tool::Inspect),
    ];
    tools
        .into_iter()
        .find(|(key, _)| is_key_pressed(*key))
        .map(|(_, tool)| tool)
}

fn pan_input(dt: f32) -> Vec2 {
    let mut dir = Vec2::ZERO;
    if is_key_down(KeyCode::Left) {
        dir.x -= 1.0;
    }
    if is_key_down(KeyCode::Right) {
        dir.x += 1.0;
    }
    if is_key_down(KeyCode::Up) {
        dir.y -= 1.0;
    }
    if is_key_down(KeyCode::Down) {
        dir.y += 1.0;
    }
    dir * PAN_SPEED * dt
}

/// Feed one frame of input, then advance the world.
fn run_frame(game: &mut Game, pointer: &PointerState, dt: f32) -> Result<(), GameError> {
    // Checked before the pointer: right click mid-drag cancels instead
    let picking = pointer.secondary_pressed && !game.grid_control_view().is_dragging();

    game.pointer(pointer)?;
    let pan = pan_input(dt);
    game.pan(pan.x, pan.y)?;
    if picking {
        game.pick_item(pointer.position)?;
    }
    game.tick(dt)
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    let args = Args::parse();
    init_logging(args.log.as_deref());

    let config = load_config(args.config.as_ref());
    let mut game = match Game::new(&config) {
        Ok(game) => game,
        Err(e) => {
            tracing::error!("cannot start: {}", e);
            return;
        }
    };

    loop {
        let dt = get_frame_time();

        if let Some(tool) = tool_for_key() {
            game.editor_mut().set_tool(tool);
        }

        if let Err(e) = run_frame(&mut game, &read_pointer(), dt) {
            tracing::error!("frame failed: {}", e);
        }

        for event in game.drain_events() {
            tracing::info!("{:?}", event);
        }

        draw_world(game.world_view());
        draw_text(&game.editor().tool().label(), 10.0, 24.0, 24.0, WHITE);

        next_frame().await
    }
}
