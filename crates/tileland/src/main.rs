//! Tileland viewer binary.
//!
//! Loads settings and an existing save (or creates a fresh noise world),
//! runs the terminal viewer, and archives the world on exit.
//!
//! Usage: `tileland [save-name]` (default save name: "world").

use std::path::Path;
use std::sync::Arc;

use tileland_storage::StorageError;
use tileland_viewer::{Settings, ViewerController};
use tileland_world::{generator_from_metadata, World};

mod terminal_input;

use terminal_input::TerminalInput;

fn main() -> std::io::Result<()> {
    init_logging();

    let save_name = std::env::args().nth(1).unwrap_or_else(|| "world".to_string());
    let settings = Settings::load(Path::new("settings.toml"));
    let save_dir = Path::new(&settings.save_directory).to_path_buf();

    let world = open_world(&save_name, &save_dir, &settings);
    let mut controller =
        ViewerController::new(world, settings.clone(), Box::new(TerminalInput::start()));

    let result = controller.run();

    let world = controller.world();
    let world = world.lock();
    match tileland_storage::save_map(&world, &save_name, &save_dir, true) {
        Ok(()) => tracing::info!(save = %save_name, "world archived on exit"),
        Err(err) => tracing::error!(save = %save_name, error = %err, "failed to save world"),
    }

    result
}

fn open_world(save_name: &str, save_dir: &Path, settings: &Settings) -> World {
    match tileland_storage::load_map(save_name, save_dir) {
        Ok(world) => world,
        Err(StorageError::NotFound { .. }) => {
            tracing::info!(save = %save_name, "no save found, creating a new world");
            new_world(settings)
        }
        Err(err) => {
            tracing::error!(save = %save_name, error = %err, "save is unreadable, starting fresh");
            new_world(settings)
        }
    }
}

fn new_world(settings: &Settings) -> World {
    let meta = settings.noise.to_metadata();
    let mut world = World::new(generator_from_metadata(&meta));
    world.set_metadata(meta);
    world
}

fn init_logging() {
    let Ok(log_file) = std::fs::File::create("tileland.log") else {
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .init();
}
