use stage::{resolve_app_paths, LoopConfig, Scene};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::config::{load_game_config, GameConfig};
use super::gameplay;

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene: Box<dyn Scene>,
}

pub(crate) fn build_app() -> AppWiring {
    init_tracing();
    info!("=== Trailhop Startup ===");

    let game_config = match resolve_app_paths() {
        Ok(paths) => load_game_config(&paths.config_path),
        Err(error) => {
            warn!(error = %error, "could not resolve app paths; using default configuration");
            GameConfig::default()
        }
    };

    let config = LoopConfig {
        target_tps: game_config.target_tps,
        ..LoopConfig::default()
    };
    let scene = gameplay::build_scene(game_config);

    AppWiring { config, scene }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
