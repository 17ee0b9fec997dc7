use engine::{
    resolve_app_paths, AssetError, AssetStore, AudioPlayer, Game, LoopConfig,
    MusicTrack, SilentTrack, StartupError,
};
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::art::{Art, MENU_TRACK_FILE};
use super::config::{apply_env_overrides, load_config, ConfigError, GameConfig, CONFIG_FILE_NAME};
use super::scenes::{RegistryError, SceneRegistry};
use super::session::Session;

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) game: Box<dyn Game>,
}

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    init_tracing();
    info!("=== Cell Signaling Startup ===");

    let paths = resolve_app_paths()?;
    info!(root = %paths.root.display(), "app_root_resolved");
    let config = load_config(&paths.assets_dir.join(CONFIG_FILE_NAME))?;
    let config = apply_env_overrides(config, |var| std::env::var(var).ok())?;

    let store = AssetStore::new(&paths.assets_dir);
    let art = Art::load(&store)?;
    let music = open_music(&store)?;

    let session = Session::init(SceneRegistry::standard(), art, music, &config)?;
    info!(
        scene = ?session.active_scene(),
        seed_signal = session.state().seed_signal.value(),
        music_playing = session.music_playing(),
        "session_ready"
    );

    Ok(AppWiring {
        config: loop_config(&config),
        game: Box::new(session),
    })
}

fn loop_config(config: &GameConfig) -> LoopConfig {
    LoopConfig {
        window_size: config.window_size,
        start_fullscreen: config.start_fullscreen,
        max_render_fps: config.max_render_fps,
        ..LoopConfig::default()
    }
}

/// The menu track must exist. A missing output device only silences it.
fn open_music(store: &AssetStore) -> Result<Box<dyn AudioPlayer>, AssetError> {
    let data = store.load_track(MENU_TRACK_FILE)?;
    match MusicTrack::open(data) {
        Ok(track) => Ok(Box::new(track)),
        Err(err) => {
            warn!(error = %err, "audio_unavailable");
            Ok(Box::new(SilentTrack::new()))
        }
    }
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
