use std::path::{Path, PathBuf};

use engine::{Resolution, BASE_RESOLUTION};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

pub(crate) const CONFIG_FILE_NAME: &str = "config.json";
pub(crate) const SEED_ENV_VAR: &str = "CELLSIG_SEED";
pub(crate) const FULLSCREEN_ENV_VAR: &str = "CELLSIG_FULLSCREEN";
pub(crate) const MUSIC_ENV_VAR: &str = "CELLSIG_MUSIC";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    pub(crate) start_fullscreen: bool,
    pub(crate) music_enabled: bool,
    pub(crate) rng_seed: Option<u64>,
    pub(crate) max_render_fps: Option<u32>,
    pub(crate) window_size: Resolution,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            start_fullscreen: false,
            music_enabled: true,
            rng_seed: None,
            max_render_fps: Some(60),
            window_size: BASE_RESOLUTION,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path} at `{field}`: {source}")]
    Parse {
        path: PathBuf,
        field: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid value {value:?} for {var}")]
    InvalidEnv { var: &'static str, value: String },
    #[error("window size must be non-zero, got {width}x{height}")]
    InvalidWindowSize { width: u32, height: u32 },
}

/// Reads `path` when it exists, otherwise returns the defaults.
pub(crate) fn load_config(path: &Path) -> Result<GameConfig, ConfigError> {
    if !path.is_file() {
        info!(path = %path.display(), "config_defaults_used");
        return Ok(GameConfig::default());
    }
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(path, &raw)?;
    info!(path = %path.display(), "config_loaded");
    Ok(config)
}

fn parse_config(path: &Path, raw: &str) -> Result<GameConfig, ConfigError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let config = serde_path_to_error::deserialize::<_, GameConfig>(&mut deserializer).map_err(
        |error| {
            let field = error.path().to_string();
            ConfigError::Parse {
                path: path.to_path_buf(),
                field,
                source: error.into_inner(),
            }
        },
    )?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &GameConfig) -> Result<(), ConfigError> {
    if config.window_size.is_empty() {
        return Err(ConfigError::InvalidWindowSize {
            width: config.window_size.width,
            height: config.window_size.height,
        });
    }
    Ok(())
}

/// Applies `CELLSIG_*` overrides. `lookup` is `std::env::var(..).ok()` outside tests.
pub(crate) fn apply_env_overrides(
    mut config: GameConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<GameConfig, ConfigError> {
    if let Some(raw) = lookup(SEED_ENV_VAR) {
        let seed = raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidEnv {
            var: SEED_ENV_VAR,
            value: raw.clone(),
        })?;
        config.rng_seed = Some(seed);
    }
    if let Some(raw) = lookup(FULLSCREEN_ENV_VAR) {
        config.start_fullscreen = parse_flag(FULLSCREEN_ENV_VAR, &raw)?;
    }
    if let Some(raw) = lookup(MUSIC_ENV_VAR) {
        config.music_enabled = parse_flag(MUSIC_ENV_VAR, &raw)?;
    }
    Ok(config)
}

fn parse_flag(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidEnv {
            var,
            value: raw.to_string(),
        }),
    }
}
