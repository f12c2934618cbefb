//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use crate::CentralConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "ISOLATION_CONFIG";

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",    // Current directory
    "../config.toml", // Parent directory (when running from a crate directory)
];

/// Locate the config file to load, if any.
///
/// `ISOLATION_CONFIG` wins when it names an existing file; otherwise the
/// first existing entry of [`CONFIG_SEARCH_PATHS`] is used.
pub fn find_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.is_file() {
            return Some(path);
        }
        warn!(
            "{}={} not found, searching defaults",
            CONFIG_PATH_ENV,
            path.display()
        );
    }

    CONFIG_SEARCH_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|path| path.is_file())
}

/// Load the central configuration.
///
/// Priority, highest first:
/// 1. `ISOLATION_<SECTION>_<KEY>` environment variables
/// 2. The file found by [`find_config_path`]
/// 3. Built-in defaults from config.defaults.toml
pub fn load_config() -> CentralConfig {
    match find_config_path() {
        Some(path) => {
            info!("Loading config from {}", path.display());
            load_from_path(&path)
        }
        None => {
            debug!("No config.toml found, using built-in defaults");
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Load configuration from a specific path.
///
/// An unreadable or malformed file falls back to the built-in defaults.
pub fn load_from_path(path: impl AsRef<Path>) -> CentralConfig {
    let path = path.as_ref();
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))
        .and_then(|content| {
            toml::from_str(&content)
                .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
        });

    match parsed {
        Ok(config) => apply_env_overrides(config),
        Err(message) => {
            warn!("{}, using defaults", message);
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (i32, u64, f64, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        if let Ok(v) =
            std::env::var($key).and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            $config.$section.$field = v;
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: ISOLATION_<SECTION>_<KEY>
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    // Common
    env_override!(config, common.log_level, "ISOLATION_COMMON_LOG_LEVEL");

    // Search
    env_override!(config, search.rollouts, "ISOLATION_SEARCH_ROLLOUTS", parse);
    env_override!(
        config,
        search.start_depth,
        "ISOLATION_SEARCH_START_DEPTH",
        parse
    );
    env_override!(config, search.max_depth, "ISOLATION_SEARCH_MAX_DEPTH", parse);
    env_override!(
        config,
        search.opening_random_plies,
        "ISOLATION_SEARCH_OPENING_RANDOM_PLIES",
        parse
    );
    env_override!(
        config,
        search.move_ordering,
        "ISOLATION_SEARCH_MOVE_ORDERING"
    );

    // Arena
    env_override!(config, arena.rounds, "ISOLATION_ARENA_ROUNDS", parse);
    env_override!(
        config,
        arena.time_limit_ms,
        "ISOLATION_ARENA_TIME_LIMIT_MS",
        parse
    );
    env_override!(config, arena.opponent, "ISOLATION_ARENA_OPPONENT");
    env_override!(
        config,
        arena.board_width,
        "ISOLATION_ARENA_BOARD_WIDTH",
        parse
    );
    env_override!(
        config,
        arena.board_height,
        "ISOLATION_ARENA_BOARD_HEIGHT",
        parse
    );
    env_override!(config, arena.stats_path, "ISOLATION_ARENA_STATS_PATH");

    config
}
