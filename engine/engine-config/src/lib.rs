//! Centralized configuration loading from config.toml.
//!
//! This crate provides configuration structs and loading logic shared by the
//! search library defaults and the arena binary.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`ISOLATION_<SECTION>_<KEY>`)
//! 2. config.toml file (or the file named by `ISOLATION_CONFIG`)
//! 3. Built-in defaults
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! ISOLATION_<SECTION>_<KEY>=value
//!
//! Examples:
//!     ISOLATION_COMMON_LOG_LEVEL=debug
//!     ISOLATION_SEARCH_ROLLOUTS=200
//!     ISOLATION_SEARCH_MOVE_ORDERING=best-first
//!     ISOLATION_ARENA_TIME_LIMIT_MS=500
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{
    apply_env_overrides, find_config_path, load_config, load_from_path, CONFIG_PATH_ENV,
    CONFIG_SEARCH_PATHS,
};
pub use structs::*;
