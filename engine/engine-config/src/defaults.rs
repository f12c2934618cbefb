//! Default configuration values loaded from config.defaults.toml.
//!
//! This module loads defaults from the shared TOML file at compile time,
//! so the library crates and the arena binary agree on every default.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    search: SearchDefaults,
    arena: ArenaDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    log_level: String,
}

#[derive(Debug, Deserialize)]
struct SearchDefaults {
    rollouts: u32,
    start_depth: u32,
    max_depth: u32,
    opening_random_plies: u32,
    move_ordering: String,
}

#[derive(Debug, Deserialize)]
struct ArenaDefaults {
    rounds: u32,
    time_limit_ms: u64,
    opponent: String,
    board_width: u8,
    board_height: u8,
    stats_path: String,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}

// Search
pub fn rollouts() -> u32 {
    DEFAULTS.search.rollouts
}
pub fn start_depth() -> u32 {
    DEFAULTS.search.start_depth
}
pub fn max_depth() -> u32 {
    DEFAULTS.search.max_depth
}
pub fn opening_random_plies() -> u32 {
    DEFAULTS.search.opening_random_plies
}
pub fn move_ordering() -> &'static str {
    &DEFAULTS.search.move_ordering
}

// Arena
pub fn rounds() -> u32 {
    DEFAULTS.arena.rounds
}
pub fn time_limit_ms() -> u64 {
    DEFAULTS.arena.time_limit_ms
}
pub fn opponent() -> &'static str {
    &DEFAULTS.arena.opponent
}
pub fn board_width() -> u8 {
    DEFAULTS.arena.board_width
}
pub fn board_height() -> u8 {
    DEFAULTS.arena.board_height
}
pub fn stats_path() -> &'static str {
    &DEFAULTS.arena.stats_path
}
