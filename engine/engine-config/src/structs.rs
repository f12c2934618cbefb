//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_rollouts() -> u32 {
    defaults::rollouts()
}
fn d_start_depth() -> u32 {
    defaults::start_depth()
}
fn d_max_depth() -> u32 {
    defaults::max_depth()
}
fn d_opening_random_plies() -> u32 {
    defaults::opening_random_plies()
}
fn d_move_ordering() -> String {
    defaults::move_ordering().into()
}
fn d_rounds() -> u32 {
    defaults::rounds()
}
fn d_time_limit_ms() -> u64 {
    defaults::time_limit_ms()
}
fn d_opponent() -> String {
    defaults::opponent().into()
}
fn d_board_width() -> u8 {
    defaults::board_width()
}
fn d_board_height() -> u8 {
    defaults::board_height()
}
fn d_stats_path() -> String {
    defaults::stats_path().into()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub arena: ArenaConfig,
}

/// Common configuration shared by all components
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_log_level")]
    pub log_level: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::log_level().into(),
        }
    }
}

/// Alpha-beta search configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    #[serde(default = "d_rollouts")]
    pub rollouts: u32,
    #[serde(default = "d_start_depth")]
    pub start_depth: u32,
    #[serde(default = "d_max_depth")]
    pub max_depth: u32,
    #[serde(default = "d_opening_random_plies")]
    pub opening_random_plies: u32,
    /// One of `max-ranked`, `inert`, `ranked`, `best-first`, `unranked`.
    #[serde(default = "d_move_ordering")]
    pub move_ordering: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            rollouts: defaults::rollouts(),
            start_depth: defaults::start_depth(),
            max_depth: defaults::max_depth(),
            opening_random_plies: defaults::opening_random_plies(),
            move_ordering: defaults::move_ordering().into(),
        }
    }
}

/// Match runner configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ArenaConfig {
    #[serde(default = "d_rounds")]
    pub rounds: u32,
    #[serde(default = "d_time_limit_ms")]
    pub time_limit_ms: u64,
    #[serde(default = "d_opponent")]
    pub opponent: String,
    #[serde(default = "d_board_width")]
    pub board_width: u8,
    #[serde(default = "d_board_height")]
    pub board_height: u8,
    #[serde(default = "d_stats_path")]
    pub stats_path: String,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            rounds: defaults::rounds(),
            time_limit_ms: defaults::time_limit_ms(),
            opponent: defaults::opponent().into(),
            board_width: defaults::board_width(),
            board_height: defaults::board_height(),
            stats_path: defaults::stats_path().into(),
        }
    }
}
