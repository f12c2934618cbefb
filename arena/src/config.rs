//! Configuration for the arena runner
//!
//! Configuration is loaded from config.toml with environment variable overrides.
//! CLI arguments take highest priority, followed by env vars, then config.toml.

use anyhow::{anyhow, Result};
use clap::Parser;
use engine_config::{load_config, CentralConfig};
use once_cell::sync::Lazy;
use search::{MoveOrdering, SearchConfig};
use std::time::Duration;
use tracing::level_filters::LevelFilter;

use crate::policy::OpponentKind;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

// Default value functions that read from central config
fn default_rounds() -> u32 {
    CENTRAL_CONFIG.arena.rounds
}

fn default_time_limit_ms() -> u64 {
    CENTRAL_CONFIG.arena.time_limit_ms
}

fn default_opponent() -> String {
    CENTRAL_CONFIG.arena.opponent.clone()
}

fn default_board_width() -> u8 {
    CENTRAL_CONFIG.arena.board_width
}

fn default_board_height() -> u8 {
    CENTRAL_CONFIG.arena.board_height
}

fn default_stats_path() -> String {
    CENTRAL_CONFIG.arena.stats_path.clone()
}

fn default_rollouts() -> u32 {
    CENTRAL_CONFIG.search.rollouts
}

fn default_max_depth() -> u32 {
    CENTRAL_CONFIG.search.max_depth
}

fn default_move_ordering() -> String {
    CENTRAL_CONFIG.search.move_ordering.clone()
}

fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}

#[derive(Parser, Debug, Clone)]
#[command(name = "isolation-arena")]
#[command(about = "Isolation arena - pits the alpha-beta agent against a baseline")]
#[command(
    long_about = "Plays rounds of knight's Isolation between the iterative-deepening
alpha-beta agent and a baseline opponent, under a per-move time budget.

Configuration is loaded from config.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct Config {
    /// Number of games to play; sides alternate who moves first
    #[arg(long, default_value_t = default_rounds())]
    pub rounds: u32,

    /// Time budget per move for the searching player, in milliseconds
    #[arg(long, default_value_t = default_time_limit_ms())]
    pub time_limit_ms: u64,

    /// Baseline opponent (random, greedy)
    #[arg(long, default_value_t = default_opponent())]
    pub opponent: String,

    /// Board width in squares
    #[arg(long, default_value_t = default_board_width())]
    pub board_width: u8,

    /// Board height in squares
    #[arg(long, default_value_t = default_board_height())]
    pub board_height: u8,

    /// Random playouts per position evaluation
    #[arg(long, default_value_t = default_rollouts())]
    pub rollouts: u32,

    /// Deepest depth limit the agent may reach
    #[arg(long, default_value_t = default_max_depth())]
    pub max_depth: u32,

    /// Child ordering (max-ranked, inert, ranked, best-first, unranked)
    #[arg(long, default_value_t = default_move_ordering())]
    pub move_ordering: String,

    /// Seed for reproducible matches; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Where to write the JSON match summary
    #[arg(long, default_value_t = default_stats_path())]
    pub stats_path: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.rounds == 0 {
            return Err(anyhow!("rounds must be greater than 0"));
        }

        if self.time_limit_ms == 0 {
            return Err(anyhow!("time_limit_ms must be greater than 0"));
        }

        self.opponent_kind()?;

        isolation_board(self.board_width, self.board_height)?;

        self.search_config()?
            .validate()
            .map_err(|e| anyhow!("invalid search settings: {}", e))?;

        if self.stats_path.is_empty() {
            return Err(anyhow!("stats_path cannot be empty"));
        }

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        Ok(())
    }

    pub fn time_limit(&self) -> Duration {
        Duration::from_millis(self.time_limit_ms)
    }

    pub fn opponent_kind(&self) -> Result<OpponentKind> {
        self.opponent
            .parse()
            .map_err(|e| anyhow!("invalid opponent: {}", e))
    }

    pub fn move_ordering(&self) -> Result<MoveOrdering> {
        self.move_ordering
            .parse()
            .map_err(|e| anyhow!("invalid move_ordering: {}", e))
    }

    /// Search settings: central config values with CLI overrides applied.
    pub fn search_config(&self) -> Result<SearchConfig> {
        let central = &CENTRAL_CONFIG.search;
        Ok(SearchConfig::default()
            .with_rollouts(self.rollouts)
            .with_start_depth(central.start_depth)
            .with_max_depth(self.max_depth)
            .with_opening_random_plies(central.opening_random_plies)
            .with_move_ordering(self.move_ordering()?))
    }
}

/// Empty board of the configured size.
pub fn isolation_board(width: u8, height: u8) -> Result<games_isolation::Isolation> {
    games_isolation::Isolation::with_dimensions(width, height)
        .map_err(|e| anyhow!("invalid board: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            rounds: 2,
            time_limit_ms: 100,
            opponent: "random".into(),
            board_width: 7,
            board_height: 7,
            rollouts: 20,
            max_depth: 10,
            move_ordering: "inert".into(),
            seed: Some(1),
            stats_path: "./data/arena_stats.json".into(),
            log_level: "info".into(),
        }
    }

    #[test]
    fn validate_accepts_valid_configuration() {
        let cfg = base_config();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_rounds() {
        let mut cfg = base_config();
        cfg.rounds = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("rounds"));
    }

    #[test]
    fn validate_rejects_zero_time_limit() {
        let mut cfg = base_config();
        cfg.time_limit_ms = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("time_limit_ms"));
    }

    #[test]
    fn validate_rejects_unknown_opponent() {
        let mut cfg = base_config();
        cfg.opponent = "minimax".into();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("invalid opponent"));
    }

    #[test]
    fn validate_rejects_unknown_move_ordering() {
        let mut cfg = base_config();
        cfg.move_ordering = "sorted".into();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("move_ordering"));
    }

    #[test]
    fn validate_rejects_oversized_board() {
        let mut cfg = base_config();
        cfg.board_width = 12;
        cfg.board_height = 11;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("invalid board"));
    }

    #[test]
    fn validate_rejects_empty_board() {
        let mut cfg = base_config();
        cfg.board_height = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_rollouts() {
        let mut cfg = base_config();
        cfg.rollouts = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("rollouts"));
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut cfg = base_config();
        cfg.log_level = "nope".into();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("invalid log level"));
    }

    #[test]
    fn time_limit_returns_correct_duration() {
        let cfg = base_config();
        assert_eq!(cfg.time_limit(), Duration::from_millis(100));
    }

    #[test]
    fn search_config_applies_cli_values() {
        let mut cfg = base_config();
        cfg.move_ordering = "best-first".into();
        let search = cfg.search_config().unwrap();
        assert_eq!(search.rollouts, 20);
        assert_eq!(search.max_depth, 10);
        assert_eq!(search.move_ordering, MoveOrdering::BestFirst);
    }

    #[test]
    fn search_config_rejects_bad_move_ordering() {
        // Callers that skip validate() still see the error
        let mut cfg = base_config();
        cfg.move_ordering = "sorted".into();
        let err = cfg.search_config().unwrap_err();
        assert!(err.to_string().contains("invalid move_ordering"));
    }
}
