//! Match statistics tracking and persistence.
//!
//! This module tracks how the search agent fares over a match:
//! - Game outcomes, split by which side moved first
//! - Game lengths
//! - Depth reached per turn, and how often only the opening guess was ready
//!
//! Stats are written to a JSON file at the end of the match.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, warn};

use crate::arena::{GameRecord, Outcome};

/// Aggregated match statistics, designed for lock-free updates.
#[derive(Debug)]
pub struct MatchStats {
    games: AtomicU32,
    wins: AtomicU32,
    losses: AtomicU32,
    /// Games lost because the agent had no move at its deadline
    forfeits: AtomicU32,
    games_as_first: AtomicU32,
    wins_as_first: AtomicU32,
    total_plies: AtomicU64,
    /// Agent turns that produced a move
    searched_turns: AtomicU64,
    /// Sum of depths over `searched_turns`
    total_depth: AtomicU64,
    /// Turns where only the random opening guess was available
    opening_only_turns: AtomicU32,
    start_time: Instant,
    stats_path: String,
    opponent: String,
    board: String,
}

/// Serializable stats for JSON output.
#[derive(Debug, Serialize, Deserialize)]
pub struct MatchStatsSnapshot {
    pub opponent: String,
    pub board: String,
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub forfeits: u32,
    pub win_rate: f64,
    pub games_as_first: u32,
    pub wins_as_first: u32,
    pub avg_game_length: f64,
    pub avg_completed_depth: f64,
    pub opening_only_turns: u32,
    pub runtime_seconds: f64,
    pub timestamp: u64,
}

impl MatchStats {
    /// Create a new stats tracker writing to `stats_path`.
    pub fn new(stats_path: &str, opponent: &str, board: &str) -> Self {
        if let Some(dir) = Path::new(stats_path).parent() {
            if !dir.as_os_str().is_empty() {
                if let Err(e) = fs::create_dir_all(dir) {
                    warn!("Failed to create stats directory: {}", e);
                }
            }
        }

        Self {
            games: AtomicU32::new(0),
            wins: AtomicU32::new(0),
            losses: AtomicU32::new(0),
            forfeits: AtomicU32::new(0),
            games_as_first: AtomicU32::new(0),
            wins_as_first: AtomicU32::new(0),
            total_plies: AtomicU64::new(0),
            searched_turns: AtomicU64::new(0),
            total_depth: AtomicU64::new(0),
            opening_only_turns: AtomicU32::new(0),
            start_time: Instant::now(),
            stats_path: stats_path.to_string(),
            opponent: opponent.to_string(),
            board: board.to_string(),
        }
    }

    /// Record a finished game.
    pub fn record_game(&self, game: &GameRecord) {
        self.games.fetch_add(1, Ordering::Relaxed);
        self.total_plies
            .fetch_add(game.plies as u64, Ordering::Relaxed);

        let won = game.outcome == Outcome::Won;
        match game.outcome {
            Outcome::Won => self.wins.fetch_add(1, Ordering::Relaxed),
            Outcome::Lost => self.losses.fetch_add(1, Ordering::Relaxed),
            Outcome::Forfeited => self.forfeits.fetch_add(1, Ordering::Relaxed),
        };

        if game.agent_moved_first() {
            self.games_as_first.fetch_add(1, Ordering::Relaxed);
            if won {
                self.wins_as_first.fetch_add(1, Ordering::Relaxed);
            }
        }

        for depth in game.turns.iter().filter_map(|t| t.depth) {
            self.searched_turns.fetch_add(1, Ordering::Relaxed);
            self.total_depth.fetch_add(depth as u64, Ordering::Relaxed);
            if depth == 0 {
                self.opening_only_turns.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Get a snapshot of current stats.
    pub fn snapshot(&self) -> MatchStatsSnapshot {
        let games = self.games.load(Ordering::Relaxed);
        let wins = self.wins.load(Ordering::Relaxed);
        let total_plies = self.total_plies.load(Ordering::Relaxed);
        let turns = self.searched_turns.load(Ordering::Relaxed);
        let opening_only = self.opening_only_turns.load(Ordering::Relaxed);
        let total_depth = self.total_depth.load(Ordering::Relaxed);

        let (win_rate, avg_game_length) = if games > 0 {
            (
                wins as f64 / games as f64,
                total_plies as f64 / games as f64,
            )
        } else {
            (0.0, 0.0)
        };

        // Opening guesses carry depth 0 and would drag the average down
        let searched = turns - opening_only as u64;
        let avg_completed_depth = if searched > 0 {
            total_depth as f64 / searched as f64
        } else {
            0.0
        };

        MatchStatsSnapshot {
            opponent: self.opponent.clone(),
            board: self.board.clone(),
            games_played: games,
            wins,
            losses: self.losses.load(Ordering::Relaxed),
            forfeits: self.forfeits.load(Ordering::Relaxed),
            win_rate,
            games_as_first: self.games_as_first.load(Ordering::Relaxed),
            wins_as_first: self.wins_as_first.load(Ordering::Relaxed),
            avg_game_length,
            avg_completed_depth,
            opening_only_turns: opening_only,
            runtime_seconds: self.start_time.elapsed().as_secs_f64(),
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        }
    }

    /// Write stats to JSON file (atomic write-then-rename).
    pub fn write_stats(&self) {
        let snapshot = self.snapshot();

        let json = match serde_json::to_string_pretty(&snapshot) {
            Ok(j) => j,
            Err(e) => {
                warn!("Failed to serialize match stats: {}", e);
                return;
            }
        };

        let temp_path = format!("{}.tmp", self.stats_path);
        let written =
            fs::File::create(&temp_path).and_then(|mut file| file.write_all(json.as_bytes()));
        if let Err(e) = written {
            warn!("Failed to write match stats: {}", e);
            let _ = fs::remove_file(&temp_path);
            return;
        }

        if let Err(e) = fs::rename(&temp_path, &self.stats_path) {
            warn!("Failed to rename stats file: {}", e);
            let _ = fs::remove_file(&temp_path);
            return;
        }

        debug!("Wrote match stats to {}", self.stats_path);
    }

    pub fn stats_path(&self) -> &str {
        &self.stats_path
    }
}
