//! Match loop: the search agent against a baseline opponent.

use anyhow::Result;
use engine_core::{GameState, Player};
use games_isolation::Isolation;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

use crate::config::{isolation_board, Config};
use crate::policy::{OpponentKind, Policy};
use crate::search_policy::{SearchPolicy, TurnRecord};
use crate::stats::MatchStats;

/// Result of one game from the agent's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
    /// The agent had no move ready at its deadline
    Forfeited,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Won => "won",
            Outcome::Lost => "lost",
            Outcome::Forfeited => "forfeited",
        }
    }
}

/// One finished game.
#[derive(Debug, Clone)]
pub struct GameRecord {
    pub round: u32,
    /// Side the agent played
    pub agent: Player,
    pub outcome: Outcome,
    pub plies: u32,
    pub turns: Vec<TurnRecord>,
}

impl GameRecord {
    pub fn agent_moved_first(&self) -> bool {
        self.agent == Player::First
    }
}

pub struct Arena {
    config: Config,
    opponent: OpponentKind,
    stats: MatchStats,
    shutdown_signal: AtomicBool,
}

impl Arena {
    pub fn new(config: Config) -> Result<Self> {
        let opponent = config.opponent_kind()?;
        let board = format!("{}x{}", config.board_width, config.board_height);
        let stats = MatchStats::new(&config.stats_path, opponent.as_str(), &board);

        info!(
            opponent = %opponent,
            board = %board,
            time_limit_ms = config.time_limit_ms,
            rollouts = config.rollouts,
            move_ordering = %config.move_ordering,
            "Arena initialized"
        );

        Ok(Self {
            config,
            opponent,
            stats,
            shutdown_signal: AtomicBool::new(false),
        })
    }

    /// Play every round, then write the stats file.
    pub fn run(&self) -> Result<()> {
        let progress = self.progress_bar()?;

        for round in 0..self.config.rounds {
            if self.shutdown_signal.load(Ordering::Relaxed) {
                info!(round, "Shutdown signal received, stopping match");
                break;
            }

            let record = self.play_game(round)?;
            self.stats.record_game(&record);

            let log_game = || {
                info!(
                    round = record.round + 1,
                    rounds = self.config.rounds,
                    agent = %record.agent,
                    outcome = record.outcome.as_str(),
                    plies = record.plies,
                    "Game finished"
                )
            };
            match progress {
                Some(ref pb) => {
                    pb.inc(1);
                    // Keep log lines from tearing the bar
                    pb.suspend(log_game);
                }
                None => log_game(),
            }
        }

        if let Some(pb) = progress {
            pb.finish_with_message("done");
        }

        self.stats.write_stats();

        let summary = self.stats.snapshot();
        info!(
            games = summary.games_played,
            wins = summary.wins,
            losses = summary.losses,
            forfeits = summary.forfeits,
            win_rate = %format!("{:.1}%", summary.win_rate * 100.0),
            avg_depth = %format!("{:.1}", summary.avg_completed_depth),
            stats_path = self.stats.stats_path(),
            "Match complete"
        );
        Ok(())
    }

    /// Progress bar over rounds, only when stderr is a terminal.
    fn progress_bar(&self) -> Result<Option<ProgressBar>> {
        if !std::io::stderr().is_terminal() {
            return Ok(None);
        }
        let pb = ProgressBar::new(self.config.rounds as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} games ({eta})")?
                .progress_chars("#>-"),
        );
        Ok(Some(pb))
    }

    /// Play one game. The agent moves first in even rounds.
    pub fn play_game(&self, round: u32) -> Result<GameRecord> {
        let agent = if round % 2 == 0 {
            Player::First
        } else {
            Player::Second
        };
        let (agent_seed, opponent_seed) = match self.config.seed {
            Some(seed) => {
                let base = seed.wrapping_add(2 * round as u64);
                (Some(base), Some(base.wrapping_add(1)))
            }
            None => (None, None),
        };

        let mut search = SearchPolicy::new(
            agent,
            self.config.search_config()?,
            self.config.time_limit(),
            agent_seed,
        );
        let mut opponent = self.opponent.build(opponent_seed);
        let mut state = isolation_board(self.config.board_width, self.config.board_height)?;

        let outcome = play_out(&mut state, agent, &mut search, opponent.as_mut())?;

        debug!(round, "Final position:\n{}", state);

        Ok(GameRecord {
            round,
            agent,
            outcome,
            plies: state.ply_count(),
            turns: search.turns().to_vec(),
        })
    }

    pub fn shutdown(&self) {
        self.shutdown_signal.store(true, Ordering::Relaxed);
        info!("Shutdown signal set");
    }

    pub fn stats(&self) -> &MatchStats {
        &self.stats
    }
}

/// Alternate moves until the game ends or a side fails to move.
///
/// A side that returns no move or an illegal move loses on the spot.
fn play_out<'a>(
    state: &mut Isolation,
    agent: Player,
    search: &'a mut (dyn Policy + 'a),
    opponent: &'a mut (dyn Policy + 'a),
) -> Result<Outcome> {
    loop {
        if state.terminal_test() {
            return Ok(if state.utility(agent) > 0.0 {
                Outcome::Won
            } else {
                Outcome::Lost
            });
        }

        let mover = state.player();
        let policy = if mover == agent {
            &mut *search
        } else {
            &mut *opponent
        };

        match policy.select_action(state)? {
            Some(action) if state.is_legal(action) => *state = state.result(action),
            Some(action) => {
                warn!(policy = policy.name(), ?action, "Illegal move, forfeiting");
                return Ok(forfeit(mover, agent));
            }
            None => {
                warn!(policy = policy.name(), ply = state.ply_count(), "No move in time");
                return Ok(forfeit(mover, agent));
            }
        }
    }
}

fn forfeit(mover: Player, agent: Player) -> Outcome {
    if mover == agent {
        Outcome::Forfeited
    } else {
        Outcome::Won
    }
}
