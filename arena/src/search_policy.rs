//! Alpha-beta agent as an arena policy
//!
//! Each turn runs the iterative-deepening driver under the supervisor's time
//! budget and plays whatever it published last.

use anyhow::{anyhow, Result};
use engine_core::{GameState, Player};
use games_isolation::{Action, Isolation};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use search::{IterativeDeepening, SearchConfig};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::policy::Policy;
use crate::supervisor::run_timed_turn;

/// How one agent turn went.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnRecord {
    /// Depth of the move played; 0 for the opening guess, `None` if forfeited
    pub depth: Option<u32>,
    /// Whether the driver returned before the deadline
    pub finished: bool,
    pub elapsed: Duration,
}

/// Policy backed by [`IterativeDeepening`] for one fixed player.
pub struct SearchPolicy {
    driver: Arc<IterativeDeepening>,
    time_limit: Duration,
    /// Seeds each turn's search rng
    rng: ChaCha20Rng,
    turns: Vec<TurnRecord>,
}

impl std::fmt::Debug for SearchPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchPolicy")
            .field("player", &self.driver.player())
            .field("time_limit", &self.time_limit)
            .field("turns", &self.turns.len())
            .finish()
    }
}

impl SearchPolicy {
    pub fn new(
        player: Player,
        config: SearchConfig,
        time_limit: Duration,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        };
        Self {
            driver: Arc::new(IterativeDeepening::new(player, config)),
            time_limit,
            rng,
            turns: Vec::new(),
        }
    }

    pub fn player(&self) -> Player {
        self.driver.player()
    }

    /// Turns played so far, in order.
    pub fn turns(&self) -> &[TurnRecord] {
        &self.turns
    }
}

impl Policy for SearchPolicy {
    fn name(&self) -> &'static str {
        "alpha-beta"
    }

    fn select_action(&mut self, state: &Isolation) -> Result<Option<Action>> {
        if state.player() != self.player() {
            return Err(anyhow!(
                "search agent plays {} but {} is to move",
                self.player(),
                state.player()
            ));
        }

        let rng = ChaCha20Rng::seed_from_u64(self.rng.gen());
        let report = run_timed_turn(Arc::clone(&self.driver), *state, self.time_limit, rng)?;

        let record = TurnRecord {
            depth: report.decision.as_ref().map(|d| d.depth),
            finished: report.summary.is_some(),
            elapsed: report.elapsed,
        };
        debug!(
            ply = state.ply_count(),
            depth = record.depth,
            finished = record.finished,
            elapsed_ms = record.elapsed.as_millis() as u64,
            "Agent turn"
        );
        self.turns.push(record);

        Ok(report.decision.map(|d| d.action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use games_isolation::Jump;

    #[test]
    fn test_plays_winning_move_and_records_turn() {
        let state = Isolation::from_parts(3, 3, &[1, 7], [Some(0), Some(6)], 2).unwrap();
        let mut policy = SearchPolicy::new(
            Player::First,
            SearchConfig::for_testing(),
            Duration::from_secs(10),
            Some(1),
        );

        let action = policy.select_action(&state).unwrap();
        assert_eq!(action, Some(Action::Jump(Jump::ESE)));

        let turns = policy.turns();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].depth, Some(3));
        assert!(turns[0].finished);
    }

    #[test]
    fn test_rejects_other_players_turn() {
        let state = Isolation::with_dimensions(4, 4).unwrap();
        let mut policy = SearchPolicy::new(
            Player::Second,
            SearchConfig::for_testing(),
            Duration::from_millis(50),
            Some(2),
        );
        assert!(policy.select_action(&state).is_err());
        assert!(policy.turns().is_empty());
    }
}
