//! Evaluator trait for position evaluation.
//!
//! An evaluator estimates how good a non-terminal position is for a fixed
//! player, as a number in `[0, 1]` where higher is better. The search uses it
//! at the depth frontier and to rank children for move ordering.

use engine_core::game_utils::win_probability;
use engine_core::{GameState, Player};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;

/// Trait for position evaluators.
///
/// Implementations could be:
/// - RolloutEvaluator: Random playouts to a terminal state
/// - Table or heuristic evaluators for tests and experiments
pub trait Evaluator<G: GameState>: Send + Sync {
    /// Estimate the value of `state` for `player`.
    ///
    /// # Returns
    /// A value in `[0, 1]`; higher is better for `player`.
    fn evaluate(&self, state: &G, player: Player, rng: &mut ChaCha20Rng) -> f64;
}

impl<G: GameState, E: Evaluator<G> + ?Sized> Evaluator<G> for &E {
    fn evaluate(&self, state: &G, player: Player, rng: &mut ChaCha20Rng) -> f64 {
        (**self).evaluate(state, player, rng)
    }
}

/// Outcome of a single random playout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolloutOutcome {
    /// Whether the playout ended in a win for the evaluated player
    pub won: bool,
    /// Plies played before reaching the terminal position
    pub plies: u32,
}

/// Monte Carlo evaluator: average result of uniformly random playouts.
///
/// Every call plays the full number of rollouts from scratch. There is no
/// memoization and no early termination, so one evaluation costs about
/// `rollouts * average game length` position transitions.
#[derive(Debug, Clone)]
pub struct RolloutEvaluator {
    rollouts: u32,
}

impl Default for RolloutEvaluator {
    fn default() -> Self {
        Self { rollouts: 1000 }
    }
}

impl RolloutEvaluator {
    /// Create an evaluator averaging `rollouts` playouts (at least one).
    pub fn new(rollouts: u32) -> Self {
        Self {
            rollouts: rollouts.max(1),
        }
    }

    pub fn rollouts(&self) -> u32 {
        self.rollouts
    }

    /// Play uniformly random legal moves from `state` until the game ends.
    ///
    /// A terminal `state` is scored immediately with zero plies. A position
    /// that reports no moves without being terminal is scored as not won.
    pub fn rollout<G: GameState>(
        state: &G,
        player: Player,
        rng: &mut ChaCha20Rng,
    ) -> RolloutOutcome {
        let mut current = state.clone();
        let mut plies = 0u32;

        while !current.terminal_test() {
            let actions = current.actions();
            let Some(&action) = actions.choose(rng) else {
                break;
            };
            current = current.result(action);
            plies += 1;
        }

        RolloutOutcome {
            won: win_probability(current.utility(player)) == 1.0,
            plies,
        }
    }
}

impl<G: GameState> Evaluator<G> for RolloutEvaluator {
    fn evaluate(&self, state: &G, player: Player, rng: &mut ChaCha20Rng) -> f64 {
        let wins = (0..self.rollouts)
            .filter(|_| Self::rollout(state, player, rng).won)
            .count();
        wins as f64 / self.rollouts as f64
    }
}
