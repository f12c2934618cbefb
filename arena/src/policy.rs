//! Move selection policies for the arena

use anyhow::{anyhow, Result};
use engine_core::GameState;
use games_isolation::{Action, Isolation};
use rand::prelude::*;
use rand_chacha::ChaCha20Rng;
use std::fmt;
use std::str::FromStr;

/// A player in the arena.
pub trait Policy: Send {
    /// Short label for logs.
    fn name(&self) -> &'static str;

    /// Choose a move for the side to move in `state`.
    ///
    /// `Ok(None)` means the policy produced nothing in time and forfeits.
    fn select_action(&mut self, state: &Isolation) -> Result<Option<Action>>;
}

/// Baseline opponents selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpponentKind {
    Random,
    Greedy,
}

impl OpponentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpponentKind::Random => "random",
            OpponentKind::Greedy => "greedy",
        }
    }

    /// Build the opponent, seeded for reproducible games when `seed` is set.
    pub fn build(&self, seed: Option<u64>) -> Box<dyn Policy> {
        let rng = match seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        };
        match self {
            OpponentKind::Random => Box::new(RandomPolicy { rng }),
            OpponentKind::Greedy => Box::new(GreedyPolicy { rng }),
        }
    }
}

impl fmt::Display for OpponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OpponentKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(OpponentKind::Random),
            "greedy" => Ok(OpponentKind::Greedy),
            other => Err(anyhow!(
                "unknown opponent '{}', expected random or greedy",
                other
            )),
        }
    }
}

/// Random policy that selects legal moves uniformly at random.
#[derive(Debug)]
pub struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl RandomPolicy {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn select_action(&mut self, state: &Isolation) -> Result<Option<Action>> {
        let actions = state.actions();
        let action = actions
            .choose(&mut self.rng)
            .ok_or_else(|| anyhow!("no legal moves for {}", state.player()))?;
        Ok(Some(*action))
    }
}

/// One-ply lookahead: take the move that leaves the mover the most
/// follow-up moves, breaking ties at random.
#[derive(Debug)]
pub struct GreedyPolicy {
    rng: ChaCha20Rng,
}

impl GreedyPolicy {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl Policy for GreedyPolicy {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn select_action(&mut self, state: &Isolation) -> Result<Option<Action>> {
        let me = state.player();
        let scored: Vec<(Action, usize)> = state
            .actions()
            .into_iter()
            .map(|action| (action, state.result(action).liberties(me).len()))
            .collect();

        let best = scored
            .iter()
            .map(|&(_, score)| score)
            .max()
            .ok_or_else(|| anyhow!("no legal moves for {}", me))?;
        let tied: Vec<Action> = scored
            .into_iter()
            .filter(|&(_, score)| score == best)
            .map(|(action, _)| action)
            .collect();

        Ok(tied.choose(&mut self.rng).copied())
    }
}
