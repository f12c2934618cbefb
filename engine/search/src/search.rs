//! Depth-limited alpha-beta search.
//!
//! Values are always reported from one fixed player's point of view:
//! - terminal positions: exact utility, `+inf` for a win and `-inf` for a loss
//! - frontier positions (depth exhausted): the evaluator's estimate in `[0, 1]`
//!
//! Terminal detection happens before the depth check, so the evaluator never
//! sees a finished game and its bounded range never mixes with a terminal value.

use engine_core::{GameState, Player};
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::trace;

use crate::config::MoveOrdering;
use crate::evaluator::Evaluator;

/// Errors that can occur during search.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("No legal moves available")]
    NoLegalMoves,

    #[error("Search depth must be at least 1, got {0}")]
    InvalidDepth(u32),

    #[error("Invalid search config: {0}")]
    InvalidConfig(#[from] crate::config::ConfigError),
}

/// Work counters for one search call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Positions entered below the root
    pub nodes: u64,
    /// Positions resolved by their exact utility
    pub terminal_nodes: u64,
    /// Evaluator calls at the depth frontier
    pub frontier_evaluations: u64,
    /// Evaluator calls spent ranking children
    pub ordering_evaluations: u64,
    /// Alpha or beta cutoffs taken
    pub cutoffs: u64,
}

impl SearchStats {
    /// Total evaluator calls of either kind.
    pub fn evaluator_calls(&self) -> u64 {
        self.frontier_evaluations + self.ordering_evaluations
    }

    /// Add another search's counters to these.
    pub fn merge(&mut self, other: &SearchStats) {
        self.nodes += other.nodes;
        self.terminal_nodes += other.terminal_nodes;
        self.frontier_evaluations += other.frontier_evaluations;
        self.ordering_evaluations += other.ordering_evaluations;
        self.cutoffs += other.cutoffs;
    }
}

/// Result of a root search.
#[derive(Debug, Clone)]
pub struct SearchResult<A> {
    /// Best action for the fixed player
    pub action: A,
    /// Value of that action
    pub value: f64,
    /// Depth limit searched
    pub depth: u32,
    /// Work performed
    pub stats: SearchStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    Max,
    Min,
}

/// Fail-soft alpha-beta search for a fixed player.
///
/// The struct only carries read-only configuration plus work counters;
/// alpha, beta and depth travel as call parameters.
pub struct AlphaBeta<'a, E> {
    evaluator: &'a E,
    player: Player,
    ordering: MoveOrdering,
    stats: SearchStats,
}

impl<'a, E> AlphaBeta<'a, E> {
    /// Create a search that plays for `player`.
    pub fn new(evaluator: &'a E, player: Player, ordering: MoveOrdering) -> Self {
        Self {
            evaluator,
            player,
            ordering,
            stats: SearchStats::default(),
        }
    }

    pub fn player(&self) -> Player {
        self.player
    }

    /// Counters from the most recent search.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Find the best action from `state` looking `depth` plies ahead.
    ///
    /// The root maximizes over actions in enumeration order with no beta
    /// cutoff. Ties go to the action enumerated first. If every action loses,
    /// the first one is still returned.
    pub fn search<G>(
        &mut self,
        state: &G,
        depth: u32,
        rng: &mut ChaCha20Rng,
    ) -> Result<SearchResult<G::Action>, SearchError>
    where
        G: GameState,
        E: Evaluator<G>,
    {
        if depth == 0 {
            return Err(SearchError::InvalidDepth(depth));
        }
        self.stats = SearchStats::default();

        let mut alpha = f64::NEG_INFINITY;
        let beta = f64::INFINITY;
        let mut best: Option<(G::Action, f64)> = None;

        for action in state.actions() {
            let value = self.min_value(&state.result(action), alpha, beta, depth - 1, rng);
            alpha = alpha.max(value);
            if best.map_or(true, |(_, best_value)| value > best_value) {
                best = Some((action, value));
            }
        }

        let (action, value) = best.ok_or(SearchError::NoLegalMoves)?;

        trace!(
            depth,
            ?action,
            value,
            nodes = self.stats.nodes,
            cutoffs = self.stats.cutoffs,
            evaluator_calls = self.stats.evaluator_calls(),
            "Root search complete"
        );

        Ok(SearchResult {
            action,
            value,
            depth,
            stats: self.stats.clone(),
        })
    }

    fn max_value<G>(
        &mut self,
        state: &G,
        mut alpha: f64,
        beta: f64,
        depth: u32,
        rng: &mut ChaCha20Rng,
    ) -> f64
    where
        G: GameState,
        E: Evaluator<G>,
    {
        if let Some(value) = self.leaf_value(state, depth, rng) {
            return value;
        }

        let mut value = f64::NEG_INFINITY;
        for child in self.ordered_children(state, NodeKind::Max, rng) {
            value = value.max(self.min_value(&child, alpha, beta, depth - 1, rng));
            if value >= beta {
                self.stats.cutoffs += 1;
                return value;
            }
            alpha = alpha.max(value);
        }
        value
    }

    fn min_value<G>(
        &mut self,
        state: &G,
        alpha: f64,
        mut beta: f64,
        depth: u32,
        rng: &mut ChaCha20Rng,
    ) -> f64
    where
        G: GameState,
        E: Evaluator<G>,
    {
        if let Some(value) = self.leaf_value(state, depth, rng) {
            return value;
        }

        let mut value = f64::INFINITY;
        for child in self.ordered_children(state, NodeKind::Min, rng) {
            value = value.min(self.max_value(&child, alpha, beta, depth - 1, rng));
            if value <= alpha {
                self.stats.cutoffs += 1;
                return value;
            }
            beta = beta.min(value);
        }
        value
    }

    /// Exact utility for terminal positions, an estimate once depth runs out.
    fn leaf_value<G>(&mut self, state: &G, depth: u32, rng: &mut ChaCha20Rng) -> Option<f64>
    where
        G: GameState,
        E: Evaluator<G>,
    {
        self.stats.nodes += 1;
        if state.terminal_test() {
            self.stats.terminal_nodes += 1;
            return Some(state.utility(self.player));
        }
        if depth == 0 {
            self.stats.frontier_evaluations += 1;
            return Some(self.evaluator.evaluate(state, self.player, rng));
        }
        None
    }

    /// Child positions of `state` in the order they should be explored.
    fn ordered_children<G>(&mut self, state: &G, kind: NodeKind, rng: &mut ChaCha20Rng) -> Vec<G>
    where
        G: GameState,
        E: Evaluator<G>,
    {
        let children: Vec<G> = state
            .actions()
            .into_iter()
            .map(|action| state.result(action))
            .collect();

        if !self.ordering.ranks_children() {
            return children;
        }

        let mut ranked: Vec<(f64, usize)> = children
            .iter()
            .enumerate()
            .map(|(index, child)| (self.rank_value(child, rng), index))
            .collect();

        let descending = match (self.ordering, kind) {
            // Ranking is paid for but exploration keeps enumeration order.
            (MoveOrdering::Inert, _) | (MoveOrdering::Unranked, _) => return children,
            (MoveOrdering::MaxRanked, NodeKind::Min) => return children,
            (MoveOrdering::MaxRanked, NodeKind::Max) => false,
            (MoveOrdering::Ranked, NodeKind::Max) => false,
            (MoveOrdering::Ranked, NodeKind::Min) => true,
            (MoveOrdering::BestFirst, NodeKind::Max) => true,
            (MoveOrdering::BestFirst, NodeKind::Min) => false,
        };

        // Stable sort: equal scores keep enumeration order.
        if descending {
            ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
        } else {
            ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
        }

        let mut slots: Vec<Option<G>> = children.into_iter().map(Some).collect();
        ranked
            .into_iter()
            .filter_map(|(_, index)| slots[index].take())
            .collect()
    }

    /// One-shot score used only for ordering.
    fn rank_value<G>(&mut self, child: &G, rng: &mut ChaCha20Rng) -> f64
    where
        G: GameState,
        E: Evaluator<G>,
    {
        if child.terminal_test() {
            return child.utility(self.player);
        }
        self.stats.ordering_evaluations += 1;
        self.evaluator.evaluate(child, self.player, rng)
    }
}
