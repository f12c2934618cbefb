//! Iterative deepening on top of [`AlphaBeta`].
//!
//! The driver never returns a move directly. It publishes a [`Decision`] at
//! each commit point:
//! 1. Early in the game, a uniformly random legal move before any search
//! 2. After every completed depth, starting at `start_depth`
//!
//! A later publication always supersedes an earlier one. The search itself
//! has no notion of time; the host stops listening when its budget runs out,
//! and the driver notices the disconnect at its next commit point.

use std::time::Instant;

use engine_core::{GameState, Player};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;
use tracing::debug;

use crate::config::SearchConfig;
use crate::evaluator::{Evaluator, RolloutEvaluator};
use crate::reporter::{Decision, ReportError, Reporter};
use crate::search::{AlphaBeta, SearchError, SearchResult, SearchStats};

/// Why a [`IterativeDeepening::get_action`] run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The consumer went away; nothing more can be published
    Disconnected,
    /// A completed depth reached only terminal positions, so deeper
    /// searches would return the same move
    Solved,
    /// `max_depth` was completed
    MaxDepth,
}

/// Summary of one driver run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Deepest depth whose result was published
    pub completed_depth: Option<u32>,
    /// Number of successful publications, including the opening guess
    pub publications: u32,
    pub stop: StopReason,
    /// Work summed over every depth searched
    pub stats: SearchStats,
}

/// Anytime move selection for a fixed player.
pub struct IterativeDeepening<E = RolloutEvaluator> {
    player: Player,
    config: SearchConfig,
    evaluator: E,
}

impl IterativeDeepening<RolloutEvaluator> {
    /// Driver using the rollout evaluator sized from `config.rollouts`.
    pub fn new(player: Player, config: SearchConfig) -> Self {
        let evaluator = RolloutEvaluator::new(config.rollouts);
        Self::with_evaluator(player, config, evaluator)
    }
}

impl<E> IterativeDeepening<E> {
    pub fn with_evaluator(player: Player, config: SearchConfig, evaluator: E) -> Self {
        Self {
            player,
            config,
            evaluator,
        }
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Run a single fixed-depth search without publishing anything.
    pub fn alpha_beta_search<G>(
        &self,
        state: &G,
        depth: u32,
        rng: &mut ChaCha20Rng,
    ) -> Result<SearchResult<G::Action>, SearchError>
    where
        G: GameState,
        E: Evaluator<G>,
    {
        AlphaBeta::new(&self.evaluator, self.player, self.config.move_ordering)
            .search(state, depth, rng)
    }

    /// Publish progressively better moves for `state` until the consumer
    /// disconnects, the position is solved, or `max_depth` completes.
    ///
    /// # Errors
    /// - `InvalidConfig` if the search config does not validate
    /// - `NoLegalMoves` if `state` offers no action; nothing is published
    pub fn get_action<G, R>(
        &self,
        state: &G,
        reporter: &mut R,
        rng: &mut ChaCha20Rng,
    ) -> Result<RunSummary, SearchError>
    where
        G: GameState,
        E: Evaluator<G>,
        R: Reporter<G::Action>,
    {
        self.config.validate()?;

        let actions = state.actions();
        if actions.is_empty() {
            return Err(SearchError::NoLegalMoves);
        }

        let mut summary = RunSummary {
            completed_depth: None,
            publications: 0,
            stop: StopReason::MaxDepth,
            stats: SearchStats::default(),
        };

        if state.ply_count() < self.config.opening_random_plies {
            let action = *actions.choose(rng).ok_or(SearchError::NoLegalMoves)?;
            let opening = Decision {
                action,
                depth: 0,
                value: None,
            };
            if let Err(ReportError::Disconnected) = reporter.publish(opening) {
                summary.stop = StopReason::Disconnected;
                return Ok(summary);
            }
            summary.publications += 1;
            debug!(player = %self.player, ?action, "Published opening move");
        }

        for depth in self.config.start_depth..=self.config.max_depth {
            let started = Instant::now();
            let result = self.alpha_beta_search(state, depth, rng)?;
            summary.stats.merge(&result.stats);

            debug!(
                player = %self.player,
                depth,
                action = ?result.action,
                value = result.value,
                nodes = result.stats.nodes,
                evaluator_calls = result.stats.evaluator_calls(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Completed depth"
            );

            let decision = Decision {
                action: result.action,
                depth,
                value: Some(result.value),
            };
            if let Err(ReportError::Disconnected) = reporter.publish(decision) {
                summary.stop = StopReason::Disconnected;
                return Ok(summary);
            }
            summary.publications += 1;
            summary.completed_depth = Some(depth);

            if result.stats.frontier_evaluations == 0 {
                summary.stop = StopReason::Solved;
                return Ok(summary);
            }
        }

        summary.stop = StopReason::MaxDepth;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::thread;

    use super::*;
    use crate::config::{ConfigError, MoveOrdering};
    use crate::reporter::decision_channel;
    use games_isolation::{Action, Isolation, Jump};
    use rand::SeedableRng;

    /// Rollout evaluator that counts how often it is called.
    struct CountingEvaluator {
        inner: RolloutEvaluator,
        calls: AtomicU64,
    }

    impl CountingEvaluator {
        fn new(rollouts: u32) -> Self {
            Self {
                inner: RolloutEvaluator::new(rollouts),
                calls: AtomicU64::new(0),
            }
        }

        fn calls(&self) -> u64 {
            self.calls.load(Ordering::Relaxed)
        }
    }

    impl Evaluator<Isolation> for CountingEvaluator {
        fn evaluate(&self, state: &Isolation, player: Player, rng: &mut ChaCha20Rng) -> f64 {
            self.calls.fetch_add(1, Ordering::Relaxed);
            self.inner.evaluate(state, player, rng)
        }
    }

    /// Records each decision with the evaluator call count at publish time.
    struct Snapshots<'a> {
        evaluator: &'a CountingEvaluator,
        seen: Vec<(Decision<Action>, u64)>,
    }

    impl Reporter<Action> for Snapshots<'_> {
        fn publish(&mut self, decision: Decision<Action>) -> Result<(), ReportError> {
            self.seen.push((decision, self.evaluator.calls()));
            Ok(())
        }
    }

    /// Accepts a fixed number of publications, then reports a disconnect.
    struct Limited {
        remaining: u32,
        seen: Vec<Decision<Action>>,
    }

    impl Reporter<Action> for Limited {
        fn publish(&mut self, decision: Decision<Action>) -> Result<(), ReportError> {
            if self.remaining == 0 {
                return Err(ReportError::Disconnected);
            }
            self.remaining -= 1;
            self.seen.push(decision);
            Ok(())
        }
    }

    /// 5x5 board, First in the center with all eight jumps, Second in a corner.
    fn open_midgame() -> Isolation {
        Isolation::from_parts(5, 5, &[], [Some(12), Some(0)], 2).unwrap()
    }

    /// 3x3 board where First's only jump wins on the spot.
    fn forced_win() -> Isolation {
        Isolation::from_parts(3, 3, &[1, 7], [Some(0), Some(6)], 2).unwrap()
    }

    fn quick_config() -> SearchConfig {
        SearchConfig::for_testing().with_rollouts(5)
    }

    #[test]
    fn test_opening_move_published_before_any_evaluation() {
        let state = Isolation::with_dimensions(4, 4).unwrap();
        let evaluator = CountingEvaluator::new(5);
        let driver = IterativeDeepening::with_evaluator(
            Player::First,
            quick_config().with_max_depth(3),
            &evaluator,
        );
        let mut reporter = Snapshots {
            evaluator: &evaluator,
            seen: Vec::new(),
        };
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        let summary = driver.get_action(&state, &mut reporter, &mut rng).unwrap();

        let (opening, calls) = &reporter.seen[0];
        assert!(opening.is_opening_guess());
        assert_eq!(opening.value, None);
        assert_eq!(*calls, 0);
        assert!(state.actions().contains(&opening.action));

        assert_eq!(reporter.seen.len(), 2);
        assert_eq!(reporter.seen[1].0.depth, 3);
        assert_eq!(summary.publications, 2);
        assert_eq!(summary.completed_depth, Some(3));
        assert_eq!(summary.stop, StopReason::MaxDepth);
    }

    #[test]
    fn test_no_opening_move_after_two_plies() {
        let driver = IterativeDeepening::new(Player::First, quick_config().with_max_depth(3));
        let mut seen: Vec<Decision<Action>> = Vec::new();
        let mut rng = ChaCha20Rng::seed_from_u64(1);

        driver.get_action(&open_midgame(), &mut seen, &mut rng).unwrap();

        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].depth, 3);
        assert!(seen[0].value.is_some());
    }

    #[test]
    fn test_depths_publish_in_increasing_order() {
        let state = open_midgame();
        let driver = IterativeDeepening::new(Player::First, quick_config().with_max_depth(5));
        let mut seen: Vec<Decision<Action>> = Vec::new();
        let mut rng = ChaCha20Rng::seed_from_u64(7);

        let summary = driver.get_action(&state, &mut seen, &mut rng).unwrap();

        let depths: Vec<u32> = seen.iter().map(|d| d.depth).collect();
        let expected: Vec<u32> = (3..3 + depths.len() as u32).collect();
        assert_eq!(depths, expected);
        assert!(seen.iter().all(|d| state.actions().contains(&d.action)));
        assert_eq!(summary.publications as usize, seen.len());
        match summary.stop {
            StopReason::MaxDepth => assert_eq!(summary.completed_depth, Some(5)),
            StopReason::Solved => assert!(summary.completed_depth.is_some()),
            StopReason::Disconnected => panic!("Vec reporter never disconnects"),
        }
    }

    #[test]
    fn test_solved_position_stops_after_first_depth() {
        let driver = IterativeDeepening::new(Player::First, quick_config().with_max_depth(20));
        let mut seen: Vec<Decision<Action>> = Vec::new();
        let mut rng = ChaCha20Rng::seed_from_u64(0);

        let summary = driver.get_action(&forced_win(), &mut seen, &mut rng).unwrap();

        assert_eq!(summary.stop, StopReason::Solved);
        assert_eq!(summary.completed_depth, Some(3));
        assert_eq!(summary.stats.frontier_evaluations, 0);
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].action, Action::Jump(Jump::ESE));
        assert_eq!(seen[0].value, Some(f64::INFINITY));
    }

    #[test]
    fn test_disconnect_before_opening_publication() {
        let evaluator = CountingEvaluator::new(5);
        let driver =
            IterativeDeepening::with_evaluator(Player::First, quick_config(), &evaluator);
        let mut reporter = Limited {
            remaining: 0,
            seen: Vec::new(),
        };
        let mut rng = ChaCha20Rng::seed_from_u64(3);

        let state = Isolation::with_dimensions(4, 4).unwrap();
        let summary = driver.get_action(&state, &mut reporter, &mut rng).unwrap();

        assert_eq!(summary.stop, StopReason::Disconnected);
        assert_eq!(summary.publications, 0);
        assert_eq!(summary.completed_depth, None);
        assert_eq!(evaluator.calls(), 0);
    }

    #[test]
    fn test_disconnect_noticed_at_next_commit_point() {
        let driver = IterativeDeepening::new(Player::First, quick_config().with_max_depth(6));
        let mut reporter = Limited {
            remaining: 1,
            seen: Vec::new(),
        };
        let mut rng = ChaCha20Rng::seed_from_u64(3);

        let state = Isolation::with_dimensions(4, 4).unwrap();
        let summary = driver.get_action(&state, &mut reporter, &mut rng).unwrap();

        // Opening accepted, depth 3 searched in full and then rejected.
        assert_eq!(summary.stop, StopReason::Disconnected);
        assert_eq!(summary.publications, 1);
        assert_eq!(summary.completed_depth, None);
        assert!(summary.stats.nodes > 0);
        assert!(reporter.seen[0].is_opening_guess());
    }

    #[test]
    fn test_dropped_receiver_ends_run() {
        let (mut tx, rx) = decision_channel::<Action>();
        drop(rx);

        let driver = IterativeDeepening::new(Player::First, quick_config());
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let summary = driver.get_action(&open_midgame(), &mut tx, &mut rng).unwrap();

        assert_eq!(summary.stop, StopReason::Disconnected);
        assert_eq!(summary.publications, 0);
    }

    #[test]
    fn test_watch_channel_from_worker_thread() {
        let (mut tx, rx) = decision_channel::<Action>();
        let state = forced_win();

        let worker = thread::spawn(move || {
            let driver = IterativeDeepening::new(Player::First, quick_config());
            let mut rng = ChaCha20Rng::seed_from_u64(5);
            driver.get_action(&state, &mut tx, &mut rng)
        });

        let summary = worker.join().unwrap().unwrap();
        assert_eq!(summary.stop, StopReason::Solved);

        let latest = rx.borrow().clone().unwrap();
        assert_eq!(latest.action, Action::Jump(Jump::ESE));
        assert_eq!(latest.depth, 3);
    }

    #[test]
    fn test_rejects_invalid_config_and_finished_games() {
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let mut seen: Vec<Decision<Action>> = Vec::new();

        let driver = IterativeDeepening::new(Player::First, quick_config().with_rollouts(0));
        let err = driver.get_action(&open_midgame(), &mut seen, &mut rng).unwrap_err();
        assert_eq!(err, SearchError::InvalidConfig(ConfigError::ZeroRollouts));

        let driver = IterativeDeepening::new(Player::Second, quick_config());
        let finished = forced_win().result(Action::Jump(Jump::ESE));
        assert!(finished.terminal_test());
        let err = driver.get_action(&finished, &mut seen, &mut rng).unwrap_err();
        assert_eq!(err, SearchError::NoLegalMoves);
        assert!(seen.is_empty());
    }

    #[test]
    fn test_every_ordering_finds_forced_win() {
        for ordering in MoveOrdering::ALL {
            let config = quick_config().with_move_ordering(ordering);
            let driver = IterativeDeepening::new(Player::First, config);
            let mut seen: Vec<Decision<Action>> = Vec::new();
            let mut rng = ChaCha20Rng::seed_from_u64(11);

            driver.get_action(&forced_win(), &mut seen, &mut rng).unwrap();
            assert_eq!(seen.last().map(|d| d.action), Some(Action::Jump(Jump::ESE)));
        }
    }
}
