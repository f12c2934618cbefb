//! Time-boxed turns for the searching agent.
//!
//! The driver runs on its own thread and publishes into a watch channel. The
//! supervisor waits until the budget expires or the driver returns, takes
//! whatever was published last, and drops the receiver. A driver still
//! searching at that point finishes its current depth, fails to publish and
//! exits. The supervisor joins it off the clock, so no worker outlives its
//! turn and competes with the next one for CPU.

use anyhow::{anyhow, Context, Result};
use engine_core::GameState;
use rand_chacha::ChaCha20Rng;
use search::{decision_channel, Decision, Evaluator, IterativeDeepening, RunSummary};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{trace, warn};

/// What one supervised turn produced.
#[derive(Debug, Clone)]
pub struct TurnReport<A> {
    /// Latest decision at the deadline, `None` if nothing was published
    pub decision: Option<Decision<A>>,
    /// Present when the driver returned before the deadline
    pub summary: Option<RunSummary>,
    /// Time until the decision was read
    pub elapsed: Duration,
    /// Time spent waiting for a late worker to finish its depth
    pub overrun: Duration,
}

/// Run `driver` on `state` for at most `time_limit`.
pub fn run_timed_turn<G, E>(
    driver: Arc<IterativeDeepening<E>>,
    state: G,
    time_limit: Duration,
    mut rng: ChaCha20Rng,
) -> Result<TurnReport<G::Action>>
where
    G: GameState,
    E: Evaluator<G> + 'static,
{
    let (mut tx, rx) = decision_channel::<G::Action>();
    let (done_tx, done_rx) = mpsc::channel();
    let started = Instant::now();

    let worker = thread::Builder::new()
        .name("search-worker".into())
        .spawn(move || {
            let result = driver.get_action(&state, &mut tx, &mut rng);
            // The supervisor stops listening once the deadline passes
            let _ = done_tx.send(result);
        })
        .context("Failed to spawn search worker")?;

    let summary = match done_rx.recv_timeout(time_limit) {
        Ok(Ok(summary)) => Some(summary),
        Ok(Err(e)) => return Err(anyhow!("Search failed: {}", e)),
        Err(RecvTimeoutError::Timeout) => None,
        Err(RecvTimeoutError::Disconnected) => {
            warn!("Search worker exited without reporting a result");
            None
        }
    };

    let decision = rx.borrow().clone();
    drop(rx);
    let elapsed = started.elapsed();

    // Fails to publish at its next commit point and returns
    worker
        .join()
        .map_err(|_| anyhow!("Search worker panicked"))?;
    let overrun = started.elapsed() - elapsed;

    trace!(
        elapsed_ms = elapsed.as_millis() as u64,
        overrun_ms = overrun.as_millis() as u64,
        finished = summary.is_some(),
        depth = decision.as_ref().map(|d| d.depth),
        "Turn complete"
    );

    Ok(TurnReport {
        decision,
        summary,
        elapsed,
        overrun,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::Player;
    use games_isolation::{Action, Isolation, Jump};
    use rand::SeedableRng;
    use search::{SearchConfig, StopReason};
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Evaluator that takes a while per call without using the CPU.
    struct SlowEvaluator;

    impl Evaluator<Isolation> for SlowEvaluator {
        fn evaluate(&self, _state: &Isolation, _player: Player, _rng: &mut ChaCha20Rng) -> f64 {
            thread::sleep(Duration::from_millis(2));
            0.5
        }
    }

    /// Slow evaluator whose call count stays readable after the turn.
    struct TallyEvaluator {
        calls: Arc<AtomicU64>,
    }

    impl Evaluator<Isolation> for TallyEvaluator {
        fn evaluate(&self, _state: &Isolation, _player: Player, _rng: &mut ChaCha20Rng) -> f64 {
            thread::sleep(Duration::from_millis(1));
            self.calls.fetch_add(1, Ordering::SeqCst);
            0.5
        }
    }

    fn slow_driver(player: Player) -> Arc<IterativeDeepening<SlowEvaluator>> {
        Arc::new(IterativeDeepening::with_evaluator(
            player,
            SearchConfig::for_testing(),
            SlowEvaluator,
        ))
    }

    #[test]
    fn test_fast_search_returns_before_deadline() {
        let state = Isolation::from_parts(3, 3, &[1, 7], [Some(0), Some(6)], 2).unwrap();
        let driver = Arc::new(IterativeDeepening::new(
            Player::First,
            SearchConfig::for_testing(),
        ));

        let report = run_timed_turn(
            driver,
            state,
            Duration::from_secs(10),
            ChaCha20Rng::seed_from_u64(1),
        )
        .unwrap();

        let summary = report.summary.expect("driver should finish in time");
        assert_eq!(summary.stop, StopReason::Solved);
        let decision = report.decision.unwrap();
        assert_eq!(decision.action, Action::Jump(Jump::ESE));
        assert_eq!(decision.depth, 3);
    }

    #[test]
    fn test_deadline_keeps_opening_move() {
        let state = Isolation::with_dimensions(5, 5).unwrap();

        let report = run_timed_turn(
            slow_driver(Player::First),
            state,
            Duration::from_millis(50),
            ChaCha20Rng::seed_from_u64(2),
        )
        .unwrap();

        assert!(report.summary.is_none());
        let decision = report.decision.expect("opening move is published at once");
        assert!(decision.is_opening_guess());
        assert!(state.is_legal(decision.action));
    }

    #[test]
    fn test_deadline_without_publication() {
        // Past the opening plies nothing is published until depth 3 completes.
        let state = Isolation::from_parts(5, 5, &[], [Some(12), Some(0)], 2).unwrap();

        let report = run_timed_turn(
            slow_driver(Player::First),
            state,
            Duration::from_millis(10),
            ChaCha20Rng::seed_from_u64(3),
        )
        .unwrap();

        assert!(report.decision.is_none());
        assert!(report.summary.is_none());
    }

    #[test]
    fn test_late_worker_is_finished_before_turn_returns() {
        let state = Isolation::from_parts(5, 5, &[], [Some(12), Some(0)], 2).unwrap();
        let calls = Arc::new(AtomicU64::new(0));
        let driver = Arc::new(IterativeDeepening::with_evaluator(
            Player::First,
            SearchConfig::for_testing(),
            TallyEvaluator {
                calls: Arc::clone(&calls),
            },
        ));

        let report = run_timed_turn(
            driver,
            state,
            Duration::from_millis(10),
            ChaCha20Rng::seed_from_u64(5),
        )
        .unwrap();

        assert!(report.summary.is_none());
        // Depth 3 runs far past the budget, so the join had to wait
        assert!(report.overrun > Duration::ZERO);
        let at_return = calls.load(Ordering::SeqCst);
        assert!(at_return > 0);

        thread::sleep(Duration::from_millis(100));
        assert_eq!(calls.load(Ordering::SeqCst), at_return);
    }

    #[test]
    fn test_search_error_is_reported() {
        let finished = Isolation::from_parts(3, 3, &[1, 7], [Some(0), Some(6)], 2)
            .unwrap()
            .result(Action::Jump(Jump::ESE));
        let driver = Arc::new(IterativeDeepening::new(
            Player::Second,
            SearchConfig::for_testing(),
        ));

        let err = run_timed_turn(
            driver,
            finished,
            Duration::from_secs(10),
            ChaCha20Rng::seed_from_u64(4),
        )
        .unwrap_err();
        assert!(err.to_string().contains("No legal moves"));
    }
}
