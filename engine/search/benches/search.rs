//! Search benchmarks for performance profiling.
//!
//! Run with: `cargo bench -p search`
//!
//! These benchmarks measure:
//! - Rollout evaluation with varying playout counts
//! - Fixed-depth alpha-beta search under each move ordering
//! - A full iterative-deepening run on a small board

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use engine_core::{GameState, Player};
use games_isolation::{Action, Isolation};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use search::{
    AlphaBeta, Decision, Evaluator, IterativeDeepening, MoveOrdering, RolloutEvaluator,
    SearchConfig,
};

/// Standard board after both tokens have been placed near the middle.
fn midgame() -> Isolation {
    Isolation::new()
        .result(Action::Place(49))
        .result(Action::Place(38))
}

fn bench_rollout_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("rollout_evaluation");

    for rollouts in [10, 100, 1000] {
        group.throughput(Throughput::Elements(rollouts as u64));
        group.bench_with_input(BenchmarkId::new("midgame", rollouts), &rollouts, |b, &n| {
            let state = midgame();
            let evaluator = RolloutEvaluator::new(n);
            let mut rng = ChaCha20Rng::seed_from_u64(42);
            b.iter(|| evaluator.evaluate(black_box(&state), Player::First, &mut rng));
        });
    }

    group.finish();
}

fn bench_depth3_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("depth3_search");
    group.sample_size(10);

    for ordering in MoveOrdering::ALL {
        group.bench_with_input(
            BenchmarkId::from_parameter(ordering),
            &ordering,
            |b, &ordering| {
                let state = midgame();
                let evaluator = RolloutEvaluator::new(20);
                let mut rng = ChaCha20Rng::seed_from_u64(42);
                b.iter(|| {
                    AlphaBeta::new(&evaluator, Player::First, ordering)
                        .search(black_box(&state), 3, &mut rng)
                        .unwrap()
                });
            },
        );
    }

    group.finish();
}

fn bench_iterative_deepening(c: &mut Criterion) {
    let mut group = c.benchmark_group("iterative_deepening");
    group.sample_size(10);

    group.bench_function("5x5_to_depth_5", |b| {
        let state = Isolation::from_parts(5, 5, &[], [Some(12), Some(0)], 2).unwrap();
        let config = SearchConfig::default().with_rollouts(20).with_max_depth(5);
        let driver = IterativeDeepening::new(Player::First, config);
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        b.iter(|| {
            let mut published: Vec<Decision<Action>> = Vec::new();
            driver.get_action(&state, &mut published, &mut rng).unwrap();
            published
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_rollout_evaluation,
    bench_depth3_search,
    bench_iterative_deepening
);
criterion_main!(benches);
