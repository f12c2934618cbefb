//! Anytime alpha-beta search with a Monte Carlo rollout evaluator.
//!
//! This crate provides a game-agnostic move chooser that works with any game
//! implementing the `engine-core` [`GameState`](engine_core::GameState) trait.
//!
//! # Overview
//!
//! Each turn the driver runs a sequence of ever deeper searches:
//!
//! 1. **Opening guess**: in the first plies of a game, publish a uniformly
//!    random legal move so the host always has an answer
//! 2. **Search**: depth-limited fail-soft alpha-beta from the side to move,
//!    scoring finished games exactly (`+inf`/`-inf`)
//! 3. **Evaluation**: at the depth frontier, average the outcome of random
//!    playouts into a win rate in `[0, 1]`
//! 4. **Publish**: after every completed depth, replace the previous answer
//!
//! The driver has no clock. The host gives it a reporting channel, waits out
//! its time budget, reads the latest published move and drops the channel.
//!
//! # Usage
//!
//! ```rust
//! use engine_core::Player;
//! use games_isolation::Isolation;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//! use search::{decision_channel, IterativeDeepening, SearchConfig};
//!
//! let state = Isolation::with_dimensions(4, 4).unwrap();
//! let config = SearchConfig::for_testing().with_max_depth(3);
//! let driver = IterativeDeepening::new(Player::First, config);
//!
//! let (mut tx, rx) = decision_channel();
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//! driver.get_action(&state, &mut tx, &mut rng).unwrap();
//!
//! let decision = rx.borrow().clone().unwrap();
//! println!("Best action: {:?} (depth {})", decision.action, decision.depth);
//! ```
//!
//! # Configuration
//!
//! The [`SearchConfig`] struct controls search behavior:
//!
//! - `rollouts`: Random playouts per evaluation (default: 1000)
//! - `start_depth` / `max_depth`: Depth limits tried in order (default: 3 to 99)
//! - `opening_random_plies`: Plies that get a random opening guess (default: 2)
//! - `move_ordering`: How interior nodes order children (default: `MaxRanked`)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     IterativeDeepening                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │  AlphaBeta  │  │  GameState  │  │     Evaluator       │  │
//! │  │ (max / min) │  │ (game sim)  │  │ (random rollouts)   │  │
//! │  └──────┬──────┘  └──────┬──────┘  └──────────┬──────────┘  │
//! │         │                │                    │             │
//! │         ▼                ▼                    ▼             │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │      search depth d → publish → search depth d+1     │   │
//! │  └──────────────────────────┬───────────────────────────┘   │
//! └─────────────────────────────┼───────────────────────────────┘
//!                               ▼
//!                   Reporter (watch channel)
//! ```

pub mod config;
pub mod driver;
pub mod evaluator;
pub mod reporter;
pub mod search;

// Re-export main types
pub use config::{ConfigError, MoveOrdering, ParseMoveOrderingError, SearchConfig};
pub use driver::{IterativeDeepening, RunSummary, StopReason};
pub use evaluator::{Evaluator, RolloutEvaluator, RolloutOutcome};
pub use reporter::{
    decision_channel, Decision, DecisionReceiver, DecisionSender, ReportError, Reporter,
};
pub use search::{AlphaBeta, SearchError, SearchResult, SearchStats};
