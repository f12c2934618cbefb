//! Typed game-state trait consumed by the search engine
//!
//! A `GameState` is an immutable position in a two-player, perfect-information,
//! zero-sum game. Every transition produces a new value; nothing in the search
//! ever mutates a state it was handed.

use std::fmt;

/// One of the two seats at the board.
///
/// `First` moves on even plies, `Second` on odd plies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    First,
    Second,
}

impl Player {
    /// Both players in seat order.
    pub const ALL: [Player; 2] = [Player::First, Player::Second];

    /// The other player.
    pub fn opponent(self) -> Player {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }

    /// Seat index (0 or 1), handy for per-player arrays.
    pub fn index(self) -> usize {
        match self {
            Player::First => 0,
            Player::Second => 1,
        }
    }

    /// The player to move after `ply_count` plies have been played.
    pub fn to_move(ply_count: u32) -> Player {
        if ply_count % 2 == 0 {
            Player::First
        } else {
            Player::Second
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::First => write!(f, "player 1"),
            Player::Second => write!(f, "player 2"),
        }
    }
}

/// Main trait for positions the engine can search
///
/// Implementations must uphold a few invariants the search relies on:
///
/// * `actions()` is non-empty whenever `terminal_test()` is false.
/// * `utility(p)` is `f64::INFINITY` or `f64::NEG_INFINITY` for terminal
///   positions and `0.0` for non-terminal ones.
/// * `actions()` enumerates in a deterministic order; the search breaks ties
///   in favour of the action enumerated first.
///
/// # Example
///
/// ```rust
/// use engine_core::typed::{GameState, Player};
/// use engine_core::game_utils::terminal_utility;
///
/// /// Players alternately take one or two stones; whoever cannot move loses.
/// #[derive(Debug, Clone)]
/// struct Nim {
///     stones: u8,
///     ply: u32,
/// }
///
/// impl GameState for Nim {
///     type Action = u8;
///
///     fn actions(&self) -> Vec<u8> {
///         (1..=2).filter(|&n| n <= self.stones).collect()
///     }
///
///     fn result(&self, action: u8) -> Self {
///         Nim { stones: self.stones - action, ply: self.ply + 1 }
///     }
///
///     fn terminal_test(&self) -> bool {
///         self.stones == 0
///     }
///
///     fn utility(&self, player: Player) -> f64 {
///         if !self.terminal_test() {
///             return 0.0;
///         }
///         // The side to move is stuck, so the previous mover won.
///         terminal_utility(self.player().opponent(), player)
///     }
///
///     fn ply_count(&self) -> u32 {
///         self.ply
///     }
///
///     fn player(&self) -> Player {
///         Player::to_move(self.ply)
///     }
/// }
///
/// let start = Nim { stones: 3, ply: 0 };
/// assert_eq!(start.actions(), vec![1, 2]);
/// let end = start.result(2).result(1);
/// assert!(end.terminal_test());
/// assert_eq!(end.utility(Player::Second), f64::INFINITY);
/// ```
pub trait GameState: Clone + fmt::Debug + Send + Sync + 'static {
    /// Opaque, comparable move identifier
    type Action: Copy + Eq + fmt::Debug + Send + Sync + 'static;

    /// Legal actions from this position, in a stable order
    fn actions(&self) -> Vec<Self::Action>;

    /// The position reached by playing `action`
    fn result(&self, action: Self::Action) -> Self;

    /// Whether the game is over
    fn terminal_test(&self) -> bool;

    /// Exact value of a finished game for `player`
    ///
    /// `+inf` for a win, `-inf` for a loss, `0.0` while the game is running.
    fn utility(&self, player: Player) -> f64;

    /// Number of plies played since the start of the game
    fn ply_count(&self) -> u32;

    /// The player to move
    fn player(&self) -> Player;
}
