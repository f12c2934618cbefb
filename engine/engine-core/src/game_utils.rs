//! Shared utilities for two-player game implementations
//!
//! Terminal values are expressed relative to a fixed player, so the same
//! number can be used at maximizing and minimizing nodes without a sign flip.

use crate::typed::Player;

/// Exact value of a finished game for `perspective`.
///
/// # Arguments
/// * `winner` - The player who won the game
/// * `perspective` - The player the value is reported for
///
/// # Returns
/// * `f64::INFINITY` if `perspective` won
/// * `f64::NEG_INFINITY` if `perspective` lost
///
/// # Example
/// ```
/// use engine_core::game_utils::terminal_utility;
/// use engine_core::Player;
///
/// assert_eq!(terminal_utility(Player::First, Player::First), f64::INFINITY);
/// assert_eq!(terminal_utility(Player::First, Player::Second), f64::NEG_INFINITY);
/// ```
#[inline]
pub fn terminal_utility(winner: Player, perspective: Player) -> f64 {
    if winner == perspective {
        f64::INFINITY
    } else {
        f64::NEG_INFINITY
    }
}

/// Collapse a utility into a rollout score: 1.0 for a win, 0.0 otherwise.
///
/// # Example
/// ```
/// use engine_core::game_utils::win_probability;
///
/// assert_eq!(win_probability(f64::INFINITY), 1.0);
/// assert_eq!(win_probability(f64::NEG_INFINITY), 0.0);
/// assert_eq!(win_probability(0.0), 0.0);
/// ```
#[inline]
pub fn win_probability(utility: f64) -> f64 {
    if utility == f64::INFINITY {
        1.0
    } else {
        0.0
    }
}

/// Whether a value came from a finished game rather than an estimate.
#[inline]
pub fn is_decisive(value: f64) -> bool {
    value.is_infinite()
}
