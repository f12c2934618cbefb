//! Core traits and types for the Isolation game engine
//!
//! This crate provides the fundamental abstractions the search consumes:
//! - `GameState`: Typed trait for immutable game positions
//! - `Player`: The fixed identity a search evaluates positions for
//! - `game_utils`: Terminal value helpers shared by game implementations

pub mod game_utils;
pub mod typed;

// Re-export main types for convenience
pub use typed::{GameState, Player};
