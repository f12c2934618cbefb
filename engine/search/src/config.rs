//! Search configuration parameters.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// How interior nodes order their children before recursing.
///
/// Every mode except `Unranked` first scores each child once with the
/// evaluator (terminal children use their exact utility instead).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveOrdering {
    /// Rank every child at both node types, but only maximizing nodes use
    /// the ranking: ascending there, enumeration order at minimizing nodes.
    #[default]
    MaxRanked,
    /// Rank every child, then explore in enumeration order anyway.
    /// The ranking costs evaluator calls but never changes which nodes are visited.
    Inert,
    /// Explore in ranked order: ascending at maximizing nodes, descending at
    /// minimizing nodes, so the opponent's best-looking replies come first.
    Ranked,
    /// Explore the mover's best-looking child first: descending at maximizing
    /// nodes, ascending at minimizing nodes.
    BestFirst,
    /// Skip the ranking pass entirely.
    Unranked,
}

impl MoveOrdering {
    pub const ALL: [MoveOrdering; 5] = [
        MoveOrdering::MaxRanked,
        MoveOrdering::Inert,
        MoveOrdering::Ranked,
        MoveOrdering::BestFirst,
        MoveOrdering::Unranked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MoveOrdering::MaxRanked => "max-ranked",
            MoveOrdering::Inert => "inert",
            MoveOrdering::Ranked => "ranked",
            MoveOrdering::BestFirst => "best-first",
            MoveOrdering::Unranked => "unranked",
        }
    }

    /// Whether children are scored by the evaluator before recursion.
    pub fn ranks_children(&self) -> bool {
        !matches!(self, MoveOrdering::Unranked)
    }
}

impl fmt::Display for MoveOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a [`MoveOrdering`] name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown move ordering '{0}', expected one of max-ranked, inert, ranked, best-first, unranked")]
pub struct ParseMoveOrderingError(pub String);

impl FromStr for MoveOrdering {
    type Err = ParseMoveOrderingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "max-ranked" | "max_ranked" => Ok(MoveOrdering::MaxRanked),
            "inert" => Ok(MoveOrdering::Inert),
            "ranked" => Ok(MoveOrdering::Ranked),
            "best-first" | "best_first" | "bestfirst" => Ok(MoveOrdering::BestFirst),
            "unranked" | "none" => Ok(MoveOrdering::Unranked),
            _ => Err(ParseMoveOrderingError(s.to_string())),
        }
    }
}

/// Invalid combination of search parameters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("rollouts must be greater than 0")]
    ZeroRollouts,

    #[error("start_depth must be at least 1")]
    ZeroStartDepth,

    #[error("max_depth ({max}) must not be below start_depth ({start})")]
    DepthRange { start: u32, max: u32 },
}

/// Configuration for the iterative-deepening alpha-beta search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Random playouts averaged per position evaluation.
    pub rollouts: u32,

    /// First depth limit searched after the opening guess.
    pub start_depth: u32,

    /// Deepest depth limit attempted (inclusive). The external time budget
    /// normally stops the driver long before this.
    pub max_depth: u32,

    /// Below this ply count a uniformly random legal move is published
    /// before any search starts.
    pub opening_random_plies: u32,

    /// Child ordering at interior nodes.
    pub move_ordering: MoveOrdering,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            rollouts: 1000,
            start_depth: 3,
            max_depth: 99,
            opening_random_plies: 2,
            move_ordering: MoveOrdering::MaxRanked,
        }
    }
}

impl SearchConfig {
    /// Create a fast config for testing.
    pub fn for_testing() -> Self {
        Self {
            rollouts: 20,
            start_depth: 3,
            max_depth: 6,
            opening_random_plies: 2,
            move_ordering: MoveOrdering::MaxRanked,
        }
    }

    /// Builder pattern: set rollouts per evaluation.
    pub fn with_rollouts(mut self, n: u32) -> Self {
        self.rollouts = n;
        self
    }

    /// Builder pattern: set the first depth limit.
    pub fn with_start_depth(mut self, depth: u32) -> Self {
        self.start_depth = depth;
        self
    }

    /// Builder pattern: set the deepest depth limit.
    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    /// Builder pattern: set how many opening plies get a random safety move.
    pub fn with_opening_random_plies(mut self, plies: u32) -> Self {
        self.opening_random_plies = plies;
        self
    }

    /// Builder pattern: set move ordering.
    pub fn with_move_ordering(mut self, ordering: MoveOrdering) -> Self {
        self.move_ordering = ordering;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rollouts == 0 {
            return Err(ConfigError::ZeroRollouts);
        }
        if self.start_depth == 0 {
            return Err(ConfigError::ZeroStartDepth);
        }
        if self.max_depth < self.start_depth {
            return Err(ConfigError::DepthRange {
                start: self.start_depth,
                max: self.max_depth,
            });
        }
        Ok(())
    }
}
