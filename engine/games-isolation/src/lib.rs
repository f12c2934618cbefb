//! Knight's Isolation for the Isolation engine
//!
//! Two players each own a single token that moves like a chess knight. A
//! token's first move places it on any open square; afterwards it jumps in
//! an L-shape. Every square a token lands on stays closed for the rest of the
//! game, and a player with no legal move loses. There are no draws.
//!
//! # Usage
//!
//! ```rust
//! use games_isolation::Isolation;
//! use engine_core::{GameState, Player};
//!
//! let state = Isolation::new();
//! assert_eq!(state.player(), Player::First);
//! assert_eq!(state.actions().len(), 11 * 9);
//!
//! let next = state.result(state.actions()[0]);
//! assert_eq!(next.player(), Player::Second);
//! ```

use std::fmt;

use engine_core::game_utils::terminal_utility;
use engine_core::{GameState, Player};
use thiserror::Error;

/// Width of the standard board
pub const DEFAULT_WIDTH: u8 = 11;
/// Height of the standard board
pub const DEFAULT_HEIGHT: u8 = 9;
/// Largest board the bitboard representation can hold
pub const MAX_SQUARES: usize = 128;

/// Square index: `row * width + col`, row 0 at the top
pub type Square = u8;

/// Errors from building a custom position
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IsolationError {
    #[error("board dimensions must be non-zero, got {width}x{height}")]
    EmptyBoard { width: u8, height: u8 },

    #[error("board {width}x{height} has {squares} squares, at most {} are supported", MAX_SQUARES)]
    BoardTooLarge { width: u8, height: u8, squares: usize },

    #[error("square {square} is outside a {width}x{height} board")]
    SquareOutOfBounds { square: Square, width: u8, height: u8 },

    #[error("both tokens occupy square {0}")]
    SharedSquare(Square),
}

/// One of the eight knight jumps
///
/// Compass names read as "two squares toward the first letter, one toward
/// the last", e.g. `NNE` is two rows up and one column right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Jump {
    NNE,
    ENE,
    ESE,
    SSE,
    SSW,
    WSW,
    WNW,
    NNW,
}

impl Jump {
    /// All jumps in enumeration order
    pub const ALL: [Jump; 8] = [
        Jump::NNE,
        Jump::ENE,
        Jump::ESE,
        Jump::SSE,
        Jump::SSW,
        Jump::WSW,
        Jump::WNW,
        Jump::NNW,
    ];

    /// Column and row offsets of this jump
    pub fn offset(self) -> (i8, i8) {
        match self {
            Jump::NNE => (1, -2),
            Jump::ENE => (2, -1),
            Jump::ESE => (2, 1),
            Jump::SSE => (1, 2),
            Jump::SSW => (-1, 2),
            Jump::WSW => (-2, 1),
            Jump::WNW => (-2, -1),
            Jump::NNW => (-1, -2),
        }
    }
}

/// Isolation action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Initial placement of a token that is not yet on the board
    Place(Square),
    /// Knight jump from the token's current square
    Jump(Jump),
}

/// Isolation position
///
/// Open squares are tracked as a bitboard; a cleared bit is closed, either
/// because it was blocked from the start or because a token visited it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Isolation {
    width: u8,
    height: u8,
    open: u128,
    locations: [Option<Square>; 2],
    ply_count: u32,
}

impl Isolation {
    /// Create the standard 11x9 starting position
    pub fn new() -> Self {
        Self::empty(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }

    /// Create an empty starting position on a custom board
    pub fn with_dimensions(width: u8, height: u8) -> Result<Self, IsolationError> {
        Self::check_dimensions(width, height)?;
        Ok(Self::empty(width, height))
    }

    /// Build an arbitrary position
    ///
    /// `blocked` squares start closed. Squares holding a token are closed as
    /// well, whether or not they are listed.
    pub fn from_parts(
        width: u8,
        height: u8,
        blocked: &[Square],
        locations: [Option<Square>; 2],
        ply_count: u32,
    ) -> Result<Self, IsolationError> {
        let mut state = Self::with_dimensions(width, height)?;

        if let [Some(a), Some(b)] = locations {
            if a == b {
                return Err(IsolationError::SharedSquare(a));
            }
        }

        for &square in blocked.iter().chain(locations.iter().flatten()) {
            if square as usize >= state.num_squares() {
                return Err(IsolationError::SquareOutOfBounds {
                    square,
                    width,
                    height,
                });
            }
            state.open &= !(1u128 << square);
        }

        state.locations = locations;
        state.ply_count = ply_count;
        Ok(state)
    }

    fn check_dimensions(width: u8, height: u8) -> Result<(), IsolationError> {
        if width == 0 || height == 0 {
            return Err(IsolationError::EmptyBoard { width, height });
        }
        let squares = width as usize * height as usize;
        if squares > MAX_SQUARES {
            return Err(IsolationError::BoardTooLarge {
                width,
                height,
                squares,
            });
        }
        Ok(())
    }

    fn empty(width: u8, height: u8) -> Self {
        let squares = width as u32 * height as u32;
        let open = if squares as usize == MAX_SQUARES {
            u128::MAX
        } else {
            (1u128 << squares) - 1
        };
        Self {
            width,
            height,
            open,
            locations: [None, None],
            ply_count: 0,
        }
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Total number of squares on the board
    pub fn num_squares(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Square at column `col`, row `row`, if it is on the board
    pub fn square(&self, col: u8, row: u8) -> Option<Square> {
        if col < self.width && row < self.height {
            Some(row * self.width + col)
        } else {
            None
        }
    }

    /// Column and row of a square
    pub fn coords(&self, square: Square) -> (u8, u8) {
        (square % self.width, square / self.width)
    }

    pub fn is_open(&self, square: Square) -> bool {
        (square as usize) < self.num_squares() && self.open & (1u128 << square) != 0
    }

    /// Number of squares still open
    pub fn open_squares(&self) -> u32 {
        self.open.count_ones()
    }

    /// Where `player`'s token stands, if it has been placed
    pub fn location(&self, player: Player) -> Option<Square> {
        self.locations[player.index()]
    }

    /// The square a jump from `from` lands on, if it stays on the board
    pub fn jump_target(&self, from: Square, jump: Jump) -> Option<Square> {
        let (col, row) = self.coords(from);
        let (dc, dr) = jump.offset();
        let col = col as i16 + dc as i16;
        let row = row as i16 + dr as i16;
        if col < 0 || row < 0 {
            return None;
        }
        self.square(col as u8, row as u8)
    }

    /// Open squares `player` could move to next
    ///
    /// A token that is not on the board yet may go to any open square.
    pub fn liberties(&self, player: Player) -> Vec<Square> {
        match self.location(player) {
            None => (0..self.num_squares() as Square)
                .filter(|&sq| self.is_open(sq))
                .collect(),
            Some(from) => Jump::ALL
                .iter()
                .filter_map(|&jump| self.jump_target(from, jump))
                .filter(|&sq| self.is_open(sq))
                .collect(),
        }
    }

    /// Whether `player` has at least one legal move
    pub fn has_liberties(&self, player: Player) -> bool {
        match self.location(player) {
            None => self.open != 0,
            Some(from) => Jump::ALL.iter().any(|&jump| {
                self.jump_target(from, jump)
                    .is_some_and(|sq| self.is_open(sq))
            }),
        }
    }

    /// The square `action` would move the side to move onto
    pub fn destination(&self, action: Action) -> Option<Square> {
        match action {
            Action::Place(square) => Some(square),
            Action::Jump(jump) => self
                .location(self.player())
                .and_then(|from| self.jump_target(from, jump)),
        }
    }

    /// Whether `action` is legal for the side to move
    pub fn is_legal(&self, action: Action) -> bool {
        let placed = self.location(self.player()).is_some();
        let kind_ok = matches!(
            (action, placed),
            (Action::Place(_), false) | (Action::Jump(_), true)
        );
        kind_ok && self.destination(action).is_some_and(|sq| self.is_open(sq))
    }
}

impl Default for Isolation {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState for Isolation {
    type Action = Action;

    fn actions(&self) -> Vec<Action> {
        match self.location(self.player()) {
            None => self.liberties(self.player()).into_iter().map(Action::Place).collect(),
            Some(from) => Jump::ALL
                .iter()
                .copied()
                .filter(|&jump| {
                    self.jump_target(from, jump)
                        .is_some_and(|sq| self.is_open(sq))
                })
                .map(Action::Jump)
                .collect(),
        }
    }

    /// Play `action`; an illegal action returns the position unchanged.
    fn result(&self, action: Action) -> Self {
        if !self.is_legal(action) {
            return *self;
        }
        let Some(destination) = self.destination(action) else {
            return *self;
        };

        let mut next = *self;
        next.open &= !(1u128 << destination);
        next.locations[self.player().index()] = Some(destination);
        next.ply_count += 1;
        next
    }

    fn terminal_test(&self) -> bool {
        !(self.has_liberties(Player::First) && self.has_liberties(Player::Second))
    }

    fn utility(&self, player: Player) -> f64 {
        if !self.terminal_test() {
            return 0.0;
        }
        let active = self.player();
        let winner = if self.has_liberties(active) {
            active
        } else {
            active.opponent()
        };
        terminal_utility(winner, player)
    }

    fn ply_count(&self) -> u32 {
        self.ply_count
    }

    fn player(&self) -> Player {
        Player::to_move(self.ply_count)
    }
}

impl fmt::Display for Isolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            for col in 0..self.width {
                let square = row * self.width + col;
                let cell = if self.location(Player::First) == Some(square) {
                    '1'
                } else if self.location(Player::Second) == Some(square) {
                    '2'
                } else if self.is_open(square) {
                    '.'
                } else {
                    '#'
                };
                if col > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
