//! Move batches: the unit a player signs and the engine applies.

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::error::{ErrorSeverity, GameError};
use crate::state::Cell;

const MAX: usize = GameConfig::MAX_BATCH_MOVES;

/// A requested reveal at raw coordinates.
///
/// Coordinates are carried unchecked so that the signed commitment covers
/// exactly what the client sent; [`MoveBatch::cells`] performs the bounds check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Move {
    pub x: u8,
    pub y: u8,
}

impl Move {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    pub const fn cell(&self) -> Option<Cell> {
        Cell::new(self.x, self.y)
    }
}

impl From<Cell> for Move {
    fn from(cell: Cell) -> Self {
        Self::new(cell.x(), cell.y())
    }
}

/// Reasons a batch is rejected before any move is applied.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BatchError {
    #[error("batch contains no moves")]
    Empty,

    #[error("batch of {len} moves exceeds the limit of {max}")]
    TooLarge { len: usize, max: usize },

    #[error("move {index} at ({x}, {y}) is outside the board")]
    InvalidCoordinates { index: usize, x: u8, y: u8 },
}

impl GameError for BatchError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Empty => "BATCH_EMPTY",
            Self::TooLarge { .. } => "BATCH_TOO_LARGE",
            Self::InvalidCoordinates { .. } => "BATCH_INVALID_COORDINATES",
        }
    }
}

/// Ordered, non-empty list of at most [`GameConfig::MAX_BATCH_MOVES`] moves.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveBatch {
    moves: ArrayVec<Move, MAX>,
}

impl MoveBatch {
    /// Checks the batch length. Coordinates are checked later by
    /// [`MoveBatch::cells`], after the signature has been verified.
    ///
    /// # Errors
    ///
    /// [`BatchError::Empty`] or [`BatchError::TooLarge`].
    pub fn new(moves: &[Move]) -> Result<Self, BatchError> {
        if moves.is_empty() {
            return Err(BatchError::Empty);
        }
        if moves.len() > MAX {
            return Err(BatchError::TooLarge {
                len: moves.len(),
                max: MAX,
            });
        }
        Ok(Self {
            moves: moves.iter().copied().collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// X coordinates in submission order.
    pub fn xs(&self) -> ArrayVec<u8, MAX> {
        self.moves.iter().map(|m| m.x).collect()
    }

    /// Y coordinates in submission order.
    pub fn ys(&self) -> ArrayVec<u8, MAX> {
        self.moves.iter().map(|m| m.y).collect()
    }

    /// Validates every coordinate, all or nothing.
    ///
    /// # Errors
    ///
    /// [`BatchError::InvalidCoordinates`] for the first out-of-range move.
    pub fn cells(&self) -> Result<ArrayVec<Cell, MAX>, BatchError> {
        self.moves
            .iter()
            .enumerate()
            .map(|(index, m)| {
                m.cell().ok_or(BatchError::InvalidCoordinates {
                    index,
                    x: m.x,
                    y: m.y,
                })
            })
            .collect()
    }
}
