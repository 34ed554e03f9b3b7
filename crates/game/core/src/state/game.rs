use crate::config::GameConfig;
use crate::env::BoardOracle;
use crate::hash::state_hash;
use crate::state::{BoardSeed, Cell, CellMask, Hash32};

/// Per-player game record.
///
/// `revealed` only gains bits, `move_count` only grows and `is_over` never
/// reverts; all mutation goes through [`crate::engine::BatchEngine`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Game {
    pub board_seed: BoardSeed,
    pub revealed: CellMask,
    pub start_time: u64,
    /// Number of cells revealed so far, flood-filled cells included.
    pub move_count: u32,
    /// Mines on this board, counted once at creation.
    pub mine_count: u16,
    pub is_over: bool,
    pub has_won: bool,
    pub score: u64,
    /// Digest of `(board_seed, revealed, move_count)` after the last batch.
    pub state_hash: Hash32,
    /// The mine that ended the game, if one did.
    pub exploded_at: Option<Cell>,
    /// Every mine on the board, filled in for display when a mine ends the game.
    pub exposed_mines: CellMask,
}

impl Game {
    /// Creates a fresh game for `board_seed`, counting its mines eagerly.
    pub fn new<B>(board: &B, board_seed: BoardSeed, now: u64) -> Self
    where
        B: BoardOracle + ?Sized,
    {
        let revealed = CellMask::EMPTY;
        Self {
            board_seed,
            revealed,
            start_time: now,
            move_count: 0,
            mine_count: board.mine_count(&board_seed),
            is_over: false,
            has_won: false,
            score: 0,
            state_hash: state_hash(&board_seed, &revealed, 0),
            exploded_at: None,
            exposed_mines: CellMask::EMPTY,
        }
    }

    /// Safe cells on this board.
    pub fn safe_cells(&self) -> u16 {
        GameConfig::safe_cells(self.mine_count)
    }

    /// Every safe cell is revealed.
    pub fn is_cleared(&self) -> bool {
        self.revealed.count() == self.safe_cells()
    }

    pub fn time_spent(&self, now: u64) -> u64 {
        now.saturating_sub(self.start_time)
    }

    /// Recomputes [`Game::state_hash`] from the current fields.
    pub fn refresh_state_hash(&mut self) -> Hash32 {
        self.state_hash = state_hash(&self.board_seed, &self.revealed, self.move_count);
        self.state_hash
    }
}
