//! Board oracle: the pure mapping from a seed to the mine layout.

use sha2::{Digest, Sha256};

use crate::config::GameConfig;
use crate::state::{BoardSeed, Cell, CellMask};

/// Read-only view of a board's mine layout.
///
/// Implementations must be pure and deterministic: the engine and every client
/// mirror recompute the layout from the seed instead of storing it.
pub trait BoardOracle: Send + Sync {
    /// Whether the cell holds a mine on the board derived from `seed`.
    fn is_mine(&self, seed: &BoardSeed, cell: Cell) -> bool;

    /// Number of mines among the up-to-8 in-bounds neighbours of `cell`.
    fn adjacent_mine_count(&self, seed: &BoardSeed, cell: Cell) -> u8 {
        cell.neighbors()
            .filter(|neighbor| self.is_mine(seed, *neighbor))
            .count() as u8
    }

    /// Total mines on the board.
    fn mine_count(&self, seed: &BoardSeed) -> u16 {
        Cell::all().filter(|cell| self.is_mine(seed, *cell)).count() as u16
    }

    /// Every mine on the board as a mask.
    fn mine_mask(&self, seed: &BoardSeed) -> CellMask {
        Cell::all().filter(|cell| self.is_mine(seed, *cell)).collect()
    }
}

/// Canonical SHA-256 board.
///
/// A cell is a mine iff `SHA-256(seed ‖ x ‖ y)`, read as a big-endian 256-bit
/// integer and reduced modulo 256, is below [`GameConfig::MINE_THRESHOLD`].
/// Reducing modulo 256 keeps only the final digest byte.
#[derive(Clone, Copy, Debug, Default)]
pub struct HashBoard;

impl HashBoard {
    /// Position hash for a cell, exposed for client mirrors and debugging.
    pub fn position_hash(seed: &BoardSeed, x: u8, y: u8) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(seed.as_bytes());
        hasher.update([x, y]);
        hasher.finalize().into()
    }
}

impl BoardOracle for HashBoard {
    fn is_mine(&self, seed: &BoardSeed, cell: Cell) -> bool {
        let digest = Self::position_hash(seed, cell.x(), cell.y());
        digest[31] < GameConfig::MINE_THRESHOLD
    }
}
