use core::fmt;

use crate::config::GameConfig;
use crate::state::Cell;

const WORDS: usize = GameConfig::CELL_COUNT / 64;

/// 256-bit set of board cells; bit `y * 16 + x` is set iff the cell is in the set.
///
/// Used both for the monotonic revealed-cell mask and for exposing mines once
/// a game ends.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellMask([u64; WORDS]);

impl CellMask {
    pub const EMPTY: Self = Self([0; WORDS]);

    pub fn contains(&self, cell: Cell) -> bool {
        let i = cell.index();
        self.0[i / 64] & (1u64 << (i % 64)) != 0
    }

    /// Sets the bit for `cell`. Returns `true` if it was not set before.
    pub fn insert(&mut self, cell: Cell) -> bool {
        let i = cell.index();
        let bit = 1u64 << (i % 64);
        let word = &mut self.0[i / 64];
        let fresh = *word & bit == 0;
        *word |= bit;
        fresh
    }

    /// Population count.
    pub fn count(&self) -> u16 {
        self.0.iter().map(|w| w.count_ones() as u16).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|w| *w == 0)
    }

    /// `true` if every bit of `self` is also set in `other`.
    pub fn is_subset(&self, other: &CellMask) -> bool {
        self.0.iter().zip(other.0.iter()).all(|(a, b)| a & !b == 0)
    }

    pub fn union(&self, other: &CellMask) -> CellMask {
        let mut out = *self;
        for (word, rhs) in out.0.iter_mut().zip(other.0.iter()) {
            *word |= rhs;
        }
        out
    }

    /// Cells in the set, in index order.
    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        Cell::all().filter(move |cell| self.contains(*cell))
    }

    /// Big-endian encoding of the mask as a 256-bit unsigned integer
    /// (cell 0 is the least significant bit).
    pub fn to_be_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        for (i, word) in self.0.iter().rev().enumerate() {
            out[i * 8..(i + 1) * 8].copy_from_slice(&word.to_be_bytes());
        }
        out
    }
}

impl FromIterator<Cell> for CellMask {
    fn from_iter<T: IntoIterator<Item = Cell>>(iter: T) -> Self {
        let mut mask = CellMask::EMPTY;
        for cell in iter {
            mask.insert(cell);
        }
        mask
    }
}

impl fmt::Debug for CellMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CellMask(0x{})", hex::encode(self.to_be_bytes()))
    }
}
