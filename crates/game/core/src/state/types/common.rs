use core::fmt;
use core::str::FromStr;

use ed25519_dalek::{SignatureError, VerifyingKey};

use crate::config::GameConfig;

/// 32-byte digest used for board seeds, nonces and the replay chain.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hash32(pub [u8; 32]);

impl Hash32 {
    pub const ZERO: Self = Self([0; 32]);

    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for Hash32 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash32({self})")
    }
}

/// Seed from which the full mine layout of one game is derivable.
pub type BoardSeed = Hash32;

/// Identity of a player or administrator.
///
/// The bytes are an Ed25519 verifying key, so a signature "recovers to" an
/// account exactly when it verifies under that key.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccountId(pub [u8; 32]);

impl AccountId {
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Interprets the account bytes as an Ed25519 public key.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a valid curve point.
    pub fn verifying_key(&self) -> Result<VerifyingKey, SignatureError> {
        VerifyingKey::from_bytes(&self.0)
    }

    /// Abbreviated form for log lines (`0x1a2b3c4d…`).
    pub fn short(&self) -> String {
        format!("0x{}…", hex::encode(&self.0[..4]))
    }
}

impl From<&VerifyingKey> for AccountId {
    fn from(key: &VerifyingKey) -> Self {
        Self(key.to_bytes())
    }
}

impl From<VerifyingKey> for AccountId {
    fn from(key: VerifyingKey) -> Self {
        Self(key.to_bytes())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.short())
    }
}

impl FromStr for AccountId {
    type Err = hex::FromHexError;

    /// Parses 64 hex characters, with or without a `0x` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(digits, &mut bytes)?;
        Ok(Self(bytes))
    }
}

/// A board cell that is known to be in bounds.
///
/// Construct through [`Cell::new`] or [`Cell::from_index`]; both reject
/// coordinates outside the 16×16 board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    x: u8,
    y: u8,
}

impl Cell {
    /// Offsets of the 8-neighbourhood.
    const NEIGHBOR_OFFSETS: [(i8, i8); 8] = [
        (-1, -1),
        (0, -1),
        (1, -1),
        (-1, 0),
        (1, 0),
        (-1, 1),
        (0, 1),
        (1, 1),
    ];

    pub const fn new(x: u8, y: u8) -> Option<Self> {
        if x < GameConfig::WIDTH && y < GameConfig::HEIGHT {
            Some(Self { x, y })
        } else {
            None
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        if index < GameConfig::CELL_COUNT {
            let width = GameConfig::WIDTH as usize;
            Some(Self {
                x: (index % width) as u8,
                y: (index / width) as u8,
            })
        } else {
            None
        }
    }

    pub const fn x(&self) -> u8 {
        self.x
    }

    pub const fn y(&self) -> u8 {
        self.y
    }

    /// Bit position of this cell in a [`CellMask`](crate::state::CellMask): `y * 16 + x`.
    pub const fn index(&self) -> usize {
        self.y as usize * GameConfig::WIDTH as usize + self.x as usize
    }

    /// Up to 8 neighbours, clipped to the board.
    pub fn neighbors(self) -> impl Iterator<Item = Cell> {
        Self::NEIGHBOR_OFFSETS.into_iter().filter_map(move |(dx, dy)| {
            let x = self.x.checked_add_signed(dx)?;
            let y = self.y.checked_add_signed(dy)?;
            Cell::new(x, y)
        })
    }

    /// Every cell of the board in index order.
    pub fn all() -> impl Iterator<Item = Cell> {
        (0..GameConfig::CELL_COUNT).filter_map(Cell::from_index)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
