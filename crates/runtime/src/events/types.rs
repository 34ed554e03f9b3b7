//! Event types for different topics.

use minesweeper_core::{AccountId, BatchOutcome, BoardSeed, Hash32};
use serde::{Deserialize, Serialize};

/// Session lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    SessionCreated {
        player: AccountId,
        expiry_time: u64,
        nonce: Hash32,
        stake: u128,
    },

    /// The session record was removed and its stake returned.
    SessionClosed { player: AccountId, refund: u128 },

    /// A still-escrowed stake was moved to the forfeited balance because the
    /// player opened a new session over an existing record.
    StakeForfeited { player: AccountId, amount: u128 },
}

/// Gameplay events, in the order they happen within a call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    GameStarted {
        player: AccountId,
        board_seed: BoardSeed,
        mine_count: u16,
        timestamp: u64,
    },

    /// One per newly revealed cell, flood-filled cells included.
    CellRevealed {
        player: AccountId,
        x: u8,
        y: u8,
        adjacent_mines: u8,
        state_hash: Hash32,
        move_count: u32,
    },

    GameOver {
        player: AccountId,
        won: bool,
        score: u64,
        time_spent: u64,
    },

    /// Summary emitted last for every accepted batch.
    BatchProcessed {
        player: AccountId,
        move_count: u32,
        state_hash: Hash32,
        outcome: BatchOutcome,
    },
}

/// Owner-only operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdminEvent {
    Paused { account: AccountId },
    Unpaused { account: AccountId },
    OwnershipTransferred {
        previous: Option<AccountId>,
        new: Option<AccountId>,
    },
    Withdrawn { owner: AccountId, amount: u128 },
}
