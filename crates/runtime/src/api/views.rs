//! Read-only snapshots returned by runtime queries.

use minesweeper_core::{AccountId, BoardSeed, Game, Session};

use crate::access::Treasury;
use crate::leaderboard::Leaderboard;

/// Everything stored for one player, sampled in a single worker step.
#[derive(Debug, Clone, Default)]
pub struct AccountView {
    /// Stored session record; present even after expiry until closed.
    pub session: Option<Session>,
    /// Whether `session` is usable right now.
    pub session_active: bool,
    pub game: Option<Game>,
    pub history: Vec<BoardSeed>,
    pub is_player: bool,
    pub high_score: u64,
}

/// Engine-wide state, sampled in a single worker step.
#[derive(Debug, Clone, Default)]
pub struct GlobalView {
    pub owner: Option<AccountId>,
    pub paused: bool,
    pub treasury: Treasury,
    pub leaderboard: Leaderboard,
}
