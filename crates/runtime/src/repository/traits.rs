//! Repository contracts for the per-player records.

use minesweeper_core::{AccountId, BoardSeed, Game, Session};

use super::error::{RepositoryError, Result};

/// Storage for session records, one per player.
///
/// Records are returned as stored; expiry is the caller's concern.
pub trait SessionRepository: Send + Sync {
    /// Insert or overwrite the player's session.
    fn save(&self, session: &Session) -> Result<()>;

    fn load(&self, player: &AccountId) -> Result<Option<Session>>;

    /// Remove the player's session, returning the removed record.
    fn delete(&self, player: &AccountId) -> Result<Option<Session>>;

    /// Every stored record, expired ones included.
    fn list(&self) -> Result<Vec<Session>>;

    /// Sum of the stakes held by stored records.
    fn total_stake(&self) -> Result<u128> {
        self.list()?
            .iter()
            .try_fold(0u128, |total, session| total.checked_add(session.stake))
            .ok_or(RepositoryError::StakeOverflow)
    }
}

/// Storage for game records plus the append-only history of board seeds.
///
/// The worker writes the game before the history entry when a game starts, so
/// a failed append can leave a current game missing from `history`, never a
/// history entry without a game. Game writes precede session writes when a
/// batch commits.
pub trait GameRepository: Send + Sync {
    /// Insert or overwrite the player's current game.
    fn save(&self, player: &AccountId, game: &Game) -> Result<()>;

    fn load(&self, player: &AccountId) -> Result<Option<Game>>;

    fn append_history(&self, player: &AccountId, seed: BoardSeed) -> Result<()>;

    /// Board seeds of every game the player started, oldest first.
    fn history(&self, player: &AccountId) -> Result<Vec<BoardSeed>>;
}
