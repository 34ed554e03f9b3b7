//! In-memory SessionRepository implementation for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use minesweeper_core::{AccountId, Session};

use crate::repository::{RepositoryError, Result, SessionRepository};

/// Sessions keyed by player.
#[derive(Default)]
pub struct InMemorySessionRepo {
    sessions: RwLock<HashMap<AccountId, Session>>,
}

impl InMemorySessionRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionRepository for InMemorySessionRepo {
    fn save(&self, session: &Session) -> Result<()> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| RepositoryError::LockPoisoned("session"))?;
        sessions.insert(session.player, session.clone());
        Ok(())
    }

    fn load(&self, player: &AccountId) -> Result<Option<Session>> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| RepositoryError::LockPoisoned("session"))?;
        Ok(sessions.get(player).cloned())
    }

    fn delete(&self, player: &AccountId) -> Result<Option<Session>> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| RepositoryError::LockPoisoned("session"))?;
        Ok(sessions.remove(player))
    }

    fn list(&self) -> Result<Vec<Session>> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| RepositoryError::LockPoisoned("session"))?;
        Ok(sessions.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minesweeper_core::Hash32;

    #[test]
    fn save_overwrites_and_delete_returns_record() {
        let repo = InMemorySessionRepo::new();
        let player = AccountId([1; 32]);
        repo.save(&Session::open(player, 10, Hash32([1; 32]), 0)).unwrap();
        repo.save(&Session::open(player, 25, Hash32([2; 32]), 5)).unwrap();

        assert_eq!(repo.list().unwrap().len(), 1);
        assert_eq!(repo.total_stake().unwrap(), 25);

        let removed = repo.delete(&player).unwrap().unwrap();
        assert_eq!(removed.nonce, Hash32([2; 32]));
        assert!(repo.load(&player).unwrap().is_none());
        assert!(repo.delete(&player).unwrap().is_none());
    }
}
