//! In-memory GameRepository implementation for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use minesweeper_core::{AccountId, BoardSeed, Game};

use crate::repository::{GameRepository, RepositoryError, Result};

#[derive(Default)]
pub struct InMemoryGameRepo {
    games: RwLock<HashMap<AccountId, Game>>,
    history: RwLock<HashMap<AccountId, Vec<BoardSeed>>>,
}

impl InMemoryGameRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameRepository for InMemoryGameRepo {
    fn save(&self, player: &AccountId, game: &Game) -> Result<()> {
        let mut games = self
            .games
            .write()
            .map_err(|_| RepositoryError::LockPoisoned("game"))?;
        games.insert(*player, game.clone());
        Ok(())
    }

    fn load(&self, player: &AccountId) -> Result<Option<Game>> {
        let games = self
            .games
            .read()
            .map_err(|_| RepositoryError::LockPoisoned("game"))?;
        Ok(games.get(player).cloned())
    }

    fn append_history(&self, player: &AccountId, seed: BoardSeed) -> Result<()> {
        let mut history = self
            .history
            .write()
            .map_err(|_| RepositoryError::LockPoisoned("game history"))?;
        history.entry(*player).or_default().push(seed);
        Ok(())
    }

    fn history(&self, player: &AccountId) -> Result<Vec<BoardSeed>> {
        let history = self
            .history
            .read()
            .map_err(|_| RepositoryError::LockPoisoned("game history"))?;
        Ok(history.get(player).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minesweeper_core::{HashBoard, Hash32};

    #[test]
    fn history_is_append_only_per_player() {
        let repo = InMemoryGameRepo::new();
        let alice = AccountId([1; 32]);
        let bob = AccountId([2; 32]);

        repo.append_history(&alice, Hash32([1; 32])).unwrap();
        repo.append_history(&alice, Hash32([2; 32])).unwrap();

        assert_eq!(
            repo.history(&alice).unwrap(),
            vec![Hash32([1; 32]), Hash32([2; 32])]
        );
        assert!(repo.history(&bob).unwrap().is_empty());
    }

    #[test]
    fn save_replaces_current_game() {
        let repo = InMemoryGameRepo::new();
        let player = AccountId([1; 32]);
        repo.save(&player, &Game::new(&HashBoard, Hash32([1; 32]), 0)).unwrap();
        repo.save(&player, &Game::new(&HashBoard, Hash32([2; 32]), 9)).unwrap();

        let game = repo.load(&player).unwrap().unwrap();
        assert_eq!(game.board_seed, Hash32([2; 32]));
        assert_eq!(game.start_time, 9);
    }
}
