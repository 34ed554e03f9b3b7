//! Player registry and high-score table.

use std::collections::HashMap;

use minesweeper_core::AccountId;
use serde::{Deserialize, Serialize};

/// One row of the ranked leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player: AccountId,
    pub score: u64,
}

/// Append-only, deduplicated list of every player that ever opened a session,
/// plus each player's best score.
#[derive(Debug, Clone, Default)]
pub struct Leaderboard {
    players: Vec<AccountId>,
    high_scores: HashMap<AccountId, u64>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `player` to the registry. Returns `true` on first registration.
    pub fn register(&mut self, player: AccountId) -> bool {
        if self.high_scores.contains_key(&player) {
            return false;
        }
        self.players.push(player);
        self.high_scores.insert(player, 0);
        true
    }

    pub fn is_player(&self, player: &AccountId) -> bool {
        self.high_scores.contains_key(player)
    }

    /// Registered players in registration order.
    pub fn players(&self) -> &[AccountId] {
        &self.players
    }

    pub fn high_score(&self, player: &AccountId) -> u64 {
        self.high_scores.get(player).copied().unwrap_or(0)
    }

    /// Best score of each requested player, zero for unknown accounts.
    pub fn scores(&self, players: &[AccountId]) -> Vec<u64> {
        players.iter().map(|player| self.high_score(player)).collect()
    }

    /// Records `score` if it beats the player's best. Returns `true` if the
    /// stored high score changed.
    pub fn record(&mut self, player: AccountId, score: u64) -> bool {
        self.register(player);
        let best = self.high_scores.entry(player).or_insert(0);
        if score > *best {
            *best = score;
            true
        } else {
            false
        }
    }

    /// Every registered player by descending score; ties keep registration order.
    pub fn ranking(&self) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<_> = self
            .players
            .iter()
            .map(|&player| LeaderboardEntry {
                player,
                score: self.high_score(&player),
            })
            .collect();
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(byte: u8) -> AccountId {
        AccountId([byte; 32])
    }

    #[test]
    fn registry_is_deduplicated() {
        let mut board = Leaderboard::new();
        assert!(board.register(account(1)));
        assert!(board.register(account(2)));
        assert!(!board.register(account(1)));
        assert_eq!(board.players(), &[account(1), account(2)]);
        assert!(board.is_player(&account(2)));
        assert!(!board.is_player(&account(3)));
    }

    #[test]
    fn only_higher_scores_are_recorded() {
        let mut board = Leaderboard::new();
        assert!(board.record(account(1), 500));
        assert!(!board.record(account(1), 300));
        assert!(board.record(account(1), 700));
        assert_eq!(board.high_score(&account(1)), 700);
        assert_eq!(board.scores(&[account(1), account(9)]), vec![700, 0]);
    }

    #[test]
    fn ranking_is_descending_and_stable() {
        let mut board = Leaderboard::new();
        board.register(account(1));
        board.register(account(2));
        board.register(account(3));
        board.record(account(3), 900);
        board.record(account(1), 100);

        let ranked: Vec<_> = board.ranking().iter().map(|e| e.player).collect();
        assert_eq!(ranked, vec![account(3), account(1), account(2)]);
    }
}
