//! Batch application.
//!
//! [`BatchEngine`] is the authoritative reducer for a [`Game`]. It applies an
//! already authenticated and bounds-checked batch move by move, runs the
//! flood fill, detects the terminal states and scores the game. Callers that
//! need all-or-nothing semantics run it against a cloned record and commit
//! the clone on success.

mod reveal;
mod score;

pub use score::winning_score;

use crate::env::BoardOracle;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{Cell, Game, Hash32};

/// A cell newly revealed by a batch, with the progress at that point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RevealedCell {
    pub cell: Cell,
    pub adjacent_mines: u8,
    pub move_count: u32,
    pub state_hash: Hash32,
}

/// How the game stands after a batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BatchOutcome {
    /// Safe cells remain hidden.
    InProgress,
    /// A mine was revealed; later moves in the batch were dropped.
    Lost { at: Cell },
    /// Every safe cell is revealed.
    Won { score: u64 },
}

impl BatchOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// Result of applying one batch.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatchReport {
    /// Newly revealed cells in reveal order, flood-filled cells included.
    pub revealed: Vec<RevealedCell>,
    /// Moves that targeted an already revealed cell.
    pub skipped: usize,
    pub outcome: BatchOutcome,
    pub move_count: u32,
    pub state_hash: Hash32,
    /// Seconds since game start at the time of the batch.
    pub time_spent: u64,
}

/// Errors raised by the engine itself.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EngineError {
    #[error("game is already over")]
    GameAlreadyOver,
}

impl GameError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::GameAlreadyOver => "ENGINE_GAME_ALREADY_OVER",
        }
    }
}

/// Applies move batches to one game record.
pub struct BatchEngine<'a, B>
where
    B: BoardOracle + ?Sized,
{
    board: &'a B,
    game: &'a mut Game,
}

impl<'a, B> BatchEngine<'a, B>
where
    B: BoardOracle + ?Sized,
{
    pub fn new(board: &'a B, game: &'a mut Game) -> Self {
        Self { board, game }
    }

    /// Applies `cells` in order.
    ///
    /// - already revealed cells are skipped
    /// - a mine ends the game as lost, exposes every mine and drops the rest
    /// - a safe cell is revealed, with a flood fill when it has no adjacent mines
    ///
    /// After the batch the game is won if every safe cell is revealed. The
    /// state hash is refreshed in every case.
    ///
    /// # Errors
    ///
    /// [`EngineError::GameAlreadyOver`] if the game ended before this batch.
    pub fn apply(&mut self, cells: &[Cell], now: u64) -> Result<BatchReport, EngineError> {
        if self.game.is_over {
            return Err(EngineError::GameAlreadyOver);
        }

        let mut revealed = Vec::new();
        let mut skipped = 0;
        let mut outcome = BatchOutcome::InProgress;

        for &cell in cells {
            if self.game.revealed.contains(cell) {
                skipped += 1;
                continue;
            }
            if self.board.is_mine(&self.game.board_seed, cell) {
                self.lose(cell);
                outcome = BatchOutcome::Lost { at: cell };
                break;
            }
            reveal::flood_reveal(self.board, self.game, cell, &mut revealed);
        }

        if !self.game.is_over && self.game.is_cleared() {
            let score = winning_score(self.game, now);
            self.game.is_over = true;
            self.game.has_won = true;
            self.game.score = score;
            outcome = BatchOutcome::Won { score };
        }

        let state_hash = self.game.refresh_state_hash();
        Ok(BatchReport {
            revealed,
            skipped,
            outcome,
            move_count: self.game.move_count,
            state_hash,
            time_spent: self.game.time_spent(now),
        })
    }

    fn lose(&mut self, at: Cell) {
        self.game.is_over = true;
        self.game.has_won = false;
        self.game.score = 0;
        self.game.exploded_at = Some(at);
        self.game.exposed_mines = self.board.mine_mask(&self.game.board_seed);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::config::GameConfig;
    use crate::env::HashBoard;
    use crate::state::{CellMask, Hash32};

    const BOARD: HashBoard = HashBoard;

    fn find_seed(predicate: impl Fn(&Hash32) -> bool) -> Hash32 {
        (0u8..=255)
            .map(|i| Hash32([i; 32]))
            .find(|seed| predicate(seed))
            .expect("some seed satisfies the predicate")
    }

    fn zero_cells(seed: &Hash32) -> Vec<Cell> {
        Cell::all()
            .filter(|c| !BOARD.is_mine(seed, *c) && BOARD.adjacent_mine_count(seed, *c) == 0)
            .collect()
    }

    fn numbered_safe_cells(seed: &Hash32) -> Vec<Cell> {
        Cell::all()
            .filter(|c| !BOARD.is_mine(seed, *c) && BOARD.adjacent_mine_count(seed, *c) > 0)
            .collect()
    }

    fn first_mine(seed: &Hash32) -> Cell {
        Cell::all().find(|c| BOARD.is_mine(seed, *c)).unwrap()
    }

    /// Independent recursive definition of the flood closure.
    fn expected_closure(seed: &Hash32, start: Cell) -> CellMask {
        let mut seen = BTreeSet::new();
        let mut stack = vec![start];
        while let Some(cell) = stack.pop() {
            if !seen.insert(cell) {
                continue;
            }
            if BOARD.adjacent_mine_count(seed, cell) == 0 {
                stack.extend(cell.neighbors());
            }
        }
        seen.into_iter().collect()
    }

    #[test]
    fn numbered_cell_reveals_only_itself() {
        let seed = find_seed(|s| !numbered_safe_cells(s).is_empty());
        let cell = numbered_safe_cells(&seed)[0];
        let mut game = Game::new(&BOARD, seed, 0);

        let report = BatchEngine::new(&BOARD, &mut game).apply(&[cell], 1).unwrap();

        assert_eq!(report.revealed.len(), 1);
        assert_eq!(report.revealed[0].cell, cell);
        assert_eq!(
            report.revealed[0].adjacent_mines,
            BOARD.adjacent_mine_count(&seed, cell)
        );
        assert_eq!(game.move_count, 1);
        assert_eq!(game.revealed.count(), 1);
    }

    #[test]
    fn flood_fill_reveals_exact_closure() {
        let seed = find_seed(|s| !zero_cells(s).is_empty());
        for start in zero_cells(&seed) {
            let mut game = Game::new(&BOARD, seed, 0);
            let report = BatchEngine::new(&BOARD, &mut game).apply(&[start], 1).unwrap();

            let expected = expected_closure(&seed, start);
            assert_eq!(game.revealed, expected, "closure from {start}");
            assert_eq!(report.revealed.len() as u16, expected.count());
            assert_eq!(game.move_count as u16, expected.count());
            assert!(game.revealed.iter().all(|c| !BOARD.is_mine(&seed, c)));
        }
    }

    #[test]
    fn per_cell_progress_is_sequential() {
        let seed = find_seed(|s| !zero_cells(s).is_empty());
        let start = zero_cells(&seed)[0];
        let mut game = Game::new(&BOARD, seed, 0);
        let report = BatchEngine::new(&BOARD, &mut game).apply(&[start], 1).unwrap();

        for (i, revealed) in report.revealed.iter().enumerate() {
            assert_eq!(revealed.move_count, i as u32 + 1);
        }
        let last = report.revealed.last().unwrap();
        assert_eq!(last.state_hash, game.state_hash);
        assert_eq!(report.state_hash, game.state_hash);
    }

    #[test]
    fn revealed_cells_are_skipped() {
        let seed = find_seed(|s| !numbered_safe_cells(s).is_empty());
        let cell = numbered_safe_cells(&seed)[0];
        let mut game = Game::new(&BOARD, seed, 0);
        BatchEngine::new(&BOARD, &mut game).apply(&[cell], 1).unwrap();
        let hash_before = game.state_hash;

        let report = BatchEngine::new(&BOARD, &mut game)
            .apply(&[cell, cell], 2)
            .unwrap();

        assert!(report.revealed.is_empty());
        assert_eq!(report.skipped, 2);
        assert_eq!(game.move_count, 1);
        assert_eq!(game.state_hash, hash_before);
        assert_eq!(report.outcome, BatchOutcome::InProgress);
    }

    #[test]
    fn mine_ends_game_and_drops_rest_of_batch() {
        let seed = find_seed(|s| numbered_safe_cells(s).len() >= 2);
        let safe = numbered_safe_cells(&seed);
        let (before, after) = (safe[0], safe[1]);
        let mine = first_mine(&seed);
        let mut game = Game::new(&BOARD, seed, 0);

        let report = BatchEngine::new(&BOARD, &mut game)
            .apply(&[before, mine, after], 5)
            .unwrap();

        assert_eq!(report.outcome, BatchOutcome::Lost { at: mine });
        assert!(game.is_over);
        assert!(!game.has_won);
        assert_eq!(game.score, 0);
        assert!(game.revealed.contains(before));
        assert!(!game.revealed.contains(after));
        assert!(!game.revealed.contains(mine));
        assert_eq!(game.exploded_at, Some(mine));
        assert_eq!(game.exposed_mines, BOARD.mine_mask(&seed));
        assert_eq!(game.move_count, 1);
    }

    #[test]
    fn finished_game_rejects_batches() {
        let seed = find_seed(|_| true);
        let mine = first_mine(&seed);
        let mut game = Game::new(&BOARD, seed, 0);
        BatchEngine::new(&BOARD, &mut game).apply(&[mine], 1).unwrap();

        let snapshot = game.clone();
        let err = BatchEngine::new(&BOARD, &mut game).apply(&[mine], 2);
        assert_eq!(err, Err(EngineError::GameAlreadyOver));
        assert_eq!(game, snapshot);
    }

    #[test]
    fn win_is_detected_on_the_completing_batch_only() {
        let seed = Hash32([11; 32]);
        let mut game = Game::new(&BOARD, seed, 100);
        assert_eq!(game.safe_cells(), GameConfig::safe_cells(BOARD.mine_count(&seed)));

        let mut last = None;
        while !game.is_over {
            let batch: Vec<Cell> = Cell::all()
                .filter(|c| !BOARD.is_mine(&seed, *c) && !game.revealed.contains(*c))
                .take(GameConfig::MAX_BATCH_MOVES)
                .collect();
            assert!(!batch.is_empty(), "ran out of cells before winning");

            let report = BatchEngine::new(&BOARD, &mut game).apply(&batch, 160).unwrap();
            if game.is_over {
                last = Some(report);
            } else {
                assert_eq!(report.outcome, BatchOutcome::InProgress);
                assert!(!game.has_won);
            }
        }

        let report = last.unwrap();
        let expected = winning_score(&game, 160);
        assert_eq!(report.outcome, BatchOutcome::Won { score: expected });
        assert!(game.has_won);
        assert_eq!(game.score, expected);
        assert_eq!(game.revealed.count(), game.safe_cells());
        assert!(game.exposed_mines.is_empty());
    }
}
