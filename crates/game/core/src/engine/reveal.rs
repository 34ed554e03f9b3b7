use std::collections::VecDeque;

use crate::env::BoardOracle;
use crate::state::{Cell, Game};

use super::RevealedCell;

/// Reveals `start` and, if it has no adjacent mines, the maximal connected
/// zero region around it plus that region's numbered border.
///
/// The queue only ever holds zero-adjacency cells whose neighbours still need
/// visiting. A cell's mask bit is set before it is queued, so each cell is
/// revealed and queued at most once and the fill terminates within one pass
/// over the board.
///
/// `start` must be in bounds, hidden and not a mine.
pub(super) fn flood_reveal<B>(
    board: &B,
    game: &mut Game,
    start: Cell,
    revealed: &mut Vec<RevealedCell>,
) where
    B: BoardOracle + ?Sized,
{
    let mut queue = VecDeque::new();
    if reveal_one(board, game, start, revealed) == 0 {
        queue.push_back(start);
    }

    while let Some(zero) = queue.pop_front() {
        for neighbor in zero.neighbors() {
            if game.revealed.contains(neighbor) {
                continue;
            }
            // Neighbours of a zero cell are never mines.
            if reveal_one(board, game, neighbor, revealed) == 0 {
                queue.push_back(neighbor);
            }
        }
    }
}

fn reveal_one<B>(board: &B, game: &mut Game, cell: Cell, revealed: &mut Vec<RevealedCell>) -> u8
where
    B: BoardOracle + ?Sized,
{
    debug_assert!(!board.is_mine(&game.board_seed, cell));
    let fresh = game.revealed.insert(cell);
    debug_assert!(fresh);

    game.move_count += 1;
    let adjacent_mines = board.adjacent_mine_count(&game.board_seed, cell);
    revealed.push(RevealedCell {
        cell,
        adjacent_mines,
        move_count: game.move_count,
        state_hash: game.refresh_state_hash(),
    });
    adjacent_mines
}
