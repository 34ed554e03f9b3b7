use crate::config::GameConfig;
use crate::state::Game;

/// Final score of a won game.
///
/// `POINTS_PER_SAFE_CELL` per safe cell plus one point for every second left
/// in the time-bonus window. Lost games always score zero.
pub fn winning_score(game: &Game, now: u64) -> u64 {
    let base = u64::from(game.safe_cells()) * GameConfig::POINTS_PER_SAFE_CELL;
    let bonus = GameConfig::TIME_BONUS_WINDOW.saturating_sub(game.time_spent(now));
    base + bonus
}
