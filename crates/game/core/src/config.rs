/// Fixed game parameters shared by the engine and every client mirror.
///
/// The board geometry and mine density are part of the public protocol: a
/// client that recomputes the board from a seed must use the same values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GameConfig;

impl GameConfig {
    // ===== board geometry =====
    pub const WIDTH: u8 = 16;
    pub const HEIGHT: u8 = 16;
    pub const CELL_COUNT: usize = Self::WIDTH as usize * Self::HEIGHT as usize;

    /// A cell is a mine iff its position hash reduced modulo
    /// [`Self::CELL_COUNT`] is below this threshold (40/256 ≈ 15.6%).
    pub const MINE_THRESHOLD: u8 = 40;

    // ===== batch limits =====
    pub const MAX_BATCH_MOVES: usize = 20;

    // ===== session =====
    /// Session lifetime in seconds.
    pub const SESSION_DURATION: u64 = 60 * 60;

    /// Minimum stake in base units (0.01 of a 10^18-unit token).
    pub const MIN_STAKE: u128 = 10_000_000_000_000_000;

    // ===== scoring =====
    pub const POINTS_PER_SAFE_CELL: u64 = 10;

    /// Seconds after game start during which a win still earns a time bonus.
    /// One bonus point per second left in the window.
    pub const TIME_BONUS_WINDOW: u64 = Self::SESSION_DURATION;

    /// Number of non-mine cells on a board with `mine_count` mines.
    pub const fn safe_cells(mine_count: u16) -> u16 {
        Self::CELL_COUNT as u16 - mine_count
    }
}
