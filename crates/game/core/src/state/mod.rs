//! Authoritative game records.
//!
//! This module owns the per-player session and game records plus the value
//! types they are built from. Runtime layers clone or query these records but
//! mutate games exclusively through the engine.
mod game;
mod mask;
mod session;
pub mod types;

pub use game::Game;
pub use mask::CellMask;
pub use session::Session;
pub use types::{AccountId, BoardSeed, Cell, Hash32};
