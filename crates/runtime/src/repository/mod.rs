//! Repository layer for per-player records.
//!
//! Repositories hold the data keyed by player that CHANGES during gameplay:
//! - Sessions (stake, expiry, replay chain)
//! - Games (current record plus history of board seeds)
//!
//! Global state (owner, pause flag, treasury, leaderboard) is small and lives
//! inside the engine worker.

mod error;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use memory::{InMemoryGameRepo, InMemorySessionRepo};
pub use traits::{GameRepository, SessionRepository};
