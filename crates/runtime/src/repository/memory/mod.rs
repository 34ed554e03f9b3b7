//! In-memory repository implementations for testing and development.

mod game;
mod session;

pub use game::InMemoryGameRepo;
pub use session::InMemorySessionRepo;
