//! Runtime orchestration for the session-gated Minesweeper engine.
//!
//! This crate wires together the rule crate, per-player repositories, the
//! administrative state and a sequential worker task into a cohesive runtime
//! API. Consumers embed [`Runtime`] and interact with the engine through
//! [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator, builder and configuration
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`processor`] authenticates and applies signed batches
//! - [`access`] and [`leaderboard`] hold the engine-wide state
//! - [`repository`] provides storage adapters for per-player records
//! - [`clock`] abstracts the time source used for expiry
//! - `workers` keeps the background task internal to the crate
pub mod access;
pub mod api;
pub mod clock;
pub mod events;
pub mod leaderboard;
pub mod processor;
pub mod repository;
pub mod runtime;

mod workers;

pub use access::{AccessControl, Treasury};
pub use api::{AccountView, GlobalView, Result, RuntimeError, RuntimeHandle};
pub use clock::{Clock, ManualClock, SystemClock};
pub use events::{AdminEvent, Event, EventBus, GameEvent, SessionEvent, Topic};
pub use leaderboard::{Leaderboard, LeaderboardEntry};
pub use processor::{MoveProcessor, ProcessedBatch};
pub use repository::{
    GameRepository, InMemoryGameRepo, InMemorySessionRepo, RepositoryError, SessionRepository,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
