//! Deterministic Minesweeper rules and data types shared by the runtime and clients.
//!
//! `minesweeper-core` defines the canonical board derivation, batch
//! authentication, reveal/flood-fill semantics and scoring. Nothing here reads
//! a clock or an entropy source: callers pass `now` and random bytes in, so a
//! client mirror that replays the same inputs reaches the same state hash.
//! All game mutation flows through [`engine::BatchEngine`].
pub mod auth;
pub mod batch;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod hash;
pub mod state;

pub use auth::{
    AuthError, Signature, SigningKey, message_hash, session_message_hash, sign_batch,
    verify_signature,
};
pub use batch::{BatchError, Move, MoveBatch};
pub use config::GameConfig;
pub use engine::{BatchEngine, BatchOutcome, BatchReport, EngineError, RevealedCell, winning_score};
pub use env::{BoardOracle, HashBoard};
pub use error::{ErrorSeverity, GameError};
pub use hash::{chain_origin, derive_board_seed, state_hash};
pub use state::{AccountId, BoardSeed, Cell, CellMask, Game, Hash32, Session};
