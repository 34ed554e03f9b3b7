//! Traits describing read-only board data.
//!
//! The engine reaches the mine layout only through [`BoardOracle`], so the
//! layout is never stored and any implementation that agrees with
//! [`HashBoard`] can serve as a client mirror.
mod board;

pub use board::{BoardOracle, HashBoard};
