//! Error types raised by repository implementations.

use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{0} repository lock was poisoned")]
    LockPoisoned(&'static str),

    #[error("stored stakes exceed the representable total")]
    StakeOverflow,
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
