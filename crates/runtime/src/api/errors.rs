//! Unified error types surfaced by the runtime API.
//!
//! Wraps rule violations from the engine, worker coordination failures and
//! repository errors so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use minesweeper_core::{AccountId, AuthError, BatchError, ErrorSeverity, GameError};

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("stake {provided} is below the minimum of {minimum}")]
    InsufficientStake { provided: u128, minimum: u128 },

    #[error("stake {stake} would overflow the treasury")]
    TreasuryOverflow { stake: u128 },

    #[error("no active session for {player}")]
    SessionExpired { player: AccountId },

    #[error("no session record for {player}")]
    SessionNotFound { player: AccountId },

    #[error("invalid signature for {player}")]
    InvalidSignature {
        player: AccountId,
        #[source]
        source: AuthError,
    },

    #[error("batch contains no moves")]
    EmptyBatch,

    #[error("batch of {len} moves exceeds the limit of {max}")]
    BatchTooLarge { len: usize, max: usize },

    #[error("move {index} at ({x}, {y}) is outside the board")]
    InvalidCoordinates { index: usize, x: u8, y: u8 },

    #[error("no game for {player}")]
    GameNotFound { player: AccountId },

    #[error("game for {player} is already over")]
    GameAlreadyOver { player: AccountId },

    #[error("engine is paused")]
    Paused,

    #[error("engine is not paused")]
    NotPaused,

    #[error("{caller} is not the owner")]
    Unauthorized { caller: AccountId },

    #[error("engine worker command channel closed")]
    CommandChannelClosed,

    #[error("engine worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("engine worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<BatchError> for RuntimeError {
    fn from(error: BatchError) -> Self {
        match error {
            BatchError::Empty => Self::EmptyBatch,
            BatchError::TooLarge { len, max } => Self::BatchTooLarge { len, max },
            BatchError::InvalidCoordinates { index, x, y } => {
                Self::InvalidCoordinates { index, x, y }
            }
        }
    }
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidSignature { .. } | Self::Unauthorized { .. } => {
                ErrorSeverity::Authorization
            }
            Self::CommandChannelClosed
            | Self::ReplyChannelClosed(_)
            | Self::WorkerJoin(_)
            | Self::Repository(_) => ErrorSeverity::Internal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientStake { .. } => "INSUFFICIENT_STAKE",
            Self::TreasuryOverflow { .. } => "TREASURY_OVERFLOW",
            Self::SessionExpired { .. } => "SESSION_EXPIRED",
            Self::SessionNotFound { .. } => "SESSION_NOT_FOUND",
            Self::InvalidSignature { .. } => "INVALID_SIGNATURE",
            Self::EmptyBatch => "EMPTY_BATCH",
            Self::BatchTooLarge { .. } => "BATCH_TOO_LARGE",
            Self::InvalidCoordinates { .. } => "INVALID_COORDINATES",
            Self::GameNotFound { .. } => "GAME_NOT_FOUND",
            Self::GameAlreadyOver { .. } => "GAME_ALREADY_OVER",
            Self::Paused => "PAUSED",
            Self::NotPaused => "NOT_PAUSED",
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::CommandChannelClosed => "COMMAND_CHANNEL_CLOSED",
            Self::ReplyChannelClosed(_) => "REPLY_CHANNEL_CLOSED",
            Self::WorkerJoin(_) => "WORKER_JOIN",
            Self::Repository(_) => "REPOSITORY",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_errors_map_to_runtime_variants() {
        assert!(matches!(
            RuntimeError::from(BatchError::Empty),
            RuntimeError::EmptyBatch
        ));
        assert!(matches!(
            RuntimeError::from(BatchError::TooLarge { len: 21, max: 20 }),
            RuntimeError::BatchTooLarge { len: 21, max: 20 }
        ));
        let err = RuntimeError::from(BatchError::InvalidCoordinates { index: 2, x: 16, y: 0 });
        assert_eq!(err.error_code(), "INVALID_COORDINATES");
        assert_eq!(err.to_string(), "move 2 at (16, 0) is outside the board");
    }

    #[test]
    fn severity_classification() {
        let player = AccountId([1; 32]);
        assert_eq!(
            RuntimeError::Unauthorized { caller: player }.severity(),
            ErrorSeverity::Authorization
        );
        assert!(RuntimeError::CommandChannelClosed.severity().is_internal());
        assert_eq!(RuntimeError::Paused.severity(), ErrorSeverity::Validation);
    }
}
