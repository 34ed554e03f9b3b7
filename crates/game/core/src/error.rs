//! Common error infrastructure for minesweeper-core.
//!
//! Domain-specific errors (`BatchError`, `AuthError`) live next to the code
//! that raises them. This module provides the shared classification used by
//! the runtime for logging and client-facing error codes.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Validation**: the request was malformed; retrying it unchanged fails again
/// - **Authorization**: the caller is not allowed to do this, or the signature
///   does not match the current session chain position
/// - **Internal**: unexpected state inconsistency; indicates a bug
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Validation,
    Authorization,
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Authorization => "authorization",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all rule errors.
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on who has to change something, not on impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a stable identifier for this error variant.
    ///
    /// Codes are part of the client contract and must not change once published.
    fn error_code(&self) -> &'static str;
}
