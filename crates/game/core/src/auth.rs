//! Batch authentication.
//!
//! A player authorizes a batch by signing the commitment
//! `H(player ‖ xs ‖ ys ‖ nonce ‖ last_hash)` with the Ed25519 key whose public
//! half is their [`AccountId`]. Binding `last_hash` ties the signature to one
//! position of the session's replay chain.

use ed25519_dalek::Signer;
use sha2::{Digest, Sha256};

pub use ed25519_dalek::{Signature, SigningKey};

use crate::batch::Move;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{AccountId, Hash32, Session};

/// Why a batch signature was not accepted.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AuthError {
    #[error("account {0} is not a valid Ed25519 public key")]
    MalformedAccount(AccountId),

    #[error("signature does not verify for account {0}")]
    SignerMismatch(AccountId),
}

impl GameError for AuthError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Authorization
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedAccount(_) => "AUTH_MALFORMED_ACCOUNT",
            Self::SignerMismatch(_) => "AUTH_SIGNER_MISMATCH",
        }
    }
}

/// Canonical commitment over a batch at a given chain position.
///
/// Coordinate lists are length-prefixed so `xs`/`ys` boundaries are unambiguous.
pub fn message_hash(
    player: &AccountId,
    xs: &[u8],
    ys: &[u8],
    nonce: &Hash32,
    last_hash: &Hash32,
) -> Hash32 {
    let mut hasher = Sha256::new();
    hasher.update(player.as_bytes());
    hasher.update((xs.len() as u32).to_be_bytes());
    hasher.update(xs);
    hasher.update((ys.len() as u32).to_be_bytes());
    hasher.update(ys);
    hasher.update(nonce.as_bytes());
    hasher.update(last_hash.as_bytes());
    Hash32(hasher.finalize().into())
}

/// Commitment for `moves` at the session's current chain head.
pub fn session_message_hash(player: &AccountId, moves: &[Move], session: &Session) -> Hash32 {
    let xs: Vec<u8> = moves.iter().map(|m| m.x).collect();
    let ys: Vec<u8> = moves.iter().map(|m| m.y).collect();
    message_hash(player, &xs, &ys, &session.nonce, &session.last_hash)
}

/// Client-side helper: signs `moves` against the session's current chain head.
pub fn sign_batch(key: &SigningKey, moves: &[Move], session: &Session) -> Signature {
    let player = AccountId::from(key.verifying_key());
    key.sign(session_message_hash(&player, moves, session).as_bytes())
}

/// Checks that `signature` over `message_hash` was produced by `player`.
///
/// # Errors
///
/// [`AuthError::MalformedAccount`] if the account is not a public key,
/// [`AuthError::SignerMismatch`] if the signature does not verify.
pub fn verify_signature(
    player: &AccountId,
    message_hash: &Hash32,
    signature: &Signature,
) -> Result<(), AuthError> {
    let key = player
        .verifying_key()
        .map_err(|_| AuthError::MalformedAccount(*player))?;
    key.verify_strict(message_hash.as_bytes(), signature)
        .map_err(|_| AuthError::SignerMismatch(*player))
}
