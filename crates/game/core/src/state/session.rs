use crate::config::GameConfig;
use crate::hash::chain_origin;
use crate::state::{AccountId, Hash32};

/// Time- and stake-bounded authorization window for one player.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Session {
    pub player: AccountId,
    /// Absolute time (unix seconds) after which the session is unusable.
    pub expiry_time: u64,
    /// Deposit backing the session, refunded on close.
    pub stake: u128,
    /// Random value fixed at creation.
    pub nonce: Hash32,
    /// Replay-protection chain head. Every accepted batch replaces it with the
    /// batch's message hash, so each signature can be used exactly once.
    pub last_hash: Hash32,
    /// Time of the last accepted batch (informational).
    pub last_action_time: u64,
}

impl Session {
    /// Opens a session that lasts [`GameConfig::SESSION_DURATION`] from `now`.
    pub fn open(player: AccountId, stake: u128, nonce: Hash32, now: u64) -> Self {
        Self {
            player,
            expiry_time: now.saturating_add(GameConfig::SESSION_DURATION),
            stake,
            nonce,
            last_hash: chain_origin(&nonce),
            last_action_time: now,
        }
    }

    /// Active iff `expiry_time > now`. Expired records are kept until closed
    /// but must be treated as absent for authorization.
    pub fn is_active(&self, now: u64) -> bool {
        self.expiry_time > now
    }

    /// Seconds until expiry, zero once expired.
    pub fn remaining(&self, now: u64) -> u64 {
        self.expiry_time.saturating_sub(now)
    }

    /// Moves the chain head to the hash of the batch that was just accepted.
    pub fn advance_chain(&mut self, message_hash: Hash32, now: u64) {
        self.last_hash = message_hash;
        self.last_action_time = now;
    }
}
