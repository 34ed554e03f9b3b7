//! Owner, pause switch and forfeited funds.

use minesweeper_core::AccountId;
use serde::{Deserialize, Serialize};

use crate::api::{Result, RuntimeError};

/// Funds held by the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Treasury {
    /// Stakes backing stored session records, refundable on close.
    pub escrowed: u128,
    /// Stakes of overwritten sessions, withdrawable by the owner.
    pub forfeited: u128,
}

/// Administrative state gating the player-facing operations.
///
/// Every mutator checks all of its preconditions before touching state.
#[derive(Debug, Clone, Default)]
pub struct AccessControl {
    owner: Option<AccountId>,
    paused: bool,
    forfeited: u128,
}

impl AccessControl {
    pub fn new(owner: Option<AccountId>) -> Self {
        Self {
            owner,
            paused: false,
            forfeited: 0,
        }
    }

    pub fn owner(&self) -> Option<AccountId> {
        self.owner
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn forfeited(&self) -> u128 {
        self.forfeited
    }

    pub fn ensure_owner(&self, caller: &AccountId) -> Result<()> {
        match self.owner {
            Some(owner) if owner == *caller => Ok(()),
            _ => Err(RuntimeError::Unauthorized { caller: *caller }),
        }
    }

    pub fn ensure_not_paused(&self) -> Result<()> {
        if self.paused {
            Err(RuntimeError::Paused)
        } else {
            Ok(())
        }
    }

    pub fn pause(&mut self, caller: &AccountId) -> Result<()> {
        self.ensure_owner(caller)?;
        self.ensure_not_paused()?;
        self.paused = true;
        Ok(())
    }

    pub fn unpause(&mut self, caller: &AccountId) -> Result<()> {
        self.ensure_owner(caller)?;
        if !self.paused {
            return Err(RuntimeError::NotPaused);
        }
        self.paused = false;
        Ok(())
    }

    /// Replaces the owner. Returns the previous owner.
    pub fn transfer_ownership(
        &mut self,
        caller: &AccountId,
        new_owner: AccountId,
    ) -> Result<Option<AccountId>> {
        self.ensure_owner(caller)?;
        Ok(self.owner.replace(new_owner))
    }

    /// Clears the owner; every owner-only call fails afterwards.
    pub fn renounce_ownership(&mut self, caller: &AccountId) -> Result<Option<AccountId>> {
        self.ensure_owner(caller)?;
        Ok(self.owner.take())
    }

    /// Moves a stake into the forfeited balance.
    pub fn forfeit(&mut self, amount: u128) -> Result<()> {
        self.forfeited = self
            .forfeited
            .checked_add(amount)
            .ok_or(RuntimeError::TreasuryOverflow { stake: amount })?;
        Ok(())
    }

    /// Drains the forfeited balance to the owner.
    pub fn withdraw(&mut self, caller: &AccountId) -> Result<u128> {
        self.ensure_owner(caller)?;
        Ok(std::mem::take(&mut self.forfeited))
    }
}
