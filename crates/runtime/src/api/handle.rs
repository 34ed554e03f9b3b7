//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for every
//! engine operation. Calls from any number of tasks are applied one at a time,
//! in the order the worker receives them.
use std::collections::HashMap;

use tokio::sync::{broadcast, mpsc, oneshot};

use minesweeper_core::{AccountId, BatchReport, BoardSeed, Game, Move, Session, Signature};

use super::errors::{Result, RuntimeError};
use super::views::{AccountView, GlobalView};
use crate::access::Treasury;
use crate::events::{Event, EventBus, Topic};
use crate::leaderboard::LeaderboardEntry;
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    pub(crate) async fn shutdown_worker(&self) -> Result<()> {
        self.request(|reply| Command::Shutdown { reply }).await
    }

    // ===== player operations =====

    /// Opens a session for `caller` backed by `stake`.
    ///
    /// An existing record is overwritten and its stake forfeited.
    pub async fn create_session(&self, caller: AccountId, stake: u128) -> Result<Session> {
        self.request(|reply| Command::CreateSession {
            caller,
            stake,
            reply,
        })
        .await?
    }

    /// Removes the caller's session and returns the refunded stake.
    pub async fn close_session(&self, caller: AccountId) -> Result<u128> {
        self.request(|reply| Command::CloseSession { caller, reply })
            .await?
    }

    /// Starts a fresh game, replacing any previous one.
    pub async fn start_new_game(&self, caller: AccountId, salt: impl Into<Vec<u8>>) -> Result<Game> {
        let salt = salt.into();
        self.request(|reply| Command::StartNewGame {
            caller,
            salt,
            reply,
        })
        .await?
    }

    /// Submits a signed batch of moves.
    ///
    /// A mine hit is a successful call; inspect [`BatchReport::outcome`].
    pub async fn process_batch_moves(
        &self,
        player: AccountId,
        moves: Vec<Move>,
        signature: Signature,
    ) -> Result<BatchReport> {
        self.request(|reply| Command::ProcessBatch {
            player,
            moves,
            signature,
            reply,
        })
        .await?
    }

    // ===== owner operations =====

    pub async fn pause(&self, caller: AccountId) -> Result<()> {
        self.request(|reply| Command::Pause { caller, reply }).await?
    }

    pub async fn unpause(&self, caller: AccountId) -> Result<()> {
        self.request(|reply| Command::Unpause { caller, reply }).await?
    }

    /// Transfers the forfeited balance to the owner and returns the amount.
    pub async fn withdraw(&self, caller: AccountId) -> Result<u128> {
        self.request(|reply| Command::Withdraw { caller, reply }).await?
    }

    pub async fn transfer_ownership(&self, caller: AccountId, new_owner: AccountId) -> Result<()> {
        self.request(|reply| Command::TransferOwnership {
            caller,
            new_owner,
            reply,
        })
        .await?
    }

    pub async fn renounce_ownership(&self, caller: AccountId) -> Result<()> {
        self.request(|reply| Command::RenounceOwnership { caller, reply })
            .await?
    }

    // ===== queries =====

    /// Snapshot of everything stored for `player`.
    pub async fn account(&self, player: AccountId) -> Result<AccountView> {
        self.request(|reply| Command::QueryAccount { player, reply })
            .await?
    }

    /// Snapshot of owner, pause flag, treasury and leaderboard.
    pub async fn global(&self) -> Result<GlobalView> {
        self.request(|reply| Command::QueryGlobal { reply }).await?
    }

    /// The stored session record, expired or not.
    pub async fn session(&self, player: AccountId) -> Result<Option<Session>> {
        Ok(self.account(player).await?.session)
    }

    pub async fn is_session_active(&self, player: AccountId) -> Result<bool> {
        Ok(self.account(player).await?.session_active)
    }

    pub async fn game(&self, player: AccountId) -> Result<Option<Game>> {
        Ok(self.account(player).await?.game)
    }

    /// Board seeds of every game the player started, oldest first.
    pub async fn game_history(&self, player: AccountId) -> Result<Vec<BoardSeed>> {
        Ok(self.account(player).await?.history)
    }

    pub async fn is_player(&self, player: AccountId) -> Result<bool> {
        Ok(self.account(player).await?.is_player)
    }

    pub async fn high_score(&self, player: AccountId) -> Result<u64> {
        Ok(self.account(player).await?.high_score)
    }

    /// Every registered player in registration order.
    pub async fn players(&self) -> Result<Vec<AccountId>> {
        Ok(self.global().await?.leaderboard.players().to_vec())
    }

    /// High scores for `players`, position for position.
    pub async fn scores(&self, players: &[AccountId]) -> Result<Vec<u64>> {
        Ok(self.global().await?.leaderboard.scores(players))
    }

    /// Registered players by descending high score.
    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        Ok(self.global().await?.leaderboard.ranking())
    }

    pub async fn treasury(&self) -> Result<Treasury> {
        Ok(self.global().await?.treasury)
    }

    pub async fn owner(&self) -> Result<Option<AccountId>> {
        Ok(self.global().await?.owner)
    }

    pub async fn is_paused(&self) -> Result<bool> {
        Ok(self.global().await?.paused)
    }

    // ===== events =====

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Session` - Session creation, close and forfeits
    /// - `Topic::Game` - Game start, per-cell reveals, game over and batch summaries
    /// - `Topic::Admin` - Pause switch, ownership and withdrawals
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use minesweeper_runtime::Topic;
    ///
    /// let mut game_rx = handle.subscribe(Topic::Game);
    /// while let Ok(event) = game_rx.recv().await {
    ///     // Handle game events
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
