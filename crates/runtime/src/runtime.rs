//! High-level runtime orchestrator.
//!
//! The runtime owns the engine worker, wires up command/event channels, and
//! exposes a builder-based API for clients to drive the engine.

use std::env;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use minesweeper_core::{AccountId, BoardOracle, GameConfig, HashBoard};

use crate::access::AccessControl;
use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::clock::{Clock, SystemClock};
use crate::events::{Event, EventBus, Topic};
use crate::repository::{GameRepository, InMemoryGameRepo, InMemorySessionRepo, SessionRepository};
use crate::workers::{Command, EngineParts, EngineWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Account allowed to pause, withdraw and transfer ownership.
    pub owner: Option<AccountId>,
    /// Smallest accepted session stake, in base units.
    pub min_stake: u128,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            owner: None,
            min_stake: GameConfig::MIN_STAKE,
            event_buffer_size: 256,
            command_buffer_size: 32,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `MINES_OWNER` - Owner account as 64 hex characters (default: none)
    /// - `MINES_MIN_STAKE` - Minimum session stake in base units (default: 10^16)
    /// - `MINES_EVENT_BUFFER` - Per-topic event channel capacity (default: 256)
    /// - `MINES_COMMAND_BUFFER` - Worker command queue size (default: 32)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(owner) = read_env::<AccountId>("MINES_OWNER") {
            config.owner = Some(owner);
        }
        if let Some(min_stake) = read_env::<u128>("MINES_MIN_STAKE") {
            config.min_stake = min_stake;
        }
        if let Some(capacity) = read_env::<usize>("MINES_EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>("MINES_COMMAND_BUFFER") {
            config.command_buffer_size = capacity.max(1);
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.trim().parse().ok()
}

/// Main runtime that orchestrates the engine
///
/// Runtime owns the worker task.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Start a runtime with in-memory storage, system clock and the SHA-256 board.
    pub async fn start(config: RuntimeConfig) -> Result<Runtime> {
        Self::builder().config(config).build().await
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Subscribe to events from a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Shutdown the runtime gracefully
    ///
    /// Commands already queued are applied first. Handles still held elsewhere
    /// get [`RuntimeError::CommandChannelClosed`] afterwards.
    pub async fn shutdown(self) -> Result<()> {
        self.handle.shutdown_worker().await?;
        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)?;
        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    sessions: Option<Arc<dyn SessionRepository>>,
    games: Option<Arc<dyn GameRepository>>,
    board: Option<Arc<dyn BoardOracle>>,
    clock: Option<Arc<dyn Clock>>,
    rng_seed: Option<u64>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            sessions: None,
            games: None,
            board: None,
            clock: None,
            rng_seed: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the owner account
    pub fn owner(mut self, owner: AccountId) -> Self {
        self.config.owner = Some(owner);
        self
    }

    /// Use a custom session store (default: in-memory)
    pub fn session_repository(mut self, sessions: Arc<dyn SessionRepository>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    /// Use a custom game store (default: in-memory)
    pub fn game_repository(mut self, games: Arc<dyn GameRepository>) -> Self {
        self.games = Some(games);
        self
    }

    /// Use a custom board oracle (default: [`HashBoard`])
    pub fn board(mut self, board: impl BoardOracle + 'static) -> Self {
        self.board = Some(Arc::new(board));
        self
    }

    /// Use a custom clock (default: [`SystemClock`])
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Seed nonce and board entropy deterministically instead of from the OS
    pub fn rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Build the runtime and spawn its worker
    pub async fn build(self) -> Result<Runtime> {
        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let sessions: Arc<dyn SessionRepository> = match self.sessions {
            Some(sessions) => sessions,
            None => Arc::new(InMemorySessionRepo::new()),
        };
        let games: Arc<dyn GameRepository> = match self.games {
            Some(games) => games,
            None => Arc::new(InMemoryGameRepo::new()),
        };
        let board: Arc<dyn BoardOracle> = match self.board {
            Some(board) => board,
            None => Arc::new(HashBoard),
        };
        let clock: Arc<dyn Clock> = match self.clock {
            Some(clock) => clock,
            None => Arc::new(SystemClock),
        };

        let parts = EngineParts {
            sessions,
            games,
            board,
            clock,
            access: AccessControl::new(self.config.owner),
            min_stake: self.config.min_stake,
            rng: self
                .rng_seed
                .map_or_else(EngineWorker::entropy_rng, EngineWorker::seeded_rng),
        };

        let worker = EngineWorker::new(parts, command_rx, event_bus);
        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        Ok(Runtime {
            handle,
            worker_handle,
        })
    }
}
