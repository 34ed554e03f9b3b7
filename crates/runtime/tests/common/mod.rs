//! Shared fixtures for runtime integration tests.
#![allow(dead_code)]

use minesweeper_core::{
    AccountId, BatchReport, BoardOracle, Cell, Game, GameConfig, HashBoard, Move, Signature,
    SigningKey, sign_batch,
};
use std::sync::Arc;

use minesweeper_runtime::{
    Event, InMemorySessionRepo, ManualClock, Result, Runtime, RuntimeConfig, RuntimeHandle,
    SessionRepository,
};
use tokio::sync::broadcast;

pub const START: u64 = 1_700_000_000;
pub const STAKE: u128 = GameConfig::MIN_STAKE;

pub struct Harness {
    pub runtime: Runtime,
    pub handle: RuntimeHandle,
    pub clock: ManualClock,
    pub owner: SigningKey,
}

impl Harness {
    pub async fn start() -> Harness {
        Self::start_with_sessions(Arc::new(InMemorySessionRepo::new())).await
    }

    pub async fn start_with_sessions(sessions: Arc<dyn SessionRepository>) -> Harness {
        let clock = ManualClock::new(START);
        let owner = key(0xA0);
        let config = RuntimeConfig {
            event_buffer_size: 2048,
            ..RuntimeConfig::default()
        };
        let runtime = Runtime::builder()
            .config(config)
            .owner(account(&owner))
            .clock(clock.clone())
            .session_repository(sessions)
            .rng_seed(7)
            .build()
            .await
            .expect("runtime should start");
        let handle = runtime.handle();
        Harness {
            runtime,
            handle,
            clock,
            owner,
        }
    }

    pub fn owner_id(&self) -> AccountId {
        account(&self.owner)
    }

    /// Opens a session and starts a game for `player`.
    pub async fn ready_player(&self, player: &SigningKey) -> Game {
        self.handle
            .create_session(account(player), STAKE)
            .await
            .expect("session should open");
        self.handle
            .start_new_game(account(player), b"salt".to_vec())
            .await
            .expect("game should start")
    }

    /// Signs `moves` at the player's current chain head.
    pub async fn sign(&self, player: &SigningKey, moves: &[Move]) -> Signature {
        let session = self
            .handle
            .session(account(player))
            .await
            .unwrap()
            .expect("player has a session");
        sign_batch(player, moves, &session)
    }

    pub async fn submit(&self, player: &SigningKey, moves: Vec<Move>) -> Result<BatchReport> {
        let signature = self.sign(player, &moves).await;
        self.handle
            .process_batch_moves(account(player), moves, signature)
            .await
    }

    pub async fn game(&self, player: &SigningKey) -> Game {
        self.handle
            .game(account(player))
            .await
            .unwrap()
            .expect("player has a game")
    }

    pub async fn shutdown(self) {
        self.runtime.shutdown().await.expect("clean shutdown");
    }
}

pub fn key(byte: u8) -> SigningKey {
    SigningKey::from_bytes(&[byte; 32])
}

pub fn account(key: &SigningKey) -> AccountId {
    AccountId::from(key.verifying_key())
}

/// Safe cells whose reveal does not cascade.
pub fn numbered_safe_cells(game: &Game) -> Vec<Cell> {
    Cell::all()
        .filter(|cell| {
            !HashBoard.is_mine(&game.board_seed, *cell)
                && HashBoard.adjacent_mine_count(&game.board_seed, *cell) > 0
        })
        .collect()
}

pub fn mines(game: &Game) -> Vec<Cell> {
    HashBoard.mine_mask(&game.board_seed).iter().collect()
}

/// Safe cells the client mirror still has to reveal.
pub fn hidden_safe_cells(game: &Game) -> Vec<Cell> {
    Cell::all()
        .filter(|cell| !HashBoard.is_mine(&game.board_seed, *cell) && !game.revealed.contains(*cell))
        .collect()
}

pub fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
