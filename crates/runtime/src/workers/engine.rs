//! Engine worker that owns the authoritative records.
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), applies them
//! one at a time, and publishes events to the EventBus. Each command samples
//! the clock once, checks every precondition on loaded copies of the records,
//! and writes back only after all checks passed.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use minesweeper_core::{
    AccountId, BatchOutcome, BatchReport, BoardOracle, Game, GameError, Hash32, Move, Session,
    Signature, derive_board_seed,
};

use crate::access::{AccessControl, Treasury};
use crate::api::{AccountView, GlobalView, Result, RuntimeError};
use crate::clock::Clock;
use crate::events::{AdminEvent, EventBus, GameEvent, SessionEvent};
use crate::leaderboard::Leaderboard;
use crate::processor::{MoveProcessor, ProcessedBatch};
use crate::repository::{GameRepository, SessionRepository};

/// Commands that can be sent to the engine worker
pub enum Command {
    CreateSession {
        caller: AccountId,
        stake: u128,
        reply: oneshot::Sender<Result<Session>>,
    },
    CloseSession {
        caller: AccountId,
        reply: oneshot::Sender<Result<u128>>,
    },
    StartNewGame {
        caller: AccountId,
        salt: Vec<u8>,
        reply: oneshot::Sender<Result<Game>>,
    },
    ProcessBatch {
        player: AccountId,
        moves: Vec<Move>,
        signature: Signature,
        reply: oneshot::Sender<Result<BatchReport>>,
    },
    Pause {
        caller: AccountId,
        reply: oneshot::Sender<Result<()>>,
    },
    Unpause {
        caller: AccountId,
        reply: oneshot::Sender<Result<()>>,
    },
    Withdraw {
        caller: AccountId,
        reply: oneshot::Sender<Result<u128>>,
    },
    TransferOwnership {
        caller: AccountId,
        new_owner: AccountId,
        reply: oneshot::Sender<Result<()>>,
    },
    RenounceOwnership {
        caller: AccountId,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Per-player snapshot (read-only).
    QueryAccount {
        player: AccountId,
        reply: oneshot::Sender<Result<AccountView>>,
    },
    /// Engine-wide snapshot (read-only).
    QueryGlobal {
        reply: oneshot::Sender<Result<GlobalView>>,
    },
    /// Stop after replying.
    Shutdown { reply: oneshot::Sender<()> },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::CreateSession { .. } => "create_session",
            Command::CloseSession { .. } => "close_session",
            Command::StartNewGame { .. } => "start_new_game",
            Command::ProcessBatch { .. } => "process_batch_moves",
            Command::Pause { .. } => "pause",
            Command::Unpause { .. } => "unpause",
            Command::Withdraw { .. } => "withdraw",
            Command::TransferOwnership { .. } => "transfer_ownership",
            Command::RenounceOwnership { .. } => "renounce_ownership",
            Command::QueryAccount { .. } => "query_account",
            Command::QueryGlobal { .. } => "query_global",
            Command::Shutdown { .. } => "shutdown",
        }
    }
}

/// Storage and collaborators the worker is built from.
pub struct EngineParts {
    pub sessions: Arc<dyn SessionRepository>,
    pub games: Arc<dyn GameRepository>,
    pub board: Arc<dyn BoardOracle>,
    pub clock: Arc<dyn Clock>,
    pub access: AccessControl,
    pub min_stake: u128,
    pub rng: StdRng,
}

/// Background task that processes engine commands sequentially.
pub struct EngineWorker {
    sessions: Arc<dyn SessionRepository>,
    games: Arc<dyn GameRepository>,
    board: Arc<dyn BoardOracle>,
    clock: Arc<dyn Clock>,
    access: AccessControl,
    leaderboard: Leaderboard,
    min_stake: u128,
    rng: StdRng,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
}

impl EngineWorker {
    pub fn new(parts: EngineParts, command_rx: mpsc::Receiver<Command>, event_bus: EventBus) -> Self {
        info!(
            target: "runtime::worker",
            owner = ?parts.access.owner(),
            min_stake = parts.min_stake,
            "EngineWorker initialized"
        );

        Self {
            sessions: parts.sessions,
            games: parts.games,
            board: parts.board,
            clock: parts.clock,
            access: parts.access,
            leaderboard: Leaderboard::new(),
            min_stake: parts.min_stake,
            rng: parts.rng,
            command_rx,
            event_bus,
        }
    }

    /// Seeds the worker RNG from OS entropy.
    pub fn entropy_rng() -> StdRng {
        StdRng::from_entropy()
    }

    /// Deterministic RNG for tests and reproducible demos.
    pub fn seeded_rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            if !self.handle_command(cmd) {
                break;
            }
        }
        debug!(target: "runtime::worker", "EngineWorker stopped");
    }

    /// Returns `false` once the worker should stop.
    fn handle_command(&mut self, cmd: Command) -> bool {
        let name = cmd.name();
        match cmd {
            Command::CreateSession {
                caller,
                stake,
                reply,
            } => {
                let result = self.create_session(caller, stake);
                self.reply(name, reply, result);
            }
            Command::CloseSession { caller, reply } => {
                let result = self.close_session(caller);
                self.reply(name, reply, result);
            }
            Command::StartNewGame {
                caller,
                salt,
                reply,
            } => {
                let result = self.start_new_game(caller, &salt);
                self.reply(name, reply, result);
            }
            Command::ProcessBatch {
                player,
                moves,
                signature,
                reply,
            } => {
                let result = self.process_batch(player, &moves, &signature);
                self.reply(name, reply, result);
            }
            Command::Pause { caller, reply } => {
                let result = self.pause(caller);
                self.reply(name, reply, result);
            }
            Command::Unpause { caller, reply } => {
                let result = self.unpause(caller);
                self.reply(name, reply, result);
            }
            Command::Withdraw { caller, reply } => {
                let result = self.withdraw(caller);
                self.reply(name, reply, result);
            }
            Command::TransferOwnership {
                caller,
                new_owner,
                reply,
            } => {
                let result = self.transfer_ownership(caller, new_owner);
                self.reply(name, reply, result);
            }
            Command::RenounceOwnership { caller, reply } => {
                let result = self.renounce_ownership(caller);
                self.reply(name, reply, result);
            }
            Command::QueryAccount { player, reply } => {
                let result = self.account_view(player);
                self.reply(name, reply, result);
            }
            Command::QueryGlobal { reply } => {
                let result = self.global_view();
                self.reply(name, reply, result);
            }
            Command::Shutdown { reply } => {
                if reply.send(()).is_err() {
                    debug!(target: "runtime::worker", "Shutdown reply channel closed (caller dropped)");
                }
                return false;
            }
        }
        true
    }

    fn reply<T>(&self, command: &'static str, reply: oneshot::Sender<Result<T>>, result: Result<T>) {
        if let Err(error) = &result {
            let severity = error.severity();
            if severity.is_internal() {
                warn!(
                    target: "runtime::worker",
                    command,
                    code = error.error_code(),
                    error = %error,
                    "Command failed"
                );
            } else {
                debug!(
                    target: "runtime::worker",
                    command,
                    code = error.error_code(),
                    severity = severity.as_str(),
                    error = %error,
                    "Command rejected"
                );
            }
        }
        if reply.send(result).is_err() {
            debug!(target: "runtime::worker", command, "Reply channel closed (caller dropped)");
        }
    }

    // ===== sessions =====

    fn create_session(&mut self, caller: AccountId, stake: u128) -> Result<Session> {
        let now = self.clock.now();
        self.access.ensure_not_paused()?;
        if stake < self.min_stake {
            return Err(RuntimeError::InsufficientStake {
                provided: stake,
                minimum: self.min_stake,
            });
        }

        // Escrow plus forfeited balance must stay representable. An overwritten
        // stake only moves between the two, so the new stake is the increase.
        self.sessions
            .total_stake()?
            .checked_add(self.access.forfeited())
            .and_then(|held| held.checked_add(stake))
            .ok_or(RuntimeError::TreasuryOverflow { stake })?;

        let previous = self.sessions.load(&caller)?;
        let nonce = Hash32(self.rng.r#gen());
        let session = Session::open(caller, stake, nonce, now);
        self.sessions.save(&session)?;

        if let Some(previous) = previous.filter(|previous| previous.stake > 0) {
            self.access.forfeit(previous.stake)?;
            warn!(
                target: "runtime::worker",
                player = %caller.short(),
                amount = previous.stake,
                was_active = previous.is_active(now),
                "Existing session overwritten, stake forfeited"
            );
            self.event_bus.publish(SessionEvent::StakeForfeited {
                player: caller,
                amount: previous.stake,
            });
        }

        if self.leaderboard.register(caller) {
            debug!(target: "runtime::worker", player = %caller.short(), "Player registered");
        }

        info!(
            target: "runtime::worker",
            player = %caller.short(),
            stake,
            expiry_time = session.expiry_time,
            "Session created"
        );
        self.event_bus.publish(SessionEvent::SessionCreated {
            player: caller,
            expiry_time: session.expiry_time,
            nonce,
            stake,
        });
        Ok(session)
    }

    fn close_session(&mut self, caller: AccountId) -> Result<u128> {
        let session = self
            .sessions
            .delete(&caller)?
            .ok_or(RuntimeError::SessionNotFound { player: caller })?;

        info!(
            target: "runtime::worker",
            player = %caller.short(),
            refund = session.stake,
            "Session closed"
        );
        self.event_bus.publish(SessionEvent::SessionClosed {
            player: caller,
            refund: session.stake,
        });
        Ok(session.stake)
    }

    fn active_session(&self, player: AccountId, now: u64) -> Result<Session> {
        self.sessions
            .load(&player)?
            .filter(|session| session.is_active(now))
            .ok_or(RuntimeError::SessionExpired { player })
    }

    // ===== games =====

    fn start_new_game(&mut self, caller: AccountId, salt: &[u8]) -> Result<Game> {
        let now = self.clock.now();
        self.access.ensure_not_paused()?;
        self.active_session(caller, now)?;

        let entropy: [u8; 32] = self.rng.r#gen();
        let board_seed = derive_board_seed(salt, &caller, now, &entropy);
        let game = Game::new(self.board.as_ref(), board_seed, now);

        self.games.save(&caller, &game)?;
        self.games.append_history(&caller, board_seed)?;

        info!(
            target: "runtime::worker",
            player = %caller.short(),
            board_seed = %board_seed,
            mine_count = game.mine_count,
            "Game started"
        );
        self.event_bus.publish(GameEvent::GameStarted {
            player: caller,
            board_seed,
            mine_count: game.mine_count,
            timestamp: now,
        });
        Ok(game)
    }

    fn process_batch(
        &mut self,
        player: AccountId,
        moves: &[Move],
        signature: &Signature,
    ) -> Result<BatchReport> {
        let now = self.clock.now();
        self.access.ensure_not_paused()?;

        let session = self.sessions.load(&player)?;
        let game = self.games.load(&player)?;
        let ProcessedBatch {
            session,
            game,
            report,
        } = MoveProcessor::new(self.board.as_ref())
            .process(player, session, game, moves, signature, now)?;

        // Commit the game before the chain. A failed session write then leaves
        // the signed batch replayable, and replaying it skips revealed cells.
        self.games.save(&player, &game)?;
        self.sessions.save(&session)?;

        if let BatchOutcome::Won { score } = report.outcome
            && self.leaderboard.record(player, score)
        {
            info!(target: "runtime::worker", player = %player.short(), score, "New high score");
        }

        self.publish_batch(player, &game, &report);
        Ok(report)
    }

    fn publish_batch(&self, player: AccountId, game: &Game, report: &BatchReport) {
        for revealed in &report.revealed {
            self.event_bus.publish(GameEvent::CellRevealed {
                player,
                x: revealed.cell.x(),
                y: revealed.cell.y(),
                adjacent_mines: revealed.adjacent_mines,
                state_hash: revealed.state_hash,
                move_count: revealed.move_count,
            });
        }

        if report.outcome.is_terminal() {
            info!(
                target: "runtime::worker",
                player = %player.short(),
                won = game.has_won,
                score = game.score,
                time_spent = report.time_spent,
                "Game over"
            );
            self.event_bus.publish(GameEvent::GameOver {
                player,
                won: game.has_won,
                score: game.score,
                time_spent: report.time_spent,
            });
        }

        self.event_bus.publish(GameEvent::BatchProcessed {
            player,
            move_count: report.move_count,
            state_hash: report.state_hash,
            outcome: report.outcome,
        });
    }

    // ===== administration =====

    fn pause(&mut self, caller: AccountId) -> Result<()> {
        self.access.pause(&caller)?;
        info!(target: "runtime::worker", account = %caller.short(), "Engine paused");
        self.event_bus.publish(AdminEvent::Paused { account: caller });
        Ok(())
    }

    fn unpause(&mut self, caller: AccountId) -> Result<()> {
        self.access.unpause(&caller)?;
        info!(target: "runtime::worker", account = %caller.short(), "Engine unpaused");
        self.event_bus.publish(AdminEvent::Unpaused { account: caller });
        Ok(())
    }

    fn withdraw(&mut self, caller: AccountId) -> Result<u128> {
        let amount = self.access.withdraw(&caller)?;
        info!(target: "runtime::worker", owner = %caller.short(), amount, "Forfeited balance withdrawn");
        self.event_bus.publish(AdminEvent::Withdrawn {
            owner: caller,
            amount,
        });
        Ok(amount)
    }

    fn transfer_ownership(&mut self, caller: AccountId, new_owner: AccountId) -> Result<()> {
        let previous = self.access.transfer_ownership(&caller, new_owner)?;
        info!(
            target: "runtime::worker",
            previous = ?previous.map(|owner| owner.short()),
            new = %new_owner.short(),
            "Ownership transferred"
        );
        self.event_bus.publish(AdminEvent::OwnershipTransferred {
            previous,
            new: Some(new_owner),
        });
        Ok(())
    }

    fn renounce_ownership(&mut self, caller: AccountId) -> Result<()> {
        let previous = self.access.renounce_ownership(&caller)?;
        warn!(target: "runtime::worker", previous = %caller.short(), "Ownership renounced");
        self.event_bus.publish(AdminEvent::OwnershipTransferred {
            previous,
            new: None,
        });
        Ok(())
    }

    // ===== queries =====

    fn account_view(&self, player: AccountId) -> Result<AccountView> {
        let now = self.clock.now();
        let session = self.sessions.load(&player)?;
        Ok(AccountView {
            session_active: session.as_ref().is_some_and(|s| s.is_active(now)),
            session,
            game: self.games.load(&player)?,
            history: self.games.history(&player)?,
            is_player: self.leaderboard.is_player(&player),
            high_score: self.leaderboard.high_score(&player),
        })
    }

    fn global_view(&self) -> Result<GlobalView> {
        Ok(GlobalView {
            owner: self.access.owner(),
            paused: self.access.is_paused(),
            treasury: Treasury {
                escrowed: self.sessions.total_stake()?,
                forfeited: self.access.forfeited(),
            },
            leaderboard: self.leaderboard.clone(),
        })
    }
}
