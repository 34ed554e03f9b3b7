//! Signed batch processing.
//!
//! [`MoveProcessor`] validates a batch against a player's session and game,
//! authenticates it, and applies it through [`BatchEngine`]. It works on owned
//! copies of the records and hands back the updated copies, so the caller
//! commits either everything or nothing.

use minesweeper_core::{
    AccountId, BatchEngine, BatchReport, BoardOracle, Game, Move, MoveBatch, Session, Signature,
    message_hash, verify_signature,
};
use tracing::debug;

use crate::api::{Result, RuntimeError};

/// Records staged by an accepted batch, ready to be committed.
#[derive(Debug, Clone)]
pub struct ProcessedBatch {
    pub session: Session,
    pub game: Game,
    pub report: BatchReport,
}

pub struct MoveProcessor<'a> {
    board: &'a dyn BoardOracle,
}

impl<'a> MoveProcessor<'a> {
    pub fn new(board: &'a dyn BoardOracle) -> Self {
        Self { board }
    }

    /// Runs the checks in order, then applies the batch.
    ///
    /// 1. session present and active
    /// 2. game present and not over
    /// 3. batch length in `1..=20`
    /// 4. signature over `(player, xs, ys, nonce, last_hash)`
    /// 5. every coordinate on the board
    ///
    /// The pause switch is checked by the caller before this runs.
    pub fn process(
        &self,
        player: AccountId,
        session: Option<Session>,
        game: Option<Game>,
        moves: &[Move],
        signature: &Signature,
        now: u64,
    ) -> Result<ProcessedBatch> {
        let mut session = session
            .filter(|session| session.is_active(now))
            .ok_or(RuntimeError::SessionExpired { player })?;
        let mut game = game.ok_or(RuntimeError::GameNotFound { player })?;
        if game.is_over {
            return Err(RuntimeError::GameAlreadyOver { player });
        }

        let batch = MoveBatch::new(moves)?;

        let digest = message_hash(
            &player,
            &batch.xs(),
            &batch.ys(),
            &session.nonce,
            &session.last_hash,
        );
        verify_signature(&player, &digest, signature)
            .map_err(|source| RuntimeError::InvalidSignature { player, source })?;

        let cells = batch.cells()?;

        let report = BatchEngine::new(self.board, &mut game)
            .apply(&cells, now)
            .map_err(|_| RuntimeError::GameAlreadyOver { player })?;
        session.advance_chain(digest, now);

        debug!(
            target: "runtime::processor",
            player = %player.short(),
            moves = batch.len(),
            revealed = report.revealed.len(),
            skipped = report.skipped,
            outcome = %report.outcome,
            "Batch applied"
        );

        Ok(ProcessedBatch {
            session,
            game,
            report,
        })
    }
}
