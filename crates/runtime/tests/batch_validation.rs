mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use common::{Harness, account, key, mines, numbered_safe_cells};
use minesweeper_core::{AccountId, BatchOutcome, Cell, Move, Session, session_message_hash, sign_batch};
use minesweeper_runtime::repository::Result as RepoResult;
use minesweeper_runtime::{InMemorySessionRepo, RepositoryError, RuntimeError, SessionRepository};

#[tokio::test]
async fn single_move_at_origin() {
    let h = Harness::start().await;
    let player = key(1);
    h.ready_player(&player).await;
    let before = h.handle.session(account(&player)).await.unwrap().unwrap();

    let moves = vec![Move::new(0, 0)];
    let report = h.submit(&player, moves.clone()).await.expect("batch accepted");

    let game = h.game(&player).await;
    let origin = Cell::new(0, 0).unwrap();
    match report.outcome {
        BatchOutcome::Lost { at } => {
            assert_eq!(at, origin);
            assert!(game.is_over);
            assert_eq!(game.score, 0);
        }
        _ => {
            assert!(game.revealed.contains(origin));
            assert!(game.move_count >= 1);
        }
    }

    let after = h.handle.session(account(&player)).await.unwrap().unwrap();
    assert_eq!(
        after.last_hash,
        session_message_hash(&account(&player), &moves, &before)
    );
    assert_eq!(after.nonce, before.nonce);
    h.shutdown().await;
}

#[tokio::test]
async fn replayed_batch_is_rejected() {
    let h = Harness::start().await;
    let player = key(1);
    let game = h.ready_player(&player).await;
    let moves = vec![Move::from(numbered_safe_cells(&game)[0])];
    let signature = h.sign(&player, &moves).await;

    h.handle
        .process_batch_moves(account(&player), moves.clone(), signature)
        .await
        .expect("first submission accepted");
    let after_first = h.game(&player).await;

    let err = h
        .handle
        .process_batch_moves(account(&player), moves, signature)
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::InvalidSignature { .. }));
    assert_eq!(h.game(&player).await, after_first);
    h.shutdown().await;
}

#[tokio::test]
async fn out_of_range_coordinate_rejects_whole_batch() {
    let h = Harness::start().await;
    let player = key(1);
    let game = h.ready_player(&player).await;
    let session = h.handle.session(account(&player)).await.unwrap().unwrap();
    let safe = Move::from(numbered_safe_cells(&game)[0]);

    let err = h
        .submit(&player, vec![safe, Move::new(16, 0)])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::InvalidCoordinates { index: 1, x: 16, y: 0 }
    ));

    let unchanged = h.game(&player).await;
    assert_eq!(unchanged.revealed, game.revealed);
    assert_eq!(unchanged.move_count, 0);
    assert_eq!(
        h.handle.session(account(&player)).await.unwrap().unwrap().last_hash,
        session.last_hash
    );

    // The chain did not move, so a signature at the original position works.
    let signature = sign_batch(&player, &[safe], &session);
    h.handle
        .process_batch_moves(account(&player), vec![safe], signature)
        .await
        .expect("valid batch at unchanged chain head");
    h.shutdown().await;
}

#[tokio::test]
async fn batch_of_twenty_one_is_too_large() {
    let h = Harness::start().await;
    let player = key(1);
    let game = h.ready_player(&player).await;

    let err = h
        .submit(&player, vec![Move::new(0, 0); 21])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::BatchTooLarge { len: 21, max: 20 }
    ));
    assert_eq!(h.game(&player).await, game);

    let err = h.submit(&player, Vec::new()).await.unwrap_err();
    assert!(matches!(err, RuntimeError::EmptyBatch));
    h.shutdown().await;
}

#[tokio::test]
async fn signature_from_another_key_is_rejected() {
    let h = Harness::start().await;
    let player = key(1);
    let intruder = key(2);
    h.ready_player(&player).await;
    let session = h.handle.session(account(&player)).await.unwrap().unwrap();
    let moves = vec![Move::new(3, 3)];

    let forged = sign_batch(&intruder, &moves, &session);
    let err = h
        .handle
        .process_batch_moves(account(&player), moves, forged)
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::InvalidSignature { .. }));
    h.shutdown().await;
}

#[tokio::test]
async fn mine_hit_ends_game_and_drops_later_moves() {
    let h = Harness::start().await;
    let player = key(1);
    let game = h.ready_player(&player).await;
    let safe = numbered_safe_cells(&game);
    let mine = mines(&game)[0];
    let mut rx = h.handle.subscribe(minesweeper_runtime::Topic::Game);

    let report = h
        .submit(
            &player,
            vec![Move::from(safe[0]), Move::from(mine), Move::from(safe[1])],
        )
        .await
        .expect("a mine hit is a successful call");
    assert_eq!(report.outcome, BatchOutcome::Lost { at: mine });

    let game = h.game(&player).await;
    assert!(game.is_over);
    assert!(!game.has_won);
    assert_eq!(game.score, 0);
    assert!(game.revealed.contains(safe[0]));
    assert!(!game.revealed.contains(safe[1]));
    assert_eq!(game.exploded_at, Some(mine));
    assert_eq!(game.exposed_mines.count(), game.mine_count);

    let events = common::drain(&mut rx);
    assert!(events.iter().any(|event| matches!(
        event,
        minesweeper_runtime::Event::Game(minesweeper_runtime::GameEvent::GameOver { won: false, score: 0, .. })
    )));

    let err = h
        .submit(&player, vec![Move::from(safe[1])])
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::GameAlreadyOver { .. }));
    h.shutdown().await;
}

#[tokio::test]
async fn batch_without_game_is_rejected() {
    let h = Harness::start().await;
    let player = key(1);
    h.handle
        .create_session(account(&player), common::STAKE)
        .await
        .unwrap();

    let err = h.submit(&player, vec![Move::new(0, 0)]).await.unwrap_err();
    assert!(matches!(err, RuntimeError::GameNotFound { .. }));
    h.shutdown().await;
}

#[tokio::test]
async fn revealed_cells_are_skipped_without_failing() {
    let h = Harness::start().await;
    let player = key(1);
    let game = h.ready_player(&player).await;
    let cell = Move::from(numbered_safe_cells(&game)[0]);

    h.submit(&player, vec![cell]).await.unwrap();
    let report = h.submit(&player, vec![cell, cell]).await.unwrap();

    assert!(report.revealed.is_empty());
    assert_eq!(report.skipped, 2);
    assert_eq!(h.game(&player).await.move_count, 1);
    h.shutdown().await;
}

#[tokio::test]
async fn concurrent_batches_at_same_chain_head_apply_once() {
    let h = Harness::start().await;
    let player = key(1);
    let game = h.ready_player(&player).await;
    let head = h.handle.session(account(&player)).await.unwrap().unwrap();
    let cells = numbered_safe_cells(&game);

    let batches = [vec![Move::from(cells[0])], vec![Move::from(cells[1])]];
    let tasks: Vec<_> = batches
        .iter()
        .cloned()
        .map(|moves| {
            let handle = h.handle.clone();
            let signature = sign_batch(&player, &moves, &head);
            let player = account(&player);
            tokio::spawn(async move { handle.process_batch_moves(player, moves, signature).await })
        })
        .collect();

    let mut results = Vec::new();
    for task in tasks {
        results.push(task.await.unwrap());
    }

    let accepted: Vec<usize> = results
        .iter()
        .enumerate()
        .filter_map(|(i, result)| result.is_ok().then_some(i))
        .collect();
    assert_eq!(accepted.len(), 1, "exactly one batch applies");
    assert!(results.iter().any(|result| matches!(
        result,
        Err(RuntimeError::InvalidSignature { .. })
    )));

    // One chain advance, bound to the accepted batch.
    let winner = &batches[accepted[0]];
    let after = h.handle.session(account(&player)).await.unwrap().unwrap();
    assert_eq!(
        after.last_hash,
        session_message_hash(&account(&player), winner, &head)
    );
    let game = h.game(&player).await;
    assert_eq!(game.move_count, 1);
    assert!(game.revealed.contains(winner[0].cell().unwrap()));
    h.shutdown().await;
}

/// Session store whose writes can be switched off.
#[derive(Default)]
struct FlakySessionRepo {
    inner: InMemorySessionRepo,
    reject_saves: AtomicBool,
}

impl SessionRepository for FlakySessionRepo {
    fn save(&self, session: &Session) -> RepoResult<()> {
        if self.reject_saves.load(Ordering::SeqCst) {
            return Err(RepositoryError::LockPoisoned("session"));
        }
        self.inner.save(session)
    }

    fn load(&self, player: &AccountId) -> RepoResult<Option<Session>> {
        self.inner.load(player)
    }

    fn delete(&self, player: &AccountId) -> RepoResult<Option<Session>> {
        self.inner.delete(player)
    }

    fn list(&self) -> RepoResult<Vec<Session>> {
        self.inner.list()
    }
}

#[tokio::test]
async fn failed_chain_write_leaves_batch_replayable() {
    let sessions = Arc::new(FlakySessionRepo::default());
    let h = Harness::start_with_sessions(sessions.clone()).await;
    let player = key(1);
    let game = h.ready_player(&player).await;
    let moves = vec![Move::from(numbered_safe_cells(&game)[0])];
    let head = h.handle.session(account(&player)).await.unwrap().unwrap();
    let signature = sign_batch(&player, &moves, &head);

    sessions.reject_saves.store(true, Ordering::SeqCst);
    let err = h
        .handle
        .process_batch_moves(account(&player), moves.clone(), signature)
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::Repository(_)));
    assert_eq!(h.handle.session(account(&player)).await.unwrap().unwrap(), head);
    assert_eq!(h.game(&player).await.move_count, 1);

    // The same signed batch still applies once the store recovers.
    sessions.reject_saves.store(false, Ordering::SeqCst);
    let report = h
        .handle
        .process_batch_moves(account(&player), moves, signature)
        .await
        .unwrap();
    assert!(report.revealed.is_empty());
    assert_eq!(report.skipped, 1);
    assert_eq!(h.game(&player).await.move_count, 1);
    h.shutdown().await;
}
