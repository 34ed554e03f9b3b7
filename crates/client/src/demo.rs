//! Scripted session that plays against the runtime as a client mirror.
//!
//! The mirror recomputes the board from the public seed, so it knows which
//! cells are safe. It keeps its own revealed mask from the reported cells and
//! checks every reported state hash against a local recomputation.

use std::env;

use anyhow::{Context, Result, ensure};
use rand::rngs::OsRng;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use minesweeper_core::{
    AccountId, BoardOracle, Cell, CellMask, Game, GameConfig, HashBoard, Move,
    SigningKey, sign_batch, state_hash,
};
use minesweeper_runtime::{RuntimeHandle, Topic};

/// Demo parameters read from the environment.
pub struct DemoConfig {
    pub player: SigningKey,
    pub operator: SigningKey,
    pub stake: u128,
    pub salt: String,
    /// Step on a mine in the first batch instead of clearing the board.
    pub play_mine: bool,
}

impl DemoConfig {
    /// Environment variables:
    /// - `PLAYER_SECRET` - 32-byte hex Ed25519 secret (default: random)
    /// - `OPERATOR_SECRET` - 32-byte hex Ed25519 secret for the owner (default: random)
    /// - `DEMO_STAKE` - session stake in base units (default: minimum stake)
    /// - `DEMO_SALT` - game salt (default: "demo")
    /// - `DEMO_PLAY_MINE` - lose on purpose (default: false)
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            player: read_key("PLAYER_SECRET")?,
            operator: read_key("OPERATOR_SECRET")?,
            stake: read_env::<u128>("DEMO_STAKE").unwrap_or(GameConfig::MIN_STAKE),
            salt: env::var("DEMO_SALT").unwrap_or_else(|_| "demo".to_string()),
            play_mine: read_env_bool("DEMO_PLAY_MINE").unwrap_or(false),
        })
    }
}

fn read_key(key: &str) -> Result<SigningKey> {
    match env::var(key) {
        Ok(secret) => {
            let mut bytes = [0u8; 32];
            hex::decode_to_slice(secret.trim().trim_start_matches("0x"), &mut bytes)
                .with_context(|| format!("{key} must be 64 hex characters"))?;
            Ok(SigningKey::from_bytes(&bytes))
        }
        Err(_) => Ok(SigningKey::generate(&mut OsRng)),
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Logs every runtime event as a JSON line under the `client::events` target.
pub fn spawn_event_logger(handle: &RuntimeHandle) -> Vec<JoinHandle<()>> {
    handle
        .subscribe_multiple(&Topic::ALL)
        .into_iter()
        .map(|(topic, mut rx)| {
            tokio::spawn(async move {
                loop {
                    match rx.recv().await {
                        Ok(event) => match serde_json::to_string(&event) {
                            Ok(json) => tracing::debug!(target: "client::events", ?topic, "{json}"),
                            Err(error) => tracing::warn!(target: "client::events", %error, "Unserializable event"),
                        },
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(target: "client::events", ?topic, skipped, "Event logger lagged");
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            })
        })
        .collect()
}

/// Plays one full game and closes the session.
pub async fn run(handle: &RuntimeHandle, config: &DemoConfig) -> Result<()> {
    let player = AccountId::from(config.player.verifying_key());
    tracing::info!(player = %player, "Demo player");

    let session = handle.create_session(player, config.stake).await?;
    tracing::info!(expiry_time = session.expiry_time, "Session open");

    let game = handle
        .start_new_game(player, config.salt.as_bytes().to_vec())
        .await?;
    tracing::info!(
        board_seed = %game.board_seed,
        mine_count = game.mine_count,
        safe_cells = game.safe_cells(),
        "Game started"
    );

    let mut mirror = CellMask::EMPTY;
    let mut game = game;
    while !game.is_over {
        let moves = plan_batch(&game, config.play_mine);
        let session = handle
            .session(player)
            .await?
            .context("session disappeared mid-game")?;
        let signature = sign_batch(&config.player, &moves, &session);

        let report = handle
            .process_batch_moves(player, moves.clone(), signature)
            .await?;

        for revealed in &report.revealed {
            mirror.insert(revealed.cell);
        }
        ensure!(
            state_hash(&game.board_seed, &mirror, report.move_count) == report.state_hash,
            "client mirror diverged from engine at move {}",
            report.move_count
        );

        tracing::info!(
            moves = moves.len(),
            revealed = report.revealed.len(),
            move_count = report.move_count,
            outcome = %report.outcome,
            "Batch processed"
        );

        game = handle
            .game(player)
            .await?
            .context("game disappeared mid-game")?;
    }

    println!("{}", render(&game));
    match (game.has_won, game.exploded_at) {
        (true, _) => println!("Won with score {}", game.score),
        (false, Some(cell)) => println!("Hit a mine at {cell}"),
        (false, None) => println!("Game over"),
    }

    println!("Leaderboard:");
    for (rank, entry) in handle.leaderboard().await?.iter().enumerate() {
        println!("  {:>2}. {} {}", rank + 1, entry.player.short(), entry.score);
    }

    let refund = handle.close_session(player).await?;
    tracing::info!(refund, "Session closed");

    let treasury = handle.treasury().await?;
    tracing::info!(
        escrowed = treasury.escrowed,
        forfeited = treasury.forfeited,
        "Treasury"
    );
    Ok(())
}

/// Next batch for the mirror: up to 20 hidden safe cells, or a deliberate
/// mine after one safe cell when `play_mine` is set.
fn plan_batch(game: &Game, play_mine: bool) -> Vec<Move> {
    let seed = &game.board_seed;
    let hidden_safe = Cell::all()
        .filter(|cell| !game.revealed.contains(*cell) && !HashBoard.is_mine(seed, *cell));

    if play_mine {
        let mine = Cell::all().find(|cell| HashBoard.is_mine(seed, *cell));
        return hidden_safe
            .take(1)
            .chain(mine)
            .map(Move::from)
            .collect();
    }

    hidden_safe
        .take(GameConfig::MAX_BATCH_MOVES)
        .map(Move::from)
        .collect()
}

/// Plain-text board: `#` hidden, `.` empty, digits for counts, `*` the mine
/// that ended the game and `x` the other exposed mines.
fn render(game: &Game) -> String {
    let mut out = String::new();
    for y in 0..GameConfig::HEIGHT {
        for x in 0..GameConfig::WIDTH {
            let Some(cell) = Cell::new(x, y) else {
                continue;
            };
            let glyph = if game.exploded_at == Some(cell) {
                '*'
            } else if game.exposed_mines.contains(cell) {
                'x'
            } else if game.revealed.contains(cell) {
                match HashBoard.adjacent_mine_count(&game.board_seed, cell) {
                    0 => '.',
                    n => char::from(b'0' + n),
                }
            } else {
                '#'
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}
