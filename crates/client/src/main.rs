//! Minesweeper engine demo binary.
//!
//! Composition root that assembles the runtime from environment
//! configuration and plays one scripted session against it.
//!
//! # Examples
//!
//! ```bash
//! # Play a full game with a random player key
//! cargo run -p minesweeper-client
//!
//! # Lose on purpose and log every event as JSON
//! DEMO_PLAY_MINE=1 RUST_LOG=info,client::events=debug cargo run -p minesweeper-client
//! ```

mod demo;
mod logging;

use anyhow::Result;
use minesweeper_core::AccountId;
use minesweeper_runtime::{Runtime, RuntimeConfig};

use demo::DemoConfig;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // 1. Setup logging
    let _log_guard = logging::setup_logging()?;

    // 2. Load configuration from environment
    let demo_config = DemoConfig::from_env()?;
    let mut runtime_config = RuntimeConfig::from_env();
    if runtime_config.owner.is_none() {
        runtime_config.owner = Some(AccountId::from(demo_config.operator.verifying_key()));
    }

    tracing::info!("Starting Minesweeper engine");
    tracing::info!("Owner: {:?}", runtime_config.owner);
    tracing::info!("Minimum stake: {}", runtime_config.min_stake);

    // 3. Build runtime
    let runtime = Runtime::start(runtime_config).await?;
    let handle = runtime.handle();
    let loggers = demo::spawn_event_logger(&handle);

    // 4. Play
    let outcome = demo::run(&handle, &demo_config).await;

    // 5. Shutdown
    runtime.shutdown().await?;
    for logger in loggers {
        logger.abort();
    }

    outcome?;
    tracing::info!("Demo complete");
    Ok(())
}
