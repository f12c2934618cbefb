//! Arena - Match runner for the Isolation search agent
//!
//! Plays a series of games between the iterative-deepening alpha-beta agent
//! and a baseline opponent:
//! 1. Each agent turn runs the search on a worker thread under a time budget
//! 2. The agent plays the last move the search published before the deadline
//! 3. Sides alternate every round
//! 4. Results are written to `./data/arena_stats.json`

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

mod arena;
mod config;
mod policy;
mod search_policy;
mod stats;
mod supervisor;

use crate::arena::Arena;
use crate::config::Config;

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    config.validate()?;

    init_tracing(&config.log_level)?;
    info!(log_level = %config.log_level, "Tracing initialized");

    info!(
        rounds = config.rounds,
        opponent = %config.opponent,
        time_limit_ms = config.time_limit_ms,
        "Starting arena"
    );

    let arena = Arc::new(Arena::new(config)?);

    // Stop between games on ctrl+c
    let shutdown_arena = Arc::clone(&arena);
    let shutdown_handle = tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received, finishing current game...");
            shutdown_arena.shutdown();
        }
    });

    // Turns block on worker threads, keep them off the async runtime
    let match_arena = Arc::clone(&arena);
    let run_result = tokio::task::spawn_blocking(move || match_arena.run())
        .await
        .map_err(anyhow::Error::from)
        .and_then(|result| result);

    shutdown_handle.abort();

    match run_result {
        Ok(()) => {
            info!("Arena completed successfully");
            Ok(())
        }
        Err(e) => {
            error!("Arena failed: {}", e);
            Err(e)
        }
    }
}
