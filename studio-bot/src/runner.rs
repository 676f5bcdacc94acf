//! Run loop: tracing, components, then Telegram long polling.

use anyhow::Result;
use studio_core::init_tracing;
use studio_telegram::run_repl;
use tracing::{info, instrument};

use super::components::build_components;
use super::config::BotConfig;

/// Main entry: init logging, build components, run the REPL until shutdown.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    init_tracing(&config.log_file)?;

    info!(
        history_max_entries = config.history_max_entries,
        log_file = %config.log_file,
        "Initializing bot"
    );

    let components = build_components(&config, None)?;

    info!("Bot started successfully");

    run_repl(components.teloxide_bot, components.handler).await
}
