//! Component factory: builds the clients and the conversation handler from config.

use std::sync::Arc;

use anyhow::Result;
use completion_client::{mask_token, LlmClient, OpenRouterClient};
use conversation::SessionStore;
use flow_handlers::{ConversationHandler, ImageModels};
use image_generation_client::{JobPoller, PollConfig, ReplicateClient};
use studio_core::Bot as CoreBot;
use studio_telegram::{TelegramBotAdapter, TelegramConfig};
use tracing::{info, instrument};

use super::config::BotConfig;

/// Everything `run_bot` needs: the teloxide bot for polling and the handler it feeds.
pub struct BotComponents {
    pub teloxide_bot: teloxide::Bot,
    pub handler: Arc<ConversationHandler>,
}

/// Builds components from config.
///
/// When `bot_override` is `Some`, the handler replies through it instead of Telegram
/// (integration tests inject a recording bot here).
#[instrument(skip(config, bot_override))]
pub fn build_components(
    config: &BotConfig,
    bot_override: Option<Arc<dyn CoreBot>>,
) -> Result<BotComponents> {
    let teloxide_bot = TelegramConfig::with_token(config.bot_token.clone())
        .with_api_url(config.telegram_api_url.clone())
        .build_bot()?;

    let bot: Arc<dyn CoreBot> = match bot_override {
        Some(bot) => bot,
        None => Arc::new(TelegramBotAdapter::new(teloxide_bot.clone())),
    };

    info!(
        base_url = %config.openrouter_base_url,
        model = %config.text_model,
        api_key = %mask_token(&config.openrouter_api_key),
        "Using completion endpoint"
    );
    let llm: Arc<dyn LlmClient> = Arc::new(
        OpenRouterClient::new(config.openrouter_api_key.clone())
            .with_base_url(config.openrouter_base_url.clone())
            .with_model(config.text_model.clone())
            .with_system_prompt_opt(config.system_prompt.clone()),
    );

    info!(
        base_url = %config.replicate_base_url,
        api_token = %mask_token(&config.replicate_api_token),
        interval_secs = config.poll_interval.as_secs(),
        max_attempts = config.poll_max_attempts,
        "Using prediction endpoint"
    );
    let jobs = JobPoller::new(
        Arc::new(
            ReplicateClient::new(config.replicate_api_token.clone())
                .with_base_url(config.replicate_base_url.clone()),
        ),
        PollConfig {
            interval: config.poll_interval,
            max_attempts: config.poll_max_attempts,
        },
    );

    let handler = ConversationHandler::new(
        bot,
        SessionStore::new(config.history_max_entries),
        llm,
        jobs,
        ImageModels {
            generation: config.image_gen_model.clone(),
            editing: config.inpainting_model.clone(),
        },
    );

    Ok(BotComponents {
        teloxide_bot,
        handler: Arc::new(handler),
    })
}
