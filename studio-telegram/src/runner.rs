//! REPL runner: converts teloxide messages to core::Message and hands each one to the handler.
//! teloxide runs one chat's updates one after another and different chats concurrently; the
//! handler is awaited inside the update closure so that order is kept.

use std::sync::Arc;

use anyhow::Result;
use studio_core::{Handler, Message, ToCoreMessage};
use teloxide::prelude::*;
use tracing::{error, info, instrument};

use super::adapters::TelegramMessageWrapper;

/// Starts long polling with the given teloxide Bot and handler.
#[instrument(skip(bot, handler))]
pub async fn run_repl(bot: teloxide::Bot, handler: Arc<dyn Handler>) -> Result<()> {
    match bot.get_me().await {
        Ok(me) => info!(
            username = ?me.user.username,
            "Bot identity confirmed, starting repl"
        ),
        Err(e) => error!(error = %e, "getMe failed; continuing"),
    }

    teloxide::repl(bot, move |msg: teloxide::types::Message| {
        let handler = handler.clone();

        async move {
            let core_msg = TelegramMessageWrapper(&msg).to_core();
            dispatch(handler.as_ref(), &core_msg).await;
            respond(())
        }
    })
    .await;

    Ok(())
}

/// Runs the handler for one message and logs the outcome. Handler errors never stop polling.
async fn dispatch(handler: &dyn Handler, message: &Message) {
    info!(
        user_id = message.user.id,
        chat_id = message.chat.id,
        kind = message.content.kind(),
        "Received message"
    );

    match handler.handle(message).await {
        Ok(response) => info!(
            user_id = message.user.id,
            message_id = %message.id,
            response = ?response,
            "Message handled"
        ),
        Err(e) => error!(
            error = %e,
            user_id = message.user.id,
            "Handler failed"
        ),
    }
}
