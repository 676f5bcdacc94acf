//! Wraps teloxide::Bot and implements [`studio_core::Bot`]. Production code talks to Telegram;
//! tests substitute another Bot impl.

use async_trait::async_trait;
use studio_core::{Bot as CoreBot, Chat, Result, StudioError};
use teloxide::{
    prelude::*,
    types::{ChatId, FileId, InputFile, KeyboardButton, KeyboardMarkup},
};

/// Thin wrapper around teloxide::Bot that implements studio-core's Bot trait.
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }

    /// Download URL for a file path returned by `getFile`.
    fn download_url(&self, file_path: &str) -> String {
        let api_url = self.bot.api_url();
        format!(
            "{}/file/bot{}/{}",
            api_url.as_str().trim_end_matches('/'),
            self.bot.token(),
            file_path
        )
    }
}

fn bot_error(e: teloxide::RequestError) -> StudioError {
    StudioError::Bot(e.to_string())
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat.id), text.to_string())
            .await
            .map_err(bot_error)?;
        Ok(())
    }

    async fn send_menu(&self, chat: &Chat, text: &str, options: &[&str]) -> Result<()> {
        let rows: Vec<Vec<KeyboardButton>> = options
            .iter()
            .map(|option| vec![KeyboardButton::new(*option)])
            .collect();
        let keyboard = KeyboardMarkup::new(rows).resize_keyboard();
        self.bot
            .send_message(ChatId(chat.id), text.to_string())
            .reply_markup(keyboard)
            .await
            .map_err(bot_error)?;
        Ok(())
    }

    async fn send_photo(&self, chat: &Chat, image_url: &str, caption: Option<&str>) -> Result<()> {
        let url = reqwest::Url::parse(image_url)
            .map_err(|e| StudioError::InvalidUrl(format!("{image_url}: {e}")))?;
        let mut request = self.bot.send_photo(ChatId(chat.id), InputFile::url(url));
        if let Some(caption) = caption {
            request = request.caption(caption.to_string());
        }
        request.await.map_err(bot_error)?;
        Ok(())
    }

    async fn file_url(&self, file_id: &str) -> Result<String> {
        let file = self
            .bot
            .get_file(FileId(file_id.to_string()))
            .await
            .map_err(|e| StudioError::FileUnavailable(format!("{file_id}: {e}")))?;
        Ok(self.download_url(&file.path))
    }
}
