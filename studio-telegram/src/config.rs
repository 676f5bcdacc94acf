//! 框架最小配置：仅 token 与可选的 API URL。
//! 环境变量由 studio-bot 的 BotConfig 统一读取后传入。

use anyhow::{Context, Result};

/// Telegram 接入配置。
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    /// 可选：Telegram Bot API 基础 URL（测试时可指向 mock 服务器）。
    pub telegram_api_url: Option<String>,
}

impl TelegramConfig {
    /// 使用给定 token 构造，API URL 为 None。
    pub fn with_token(bot_token: String) -> Self {
        Self {
            bot_token,
            telegram_api_url: None,
        }
    }

    pub fn with_api_url(mut self, url: Option<String>) -> Self {
        self.telegram_api_url = url;
        self
    }

    /// 构造 teloxide Bot；设置了 API URL 时请求发往该地址。
    pub fn build_bot(&self) -> Result<teloxide::Bot> {
        let bot = teloxide::Bot::new(self.bot_token.clone());
        match self.telegram_api_url.as_deref() {
            Some(url) => {
                let url = reqwest::Url::parse(url)
                    .with_context(|| format!("Invalid TELEGRAM_API_URL: {url}"))?;
                Ok(bot.set_api_url(url))
            }
            None => Ok(bot),
        }
    }
}
