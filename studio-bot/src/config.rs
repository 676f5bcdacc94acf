use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// 默认文生图模型版本（sdxl）。
pub const DEFAULT_IMAGE_GEN_MODEL: &str =
    "stability-ai/sdxl:39ed52f2a78e934b3ba6e2a89f5b1c712de7dfea535525255b1aa35c5565e08b";
/// 默认图片编辑模型版本。
pub const DEFAULT_INPAINTING_MODEL: &str =
    "arielreplicate/rembg:476680b575388b5cd2d0ce93fb7a51658ff1d4ef7f35c334f69630ab25a3da736";
pub const DEFAULT_LOG_FILE: &str = "logs/studio-bot.log";

/// Studio Bot 配置，从环境变量加载
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub bot_token: String,
    pub log_file: String,
    /// 文本补全服务（OpenRouter 兼容）
    pub openrouter_api_key: String,
    pub openrouter_base_url: String,
    pub text_model: String,
    pub system_prompt: Option<String>,
    /// 图片任务服务（Replicate 兼容）
    pub replicate_api_token: String,
    pub replicate_base_url: String,
    pub image_gen_model: String,
    pub inpainting_model: String,
    pub poll_interval: Duration,
    pub poll_max_attempts: u32,
    /// 每个用户保留的历史条数上限
    pub history_max_entries: usize,
    /// 可选：Telegram Bot API 基础 URL（测试时指向 mock 服务器）。
    /// 环境变量：`TELEGRAM_API_URL` 或 `TELOXIDE_API_URL`。
    pub telegram_api_url: Option<String>,
}

/// 必填变量：缺失或为空时报错。
fn required(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => anyhow::bail!("{name} not set. Set it in .env or environment."),
    }
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn with_default(name: &str, default: &str) -> String {
    optional(name).unwrap_or_else(|| default.to_string())
}

/// 数值变量：未设置时取默认值，无法解析时报错。
fn parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {name}: {raw}")),
        None => Ok(default),
    }
}

impl BotConfig {
    /// 从环境变量加载配置
    /// 如果传入 token，则覆盖 BOT_TOKEN
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(token) => token,
            None => required("BOT_TOKEN")?,
        };

        let config = Self {
            bot_token,
            log_file: with_default("LOG_FILE", DEFAULT_LOG_FILE),
            openrouter_api_key: required("OPENROUTER_API_KEY")?,
            openrouter_base_url: with_default(
                "OPENROUTER_BASE_URL",
                completion_client::DEFAULT_BASE_URL,
            ),
            text_model: with_default("TEXT_MODEL", completion_client::DEFAULT_MODEL),
            system_prompt: optional("SYSTEM_PROMPT"),
            replicate_api_token: required("REPLICATE_API_TOKEN")?,
            replicate_base_url: with_default(
                "REPLICATE_BASE_URL",
                image_generation_client::DEFAULT_BASE_URL,
            ),
            image_gen_model: with_default("IMAGE_GEN_MODEL", DEFAULT_IMAGE_GEN_MODEL),
            inpainting_model: with_default("INPAINTING_MODEL", DEFAULT_INPAINTING_MODEL),
            poll_interval: Duration::from_secs(parse_or("POLL_INTERVAL_SECS", 2u64)?),
            poll_max_attempts: parse_or("POLL_MAX_ATTEMPTS", 150u32)?,
            history_max_entries: parse_or(
                "HISTORY_MAX_ENTRIES",
                conversation::DEFAULT_HISTORY_LIMIT,
            )?,
            telegram_api_url: optional("TELEGRAM_API_URL").or_else(|| optional("TELOXIDE_API_URL")),
        };
        config.validate()?;
        Ok(config)
    }

    /// 校验数值范围
    pub fn validate(&self) -> Result<()> {
        if self.bot_token.trim().is_empty() {
            anyhow::bail!("Bot token is empty");
        }
        if self.poll_max_attempts == 0 {
            anyhow::bail!("POLL_MAX_ATTEMPTS must be at least 1");
        }
        if self.history_max_entries == 0 {
            anyhow::bail!("HISTORY_MAX_ENTRIES must be at least 1");
        }
        Ok(())
    }
}
