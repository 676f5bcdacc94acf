//! OpenRouter-compatible `/chat/completions` client.

use std::time::Duration;

use async_trait::async_trait;
use conversation::HistoryEntry;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::{mask_token, CompletionError, LlmClient};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "google/gemma-7b-it";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ReplyMessage>,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

/// HTTP client for an OpenAI-style chat-completions endpoint (OpenRouter by default).
#[derive(Clone)]
pub struct OpenRouterClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    system_prompt: Option<String>,
}

impl OpenRouterClient {
    pub fn new(api_key: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Prepended to every request as a system message; never stored in history.
    pub fn with_system_prompt_opt(mut self, prompt: Option<String>) -> Self {
        self.system_prompt = prompt.filter(|p| !p.trim().is_empty());
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn build_request<'a>(&'a self, history: &'a [HistoryEntry]) -> ChatCompletionRequest<'a> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        if let Some(system) = self.system_prompt.as_deref() {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.extend(history.iter().map(|entry| ChatMessage {
            role: match entry.role {
                conversation::Role::User => "user",
                conversation::Role::Assistant => "assistant",
            },
            content: entry.content.as_str(),
        }));
        ChatCompletionRequest {
            model: &self.model,
            messages,
        }
    }
}

#[async_trait]
impl LlmClient for OpenRouterClient {
    #[instrument(skip(self, history), fields(model = %self.model))]
    async fn complete(&self, history: &[HistoryEntry]) -> Result<String, CompletionError> {
        let request = self.build_request(history);
        info!(
            message_count = request.messages.len(),
            api_key = %mask_token(&self.api_key),
            "chat completion request"
        );
        if let Ok(json) = serde_json::to_string(&request) {
            debug!(request_json = %json, "chat completion request JSON");
        }

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!(status = status.as_u16(), "chat completion rejected");
            return Err(CompletionError::Remote {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| CompletionError::MalformedPayload(e.to_string()))?;
        let reply = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or_else(|| {
                CompletionError::MalformedPayload("missing choices[0].message.content".to_string())
            })?;

        info!(reply_len = reply.len(), "chat completion succeeded");
        Ok(reply)
    }
}
