//! # Completion client
//!
//! Defines the [`LlmClient`] trait and an OpenRouter-compatible HTTP implementation
//! ([`OpenRouterClient`]). [`complete`] is the conversation-level entry point: it sends a
//! user's history and records the reply in it.
//!
//! Provides token masking for safe logging.

use async_trait::async_trait;
use conversation::{History, HistoryEntry};
use tracing::{info, instrument};

mod error;
mod openrouter;

pub use error::CompletionError;
pub use openrouter::{OpenRouterClient, DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Masks an API key/token for safe logging: shows first 7 chars + "***" + last 4 chars.
/// If length <= 11, returns "***" to avoid leaking any part of the key.
pub fn mask_token(token: &str) -> String {
    let len = token.len();
    if len <= 11 || !token.is_char_boundary(7) || !token.is_char_boundary(len - 4) {
        "***".to_string()
    } else {
        format!("{}***{}", &token[..7], &token[len - 4..])
    }
}

/// Text-completion backend.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Returns the model reply for the given chronological history. Not retried.
    async fn complete(&self, history: &[HistoryEntry]) -> Result<String, CompletionError>;
}

/// Sends `history` to `client` and, on success, appends the reply as an assistant entry so
/// later calls carry it as context. On failure `history` is left untouched.
#[instrument(skip(client, history), fields(history_len = history.len()))]
pub async fn complete(
    client: &dyn LlmClient,
    history: &mut History,
) -> Result<String, CompletionError> {
    let request = history.to_vec();
    let reply = client.complete(&request).await?;
    history.push(HistoryEntry::assistant(reply.clone()));
    info!(reply_len = reply.len(), "completion recorded in history");
    Ok(reply)
}
