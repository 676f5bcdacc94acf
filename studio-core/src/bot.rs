//! Bot abstraction for replying to users.
//!
//! [`Bot`] is transport-agnostic; studio-telegram implements it via teloxide and tests
//! substitute a recording mock.

use crate::error::Result;
use crate::types::Chat;
use async_trait::async_trait;

/// Outbound capabilities the orchestrator needs from a transport.
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a plain text message to the given chat.
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()>;

    /// Sends a text message with a reply keyboard, one button per option.
    async fn send_menu(&self, chat: &Chat, text: &str, options: &[&str]) -> Result<()>;

    /// Sends a photo fetched by the transport from `image_url`.
    async fn send_photo(&self, chat: &Chat, image_url: &str, caption: Option<&str>) -> Result<()>;

    /// Resolves an uploaded file reference to a publicly fetchable URL.
    async fn file_url(&self, file_id: &str) -> Result<String>;
}
