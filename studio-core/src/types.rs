//! Core types: user, chat, message, handler response, and Handler trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User identity (id, username, names).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Chat (channel or private) identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub chat_type: String,
}

/// What the user sent. Only the kinds the conversation flows distinguish are modelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageContent {
    /// Plain text, including reply-keyboard button labels.
    Text(String),
    /// A `/command`, without the slash and without any `@botname` suffix.
    Command { name: String, args: String },
    /// An uploaded photo; `file_id` is the transport's reference to the largest size.
    Photo {
        file_id: String,
        caption: Option<String>,
    },
    /// Anything else (stickers, voice, documents…).
    Unsupported,
}

impl MessageContent {
    /// Parses a text body, recognising `/command args` and `/command@bot args`.
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if let Some(rest) = trimmed.strip_prefix('/') {
            let (head, args) = match rest.split_once(char::is_whitespace) {
                Some((head, args)) => (head, args.trim()),
                None => (rest, ""),
            };
            let name = head.split('@').next().unwrap_or(head);
            if !name.is_empty() {
                return MessageContent::Command {
                    name: name.to_lowercase(),
                    args: args.to_string(),
                };
            }
        }
        MessageContent::Text(text.to_string())
    }

    /// Short label for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            MessageContent::Text(_) => "text",
            MessageContent::Command { .. } => "command",
            MessageContent::Photo { .. } => "photo",
            MessageContent::Unsupported => "unsupported",
        }
    }
}

/// A single inbound message with user, chat and content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub user: User,
    pub chat: Chat,
    pub content: MessageContent,
    pub created_at: DateTime<Utc>,
}

/// Result of handling one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerResponse {
    /// Handled without a model result (prompts, menu, re-prompts, reported failures).
    Stop,
    /// A completion reply was sent.
    Reply(String),
    /// An image was sent; carries its URL.
    Photo(String),
}

/// Converts a transport-specific user type to core [`User`].
pub trait ToCoreUser: Send + Sync {
    fn to_core(&self) -> User;
}

/// Converts a transport-specific message type to core [`Message`].
pub trait ToCoreMessage: Send + Sync {
    fn to_core(&self) -> Message;
}

/// Processes one inbound message.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, message: &Message) -> crate::error::Result<HandlerResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_plain() {
        assert_eq!(
            MessageContent::from_text("a red fox"),
            MessageContent::Text("a red fox".to_string())
        );
    }

    #[test]
    fn test_from_text_command_with_bot_suffix_and_args() {
        assert_eq!(
            MessageContent::from_text("/Start@studio_bot hello there"),
            MessageContent::Command {
                name: "start".to_string(),
                args: "hello there".to_string(),
            }
        );
    }

    #[test]
    fn test_from_text_lone_slash_is_text() {
        assert_eq!(
            MessageContent::from_text("/"),
            MessageContent::Text("/".to_string())
        );
    }
}
