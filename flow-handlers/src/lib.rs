//! # flow-handlers
//!
//! The conversation orchestrator. [`ConversationHandler`] routes every inbound message through
//! the user's state machine and runs the resulting action: menu and prompts, chat completion
//! with history, or an image job polled to completion.

mod conversation_handler;
pub mod messages;

pub use conversation_handler::{ConversationHandler, ImageModels};
