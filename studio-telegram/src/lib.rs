//! # studio-telegram
//!
//! Telegram transport layer: adapters to [`studio_core`] types, a [`studio_core::Bot`]
//! implementation, minimal config and the REPL runner.
//! Handles only Telegram connectivity; conversation logic lives in flow-handlers.

mod adapters;
mod bot_adapter;
mod config;
mod runner;

pub use adapters::{TelegramMessageWrapper, TelegramUserWrapper};
pub use bot_adapter::TelegramBotAdapter;
pub use config::TelegramConfig;
pub use runner::run_repl;
