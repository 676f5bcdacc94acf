//! # studio-core
//!
//! Core types and traits for the studio bot: [`Bot`], [`Handler`], message and user types,
//! and tracing initialization. Transport-agnostic; used by studio-telegram and flow-handlers.

pub mod bot;
pub mod error;
pub mod logger;
pub mod types;

pub use bot::Bot;
pub use error::{Result, StudioError};
pub use logger::init_tracing;
pub use types::{
    Chat, Handler, HandlerResponse, Message, MessageContent, ToCoreMessage, ToCoreUser, User,
};
