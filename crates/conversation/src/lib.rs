//! # Conversation
//!
//! Per-user conversation bookkeeping for the studio bot:
//!
//! - [`ConversationState`] and [`transition`]: which guided flow a user is in and what the
//!   next inbound event should trigger.
//! - [`History`]: bounded, chronological chat history sent to the completion endpoint.
//! - [`SessionStore`]: state, history and flow data keyed by [`UserId`], with one lock per
//!   user so events for the same user are handled one at a time.
//!
//! Nothing here is persisted; all data lives for the lifetime of the process.

mod history;
mod session;
mod state;

pub use history::{History, HistoryEntry, Role, DEFAULT_HISTORY_LIMIT};
pub use session::{Session, SessionStore, UserId};
pub use state::{transition, Action, ConversationState, Event, MenuChoice, Transition};
