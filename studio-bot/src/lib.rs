//! # studio-bot
//!
//! Application crate: env config, CLI, component wiring and the run loop.

pub mod cli;
pub mod components;
pub mod config;
pub mod runner;

pub use cli::{Cli, Commands};
pub use components::{build_components, BotComponents};
pub use config::BotConfig;
pub use runner::run_bot;
