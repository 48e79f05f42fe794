// Discord layer - commands and event handlers.

#[path = "commands/command_catalog.rs"]
pub mod commands;

#[path = "automod/message_filter.rs"]
pub mod message_filter;

// Re-export command types for convenience
pub use commands::blacklist::{Data, Error};
