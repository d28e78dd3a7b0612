//! # Command layer
//!
//! Turns chat text into replies. [`commands`] parses `<prefix><name> [args]`,
//! [`cooldown`] enforces per-channel rate limits, [`handler`] runs commands
//! against the current [`crate::pss::GameData`] snapshot, and [`console`] is
//! the stdin/stdout transport used by the `start` subcommand.

pub mod commands;
pub mod console;
pub mod cooldown;
pub mod handler;

pub use commands::{BotCommand, CommandParser};
pub use handler::{Bot, Control, MessageContext, Response};
