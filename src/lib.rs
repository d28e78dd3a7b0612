//! # pssbot - Pixel Starships lookup bot
//!
//! pssbot answers chat commands about the game Pixel Starships: crew prestige
//! combinations, item prices and stats, recipes, research, rooms, collections
//! and the live marketplace. Game data comes from the public game API as XML
//! and is cached on disk.
//!
//! ## Features
//!
//! - **Fuzzy lookups**: case, punctuation and common spelling variants are ignored when matching names.
//! - **Disk cache**: design lists are reused across restarts; item prices refresh every half day.
//! - **Message-sized replies**: long answers are split on line boundaries under the 2000 character cap.
//! - **Per-channel cooldowns**: each command is rate limited per channel.
//! - **Owner tools**: refresh, restart and diagnostics behind an owner check.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pssbot::bot::{Bot, MessageContext};
//! use pssbot::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load_or_default("config.toml").await?;
//!     let bot = Bot::connect(config).await?;
//!     let reply = bot
//!         .handle_message(&MessageContext::new("me", "console"), "/price gold")
//!         .await;
//!     for message in reply.messages {
//!         println!("{}", message);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`bot`] - command parsing, cooldowns, handlers and the console transport
//! - [`pss`] - game API access, caching, XML decoding and reply formatting
//! - [`config`] - configuration loading, environment overrides and validation
//! - [`metrics`] - process-wide command and cache counters
//! - [`logutil`] - escaping user text for log lines
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   Bot           │ ← parsing, cooldowns, command handlers
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │   GameData      │ ← immutable snapshot, swapped on refresh
//! │   snapshot      │
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │   Raw cache     │ ← XML payloads on disk
//! │   + Fetcher     │
//! └─────────────────┘
//! ```

pub mod bot;
pub mod config;
pub mod logutil;
pub mod metrics;
pub mod pss;
