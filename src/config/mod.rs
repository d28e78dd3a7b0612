//! # Configuration Management Module
//!
//! This module handles all configuration aspects of the bot: a TOML file with
//! sensible defaults for every section, plus the three environment variables the
//! hosting setup provides at startup.
//!
//! ## Configuration Structure
//!
//! - [`BotConfig`] - command prefix, token, owner identity, greeting text
//! - [`ApiConfig`] - game API base URL, language key, request timeout
//! - [`CacheConfig`] - where raw payloads and lookup tables are stored
//! - [`CooldownConfig`] - per-channel command rate limits
//! - [`LoggingConfig`] - logging level and optional log file
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pssbot::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut config = Config::load("config.toml").await?;
//!     config.apply_env();
//!     config.validate()?;
//!     println!("Prefix: {}", config.bot.prefix);
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [bot]
//! prefix = "/"
//! owner = "someone#1234"
//!
//! [api]
//! base_url = "https://api2.pixelstarships.com"
//! language_key = "en"
//! timeout_seconds = 10
//!
//! [cache]
//! data_dir = "./data"
//! ```
//!
//! ## Environment Integration
//!
//! `COMMAND_PREFIX`, `DISCORD_BOT_TOKEN` and `DISCORD_BOT_OWNER` override the
//! file. Precedence: environment > config file > defaults.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

pub const ENV_PREFIX: &str = "COMMAND_PREFIX";
pub const ENV_TOKEN: &str = "DISCORD_BOT_TOKEN";
pub const ENV_OWNER: &str = "DISCORD_BOT_OWNER";

const DEFAULT_WELCOME: &str = "**Welcome to the Pixel Starships Discord!**
This is a place where we can interact with devs and players from other alliances/fleets
1. you can mute any channel to avoid notifications from that channel
2. #announcements-and-tips-of-the-day are for anything really important on PSS
3. if you have any suggestions for the game, you can post them in #suggestion-posts
4. #game-support is for bugs, etc.
5. type `/help` to find out how to use this bot for character stats/prestige combos, and item prices/stats.
6. The usual guidelines for any forum apply (try to be civil, don't spam, etc).";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Command prefix, e.g. "/" or "!".
    pub prefix: String,
    /// Chat platform token. Only the platform transport needs it.
    #[serde(default)]
    pub token: String,
    /// Identity allowed to run owner-only commands. Empty disables them.
    #[serde(default)]
    pub owner: String,
    #[serde(default = "default_description")]
    pub description: String,
    #[serde(default = "default_welcome")]
    pub welcome_message: String,
}

fn default_description() -> String {
    "This is a bot for pixel starships".to_string()
}

fn default_welcome() -> String {
    DEFAULT_WELCOME.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_language_key")]
    pub language_key: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_language_key() -> String {
    "en".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api2.pixelstarships.com".to_string(),
            language_key: default_language_key(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub data_dir: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
        }
    }
}

/// Per-channel cooldown: at most `rate` uses of a command per `per_seconds`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CooldownConfig {
    pub rate: u32,
    pub per_seconds: u64,
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self {
            rate: 3,
            per_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    /// Separate file for `security` target records (refused owner commands).
    #[serde(default)]
    pub security_file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: Some("pssbot.log".to_string()),
            security_file: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub bot: BotConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub cooldown: CooldownConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        Ok(config)
    }

    /// Load the file if it exists, otherwise start from defaults.
    pub async fn load_or_default(path: &str) -> Result<Self> {
        if fs::try_exists(path).await.unwrap_or(false) {
            Self::load(path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    /// Apply `COMMAND_PREFIX`, `DISCORD_BOT_TOKEN` and `DISCORD_BOT_OWNER`.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup (empty values are ignored).
    pub fn apply_overrides<L>(&mut self, lookup: L)
    where
        L: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(prefix) = non_empty(ENV_PREFIX) {
            self.bot.prefix = prefix;
        }
        if let Some(token) = non_empty(ENV_TOKEN) {
            self.bot.token = token;
        }
        if let Some(owner) = non_empty(ENV_OWNER) {
            self.bot.owner = owner;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.bot.prefix.is_empty() || self.bot.prefix.chars().any(char::is_whitespace) {
            return Err(anyhow!(
                "Invalid command prefix '{}': must be non-empty without whitespace",
                self.bot.prefix
            ));
        }
        if self.cooldown.rate == 0 {
            return Err(anyhow!("cooldown.rate must be at least 1"));
        }
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            return Err(anyhow!("api.base_url must be an http(s) URL"));
        }
        if self.api.timeout_seconds == 0 {
            return Err(anyhow!("api.timeout_seconds must be positive"));
        }
        Ok(())
    }

    pub fn has_owner(&self) -> bool {
        !self.bot.owner.is_empty()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bot: BotConfig {
                prefix: "/".to_string(),
                token: String::new(),
                owner: String::new(),
                description: default_description(),
                welcome_message: default_welcome(),
            },
            api: ApiConfig::default(),
            cache: CacheConfig::default(),
            cooldown: CooldownConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
