//! Binary entrypoint for the pssbot CLI.
//!
//! Commands:
//! - `start [--as-owner]` - load game data and answer commands typed on stdin
//! - `init` - create a starter `config.toml`
//! - `status` - print configuration and cache state as JSON (no network)
//! - `query <text...>` - run a single command and print the reply
//! - `refresh` - re-download every design list into the cache
//!
//! See the library crate docs for module-level details: `pssbot::`.
use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{error, info, warn};

use pssbot::bot::console::{self, ConsoleExit};
use pssbot::bot::{Bot, MessageContext};
use pssbot::config::Config;
use pssbot::pss::api::{ApiEndpoints, HttpFetcher};
use pssbot::pss::DataStore;

const CONSOLE_CHANNEL: &str = "console";
const CONSOLE_USER: &str = "console";

#[derive(Parser)]
#[command(name = "pssbot")]
#[command(about = "A Pixel Starships lookup bot")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot on the console
    Start {
        /// Type commands as the configured owner (enables `testing`)
        #[arg(long)]
        as_owner: bool,
    },
    /// Write a default configuration file
    Init,
    /// Show configuration and cache state
    Status,
    /// Run one command, e.g. `pssbot query /price gold`
    Query {
        /// Command text
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
        /// Send the command as the configured owner
        #[arg(long)]
        as_owner: bool,
    },
    /// Re-download all design lists
    Refresh,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Init = cli.command {
        init_logging(&None, cli.verbose);
        info!("Initializing new pssbot configuration");
        Config::create_default(&cli.config).await?;
        info!("Configuration file created at {}", cli.config);
        return Ok(());
    }

    let mut config = Config::load_or_default(&cli.config).await?;
    config.apply_env();
    init_logging(&Some(config.clone()), cli.verbose);
    config.validate()?;

    match cli.command {
        Commands::Init => {}
        Commands::Start { as_owner } => {
            info!("Starting pssbot v{}", env!("CARGO_PKG_VERSION"));
            if as_owner && !config.has_owner() {
                warn!("--as-owner given but no owner is configured; owner commands stay disabled");
            }
            let ctx = console_context(&config, as_owner);
            let bot = Bot::connect(config).await?;
            info!("Ready. Type commands, e.g. {}help", bot.config().bot.prefix);
            match console::run_stdio(&bot, ctx).await? {
                ConsoleExit::EndOfInput => info!("Input closed, shutting down"),
                ConsoleExit::Restart => restart_process()?,
            }
        }
        Commands::Status => {
            let store = store_for(&config);
            let cached = cached_files(&config.cache.data_dir).await;
            let name_table = store.read_name_table().await?.map(|t| t.len());
            let payload = serde_json::json!({
                "version": env!("CARGO_PKG_VERSION"),
                "config": cli.config,
                "prefix": config.bot.prefix,
                "owner_configured": config.has_owner(),
                "token_configured": !config.bot.token.is_empty(),
                "api_base_url": config.api.base_url,
                "data_dir": config.cache.data_dir,
                "cached_files": cached,
                "known_characters": name_table,
            });
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        Commands::Query { text, as_owner } => {
            let ctx = console_context(&config, as_owner);
            let bot = Bot::connect(config).await?;
            let response = bot.handle_message(&ctx, &text.join(" ")).await;
            if response.is_empty() {
                warn!("'{}' is not a known command", text.join(" "));
            }
            for message in response.messages {
                println!("{}\n", message);
            }
        }
        Commands::Refresh => {
            let store = store_for(&config);
            let data = store.load(true).await?;
            let fresh = store.detect_new_characters(&data.characters).await?;
            println!("Refreshed: {}", data.summary());
            if !fresh.is_empty() {
                println!("New characters: {}", fresh.join(", "));
            }
        }
    }

    Ok(())
}

fn console_context(config: &Config, as_owner: bool) -> MessageContext {
    if as_owner && config.has_owner() {
        MessageContext::new(config.bot.owner.clone(), CONSOLE_CHANNEL)
    } else {
        MessageContext::new(CONSOLE_USER, CONSOLE_CHANNEL)
    }
}

fn store_for(config: &Config) -> DataStore<HttpFetcher> {
    DataStore::new(
        HttpFetcher::new(&config.api),
        ApiEndpoints::new(&config.api),
        config.cache.data_dir.clone(),
    )
}

async fn cached_files(data_dir: &str) -> Vec<String> {
    let mut names = Vec::new();
    let Ok(mut entries) = tokio::fs::read_dir(data_dir).await else {
        return names;
    };
    while let Ok(Some(entry)) = entries.next_entry().await {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    names
}

/// Replace this process with a fresh copy of itself (same arguments).
fn restart_process() -> Result<()> {
    use std::process::Command;

    let current_exe = std::env::current_exe()?;
    let args: Vec<String> = std::env::args().skip(1).collect();
    info!("Restarting {} {}", current_exe.display(), args.join(" "));
    match Command::new(&current_exe).args(&args).spawn() {
        Ok(child) => info!("Restarted as pid {}", child.id()),
        Err(e) => {
            error!("Restart failed: {}", e);
            return Err(e.into());
        }
    }
    std::process::exit(0);
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let configured = config
        .as_ref()
        .and_then(|c| c.logging.level.parse::<log::LevelFilter>().ok())
        .unwrap_or(log::LevelFilter::Info);
    let base_level = match verbosity {
        0 => configured,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);
    // Quieten HTTP client internals unless tracing
    if verbosity < 2 {
        builder.filter_module("reqwest", log::LevelFilter::Warn);
        builder.filter_module("hyper", log::LevelFilter::Warn);
    }

    let log_file = config.as_ref().and_then(|c| c.logging.file.clone());
    let security_path = config.as_ref().and_then(|c| c.logging.security_file.clone());
    let opened = log_file.and_then(|file| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(file)
            .ok()
    });

    match opened {
        Some(f) => {
            let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
            // Echo to the console only when a person is watching
            let is_tty = atty::is(atty::Stream::Stderr);
            builder.format(move |fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                let line = format!("{} [{}] {}", ts, record.level(), record.args());

                if let Ok(mut guard) = write_mutex.lock() {
                    let _ = writeln!(guard, "{}", line);
                }

                if record.target() == "security" {
                    if let Some(ref sec_path) = security_path {
                        if let Ok(mut sf) = std::fs::OpenOptions::new()
                            .create(true)
                            .append(true)
                            .open(sec_path)
                        {
                            let _ = writeln!(sf, "{}", line);
                        }
                    }
                }

                if is_tty {
                    writeln!(fmt, "{}", line)
                } else {
                    Ok(())
                }
            });
        }
        None => {
            builder.format(|fmt, record| {
                writeln!(
                    fmt,
                    "{} [{}] {}",
                    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
                    record.level(),
                    record.args()
                )
            });
        }
    }
    let _ = builder.try_init();
}
