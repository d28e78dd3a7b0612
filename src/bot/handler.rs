//! Command execution against the current game-data snapshot.
use anyhow::Result;
use chrono::{NaiveDate, Utc};
use log::{debug, error, info, warn};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Instant;

use super::commands::{BotCommand, CommandParser, Invocation, ListKind, TestingAction, COMMANDS};
use super::cooldown::{cooldown_message, Cooldown, Cooldowns};
use crate::config::Config;
use crate::logutil::{command_line, escape_log};
use crate::metrics;
use crate::pss::api::{ApiEndpoints, Fetcher, HttpFetcher, PrestigeDirection};
use crate::pss::character::format_stats;
use crate::pss::item::ItemView;
use crate::pss::paginate::paginate_message;
use crate::pss::prestige::format_prestige;
use crate::pss::{collection, market, research, room};
use crate::pss::{DataStore, GameData};

const BUX_NOTE: &str = "Note: bux prices listed here may not always be accurate due to transfers between alts/friends or other reasons";
const RECIPE_LEVELS: usize = 5;
const NEWEST_CHARACTERS: usize = 10;
const COMMAND_FAILED: &str = "Error: command failed";

/// Who sent a message and where. Cooldowns are per channel; owner checks use the author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContext {
    pub author: String,
    pub channel: String,
}

impl MessageContext {
    pub fn new(author: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            channel: channel.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// The owner asked for the process to be restarted.
    Restart,
}

/// Messages to post in the channel, in order, plus an optional process action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    pub messages: Vec<String>,
    pub control: Option<Control>,
}

impl Response {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn text(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
            control: None,
        }
    }

    pub fn many(messages: Vec<String>) -> Self {
        Self {
            messages,
            control: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.control.is_none()
    }
}

/// Title, lines, blank line, bux disclaimer; paginated.
fn with_bux_note(title: String, lines: Vec<String>) -> Vec<String> {
    paginate_message(
        std::iter::once(title)
            .chain(lines)
            .chain([String::new(), BUX_NOTE.to_string()]),
    )
}

/// Days since 2016-01-06 plus weekday and UTC time.
pub fn stardate_text(now: chrono::DateTime<Utc>) -> String {
    let epoch = NaiveDate::from_ymd_opt(2016, 1, 6).unwrap_or_default();
    let days = now.date_naive().signed_duration_since(epoch).num_days();
    format!(
        "Today is Stardate {}\n{}",
        days,
        now.format("It is %A, %H:%M UTC")
    )
}

pub struct Bot<F: Fetcher> {
    config: Config,
    parser: CommandParser,
    store: DataStore<F>,
    snapshot: RwLock<Arc<GameData>>,
    cooldowns: Mutex<Cooldowns>,
}

impl Bot<HttpFetcher> {
    /// Bot backed by the real game API, with data loaded from the cache.
    pub async fn connect(config: Config) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config.api);
        let store = DataStore::new(
            fetcher,
            ApiEndpoints::new(&config.api),
            config.cache.data_dir.clone(),
        );
        Self::start(config, store).await
    }
}

impl<F: Fetcher> Bot<F> {
    /// Load the initial snapshot and record the newest character id.
    pub async fn start(config: Config, store: DataStore<F>) -> Result<Self> {
        let data = store.load(false).await?;
        let fresh = store.detect_new_characters(&data.characters).await?;
        if !fresh.is_empty() {
            info!("New characters since last run: {}", fresh.join(", "));
        }
        Ok(Self::with_snapshot(config, store, data))
    }

    pub fn with_snapshot(config: Config, store: DataStore<F>, data: GameData) -> Self {
        Self {
            parser: CommandParser::new(config.bot.prefix.clone()),
            config,
            store,
            snapshot: RwLock::new(Arc::new(data)),
            cooldowns: Mutex::new(Cooldowns::new()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn snapshot(&self) -> Arc<GameData> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace_snapshot(&self, data: GameData) {
        *self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::new(data);
    }

    fn is_owner(&self, ctx: &MessageContext) -> bool {
        self.config.has_owner() && ctx.author == self.config.bot.owner
    }

    /// Re-download everything and swap in the new snapshot.
    /// Returns characters added since the last recorded id.
    pub async fn refresh(&self) -> Result<Vec<String>> {
        let data = self.store.load(true).await?;
        let fresh = self.store.detect_new_characters(&data.characters).await?;
        self.replace_snapshot(data);
        Ok(fresh)
    }

    /// Snapshot whose item list matches the current half-day bucket.
    async fn current_items(&self) -> Result<Arc<GameData>> {
        let data = self.snapshot();
        let now = chrono::Local::now();
        if !data.items_stale(&now) {
            return Ok(data);
        }
        debug!("item list from {} is stale, reloading", data.items_bucket);
        let (items, bucket) = self.store.load_items_at(false, &now).await?;

        // Another task may have swapped in a whole new snapshot while the
        // items were loading. Patch whatever is current, never `data`.
        let mut current = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        if current.items_stale(&now) {
            *current = Arc::new(current.with_items(items, bucket));
        } else {
            debug!("item list already current ({})", current.items_bucket);
        }
        Ok(current.clone())
    }

    /// Handle one chat message. Messages that are not commands get an empty response.
    pub async fn handle_message(&self, ctx: &MessageContext, text: &str) -> Response {
        let Some(invocation) = self.parser.parse(text) else {
            return Response::empty();
        };
        let name = invocation.spec.name;

        if name == "testing" && !self.is_owner(ctx) {
            warn!(
                target: "security",
                "owner-only command refused for {}",
                command_line(&ctx.author, &ctx.channel, text)
            );
            return Response::empty();
        }

        let rule = Cooldown::for_command(name, &self.config.cooldown);
        let verdict = {
            let mut cooldowns = self.cooldowns.lock().unwrap_or_else(PoisonError::into_inner);
            let now = Instant::now();
            cooldowns.prune_expired(now);
            cooldowns.check(name, &ctx.channel, rule, now)
        };
        if let Err(retry_after) = verdict {
            metrics::inc_cooldown_rejections();
            debug!("cooldown hit: {}", command_line(&ctx.author, &ctx.channel, text));
            return Response::text(cooldown_message(retry_after));
        }

        metrics::record_command(name);
        info!("{}", command_line(&ctx.author, &ctx.channel, text));
        match self.dispatch(ctx, &invocation).await {
            Ok(resp) => resp,
            Err(e) => {
                metrics::inc_commands_failed();
                error!("command '{}' failed: {:#}", name, e);
                Response::text(COMMAND_FAILED)
            }
        }
    }

    fn usage(&self, invocation: &Invocation) -> Response {
        Response::text(self.parser.usage(&invocation.invoked_with, invocation.spec))
    }

    async fn dispatch(&self, ctx: &MessageContext, invocation: &Invocation) -> Result<Response> {
        match &invocation.command {
            BotCommand::Ping => Ok(Response::text("Pong!")),
            BotCommand::Prestige(None)
            | BotCommand::Recipe(None)
            | BotCommand::Price(None)
            | BotCommand::Stats { name: None, .. }
            | BotCommand::Research(None)
            | BotCommand::Collection(None)
            | BotCommand::Room(None)
            | BotCommand::List(None)
            | BotCommand::Best { slot: None, .. }
            | BotCommand::Best { enhancement: None, .. } => Ok(self.usage(invocation)),
            BotCommand::Prestige(Some(name)) => self.prestige(name).await,
            BotCommand::Recipe(Some(name)) => self.recipe(name).await,
            BotCommand::Price(Some(name)) => self.price(name).await,
            BotCommand::List(Some(kind)) => self.list(*kind).await,
            BotCommand::Stats {
                name: Some(name),
                items_only,
            } => self.stats(name, *items_only).await,
            BotCommand::Best {
                slot: Some(slot),
                enhancement: Some(enhancement),
            } => self.best(slot, enhancement).await,
            BotCommand::Research(Some(query)) => {
                let data = self.snapshot();
                let selected = research::filter(&data.research, query);
                Ok(match research::format_research(&selected) {
                    Some(lines) => Response::many(paginate_message(lines)),
                    None => Response::text(format!("No entries found for '{}'", query)),
                })
            }
            BotCommand::Collection(Some(query)) => {
                let data = self.snapshot();
                Ok(
                    match collection::format_collection(&data.collections, query, &data.characters) {
                        Some(lines) => Response::many(paginate_message(lines)),
                        None => Response::text(format!("No entries found for '{}'", query)),
                    },
                )
            }
            BotCommand::Room(Some(query)) => {
                let data = self.snapshot();
                let selected = room::filter(&data.rooms, query);
                Ok(match room::format_rooms(&selected) {
                    Some(lines) => Response::many(paginate_message(lines)),
                    None => Response::text(format!("No entries found for '{}'", query)),
                })
            }
            BotCommand::Market => {
                let listings = self.store.market().await?;
                Ok(match market::format_market(&listings) {
                    Some(lines) => Response::many(paginate_message(
                        std::iter::once("**Marketplace**".to_string()).chain(lines),
                    )),
                    None => Response::text("The marketplace is empty"),
                })
            }
            BotCommand::Time => Ok(Response::text(stardate_text(Utc::now()))),
            BotCommand::Welcome => Ok(Response::text(self.config.bot.welcome_message.clone())),
            BotCommand::Version => Ok(Response::text(format!(
                "Bot version is {}",
                env!("CARGO_PKG_VERSION")
            ))),
            BotCommand::Help(topic) => Ok(self.help(topic.as_deref())),
            BotCommand::Testing(action) => self.testing(ctx, action.as_ref()).await,
        }
    }

    async fn prestige(&self, name: &str) -> Result<Response> {
        let data = self.snapshot();
        let Some(character) = data.characters.resolve(name) else {
            return Ok(Response::text(format!("Could not find {}", name)));
        };
        let combos = self
            .store
            .prestige(PrestigeDirection::From, character.id)
            .await?;
        Ok(
            match format_prestige(PrestigeDirection::From, &character.name, &combos, &data.characters) {
                Some(blocks) => Response::many(blocks),
                None => Response::text(format!("No prestige combinations found for {}", character.name)),
            },
        )
    }

    async fn recipe(&self, name: &str) -> Result<Response> {
        let data = self.snapshot();
        if let Some(character) = data.characters.resolve(name) {
            let combos = self
                .store
                .prestige(PrestigeDirection::To, character.id)
                .await?;
            if let Some(blocks) =
                format_prestige(PrestigeDirection::To, &character.name, &combos, &data.characters)
            {
                return Ok(Response::many(blocks));
            }
        }

        let data = self.current_items().await?;
        if let Some(item) = data.items.resolve(name) {
            if let Some(lines) = data.items.recipe(item, RECIPE_LEVELS) {
                return Ok(Response::many(with_bux_note(
                    format!("**Recipe for {}**", item.name),
                    lines,
                )));
            }
        }
        Ok(Response::text(format!(
            "Could not find character or item named '{}'",
            name
        )))
    }

    async fn price(&self, name: &str) -> Result<Response> {
        if name.chars().count() < 2 {
            return Ok(Response::text(
                "Please enter at least two characters for item name",
            ));
        }
        let data = self.current_items().await?;
        let listing = data
            .items
            .resolve(name)
            .and_then(|_| data.items.listing(name, ItemView::Price));
        Ok(match listing {
            Some(lines) => Response::many(with_bux_note(
                format!("**Prices matching '{}'**", name),
                lines,
            )),
            None => Response::text(format!("Could not find item name '{}'", name)),
        })
    }

    async fn list(&self, kind: ListKind) -> Result<Response> {
        let data = match kind {
            ListKind::Items => self.current_items().await?,
            _ => self.snapshot(),
        };
        let (title, names): (&str, Vec<String>) = match kind {
            ListKind::Chars => (
                "**Characters**",
                data.characters.names().map(str::to_string).collect(),
            ),
            ListKind::NewChars => (
                "**Newest characters**",
                data.characters
                    .newest(NEWEST_CHARACTERS)
                    .into_iter()
                    .map(|c| c.name.clone())
                    .collect(),
            ),
            ListKind::Items => (
                "**Items**",
                data.items
                    .tradable_names()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            ),
            ListKind::Research => (
                "**Research**",
                data.research.iter().map(|r| r.name.clone()).collect(),
            ),
            ListKind::Rooms => (
                "**Rooms**",
                room::names(&data.rooms)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            ),
            ListKind::Collections => (
                "**Collections**",
                data.collections.iter().map(|c| c.name.clone()).collect(),
            ),
        };
        if names.is_empty() {
            return Ok(Response::text("Nothing to list"));
        }
        Ok(Response::many(paginate_message(
            std::iter::once(title.to_string()).chain(names),
        )))
    }

    async fn stats(&self, name: &str, items_only: bool) -> Result<Response> {
        let mut messages = Vec::new();
        if !items_only {
            if let Some(character) = self.snapshot().characters.resolve(name) {
                messages.push(format_stats(character));
            }
        }
        let data = self.current_items().await?;
        if let Some(lines) = data.items.listing(name, ItemView::Stats) {
            messages.extend(paginate_message(lines));
        }
        if messages.is_empty() {
            return Ok(Response::text(format!("Could not find {}", name)));
        }
        Ok(Response::many(messages))
    }

    async fn best(&self, slot: &str, enhancement: &str) -> Result<Response> {
        let data = self.current_items().await?;
        if let Some(lines) = data.items.best(slot, enhancement) {
            return Ok(Response::many(paginate_message(
                std::iter::once(format!("**Best {} items for {}**", slot, enhancement))
                    .chain(lines),
            )));
        }
        let (slots, enhancements) = data.items.best_catalog();
        Ok(Response::many(vec![
            format!(
                "No entries found for {} slot, {} enhancement",
                slot, enhancement
            ),
            format!(
                "Slots: {}\nEnhancements: {}",
                slots.join(", "),
                enhancements.join(", ")
            ),
        ]))
    }

    fn help(&self, topic: Option<&str>) -> Response {
        let prefix = self.parser.prefix();
        if let Some(topic) = topic {
            return match super::commands::find_spec(topic) {
                Some(spec) => Response::text(format!(
                    "{}\n{}",
                    self.parser.usage(spec.name, spec),
                    spec.brief
                )),
                None => Response::text(format!("No command called '{}' found.", topic)),
            };
        }
        let lines = std::iter::once(self.config.bot.description.clone()).chain(
            COMMANDS
                .iter()
                .filter(|c| !c.hidden)
                .map(|c| format!("{}{} - {}", prefix, c.name, c.brief)),
        );
        Response::many(paginate_message(lines))
    }

    async fn testing(
        &self,
        ctx: &MessageContext,
        action: Option<&TestingAction>,
    ) -> Result<Response> {
        match action {
            Some(TestingAction::Refresh) => {
                let fresh = self.refresh().await?;
                let mut messages = vec!["Refreshed".to_string()];
                if !fresh.is_empty() {
                    messages.extend(paginate_message(
                        std::iter::once("New characters:".to_string()).chain(fresh),
                    ));
                }
                Ok(Response::many(messages))
            }
            Some(TestingAction::Restart) => {
                info!("restart requested by {}", escape_log(&ctx.author));
                Ok(Response {
                    messages: vec!["Bot will restart".to_string()],
                    control: Some(Control::Restart),
                })
            }
            Some(TestingAction::Info) => {
                let data = self.snapshot();
                let lines = vec![
                    format!("Message Author: {}", ctx.author),
                    format!("This Channel: {}", ctx.channel),
                    format!("Bot version: {}", env!("CARGO_PKG_VERSION")),
                    format!("Data: {}", data.summary()),
                    format!("Loaded at: {}", data.loaded_at.format("%Y-%m-%d %H:%M:%S")),
                    format!("Counters: {}", metrics::snapshot().summary()),
                ];
                Ok(Response::text(lines.join("\n")))
            }
            Some(TestingAction::Say(text)) if text.is_empty() => Ok(Response::empty()),
            Some(TestingAction::Say(text)) => Ok(Response::text(text.clone())),
            None => Ok(Response::text("Testing actions: refresh, restart, info, say")),
        }
    }
}
