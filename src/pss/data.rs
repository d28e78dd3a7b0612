//! Game-data snapshots and the store that builds them.
//!
//! A [GameData] is immutable once built. Refreshing never edits one in place:
//! [DataStore::load] produces a whole new snapshot which the caller swaps in.
use chrono::{DateTime, Local};
use log::{debug, info};
use std::path::PathBuf;
use tokio::fs;

use super::api::{ApiEndpoints, DesignKind, Fetcher, PrestigeDirection};
use super::cache::{write_atomic, CachePolicy, RawCache};
use super::character::{self, parse_name_table, CharacterDesign, CharacterTable};
use super::collection::CollectionDesign;
use super::errors::PssResult;
use super::item::{self, ItemDesign, ItemTable};
use super::market::MarketMessage;
use super::prestige::Prestige;
use super::research::ResearchDesign;
use super::room::RoomDesign;
use super::xml::{decode_all, decode_keyed};

pub const NAME_TABLE_FILE: &str = "characters.txt";
pub const LAST_CHARACTER_FILE: &str = "last-character-id.txt";

#[derive(Debug, Clone)]
pub struct GameData {
    pub characters: CharacterTable,
    pub items: ItemTable,
    /// Half-day bucket the item list was loaded for.
    pub items_bucket: String,
    pub research: Vec<ResearchDesign>,
    pub rooms: Vec<RoomDesign>,
    pub collections: Vec<CollectionDesign>,
    pub loaded_at: DateTime<Local>,
}

impl GameData {
    /// Whether the item list belongs to an older half-day bucket than `now`.
    pub fn items_stale(&self, now: &DateTime<Local>) -> bool {
        self.items_bucket != RawCache::bucket_label(now)
    }

    /// Copy of this snapshot with a different item list.
    pub fn with_items(&self, items: ItemTable, bucket: String) -> GameData {
        GameData {
            items,
            items_bucket: bucket,
            ..self.clone()
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} characters, {} items ({}), {} research, {} rooms, {} collections",
            self.characters.len(),
            self.items.len(),
            self.items_bucket,
            self.research.len(),
            self.rooms.len(),
            self.collections.len()
        )
    }
}

pub struct DataStore<F: Fetcher> {
    fetcher: F,
    api: ApiEndpoints,
    cache: RawCache,
}

impl<F: Fetcher> DataStore<F> {
    pub fn new(fetcher: F, api: ApiEndpoints, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            api,
            cache: RawCache::new(data_dir),
        }
    }

    pub fn cache(&self) -> &RawCache {
        &self.cache
    }

    async fn raw(&self, kind: DesignKind, refresh: bool, now: &DateTime<Local>) -> PssResult<String> {
        let url = self.api.design_list(kind);
        self.cache
            .load_at(
                &self.fetcher,
                kind.stem(),
                &url,
                CachePolicy::for_kind(kind),
                refresh,
                now,
            )
            .await
    }

    /// Character designs; the `id,name` table file is rewritten each time.
    pub async fn load_characters(&self, refresh: bool) -> PssResult<CharacterTable> {
        let raw = self.raw(DesignKind::Characters, refresh, &Local::now()).await?;
        let designs = decode_keyed::<CharacterDesign>(&raw, character::NAME_ATTRIBUTE)?;
        let table = CharacterTable::from_designs(designs);
        write_atomic(&self.cache.dir().join(NAME_TABLE_FILE), table.render_name_table()).await?;
        Ok(table)
    }

    /// Item designs for the half-day bucket containing `now`.
    pub async fn load_items_at(
        &self,
        refresh: bool,
        now: &DateTime<Local>,
    ) -> PssResult<(ItemTable, String)> {
        let raw = self.raw(DesignKind::Items, refresh, now).await?;
        let table = ItemTable::from_designs(decode_keyed::<ItemDesign>(&raw, item::NAME_ATTRIBUTE)?);
        Ok((table, RawCache::bucket_label(now)))
    }

    /// Build a complete snapshot, downloading everything when `refresh` is set.
    pub async fn load(&self, refresh: bool) -> PssResult<GameData> {
        let now = Local::now();
        let characters = self.load_characters(refresh).await?;
        let (items, items_bucket) = self.load_items_at(refresh, &now).await?;
        let research = decode_all(&self.raw(DesignKind::Research, refresh, &now).await?)?;
        let rooms = decode_all(&self.raw(DesignKind::Rooms, refresh, &now).await?)?;
        let collections = decode_all(&self.raw(DesignKind::Collections, refresh, &now).await?)?;
        let data = GameData {
            characters,
            items,
            items_bucket,
            research,
            rooms,
            collections,
            loaded_at: now,
        };
        info!("loaded game data: {}", data.summary());
        Ok(data)
    }

    /// Prestige combinations, always fetched live.
    pub async fn prestige(
        &self,
        direction: PrestigeDirection,
        character_id: u32,
    ) -> PssResult<Vec<Prestige>> {
        let raw = self
            .fetcher
            .fetch(&self.api.prestige(direction, character_id))
            .await?;
        decode_all(&raw)
    }

    /// Current marketplace listings, fetched with a fresh access token.
    pub async fn market(&self) -> PssResult<Vec<MarketMessage>> {
        let token = uuid::Uuid::new_v4().to_string();
        let raw = self.fetcher.fetch(&self.api.marketplace(&token)).await?;
        decode_all(&raw)
    }

    /// Characters added since the last recorded id; updates the marker.
    /// The first run only records the marker and reports nothing.
    pub async fn detect_new_characters(&self, table: &CharacterTable) -> PssResult<Vec<String>> {
        let marker = self.cache.dir().join(LAST_CHARACTER_FILE);
        let Some(max_id) = table.max_id() else {
            return Ok(Vec::new());
        };
        let last_seen = match fs::read_to_string(&marker).await {
            Ok(raw) => raw.trim().parse::<u32>().ok(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };
        let fresh: Vec<String> = match last_seen {
            Some(last) => table
                .added_since(last)
                .into_iter()
                .map(|d| d.name.clone())
                .collect(),
            None => Vec::new(),
        };
        if last_seen.map_or(true, |last| max_id > last) {
            write_atomic(&marker, max_id.to_string()).await?;
            debug!("last character id marker now {}", max_id);
        }
        Ok(fresh)
    }

    /// The persisted `id,name` table, if one has been written.
    pub async fn read_name_table(&self) -> PssResult<Option<Vec<(u32, String)>>> {
        match fs::read_to_string(self.cache.dir().join(NAME_TABLE_FILE)).await {
            Ok(raw) => Ok(Some(parse_name_table(&raw))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
