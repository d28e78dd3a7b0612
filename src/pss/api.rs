//! Game API endpoints and the HTTP fetcher.
//!
//! The game publishes its design data through plain GET endpoints answering
//! nested XML. [ApiEndpoints] builds the URLs from the configured base URL and
//! language key; [Fetcher] abstracts the transport so the cache and the
//! command handlers can be exercised without a network.
use log::debug;
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

use super::errors::{PssError, PssResult};
use crate::config::ApiConfig;

/// Design lists that are downloaded whole and cached on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DesignKind {
    Characters,
    Items,
    Research,
    Rooms,
    Collections,
}

impl DesignKind {
    fn path(&self) -> &'static str {
        match self {
            DesignKind::Characters => "CharacterService/ListAllCharacterDesigns",
            DesignKind::Items => "ItemService/ListItemDesigns2",
            DesignKind::Research => "ResearchService/ListAllResearchDesigns2",
            DesignKind::Rooms => "RoomService/ListRoomDesigns2",
            DesignKind::Collections => "CollectionService/ListAllCollectionDesigns2",
        }
    }

    /// File stem used for the raw cache.
    pub fn stem(&self) -> &'static str {
        match self {
            DesignKind::Characters => "characters",
            DesignKind::Items => "items",
            DesignKind::Research => "research",
            DesignKind::Rooms => "rooms",
            DesignKind::Collections => "collections",
        }
    }
}

/// Which way a prestige lookup goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrestigeDirection {
    /// Combinations that produce the character.
    To,
    /// Combinations the character takes part in.
    From,
}

impl PrestigeDirection {
    fn path(&self) -> &'static str {
        match self {
            PrestigeDirection::To => "CharacterService/PrestigeCharacterTo",
            PrestigeDirection::From => "CharacterService/PrestigeCharacterFrom",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiEndpoints {
    base_url: String,
    language_key: String,
}

impl ApiEndpoints {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language_key: config.language_key.clone(),
        }
    }

    pub fn design_list(&self, kind: DesignKind) -> String {
        format!(
            "{}/{}?languageKey={}",
            self.base_url,
            kind.path(),
            urlencoding::encode(&self.language_key)
        )
    }

    pub fn prestige(&self, direction: PrestigeDirection, character_id: u32) -> String {
        format!(
            "{}/{}?characterDesignId={}",
            self.base_url,
            direction.path(),
            character_id
        )
    }

    pub fn marketplace(&self, access_token: &str) -> String {
        format!(
            "{}/MessageService/ListActiveMarketplaceMessages2?itemSubType=None&rarity=None&accessToken={}",
            self.base_url,
            urlencoding::encode(access_token)
        )
    }
}

/// Source of raw API payloads.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = PssResult<String>> + Send;
}

/// reqwest-backed fetcher with a per-request timeout.
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout_seconds: u64,
}

impl HttpFetcher {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout_seconds: config.timeout_seconds,
        }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = PssResult<String>> + Send {
        let request = self.client.get(url);
        let secs = self.timeout_seconds;
        let url = url.to_string();
        async move {
            debug!("Fetching {}", url);
            let response = timeout(Duration::from_secs(secs), request.send())
                .await
                .map_err(|_| PssError::Timeout(secs))?
                .map_err(|e| PssError::Http(e.to_string()))?;

            if !response.status().is_success() {
                return Err(PssError::Status {
                    status: response.status().as_u16(),
                    url,
                });
            }

            response
                .text()
                .await
                .map_err(|e| PssError::Http(format!("failed to read body: {}", e)))
        }
    }
}
