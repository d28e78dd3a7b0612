//! Test utilities & fixtures.
//! An in-memory fetcher serving canned API payloads, plus helpers to build a
//! bot over a temporary data directory.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pssbot::bot::{Bot, MessageContext};
use pssbot::config::Config;
use pssbot::pss::api::{ApiEndpoints, Fetcher};
use pssbot::pss::{DataStore, PssError, PssResult};

pub const CHARACTERS_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<ListAllCharacterDesignsResponse><CharacterDesigns>
<CharacterDesign CharacterDesignId="1" CharacterDesignName="Alien Queen" CharacterDesignDescription="Rules the hive" Rarity="Legendary" RaceType="Alien" GenderType="Female" SpecialAbilityType="DamageToCurrentEnemy" FinalHp="20" CollectionDesignId="5" EquipmentMask="3" />
<CharacterDesign CharacterDesignId="2" CharacterDesignName="Alien Officer" Rarity="Epic" CollectionDesignId="5" />
<CharacterDesign CharacterDesignId="3" CharacterDesignName="Zongzi Guard" Rarity="Unique" />
<CharacterDesign CharacterDesignId="4" CharacterDesignName="Engineer" Rarity="Common" />
</CharacterDesigns></ListAllCharacterDesignsResponse>"#;

pub const ITEMS_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<ListItemDesignsResponse><ItemDesigns>
<ItemDesign ItemDesignId="10" ItemDesignName="Gold Ore" ItemSubType="Mineral" MarketPrice="12" EnhancementType="None" />
<ItemDesign ItemDesignId="11" ItemDesignName="Gold Helmet" ItemSubType="EquipmentHead" MarketPrice="300" EnhancementType="Hp" EnhancementValue="5" Ingredients="10x2|12x1" />
<ItemDesign ItemDesignId="12" ItemDesignName="Scrap" MarketPrice="0" EnhancementType="None" />
<ItemDesign ItemDesignId="13" ItemDesignName="Gas" MarketPrice="1" EnhancementType="None" />
</ItemDesigns></ListItemDesignsResponse>"#;

pub const RESEARCH_XML: &str = r#"<ListAllResearchDesignsResponse><ResearchDesigns>
<ResearchDesign ResearchDesignId="1" ResearchName="Laser Level 1" ResearchDescription="Basic lasers" GasCost="1000" ResearchTime="3600" RequiredLabLevel="1" />
<ResearchDesign ResearchDesignId="2" ResearchName="Laser Level 2" ResearchDescription="Better lasers" GasCost="5000" ResearchTime="86400" RequiredLabLevel="2" />
</ResearchDesigns></ListAllResearchDesignsResponse>"#;

pub const ROOMS_XML: &str = r#"<ListRoomDesignsResponse><RoomDesigns>
<RoomDesign RoomDesignId="1" RoomName="Laser" RoomType="Laser" Level="1" Capacity="4" ConstructionTime="60" MinShipLevel="1" PriceString="mineral:1000" />
</RoomDesigns></ListRoomDesignsResponse>"#;

pub const COLLECTIONS_XML: &str = r#"<ListAllCollectionDesignsResponse><CollectionDesigns>
<CollectionDesign CollectionDesignId="5" CollectionName="Alien" CollectionDescription="Hive minds" MinCombo="2" MaxCombo="5" EnhancementType="Attack" BaseEnhancementValue="10" StepEnhancementValue="5" />
</CollectionDesigns></ListAllCollectionDesignsResponse>"#;

pub const PRESTIGE_XML: &str = r#"<PrestigeCharacterResponse><Prestiges>
<Prestige CharacterDesignId1="2" CharacterDesignId2="3" ToCharacterDesignId="1" />
</Prestiges></PrestigeCharacterResponse>"#;

pub const MARKET_XML: &str = r#"<ListActiveMarketplaceMessagesResponse><Messages>
<Message UserName="bob" Message="Gold Helmet x1" ActivityArgument="starbux:120" />
</Messages></ListActiveMarketplaceMessagesResponse>"#;

/// Serves the first route whose pattern occurs in the URL; 404 otherwise.
#[derive(Clone, Default)]
pub struct StaticFetcher {
    routes: Arc<Vec<(String, String)>>,
    calls: Arc<Mutex<Vec<String>>>,
    /// Next URL containing the pattern answers only after the delay.
    delay: Arc<Mutex<Option<(String, Duration)>>>,
}

#[allow(dead_code)]
impl StaticFetcher {
    pub fn new(routes: &[(&str, &str)]) -> Self {
        Self {
            routes: Arc::new(
                routes
                    .iter()
                    .map(|(p, b)| (p.to_string(), b.to_string()))
                    .collect(),
            ),
            calls: Arc::default(),
            delay: Arc::default(),
        }
    }

    /// Every endpoint the bot talks to.
    pub fn game() -> Self {
        Self::new(&game_routes())
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_matching(&self, pattern: &str) -> usize {
        self.calls().iter().filter(|u| u.contains(pattern)).count()
    }

    pub fn delay_next(&self, pattern: &str, delay: Duration) {
        *self.delay.lock().unwrap() = Some((pattern.to_string(), delay));
    }
}

impl Fetcher for StaticFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = PssResult<String>> + Send {
        self.calls.lock().unwrap().push(url.to_string());
        let pause = {
            let mut delay = self.delay.lock().unwrap();
            let hit = matches!(delay.as_ref(), Some((pattern, _)) if url.contains(pattern.as_str()));
            if hit {
                delay.take().map(|(_, d)| d)
            } else {
                None
            }
        };
        let body = self
            .routes
            .iter()
            .find(|(pattern, _)| url.contains(pattern.as_str()))
            .map(|(_, body)| body.clone());
        let url = url.to_string();
        async move {
            if let Some(pause) = pause {
                tokio::time::sleep(pause).await;
            }
            body.ok_or(PssError::Status { status: 404, url })
        }
    }
}

pub fn game_routes() -> Vec<(&'static str, &'static str)> {
    vec![
        ("ListAllCharacterDesigns", CHARACTERS_XML),
        ("ListItemDesigns2", ITEMS_XML),
        ("ListAllResearchDesigns2", RESEARCH_XML),
        ("ListRoomDesigns2", ROOMS_XML),
        ("ListAllCollectionDesigns2", COLLECTIONS_XML),
        ("PrestigeCharacterTo", PRESTIGE_XML),
        ("PrestigeCharacterFrom", PRESTIGE_XML),
        ("ListActiveMarketplaceMessages2", MARKET_XML),
    ]
}

#[allow(dead_code)]
pub fn test_config(data_dir: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.cache.data_dir = data_dir.to_string_lossy().into_owned();
    config.bot.owner = "boss".to_string();
    config.logging.file = None;
    config
}

#[allow(dead_code)]
pub fn store(fetcher: StaticFetcher, config: &Config) -> DataStore<StaticFetcher> {
    DataStore::new(
        fetcher,
        ApiEndpoints::new(&config.api),
        config.cache.data_dir.clone(),
    )
}

/// A started bot over a fresh temp dir. Keep the `TempDir` alive for the test.
#[allow(dead_code)]
pub async fn game_bot(fetcher: StaticFetcher) -> (Bot<StaticFetcher>, tempfile::TempDir) {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config = test_config(tmp.path());
    let store = store(fetcher, &config);
    let bot = Bot::start(config, store).await.expect("bot starts");
    (bot, tmp)
}

#[allow(dead_code)]
pub fn user(channel: &str) -> MessageContext {
    MessageContext::new("alice", channel)
}

#[allow(dead_code)]
pub fn owner(channel: &str) -> MessageContext {
    MessageContext::new("boss", channel)
}
