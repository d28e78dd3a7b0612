//! Character (crew) designs: decoding, id/name lookup and the stats card.
use std::collections::HashMap;

use super::errors::PssResult;
use super::resolver::NameResolver;
use super::xml::{number, number_or_default, text, text_or_default, Attributes, FromAttributes};

/// Display names for special ability identifiers.
const SPECIALS: &[(&str, &str)] = &[
    ("AddReload", "Rush Command"),
    ("DamageToCurrentEnemy", "Critical Strike"),
    ("DamageToRoom", "Ultra Dismantle"),
    ("DamageToSameRoomCharacters", "Poison Gas"),
    ("DeductReload", "System Hack"),
    ("FireWalk", "Fire Walk"),
    ("Freeze", "Freeze"),
    ("HealRoomHp", "Urgent Repair"),
    ("HealSameRoomCharacters", "Healing Rain"),
    ("HealSelfHp", "First Aid"),
    ("SetFire", "Arson"),
];

/// Attribute that names a design; designs are keyed by it.
pub const NAME_ATTRIBUTE: &str = "CharacterDesignName";

/// Equipment slot bits in `EquipmentMask`.
const EQUIPMENT_SLOTS: &[(u32, &str)] = &[
    (1, "head"),
    (2, "body"),
    (4, "leg"),
    (8, "weapon"),
    (16, "accessory"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct CharacterDesign {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub rarity: String,
    pub race: String,
    pub gender: String,
    pub special_ability: String,
    pub ability: String,
    pub hp: String,
    pub attack: String,
    pub repair: String,
    pub pilot: String,
    pub shield: String,
    pub weapon: String,
    pub engine: String,
    pub walking_speed: String,
    pub run_speed: String,
    pub fire_resistance: String,
    pub training_capacity: String,
    pub equipment_mask: u32,
    pub collection_id: u32,
}

impl FromAttributes for CharacterDesign {
    const ELEMENT: &'static str = "CharacterDesign";

    fn from_attributes(a: &Attributes) -> PssResult<Self> {
        Ok(Self {
            id: number(a, Self::ELEMENT, "CharacterDesignId")?,
            name: text(a, Self::ELEMENT, NAME_ATTRIBUTE)?,
            description: text_or_default(a, "CharacterDesignDescription"),
            rarity: text_or_default(a, "Rarity"),
            race: text_or_default(a, "RaceType"),
            gender: text_or_default(a, "GenderType"),
            special_ability: text_or_default(a, "SpecialAbilityType"),
            ability: text_or_default(a, "SpecialAbilityFinalArgument"),
            hp: text_or_default(a, "FinalHp"),
            attack: text_or_default(a, "FinalAttack"),
            repair: text_or_default(a, "FinalRepair"),
            pilot: text_or_default(a, "FinalPilot"),
            shield: text_or_default(a, "FinalShield"),
            weapon: text_or_default(a, "FinalWeapon"),
            engine: text_or_default(a, "FinalEngine"),
            walking_speed: text_or_default(a, "WalkingSpeed"),
            run_speed: text_or_default(a, "RunSpeed"),
            fire_resistance: text_or_default(a, "FireResistance"),
            training_capacity: text_or_default(a, "TrainingCapacity"),
            equipment_mask: number_or_default(a, "EquipmentMask")?,
            collection_id: number_or_default(a, "CollectionDesignId")?,
        })
    }
}

pub fn special_name(kind: &str) -> &str {
    SPECIALS
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, v)| *v)
        .unwrap_or(kind)
}

/// Comma-separated slots from an equipment bitmask, `nil` when empty.
pub fn equipment_slots(mask: u32) -> String {
    let slots: Vec<&str> = EQUIPMENT_SLOTS
        .iter()
        .filter(|(bit, _)| mask & bit != 0)
        .map(|(_, name)| *name)
        .collect();
    if slots.is_empty() {
        "nil".to_string()
    } else {
        slots.join(", ")
    }
}

/// Stats card for one character.
pub fn format_stats(c: &CharacterDesign) -> String {
    let mut lines = vec![
        format!("**{}** ({})", c.name, c.rarity),
        c.description.clone(),
        format!("Race: {}, Gender: {}", c.race, c.gender),
    ];
    lines.push(format!("ability = {}", c.ability));
    lines.push(format!("hp = {}", c.hp));
    lines.push(format!("attack = {}", c.attack));
    lines.push(format!("repair = {}", c.repair));
    lines.push(format!("pilot = {}", c.pilot));
    lines.push(format!("shield = {}", c.shield));
    lines.push(format!("weapon = {}", c.weapon));
    lines.push(format!("engine = {}", c.engine));
    lines.push(format!("walk/run speed = {}/{}", c.walking_speed, c.run_speed));
    lines.push(format!("fire resist = {}", c.fire_resistance));
    lines.push(format!("training capacity = {}", c.training_capacity));
    lines.push(format!("special = {}", special_name(&c.special_ability)));
    lines.push(format!("equipment = {}", equipment_slots(c.equipment_mask)));
    lines.join("\n")
}

/// All character designs with id and name indexes.
///
/// Expects names to be unique already, as [decode_keyed] yields them.
///
/// [decode_keyed]: super::xml::decode_keyed
#[derive(Debug, Clone, Default)]
pub struct CharacterTable {
    designs: Vec<CharacterDesign>,
    by_id: HashMap<u32, usize>,
    by_name: HashMap<String, usize>,
}

impl CharacterTable {
    pub fn from_designs(designs: Vec<CharacterDesign>) -> Self {
        let by_id = designs.iter().enumerate().map(|(i, d)| (d.id, i)).collect();
        let by_name = designs
            .iter()
            .enumerate()
            .map(|(i, d)| (d.name.clone(), i))
            .collect();
        Self {
            designs,
            by_id,
            by_name,
        }
    }

    pub fn len(&self) -> usize {
        self.designs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.designs.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.designs.iter().map(|d| d.name.as_str())
    }

    pub fn by_id(&self, id: u32) -> Option<&CharacterDesign> {
        self.by_id.get(&id).map(|&i| &self.designs[i])
    }

    pub fn by_name(&self, name: &str) -> Option<&CharacterDesign> {
        self.by_name.get(name).map(|&i| &self.designs[i])
    }

    /// Display name for an id, `#id` if unknown.
    pub fn name_or_id(&self, id: u32) -> String {
        self.by_id(id)
            .map(|d| d.name.clone())
            .unwrap_or_else(|| format!("#{}", id))
    }

    pub fn resolve(&self, query: &str) -> Option<&CharacterDesign> {
        NameResolver::plain()
            .resolve(query, self.names())
            .and_then(|name| self.by_name(name))
    }

    /// The `count` most recently added designs (highest ids first).
    pub fn newest(&self, count: usize) -> Vec<&CharacterDesign> {
        let mut all: Vec<&CharacterDesign> = self.designs.iter().collect();
        all.sort_by(|a, b| b.id.cmp(&a.id));
        all.truncate(count);
        all
    }

    pub fn max_id(&self) -> Option<u32> {
        self.designs.iter().map(|d| d.id).max()
    }

    /// Designs added after `last_seen_id`, lowest id first.
    pub fn added_since(&self, last_seen_id: u32) -> Vec<&CharacterDesign> {
        let mut fresh: Vec<&CharacterDesign> = self
            .designs
            .iter()
            .filter(|d| d.id > last_seen_id)
            .collect();
        fresh.sort_by_key(|d| d.id);
        fresh
    }

    pub fn in_collection(&self, collection_id: u32) -> Vec<&CharacterDesign> {
        self.designs
            .iter()
            .filter(|d| d.collection_id == collection_id)
            .collect()
    }

    /// Plain-text `id,name` table, one design per line.
    pub fn render_name_table(&self) -> String {
        let mut out = String::new();
        for d in &self.designs {
            out.push_str(&format!("{},{}\n", d.id, d.name));
        }
        out
    }
}

/// Parse a table written by [CharacterTable::render_name_table]. Lines that
/// do not start with a numeric id are skipped; names may contain commas.
pub fn parse_name_table(raw: &str) -> Vec<(u32, String)> {
    raw.lines()
        .filter_map(|line| {
            let (id, name) = line.split_once(',')?;
            Some((id.trim().parse().ok()?, name.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pss::xml::decode_keyed;

    fn design(id: u32, name: &str) -> CharacterDesign {
        let mut a = Attributes::new();
        a.insert("CharacterDesignId".into(), id.to_string());
        a.insert("CharacterDesignName".into(), name.into());
        CharacterDesign::from_attributes(&a).unwrap()
    }

    #[test]
    fn equipment_mask_names() {
        assert_eq!(equipment_slots(0), "nil");
        assert_eq!(equipment_slots(1 | 8), "head, weapon");
        assert_eq!(equipment_slots(31), "head, body, leg, weapon, accessory");
    }

    #[test]
    fn specials_fall_back_to_raw_name() {
        assert_eq!(special_name("SetFire"), "Arson");
        assert_eq!(special_name("Mystery"), "Mystery");
    }

    #[test]
    fn duplicate_names_keep_later_design() {
        let xml = r#"<CharacterDesigns>
            <CharacterDesign CharacterDesignId="1" CharacterDesignName="Alpha" />
            <CharacterDesign CharacterDesignId="2" CharacterDesignName="Beta" />
            <CharacterDesign CharacterDesignId="3" CharacterDesignName="Alpha" />
        </CharacterDesigns>"#;
        let designs = decode_keyed::<CharacterDesign>(xml, NAME_ATTRIBUTE).unwrap();
        let table = CharacterTable::from_designs(designs);
        assert_eq!(table.len(), 2);
        assert_eq!(table.by_name("Alpha").unwrap().id, 3);
        assert!(table.by_id(1).is_none());
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["Alpha", "Beta"]);
    }

    #[test]
    fn name_table_round_trips_commas() {
        let table = CharacterTable::from_designs(vec![design(5, "Bob, the Brave")]);
        let parsed = parse_name_table(&table.render_name_table());
        assert_eq!(parsed, vec![(5, "Bob, the Brave".to_string())]);
    }

    #[test]
    fn newest_and_added_since() {
        let table = CharacterTable::from_designs(vec![
            design(10, "Old"),
            design(30, "Newest"),
            design(20, "Newer"),
        ]);
        let newest: Vec<_> = table.newest(2).iter().map(|d| d.name.as_str()).collect();
        assert_eq!(newest, vec!["Newest", "Newer"]);
        let added: Vec<_> = table.added_since(10).iter().map(|d| d.id).collect();
        assert_eq!(added, vec![20, 30]);
    }
}
