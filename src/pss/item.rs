//! Item designs: price and stat listings, best-in-slot search and recipes.
//!
//! Listings only cover items a player can actually trade. Resources (`Gas`,
//! `Mineral`) and items that stand in for a missile, craft or crew design are
//! dropped before any view is rendered.
use std::collections::HashMap;

use super::errors::PssResult;
use super::resolver::NameResolver;
use super::xml::{number, number_or_default, text, text_or_default, Attributes, FromAttributes};

pub const NAME_ATTRIBUTE: &str = "ItemDesignName";

#[derive(Debug, Clone, PartialEq)]
pub struct ItemDesign {
    pub id: u32,
    pub name: String,
    pub sub_type: String,
    pub rarity: String,
    pub market_price: i64,
    pub enhancement_type: String,
    pub enhancement_value: f64,
    pub missile_design_id: u32,
    pub craft_design_id: u32,
    pub character_design_id: u32,
    pub ingredients: String,
}

impl FromAttributes for ItemDesign {
    const ELEMENT: &'static str = "ItemDesign";

    fn from_attributes(a: &Attributes) -> PssResult<Self> {
        Ok(Self {
            id: number(a, Self::ELEMENT, "ItemDesignId")?,
            name: text(a, Self::ELEMENT, NAME_ATTRIBUTE)?,
            sub_type: text_or_default(a, "ItemSubType"),
            rarity: text_or_default(a, "Rarity"),
            market_price: number_or_default(a, "MarketPrice")?,
            enhancement_type: match a.get("EnhancementType") {
                Some(t) if !t.is_empty() => t.clone(),
                _ => "None".to_string(),
            },
            enhancement_value: number_or_default(a, "EnhancementValue")?,
            missile_design_id: number_or_default(a, "MissileDesignId")?,
            craft_design_id: number_or_default(a, "CraftDesignId")?,
            character_design_id: number_or_default(a, "CharacterDesignId")?,
            ingredients: text_or_default(a, "Ingredients"),
        })
    }
}

impl ItemDesign {
    pub fn is_tradable(&self) -> bool {
        self.name != "Gas"
            && self.name != "Mineral"
            && self.missile_design_id == 0
            && self.craft_design_id == 0
            && self.character_design_id == 0
    }

    pub fn has_enhancement(&self) -> bool {
        self.enhancement_type != "None"
    }

    pub fn is_equipment(&self) -> bool {
        self.sub_type.contains("Equipment")
    }

    /// Equipment slot, e.g. `EquipmentHead` -> `Head`.
    pub fn slot(&self) -> String {
        self.sub_type.replace("Equipment", "")
    }

    pub fn price_text(&self) -> String {
        if self.market_price == 0 {
            "NA".to_string()
        } else {
            self.market_price.to_string()
        }
    }

    /// `(item id, quantity)` pairs from `Ingredients`, e.g. `12x2|40x1`.
    pub fn ingredient_list(&self) -> Vec<(u32, u32)> {
        self.ingredients
            .split('|')
            .filter_map(|part| {
                let part = part.trim();
                if part.is_empty() {
                    return None;
                }
                match part.split_once('x') {
                    Some((id, qty)) => Some((id.trim().parse().ok()?, qty.trim().parse().ok()?)),
                    None => Some((part.parse().ok()?, 1)),
                }
            })
            .collect()
    }
}

/// What an item listing shows per line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemView {
    /// `Name: price`
    Price,
    /// `Name: Enhancement +value (Slot)`; items without an enhancement are skipped.
    Stats,
}

impl ItemView {
    fn line(&self, item: &ItemDesign) -> Option<String> {
        match self {
            ItemView::Price => Some(format!("{}: {}", item.name, item.price_text())),
            ItemView::Stats if !item.has_enhancement() => None,
            ItemView::Stats => Some(format!(
                "{}: {} +{} ({})",
                item.name,
                item.enhancement_type,
                item.enhancement_value,
                item.slot()
            )),
        }
    }
}

/// Item designs with id and name indexes. Names must already be unique.
#[derive(Debug, Clone, Default)]
pub struct ItemTable {
    items: Vec<ItemDesign>,
    by_id: HashMap<u32, usize>,
    by_name: HashMap<String, usize>,
}

impl ItemTable {
    pub fn from_designs(items: Vec<ItemDesign>) -> Self {
        let mut by_id = HashMap::with_capacity(items.len());
        let mut by_name = HashMap::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            by_id.insert(item.id, idx);
            by_name.insert(item.name.clone(), idx);
        }
        Self {
            items,
            by_id,
            by_name,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|i| i.name.as_str())
    }

    pub fn by_id(&self, id: u32) -> Option<&ItemDesign> {
        self.by_id.get(&id).map(|&i| &self.items[i])
    }

    pub fn by_name(&self, name: &str) -> Option<&ItemDesign> {
        self.by_name.get(name).map(|&i| &self.items[i])
    }

    pub fn resolve(&self, query: &str) -> Option<&ItemDesign> {
        NameResolver::items()
            .resolve(query, self.names())
            .and_then(|name| self.by_name(name))
    }

    pub fn tradable_names(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter(|i| i.is_tradable())
            .map(|i| i.name.as_str())
            .collect()
    }

    /// Listing lines for every tradable item whose name contains `query`.
    /// `None` when no line survives the filters.
    pub fn listing(&self, query: &str, view: ItemView) -> Option<Vec<String>> {
        let lines: Vec<String> = NameResolver::items()
            .matches(query, self.names())
            .into_iter()
            .filter_map(|name| self.by_name(name))
            .filter(|item| item.is_tradable())
            .filter_map(|item| view.line(item))
            .collect();
        if lines.is_empty() {
            None
        } else {
            Some(lines)
        }
    }

    fn equipment(&self) -> impl Iterator<Item = &ItemDesign> {
        self.items
            .iter()
            .filter(|i| i.has_enhancement() && i.is_equipment())
    }

    /// Equipment for `slot` with `enhancement`, strongest first.
    pub fn best(&self, slot: &str, enhancement: &str) -> Option<Vec<String>> {
        let slot = slot.to_lowercase();
        let enhancement = enhancement.to_lowercase();
        let mut hits: Vec<&ItemDesign> = self
            .equipment()
            .filter(|i| i.slot().to_lowercase() == slot)
            .filter(|i| i.enhancement_type.to_lowercase() == enhancement)
            .collect();
        if hits.is_empty() {
            return None;
        }
        hits.sort_by(|a, b| {
            b.enhancement_value
                .partial_cmp(&a.enhancement_value)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Some(
            hits.iter()
                .map(|i| format!("{}: {}", i.name, i.enhancement_value))
                .collect(),
        )
    }

    /// Known equipment slots and enhancement types, most common first.
    pub fn best_catalog(&self) -> (Vec<String>, Vec<String>) {
        let slots = by_frequency(self.equipment().map(|i| i.slot().to_lowercase()));
        let enhancements =
            by_frequency(self.equipment().map(|i| i.enhancement_type.to_lowercase()));
        (slots, enhancements)
    }

    /// Ingredient tree of `item`, `levels` deep. `None` if it has no recipe.
    pub fn recipe(&self, item: &ItemDesign, levels: usize) -> Option<Vec<String>> {
        let mut lines = Vec::new();
        self.expand_recipe(item, 1, levels, &mut lines);
        if lines.is_empty() {
            None
        } else {
            Some(lines)
        }
    }

    fn expand_recipe(&self, item: &ItemDesign, depth: usize, levels: usize, out: &mut Vec<String>) {
        if depth > levels {
            return;
        }
        for (id, qty) in item.ingredient_list() {
            let indent = "  ".repeat(depth - 1);
            match self.by_id(id) {
                Some(part) => {
                    out.push(format!(
                        "{}{} x {} ({} bux)",
                        indent,
                        qty,
                        part.name,
                        part.price_text()
                    ));
                    self.expand_recipe(part, depth + 1, levels, out);
                }
                None => out.push(format!("{}{} x #{}", indent, qty, id)),
            }
        }
    }
}

fn by_frequency(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for v in values {
        *counts.entry(v).or_default() += 1;
    }
    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.into_iter().map(|(v, _)| v).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u32, name: &str, extra: &[(&str, &str)]) -> ItemDesign {
        let mut a = Attributes::new();
        a.insert("ItemDesignId".into(), id.to_string());
        a.insert("ItemDesignName".into(), name.into());
        for (k, v) in extra {
            a.insert(k.to_string(), v.to_string());
        }
        ItemDesign::from_attributes(&a).unwrap()
    }

    fn table() -> ItemTable {
        ItemTable::from_designs(vec![
            item(1, "Gas", &[("MarketPrice", "5")]),
            item(2, "Gold Helmet", &[
                ("MarketPrice", "300"),
                ("ItemSubType", "EquipmentHead"),
                ("EnhancementType", "Attack"),
                ("EnhancementValue", "10"),
                ("Ingredients", "3x2|4x1"),
            ]),
            item(3, "Gold Bar", &[("MarketPrice", "0"), ("EnhancementType", "None")]),
            item(4, "Gold Dust", &[("MarketPrice", "12")]),
            item(5, "Gold Crew Token", &[("CharacterDesignId", "77")]),
            item(6, "Iron Helmet", &[
                ("ItemSubType", "EquipmentHead"),
                ("EnhancementType", "Attack"),
                ("EnhancementValue", "4.5"),
            ]),
        ])
    }

    #[test]
    fn price_listing_marks_unpriced_and_skips_untradable() {
        let lines = table().listing("gold", ItemView::Price).unwrap();
        assert_eq!(lines, vec!["Gold Helmet: 300", "Gold Bar: NA", "Gold Dust: 12"]);
    }

    #[test]
    fn stats_listing_requires_enhancement() {
        let lines = table().listing("golden", ItemView::Stats).unwrap();
        assert_eq!(lines, vec!["Gold Helmet: Attack +10 (Head)"]);
        assert!(table().listing("gold bar", ItemView::Stats).is_none());
    }

    #[test]
    fn best_sorts_descending() {
        let lines = table().best("HEAD", "attack").unwrap();
        assert_eq!(lines, vec!["Gold Helmet: 10", "Iron Helmet: 4.5"]);
        assert!(table().best("leg", "attack").is_none());
        let (slots, enh) = table().best_catalog();
        assert_eq!(slots, vec!["head"]);
        assert_eq!(enh, vec!["attack"]);
    }

    #[test]
    fn recipe_expands_ingredients() {
        let t = table();
        let helmet = t.by_name("Gold Helmet").unwrap();
        let lines = t.recipe(helmet, 5).unwrap();
        assert_eq!(lines, vec!["2 x Gold Bar (NA bux)", "1 x Gold Dust (12 bux)"]);
        assert!(t.recipe(t.by_name("Gold Dust").unwrap(), 5).is_none());
    }

    #[test]
    fn self_referencing_recipe_stops_at_level_cap() {
        let t = ItemTable::from_designs(vec![item(9, "Loop", &[("Ingredients", "9x1")])]);
        let lines = t.recipe(t.by_name("Loop").unwrap(), 3).unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "    1 x Loop (NA bux)");
    }
}
