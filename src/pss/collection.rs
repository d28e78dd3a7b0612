//! Crew collections and their members.
use super::character::CharacterTable;
use super::errors::PssResult;
use super::resolver::NameResolver;
use super::xml::{number, number_or_default, text, text_or_default, Attributes, FromAttributes};

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionDesign {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub min_combo: u32,
    pub max_combo: u32,
    pub enhancement_type: String,
    pub base_enhancement: f64,
    pub step_enhancement: f64,
}

impl FromAttributes for CollectionDesign {
    const ELEMENT: &'static str = "CollectionDesign";

    fn from_attributes(a: &Attributes) -> PssResult<Self> {
        Ok(Self {
            id: number(a, Self::ELEMENT, "CollectionDesignId")?,
            name: text(a, Self::ELEMENT, "CollectionName")?,
            description: text_or_default(a, "CollectionDescription"),
            min_combo: number_or_default(a, "MinCombo")?,
            max_combo: number_or_default(a, "MaxCombo")?,
            enhancement_type: text_or_default(a, "EnhancementType"),
            base_enhancement: number_or_default(a, "BaseEnhancementValue")?,
            step_enhancement: number_or_default(a, "StepEnhancementValue")?,
        })
    }
}

pub fn resolve<'a>(designs: &'a [CollectionDesign], query: &str) -> Option<&'a CollectionDesign> {
    let name = NameResolver::plain().resolve(query, designs.iter().map(|c| c.name.as_str()))?;
    designs.iter().find(|c| c.name == name)
}

/// Collection card with its member crew. `None` for an unknown collection.
pub fn format_collection(
    designs: &[CollectionDesign],
    query: &str,
    characters: &CharacterTable,
) -> Option<Vec<String>> {
    let c = resolve(designs, query)?;
    let members: Vec<&str> = characters
        .in_collection(c.id)
        .iter()
        .map(|d| d.name.as_str())
        .collect();
    let members = if members.is_empty() {
        "none".to_string()
    } else {
        members.join(", ")
    };
    Some(vec![
        format!("**{}**", c.name),
        c.description.clone(),
        format!("Combo: {}-{}", c.min_combo, c.max_combo),
        format!(
            "Enhancement: {} {} (+{} per extra crew)",
            c.enhancement_type, c.base_enhancement, c.step_enhancement
        ),
        format!("Members: {}", members),
    ])
}
