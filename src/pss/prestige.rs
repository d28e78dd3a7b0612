//! Prestige combinations: two crew in, one crew out.
use super::api::PrestigeDirection;
use super::character::CharacterTable;
use super::errors::PssResult;
use super::paginate::paginate_message;
use super::xml::{number, Attributes, FromAttributes};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prestige {
    pub first: u32,
    pub second: u32,
    pub result: u32,
}

impl FromAttributes for Prestige {
    const ELEMENT: &'static str = "Prestige";

    fn from_attributes(a: &Attributes) -> PssResult<Self> {
        Ok(Self {
            first: number(a, Self::ELEMENT, "CharacterDesignId1")?,
            second: number(a, Self::ELEMENT, "CharacterDesignId2")?,
            result: number(a, Self::ELEMENT, "ToCharacterDesignId")?,
        })
    }
}

/// Render prestige combinations for `subject` as message-sized blocks.
/// `None` when there are no combinations.
pub fn format_prestige(
    direction: PrestigeDirection,
    subject: &str,
    prestiges: &[Prestige],
    names: &CharacterTable,
) -> Option<Vec<String>> {
    if prestiges.is_empty() {
        return None;
    }
    let header = match direction {
        PrestigeDirection::To => format!("**{}** can be prestiged from:", subject),
        PrestigeDirection::From => format!("**{}**", subject),
    };
    let lines = prestiges.iter().map(|p| match direction {
        PrestigeDirection::To => format!(
            "{} + {}",
            names.name_or_id(p.first),
            names.name_or_id(p.second)
        ),
        PrestigeDirection::From => format!(
            "+ {} -> {}",
            names.name_or_id(p.second),
            names.name_or_id(p.result)
        ),
    });
    Some(paginate_message(std::iter::once(header).chain(lines)))
}
