//! Room designs.
use super::errors::PssResult;
use super::research::format_duration;
use super::resolver::NameResolver;
use super::xml::{number, number_or_default, text, text_or_default, Attributes, FromAttributes};

#[derive(Debug, Clone, PartialEq)]
pub struct RoomDesign {
    pub id: u32,
    pub name: String,
    pub short_name: String,
    pub room_type: String,
    pub level: u32,
    pub capacity: i64,
    pub construction_time: u64,
    pub min_ship_level: u32,
    /// Raw `unit:amount` price, e.g. `mineral:12000`.
    pub price: String,
}

impl FromAttributes for RoomDesign {
    const ELEMENT: &'static str = "RoomDesign";

    fn from_attributes(a: &Attributes) -> PssResult<Self> {
        Ok(Self {
            id: number(a, Self::ELEMENT, "RoomDesignId")?,
            name: text(a, Self::ELEMENT, "RoomName")?,
            short_name: text_or_default(a, "RoomShortName"),
            room_type: text_or_default(a, "RoomType"),
            level: number_or_default(a, "Level")?,
            capacity: number_or_default(a, "Capacity")?,
            construction_time: number_or_default(a, "ConstructionTime")?,
            min_ship_level: number_or_default(a, "MinShipLevel")?,
            price: text_or_default(a, "PriceString"),
        })
    }
}

/// `mineral:12000` -> `12000 mineral`; anything else is shown as-is.
pub fn format_price(raw: &str) -> String {
    match raw.split_once(':') {
        Some((unit, amount)) if !unit.is_empty() => format!("{} {}", amount, unit),
        _ if raw.is_empty() => "free".to_string(),
        _ => raw.to_string(),
    }
}

pub fn filter<'a>(designs: &'a [RoomDesign], query: &str) -> Vec<&'a RoomDesign> {
    NameResolver::plain().select(query, designs, |d| d.name.as_str())
}

/// Distinct room names in design order.
pub fn names(designs: &[RoomDesign]) -> Vec<&str> {
    let mut seen = std::collections::HashSet::new();
    designs
        .iter()
        .map(|d| d.name.as_str())
        .filter(|name| seen.insert(*name))
        .collect()
}

pub fn format_rooms(selected: &[&RoomDesign]) -> Option<Vec<String>> {
    match selected {
        [] => None,
        [one] => {
            let title = if one.short_name.is_empty() {
                format!("**{}** (lvl {})", one.name, one.level)
            } else {
                format!("**{}** [{}] (lvl {})", one.name, one.short_name, one.level)
            };
            Some(vec![
                title,
                format!("Type: {}", one.room_type),
                format!("Capacity: {}", one.capacity),
                format!("Build time: {}", format_duration(one.construction_time)),
                format!("Cost: {}", format_price(&one.price)),
                format!("Min ship lvl: {}", one.min_ship_level),
            ])
        }
        many => Some(
            many.iter()
                .map(|r| {
                    format!(
                        "{} (lvl {}): t={}, cost={}",
                        r.name,
                        r.level,
                        format_duration(r.construction_time),
                        format_price(&r.price)
                    )
                })
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(id: u32, name: &str, level: u32) -> RoomDesign {
        RoomDesign {
            id,
            name: name.into(),
            short_name: String::new(),
            room_type: "Laser".into(),
            level,
            capacity: 10,
            construction_time: 3600,
            min_ship_level: level,
            price: "mineral:1000".into(),
        }
    }

    #[test]
    fn price_strings() {
        assert_eq!(format_price("mineral:1000"), "1000 mineral");
        assert_eq!(format_price(""), "free");
        assert_eq!(format_price("odd"), "odd");
    }

    #[test]
    fn single_room_card() {
        let rooms = vec![room(1, "Laser Lv1", 1), room(2, "Laser Lv2", 2)];
        let out = format_rooms(&filter(&rooms, "laser lv2")).unwrap();
        assert_eq!(out[0], "**Laser Lv2** (lvl 2)");
        assert_eq!(out[3], "Build time: 1:00:00");
        assert_eq!(out[4], "Cost: 1000 mineral");
    }

    #[test]
    fn summary_for_several() {
        let rooms = vec![room(1, "Laser Lv1", 1), room(2, "Laser Lv2", 2)];
        let out = format_rooms(&filter(&rooms, "laser")).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], "Laser Lv1 (lvl 1): t=1:00:00, cost=1000 mineral");
    }

    #[test]
    fn distinct_names() {
        let rooms = vec![room(1, "A", 1), room(2, "B", 1), room(3, "A", 2)];
        assert_eq!(names(&rooms), vec!["A", "B"]);
    }
}
