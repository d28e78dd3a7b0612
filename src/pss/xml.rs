//! Flattening of the game API's nested XML design lists.
//!
//! Every design endpoint answers with the same shape: a couple of wrapper
//! containers around a repeated element whose attributes carry all the data,
//! e.g. `<ItemService><ListItemDesigns><ItemDesigns><ItemDesign .../>`. Only
//! the repeated element matters, so the walker ignores nesting and collects
//! the attribute set of every element with the requested tag.
//!
//! [flatten] keys those attribute sets by one attribute. Duplicate keys are
//! not an error: the later element replaces the earlier one's attributes but
//! the key keeps its original position in [RecordTable::iter] order.
use log::warn;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::str::FromStr;

use super::errors::{PssError, PssResult};

/// Attribute name -> value for a single design element.
pub type Attributes = HashMap<String, String>;

/// Attribute sets keyed by one attribute, iterable in document order.
#[derive(Debug, Clone, Default)]
pub struct RecordTable {
    order: Vec<String>,
    rows: HashMap<String, Attributes>,
}

impl RecordTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace. A replaced key keeps its first position.
    pub fn insert(&mut self, key: String, attrs: Attributes) {
        if !self.rows.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.rows.insert(key, attrs);
    }

    pub fn get(&self, key: &str) -> Option<&Attributes> {
        self.rows.get(key)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Attributes)> {
        self.order
            .iter()
            .filter_map(move |k| self.rows.get(k).map(|v| (k.as_str(), v)))
    }
}

fn collect_attributes(start: &BytesStart<'_>) -> PssResult<Attributes> {
    let mut attrs = Attributes::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| PssError::Xml(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| PssError::Xml(e.to_string()))?
            .into_owned();
        attrs.insert(key, value);
    }
    Ok(attrs)
}

/// Attribute sets of every `element` in document order.
pub fn records(xml: &str, element: &str) -> PssResult<Vec<Attributes>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut out = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.name().as_ref() == element.as_bytes() {
                    out.push(collect_attributes(&e)?);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(PssError::Xml(format!(
                    "at byte {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
        }
    }
    Ok(out)
}

/// Key every `element` by its `key_attr` value. Later duplicates win.
pub fn flatten(xml: &str, element: &str, key_attr: &str) -> PssResult<RecordTable> {
    let mut table = RecordTable::new();
    for attrs in records(xml, element)? {
        match attrs.get(key_attr) {
            Some(key) => table.insert(key.clone(), attrs.clone()),
            None => warn!("skipping {} without {}", element, key_attr),
        }
    }
    Ok(table)
}

/// Typed decoding of one design element.
pub trait FromAttributes: Sized {
    /// Tag of the repeated element carrying this record.
    const ELEMENT: &'static str;

    fn from_attributes(attrs: &Attributes) -> PssResult<Self>;
}

/// Decode every `T::ELEMENT` in document order.
pub fn decode_all<T: FromAttributes>(xml: &str) -> PssResult<Vec<T>> {
    records(xml, T::ELEMENT)?
        .iter()
        .map(T::from_attributes)
        .collect()
}

/// Decode one `T` per distinct `key_attr` value, in [flatten] order.
pub fn decode_keyed<T: FromAttributes>(xml: &str, key_attr: &str) -> PssResult<Vec<T>> {
    flatten(xml, T::ELEMENT, key_attr)?
        .iter()
        .map(|(_, attrs)| T::from_attributes(attrs))
        .collect()
}

pub(crate) fn text(
    attrs: &Attributes,
    element: &'static str,
    attribute: &'static str,
) -> PssResult<String> {
    attrs
        .get(attribute)
        .cloned()
        .ok_or(PssError::MissingAttribute { element, attribute })
}

pub(crate) fn text_or_default(attrs: &Attributes, attribute: &str) -> String {
    attrs.get(attribute).cloned().unwrap_or_default()
}

pub(crate) fn number<T: FromStr>(
    attrs: &Attributes,
    element: &'static str,
    attribute: &'static str,
) -> PssResult<T> {
    let raw = text(attrs, element, attribute)?;
    parse_number(&raw, attribute)
}

/// Missing or empty attributes read as `T::default()`.
pub(crate) fn number_or_default<T: FromStr + Default>(
    attrs: &Attributes,
    attribute: &'static str,
) -> PssResult<T> {
    match attrs.get(attribute) {
        Some(raw) if !raw.trim().is_empty() => parse_number(raw, attribute),
        _ => Ok(T::default()),
    }
}

fn parse_number<T: FromStr>(raw: &str, attribute: &'static str) -> PssResult<T> {
    raw.trim().parse::<T>().map_err(|_| PssError::InvalidNumber {
        attribute,
        value: raw.to_string(),
    })
}
