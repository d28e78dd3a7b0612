//! Live marketplace listings.
use super::errors::PssResult;
use super::xml::{text, text_or_default, Attributes, FromAttributes};

#[derive(Debug, Clone, PartialEq)]
pub struct MarketMessage {
    pub user_name: String,
    pub message: String,
    /// `unit:cost`, e.g. `starbux:120`.
    pub activity_argument: String,
}

impl FromAttributes for MarketMessage {
    const ELEMENT: &'static str = "Message";

    fn from_attributes(a: &Attributes) -> PssResult<Self> {
        Ok(Self {
            user_name: text_or_default(a, "UserName"),
            message: text(a, Self::ELEMENT, "Message")?,
            activity_argument: text_or_default(a, "ActivityArgument"),
        })
    }
}

impl MarketMessage {
    pub fn line(&self) -> String {
        match self.activity_argument.split_once(':') {
            Some((unit, cost)) => {
                format!("{}: {} for {} {}", self.user_name, self.message, cost, unit)
            }
            None => format!("{}: {}", self.user_name, self.message),
        }
    }
}

/// One line per listing, `None` when the market is empty.
pub fn format_market(messages: &[MarketMessage]) -> Option<Vec<String>> {
    if messages.is_empty() {
        None
    } else {
        Some(messages.iter().map(MarketMessage::line).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pss::xml::decode_all;

    #[test]
    fn listing_lines() {
        let xml = r#"<MessageService><ListActiveMarketplaceMessages><Messages>
            <Message MessageId="1" UserName="Zed" Message="Gold Helmet" ActivityArgument="starbux:120"/>
            <Message MessageId="2" UserName="Amy" Message="Scrap" ActivityArgument=""/>
        </Messages></ListActiveMarketplaceMessages></MessageService>"#;
        let msgs: Vec<MarketMessage> = decode_all(xml).unwrap();
        let lines = format_market(&msgs).unwrap();
        assert_eq!(lines, vec!["Zed: Gold Helmet for 120 starbux", "Amy: Scrap"]);
        assert!(format_market(&[]).is_none());
    }
}
