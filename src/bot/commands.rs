//! Chat command parsing.
//!
//! A command is `<prefix><name>` optionally followed by whitespace and a
//! free-text remainder, e.g. `/prestige alien queen`. Names are matched
//! case-insensitively against [COMMANDS] (including aliases); anything else,
//! prefixed or not, is ignored by the bot so ordinary conversation never
//! triggers a reply.
//!
//! Arguments stay `Option`al here: a missing argument is not a parse error but
//! a request for the usage line, which the handler renders.
use log::trace;

/// Static description of one command, shared by the parser and `help`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub brief: &'static str,
    /// Argument placeholder for usage lines, empty when the command takes none.
    pub usage: &'static str,
    pub hidden: bool,
}

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec { name: "ping", aliases: &[], brief: "Ping the server", usage: "", hidden: false },
    CommandSpec { name: "prestige", aliases: &[], brief: "Get prestige combos of crew", usage: "[character name]", hidden: false },
    CommandSpec { name: "recipe", aliases: &[], brief: "Get character/item recipes", usage: "[name]", hidden: false },
    CommandSpec { name: "price", aliases: &[], brief: "Get item prices from the PSS API", usage: "[item name]", hidden: false },
    CommandSpec { name: "list", aliases: &[], brief: "List items/characters", usage: "[chars|newchars|items|research|rooms|collections]", hidden: false },
    CommandSpec { name: "stats", aliases: &["item"], brief: "Get item/character stats", usage: "[name]", hidden: false },
    CommandSpec { name: "best", aliases: &[], brief: "Get best items for a slot", usage: "[slot] [enhancement]", hidden: false },
    CommandSpec { name: "research", aliases: &[], brief: "Get research data", usage: "[research]", hidden: false },
    CommandSpec { name: "collection", aliases: &[], brief: "Get collections", usage: "[collection]", hidden: false },
    CommandSpec { name: "room", aliases: &[], brief: "Get room data", usage: "[room]", hidden: false },
    CommandSpec { name: "market", aliases: &[], brief: "Get recent market postings", usage: "", hidden: false },
    CommandSpec { name: "time", aliases: &[], brief: "Get PSS stardate & UTC time", usage: "", hidden: false },
    CommandSpec { name: "help", aliases: &[], brief: "Show this message", usage: "[command]", hidden: false },
    CommandSpec { name: "welcome", aliases: &[], brief: "Show the welcome message", usage: "", hidden: true },
    CommandSpec { name: "version", aliases: &[], brief: "Gives the version number of the bot", usage: "", hidden: true },
    CommandSpec { name: "testing", aliases: &[], brief: "These are testing commands, usually for debugging purposes", usage: "[refresh|restart|info|say]", hidden: true },
];

pub fn find_spec(name: &str) -> Option<&'static CommandSpec> {
    let name = name.to_ascii_lowercase();
    COMMANDS
        .iter()
        .find(|c| c.name == name || c.aliases.contains(&name.as_str()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Chars,
    NewChars,
    Items,
    Research,
    Rooms,
    Collections,
}

impl ListKind {
    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "chars" => Some(ListKind::Chars),
            "newchars" => Some(ListKind::NewChars),
            "items" => Some(ListKind::Items),
            "research" => Some(ListKind::Research),
            "rooms" => Some(ListKind::Rooms),
            "collections" => Some(ListKind::Collections),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestingAction {
    Refresh,
    Restart,
    Info,
    Say(String),
}

impl TestingAction {
    fn parse(s: &str) -> Option<Self> {
        let (word, rest) = split_word(s);
        match word.to_ascii_lowercase().as_str() {
            "refresh" => Some(TestingAction::Refresh),
            "restart" => Some(TestingAction::Restart),
            "info" => Some(TestingAction::Info),
            "say" => Some(TestingAction::Say(rest.to_string())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    Ping,
    Prestige(Option<String>),
    Recipe(Option<String>),
    Price(Option<String>),
    List(Option<ListKind>),
    /// `item` alias restricts the lookup to items.
    Stats { name: Option<String>, items_only: bool },
    Best { slot: Option<String>, enhancement: Option<String> },
    Research(Option<String>),
    Collection(Option<String>),
    Room(Option<String>),
    Market,
    Time,
    Welcome,
    Version,
    Help(Option<String>),
    Testing(Option<TestingAction>),
}

/// A recognised command together with how it was typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub spec: &'static CommandSpec,
    /// Name as typed (lowercased), e.g. `item` for the `stats` alias.
    pub invoked_with: String,
    pub command: BotCommand,
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim();
    match s.find(char::is_whitespace) {
        Some(pos) => (&s[..pos], s[pos..].trim()),
        None => (s, ""),
    }
}

fn arg(rest: &str) -> Option<String> {
    if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct CommandParser {
    prefix: String,
}

impl CommandParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn parse(&self, raw: &str) -> Option<Invocation> {
        let body = raw.trim().strip_prefix(self.prefix.as_str())?;
        let (name, rest) = split_word(body);
        if name.is_empty() {
            return None;
        }
        let spec = find_spec(name)?;
        let invoked_with = name.to_ascii_lowercase();
        let command = match spec.name {
            "ping" => BotCommand::Ping,
            "prestige" => BotCommand::Prestige(arg(rest)),
            "recipe" => BotCommand::Recipe(arg(rest)),
            "price" => BotCommand::Price(arg(rest)),
            "list" => BotCommand::List(ListKind::parse(rest)),
            "stats" => BotCommand::Stats {
                name: arg(rest),
                items_only: invoked_with == "item",
            },
            "best" => {
                let (slot, rest) = split_word(rest);
                let (enhancement, _) = split_word(rest);
                BotCommand::Best {
                    slot: arg(slot),
                    enhancement: arg(enhancement),
                }
            }
            "research" => BotCommand::Research(arg(rest)),
            "collection" => BotCommand::Collection(arg(rest)),
            "room" => BotCommand::Room(arg(rest)),
            "market" => BotCommand::Market,
            "time" => BotCommand::Time,
            "welcome" => BotCommand::Welcome,
            "version" => BotCommand::Version,
            "help" => BotCommand::Help(arg(rest)),
            "testing" => BotCommand::Testing(TestingAction::parse(rest)),
            _ => return None,
        };
        trace!("Parsed {:?} from '{}'", command, raw);
        Some(Invocation {
            spec,
            invoked_with,
            command,
        })
    }

    /// `Enter: /prestige [character name]`
    pub fn usage(&self, invoked_with: &str, spec: &CommandSpec) -> String {
        if spec.usage.is_empty() {
            format!("Enter: {}{}", self.prefix, invoked_with)
        } else {
            format!("Enter: {}{} {}", self.prefix, invoked_with, spec.usage)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_command_round_trips_through_find_spec() {
        for spec in COMMANDS {
            assert_eq!(find_spec(spec.name).unwrap().name, spec.name);
        }
    }

    #[test]
    fn split_word_handles_extra_spaces() {
        assert_eq!(split_word("  say   hello there "), ("say", "hello there"));
        assert_eq!(split_word("info"), ("info", ""));
    }
}
