//! Fuzzy name resolution against the canonical design names.
//!
//! Both the query and every canonical name go through [NameResolver::normalize]
//! (lowercase, ASCII alphanumerics only, then the synonym table). Resolution
//! prefers an exact normalized match; failing that, the *last* canonical name
//! (in iteration order) whose normalized form contains the query wins.

/// Ordered plain-substring substitutions applied after stripping.
pub type Synonyms = &'static [(&'static str, &'static str)];

pub const ITEM_SYNONYMS: Synonyms = &[
    ("golden", "gold"),
    ("armour", "armor"),
    ("dmrmark2", "dmrmarkii"),
    ("dmrmk2", "dmrmarkii"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct NameResolver {
    synonyms: Synonyms,
}

impl NameResolver {
    pub const fn new(synonyms: Synonyms) -> Self {
        Self { synonyms }
    }

    /// Resolver for characters, research, rooms and collections.
    pub const fn plain() -> Self {
        Self { synonyms: &[] }
    }

    pub const fn items() -> Self {
        Self::new(ITEM_SYNONYMS)
    }

    pub fn normalize(&self, s: &str) -> String {
        let mut out: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        // A substitution can expose another match ("goldenenergy" -> "goldenergy"),
        // so repeat until nothing changes.
        loop {
            let next = self.substitute(&out);
            if next == out {
                return out;
            }
            out = next;
        }
    }

    fn substitute(&self, s: &str) -> String {
        self.synonyms
            .iter()
            .fold(s.to_string(), |acc, (from, to)| acc.replace(from, to))
    }

    /// Canonical name for `query`, or `None` when nothing matches.
    pub fn resolve<'a, I>(&self, query: &str, names: I) -> Option<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let wanted = self.normalize(query);
        if wanted.is_empty() {
            return None;
        }
        let mut last_partial = None;
        for name in names {
            let candidate = self.normalize(name);
            if candidate == wanted {
                return Some(name);
            }
            if candidate.contains(&wanted) {
                last_partial = Some(name);
            }
        }
        last_partial
    }

    /// Every canonical name containing `query`, in iteration order.
    pub fn matches<'a, I>(&self, query: &str, names: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let wanted = self.normalize(query);
        if wanted.is_empty() {
            return Vec::new();
        }
        names
            .into_iter()
            .filter(|name| self.normalize(name).contains(&wanted))
            .collect()
    }

    /// Records named by `query`: the single exact match if there is exactly
    /// one, otherwise every record whose name contains the query.
    pub fn select<'a, T>(&self, query: &str, items: &'a [T], name_of: impl Fn(&T) -> &str) -> Vec<&'a T> {
        let wanted = self.normalize(query);
        if wanted.is_empty() {
            return Vec::new();
        }
        let exact: Vec<&T> = items
            .iter()
            .filter(|item| self.normalize(name_of(*item)) == wanted)
            .collect();
        if exact.len() == 1 {
            return exact;
        }
        items
            .iter()
            .filter(|item| self.normalize(name_of(*item)).contains(&wanted))
            .collect()
    }
}
