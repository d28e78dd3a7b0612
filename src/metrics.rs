//! Process-wide counters for command traffic and cache behaviour.
//! Read back through [snapshot] for the owner diagnostics command.
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};

static COMMANDS_HANDLED: AtomicU64 = AtomicU64::new(0);
static COMMANDS_FAILED: AtomicU64 = AtomicU64::new(0);
static COOLDOWN_REJECTIONS: AtomicU64 = AtomicU64::new(0);
static CACHE_HITS: AtomicU64 = AtomicU64::new(0);
static CACHE_FETCHES: AtomicU64 = AtomicU64::new(0);

static COMMAND_COUNTS: OnceLock<Mutex<BTreeMap<String, u64>>> = OnceLock::new();

fn command_counts() -> &'static Mutex<BTreeMap<String, u64>> {
    COMMAND_COUNTS.get_or_init(|| Mutex::new(BTreeMap::new()))
}

pub fn record_command(name: &str) {
    COMMANDS_HANDLED.fetch_add(1, Ordering::Relaxed);
    let mut guard = command_counts()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let count = guard.entry(name.to_string()).or_default();
    *count = count.saturating_add(1);
}

pub fn inc_commands_failed() {
    COMMANDS_FAILED.fetch_add(1, Ordering::Relaxed);
}

pub fn inc_cooldown_rejections() {
    COOLDOWN_REJECTIONS.fetch_add(1, Ordering::Relaxed);
}

pub fn inc_cache_hits() {
    CACHE_HITS.fetch_add(1, Ordering::Relaxed);
}

pub fn inc_cache_fetches() {
    CACHE_FETCHES.fetch_add(1, Ordering::Relaxed);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub commands_handled: u64,
    pub commands_failed: u64,
    pub cooldown_rejections: u64,
    pub cache_hits: u64,
    pub cache_fetches: u64,
    pub per_command: BTreeMap<String, u64>,
}

pub fn snapshot() -> Snapshot {
    let per_command = command_counts()
        .lock()
        .map(|g| g.clone())
        .unwrap_or_else(|poisoned| poisoned.into_inner().clone());
    Snapshot {
        commands_handled: COMMANDS_HANDLED.load(Ordering::Relaxed),
        commands_failed: COMMANDS_FAILED.load(Ordering::Relaxed),
        cooldown_rejections: COOLDOWN_REJECTIONS.load(Ordering::Relaxed),
        cache_hits: CACHE_HITS.load(Ordering::Relaxed),
        cache_fetches: CACHE_FETCHES.load(Ordering::Relaxed),
        per_command,
    }
}

impl Snapshot {
    /// One-line summary, e.g.
    /// `commands=3 failed=0 cooldown=1 cache hit/fetch=9/2 [ping=2 price=1]`.
    pub fn summary(&self) -> String {
        let per_command: Vec<String> = self
            .per_command
            .iter()
            .map(|(name, count)| format!("{}={}", name, count))
            .collect();
        format!(
            "commands={} failed={} cooldown={} cache hit/fetch={}/{} [{}]",
            self.commands_handled,
            self.commands_failed,
            self.cooldown_rejections,
            self.cache_hits,
            self.cache_fetches,
            per_command.join(" ")
        )
    }
}
