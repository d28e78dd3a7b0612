//! Per-channel command cooldowns.
//!
//! Each (command, channel) pair owns a fixed window that opens on its first
//! use. Within the window at most `rate` invocations pass; the next one is
//! told how long until the window closes.
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::config::CooldownConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cooldown {
    pub rate: u32,
    pub per: Duration,
}

impl Cooldown {
    pub const fn new(rate: u32, per: Duration) -> Self {
        Self { rate, per }
    }

    /// Cooldown for `command`, falling back to the configured default.
    pub fn for_command(command: &str, default: &CooldownConfig) -> Self {
        match command {
            "welcome" => Cooldown::new(2, Duration::from_secs(600)),
            "version" => Cooldown::new(1, Duration::from_secs(30)),
            _ => Cooldown::new(default.rate, Duration::from_secs(default.per_seconds)),
        }
    }
}

#[derive(Debug)]
struct Window {
    opened: Instant,
    used: u32,
    per: Duration,
}

#[derive(Debug, Default)]
pub struct Cooldowns {
    windows: HashMap<(String, String), Window>,
}

impl Cooldowns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one use of `command` in `channel`. `Err` carries the remaining wait.
    pub fn check(
        &mut self,
        command: &str,
        channel: &str,
        cooldown: Cooldown,
        now: Instant,
    ) -> Result<(), Duration> {
        let window = self
            .windows
            .entry((command.to_string(), channel.to_string()))
            .or_insert(Window {
                opened: now,
                used: 0,
                per: cooldown.per,
            });
        let elapsed = now.saturating_duration_since(window.opened);
        if elapsed >= cooldown.per {
            window.opened = now;
            window.used = 0;
        }
        window.per = cooldown.per;
        if window.used >= cooldown.rate {
            return Err(cooldown.per.saturating_sub(now.saturating_duration_since(window.opened)));
        }
        window.used += 1;
        Ok(())
    }

    /// Drop windows that have fully elapsed.
    pub fn prune_expired(&mut self, now: Instant) {
        self.windows
            .retain(|_, w| now.saturating_duration_since(w.opened) < w.per);
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

/// `Error: You are on cooldown. Try again in 12.34s`
pub fn cooldown_message(retry_after: Duration) -> String {
    format!(
        "Error: You are on cooldown. Try again in {:.2}s",
        retry_after.as_secs_f64()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn third_use_passes_fourth_is_rejected() {
        let mut cd = Cooldowns::new();
        let rule = Cooldown::new(3, Duration::from_secs(30));
        let t0 = Instant::now();
        for _ in 0..3 {
            assert!(cd.check("price", "general", rule, t0).is_ok());
        }
        let wait = cd
            .check("price", "general", rule, t0 + Duration::from_secs(10))
            .unwrap_err();
        assert_eq!(wait, Duration::from_secs(20));
    }

    #[test]
    fn channels_and_commands_are_independent() {
        let mut cd = Cooldowns::new();
        let rule = Cooldown::new(1, Duration::from_secs(30));
        let t0 = Instant::now();
        assert!(cd.check("price", "a", rule, t0).is_ok());
        assert!(cd.check("price", "b", rule, t0).is_ok());
        assert!(cd.check("stats", "a", rule, t0).is_ok());
        assert!(cd.check("price", "a", rule, t0).is_err());
    }

    #[test]
    fn window_reopens_after_period() {
        let mut cd = Cooldowns::new();
        let rule = Cooldown::new(1, Duration::from_secs(30));
        let t0 = Instant::now();
        assert!(cd.check("version", "c", rule, t0).is_ok());
        assert!(cd.check("version", "c", rule, t0 + Duration::from_secs(29)).is_err());
        assert!(cd.check("version", "c", rule, t0 + Duration::from_secs(30)).is_ok());
    }

    #[test]
    fn prune_drops_elapsed_windows() {
        let mut cd = Cooldowns::new();
        let rule = Cooldown::new(3, Duration::from_secs(30));
        let t0 = Instant::now();
        cd.check("ping", "c", rule, t0).unwrap();
        cd.prune_expired(t0 + Duration::from_secs(5));
        assert_eq!(cd.len(), 1);
        cd.prune_expired(t0 + Duration::from_secs(31));
        assert!(cd.is_empty());
    }

    #[test]
    fn special_cooldowns() {
        let default = CooldownConfig::default();
        assert_eq!(Cooldown::for_command("welcome", &default).rate, 2);
        assert_eq!(Cooldown::for_command("version", &default).per, Duration::from_secs(30));
        assert_eq!(Cooldown::for_command("price", &default).rate, 3);
        assert_eq!(
            cooldown_message(Duration::from_millis(12_500)),
            "Error: You are on cooldown. Try again in 12.50s"
        );
    }
}
