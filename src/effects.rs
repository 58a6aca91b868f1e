//! Transient presentation effects with auto-clear deadlines
//!
//! Each effect has at most one pending deadline. Triggering an effect that is
//! already active cancels its pending clear and schedules a new one.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::config::EffectSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    /// Shown while a submission is "sent to the network"
    NetworkPing,
    /// Coins flying into the wallet
    CoinBurst,
    LevelUp,
}

impl Effect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NetworkPing => "network_ping",
            Self::CoinBurst => "coin_burst",
            Self::LevelUp => "level_up",
        }
    }

    /// Map a step's effect tag to an effect, if it names one
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "network_ping" => Some(Self::NetworkPing),
            "coin_burst" => Some(Self::CoinBurst),
            "level_up" => Some(Self::LevelUp),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EffectTimers {
    settings: EffectSettings,
    deadlines: BTreeMap<Effect, Instant>,
}

impl Default for EffectTimers {
    fn default() -> Self {
        Self::new(EffectSettings::default())
    }
}

impl EffectTimers {
    pub fn new(settings: EffectSettings) -> Self {
        Self {
            settings,
            deadlines: BTreeMap::new(),
        }
    }

    pub fn duration(&self, effect: Effect) -> Duration {
        let ms = match effect {
            Effect::NetworkPing => self.settings.network_ping_ms,
            Effect::CoinBurst => self.settings.coin_burst_ms,
            Effect::LevelUp => self.settings.level_up_ms,
        };
        Duration::from_millis(ms)
    }

    /// Activate `effect`, replacing any pending clear. Returns the new deadline.
    pub fn trigger(&mut self, effect: Effect, now: Instant) -> Instant {
        let deadline = now + self.duration(effect);
        self.deadlines.insert(effect, deadline);
        deadline
    }

    /// Clear an effect before its deadline
    pub fn cancel(&mut self, effect: Effect) -> bool {
        self.deadlines.remove(&effect).is_some()
    }

    pub fn is_active(&self, effect: Effect, now: Instant) -> bool {
        self.deadlines.get(&effect).is_some_and(|d| now < *d)
    }

    /// Active effects, in a stable order
    pub fn active(&self, now: Instant) -> Vec<Effect> {
        self.deadlines
            .iter()
            .filter(|(_, d)| now < **d)
            .map(|(e, _)| *e)
            .collect()
    }

    /// Drop expired deadlines
    pub fn sweep(&mut self, now: Instant) {
        self.deadlines.retain(|_, d| now < *d);
    }
}
