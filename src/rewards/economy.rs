//! Ranch economy: coins, experience and level

use serde::{Deserialize, Serialize};

use super::levels::{Level, PlayerStats};

/// A level up event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelUp {
    pub old_level: u32,
    pub new_level: u32,
    pub new_title: String,
}

/// Coins and experience owned by one learner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RanchEconomy {
    coins: u64,
    experience: u64,
    /// Stored for readers of the document; always re-derived from experience
    level: u32,
}

impl Default for RanchEconomy {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl RanchEconomy {
    pub fn new(coins: u64, experience: u64) -> Self {
        Self {
            coins,
            experience,
            level: Level::for_xp(experience),
        }
    }

    /// Re-derive the level after loading a persisted document
    pub fn normalized(self) -> Self {
        Self::new(self.coins, self.experience)
    }

    pub fn coins(&self) -> u64 {
        self.coins
    }

    pub fn experience(&self) -> u64 {
        self.experience
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn stats(&self) -> PlayerStats {
        PlayerStats::new(self.experience)
    }

    /// Add coins. Returns the new balance.
    pub fn earn_ranch_coin(&mut self, amount: u64) -> u64 {
        self.coins = self.coins.saturating_add(amount);
        self.coins
    }

    /// Spend coins if the balance covers `amount`; otherwise leave it untouched
    pub fn spend_ranch_coin(&mut self, amount: u64) -> bool {
        match self.coins.checked_sub(amount) {
            Some(rest) => {
                self.coins = rest;
                true
            }
            None => false,
        }
    }

    /// Add experience and re-derive the level from the new total
    pub fn add_experience(&mut self, amount: u64) -> Option<LevelUp> {
        let old_level = self.level;
        self.experience = self.experience.saturating_add(amount);
        self.level = Level::for_xp(self.experience);

        (self.level > old_level).then(|| LevelUp {
            old_level,
            new_level: self.level,
            new_title: Level::title(self.level).to_string(),
        })
    }
}
