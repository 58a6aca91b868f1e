//! Settings configuration types

use serde::{Deserialize, Serialize};

/// HTTP API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Interface to bind. Default: 127.0.0.1
    #[serde(default = "default_host")]
    pub host: String,

    /// Port for the lesson API. Default: 8787
    #[serde(default = "default_port")]
    pub port: u16,

    /// Shared secret required on every request (sent as `X-Ranch-Token`)
    ///
    /// If empty, the server accepts unauthenticated requests.
    #[serde(default)]
    pub auth_token: String,

    /// Requests with larger bodies are rejected with 413
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

/// Document store settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite database path. Empty means `~/.ranch-academy/academy.db`.
    #[serde(default)]
    pub db_path: String,
}

/// Coin and experience amounts granted by the reward dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardSettings {
    /// Coins for a passed step without an explicit override
    #[serde(default = "default_step_coins")]
    pub step_coins: u64,

    /// Experience for a passed step without an explicit override
    #[serde(default = "default_step_xp")]
    pub step_xp: u64,

    /// Experience added on top of the lesson's coin reward at completion
    #[serde(default = "default_lesson_xp_bonus")]
    pub lesson_xp_bonus: u64,
}

/// Auto-clear durations for transient presentation effects, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectSettings {
    #[serde(default = "default_network_ping_ms")]
    pub network_ping_ms: u64,

    #[serde(default = "default_coin_burst_ms")]
    pub coin_burst_ms: u64,

    #[serde(default = "default_level_up_ms")]
    pub level_up_ms: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_max_body_bytes() -> usize {
    256 * 1024
}

fn default_step_coins() -> u64 {
    10
}

fn default_step_xp() -> u64 {
    25
}

fn default_lesson_xp_bonus() -> u64 {
    50
}

fn default_network_ping_ms() -> u64 {
    1500
}

fn default_coin_burst_ms() -> u64 {
    2000
}

fn default_level_up_ms() -> u64 {
    4000
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            auth_token: String::new(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for RewardSettings {
    fn default() -> Self {
        Self {
            step_coins: default_step_coins(),
            step_xp: default_step_xp(),
            lesson_xp_bonus: default_lesson_xp_bonus(),
        }
    }
}

impl Default for EffectSettings {
    fn default() -> Self {
        Self {
            network_ping_ms: default_network_ping_ms(),
            coin_burst_ms: default_coin_burst_ms(),
            level_up_ms: default_level_up_ms(),
        }
    }
}
