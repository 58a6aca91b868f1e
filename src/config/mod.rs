//! Configuration loading and management

mod io;
mod settings;
mod token;

pub use io::LOCAL_CONFIG_PATH;
pub use settings::{EffectSettings, RewardSettings, ServerSettings, StorageSettings};
pub use token::generate_api_token;

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP API settings
    #[serde(default)]
    pub server: ServerSettings,

    /// Document store settings
    #[serde(default)]
    pub storage: StorageSettings,

    /// Reward amounts
    #[serde(default)]
    pub rewards: RewardSettings,

    /// Presentation effect durations
    #[serde(default)]
    pub effects: EffectSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 9000

            [rewards]
            step_coins = 15
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.rewards.step_coins, 15);
        assert_eq!(config.rewards.step_xp, 25);
        assert_eq!(config.rewards.lesson_xp_bonus, 50);
        assert_eq!(config.effects.network_ping_ms, 1500);
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.rewards, RewardSettings::default());
        assert!(config.server.auth_token.is_empty());
    }
}
