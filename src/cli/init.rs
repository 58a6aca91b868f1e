//! Init command implementation

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use ranch_academy::config::{generate_api_token, Config, LOCAL_CONFIG_PATH};

/// Default configuration written by `ranch-academy init`.
/// `{auth_token}` is replaced with a freshly generated token.
pub const DEFAULT_CONFIG: &str = r#"# Ranch Academy Configuration
# ===========================
#
# Lookup order: --config <path>, then .ranch-academy/config.toml in the
# working directory, then ~/.ranch-academy/config.toml.

# ============================================================================
# SERVER - Lesson API (local HTTP server)
# ============================================================================
[server]
host = "127.0.0.1"
port = 8787
# Shared secret required on every request (sent as `X-Ranch-Token`).
# Set to "" to disable auth for local development.
auth_token = "{auth_token}"
# Requests with larger bodies are rejected with 413
max_body_bytes = 262144

# ============================================================================
# STORAGE - Learner progress, ranch economy and badges
# ============================================================================
[storage]
# Empty means ~/.ranch-academy/academy.db
db_path = ""

# ============================================================================
# REWARDS - Amounts granted by the reward dispatcher
# ============================================================================
#
# Steps may carry their own amounts; these are the defaults.
# A lesson's coin reward comes from the catalog.
[rewards]
step_coins = 10
step_xp = 25
lesson_xp_bonus = 50

# ============================================================================
# EFFECTS - How long presentation effects stay active, in milliseconds
# ============================================================================
[effects]
network_ping_ms = 1500
coin_burst_ms = 2000
level_up_ms = 4000
"#;

fn render_config(auth_token: &str) -> String {
    DEFAULT_CONFIG.replace("{auth_token}", auth_token)
}

/// Write a default config. Without an explicit path it goes to the working
/// directory when `local` is set, otherwise to ~/.ranch-academy/config.toml.
pub async fn init_command(
    work_dir: &Path,
    config_path: Option<PathBuf>,
    local: bool,
    force: bool,
) -> Result<()> {
    let config_path = config_path.unwrap_or_else(|| {
        if local {
            work_dir.join(LOCAL_CONFIG_PATH)
        } else {
            Config::global_config_path()
        }
    });

    if config_path.exists() && !force {
        bail!(
            "Configuration already exists: {}\nUse --force to overwrite.",
            config_path.display()
        );
    }

    if let Some(parent) = config_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let token = generate_api_token().context("Failed to generate an API token")?;
    std::fs::write(&config_path, render_config(&token))
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("Created: {}", config_path.display());
    println!("Clients must send the token from [server] auth_token as X-Ranch-Token.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_parses() {
        let config: Config = toml::from_str(&render_config("abc123")).unwrap();
        assert_eq!(config.server.auth_token, "abc123");
        assert_eq!(config.server.port, 8787);
        assert_eq!(config.rewards.step_coins, 10);
        assert_eq!(config.effects.level_up_ms, 4000);
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = tempdir().unwrap();
        init_command(dir.path(), None, true, false).await.unwrap();

        let written = Config::from_dir(dir.path()).unwrap();
        let first = written.server.auth_token;
        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));

        assert!(init_command(dir.path(), None, true, false).await.is_err());
        init_command(dir.path(), None, true, true).await.unwrap();

        let rewritten = Config::from_dir(dir.path()).unwrap();
        assert_ne!(rewritten.server.auth_token, first);
    }
}
