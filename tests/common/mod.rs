//! Shared test utilities for learner flow and API tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use ranch_academy::catalog;
use ranch_academy::config::Config;
use ranch_academy::server::ApiState;
use ranch_academy::store::SqliteStore;

/// Passing submission for lesson 6, step 1
pub const RANCH_OWNER: &str = "use anchor_lang::prelude::*;

#[account]
pub struct Ranch {
    pub owner: Pubkey,
}
";

pub const RANCH_LEDGER: &str = "#[account]
pub struct Ranch {
    pub owner: Pubkey,
    pub coins: u64,
    pub experience: u64,
}
";

pub const BUILD_BARN: &str = "pub fn build_barn(ctx: Context<Build>, cost: u64) -> Result<()> {
    let ranch = &mut ctx.accounts.ranch;
    require!(ranch.coins >= cost, RanchError::TooPoor);
    ranch.coins -= cost;
    Ok(())
}
";

/// A temp dir holding a fresh academy database
pub fn temp_db() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("academy.db");
    (dir, path)
}

pub fn open_store(path: &Path) -> SqliteStore {
    SqliteStore::open(path).expect("Failed to open store")
}

/// API state over the built-in catalog and a SQLite store
pub fn api_state(path: &Path, config: Config) -> Arc<ApiState> {
    Arc::new(ApiState::new(
        Arc::new(catalog::builtin().clone()),
        Arc::new(open_store(path)),
        config,
    ))
}
