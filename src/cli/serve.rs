//! Serve command implementation

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use ranch_academy::catalog;
use ranch_academy::config::Config;
use ranch_academy::server::{ApiServer, ApiState};
use ranch_academy::store::SqliteStore;

/// Run the lesson API until Ctrl-C
pub async fn serve_command(
    work_dir: &Path,
    config_path: Option<&Path>,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    let mut config = Config::resolve(config_path, work_dir)?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let db_path = config.db_path();
    let store = SqliteStore::open(&db_path)?;
    info!("[ranch:store] Using {}", db_path.display());

    let addr = config.bind_addr();
    let catalog = Arc::new(catalog::builtin().clone());
    let state = Arc::new(ApiState::new(catalog, Arc::new(store), config));
    let server = ApiServer::bind(&addr, state)?;

    let worker = server.clone();
    let mut serving = tokio::task::spawn_blocking(move || worker.serve());

    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            info!("[ranch:http] Shutting down");
            server.unblock();
            (&mut serving).await.context("Server task failed")?;
        }
        finished = &mut serving => {
            finished.context("Server task failed")?;
        }
    }

    Ok(())
}
