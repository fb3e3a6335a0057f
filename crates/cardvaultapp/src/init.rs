//! # Context Setup
//!
//! [`initialize`] wires a ready-to-use context for a UI client:
//!
//! 1. Resolve the data directory: explicit override, else the `CARDVAULT_DATA`
//!    environment variable, else the OS data directory (via `directories`).
//! 2. Load [`CardVaultConfig`] from the environment and `<data dir>/cardvault.toml`.
//! 3. Build a [`FileStore`] with the configured mirror file name.
//! 4. Start a fresh [`SessionContext`] and run reconciliation once.
//!
//! Steps 3 and 4 alone are [`initialize_with`], for callers that loaded the
//! config themselves.
//!
//! The data directory itself is created lazily on the first write.

use crate::api::CardApi;
use crate::config::CardVaultConfig;
use crate::error::{CardError, Result};
use crate::reconcile::ReconcileReport;
use crate::session::SessionContext;
use crate::store::fs::FileStore;
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::{debug, info};

pub const DATA_DIR_ENV: &str = "CARDVAULT_DATA";

pub struct CardVaultContext {
    pub api: CardApi<FileStore>,
    pub session: SessionContext,
    pub config: CardVaultConfig,
    pub data_dir: PathBuf,
    /// Outcome of the startup reconciliation.
    pub reconcile: ReconcileReport,
}

/// `--data` wins over `CARDVAULT_DATA`, which wins over the OS data directory.
pub fn resolve_data_dir(data_override: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = data_override {
        return Ok(path);
    }
    if let Some(path) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    ProjectDirs::from("com", "cardvault", "cardvault")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            CardError::StorageUnavailable("could not determine a data directory".to_string())
        })
}

pub fn initialize(data_override: Option<PathBuf>) -> Result<CardVaultContext> {
    let data_dir = resolve_data_dir(data_override)?;
    let config = CardVaultConfig::load(&data_dir)?;
    Ok(initialize_with(data_dir, config))
}

/// Builds the context from an already resolved directory and loaded config,
/// for clients that needed the config before the store (e.g. to set up logging).
pub fn initialize_with(data_dir: PathBuf, config: CardVaultConfig) -> CardVaultContext {
    debug!(data_dir = %data_dir.display(), ?config, "initializing");

    let store = FileStore::new(data_dir.clone()).with_mirror_file(&config.mirror_file);
    let mut api = CardApi::new(store);
    let mut session = SessionContext::new();
    let reconcile = api.initialize(&mut session);
    if reconcile.written() > 0 {
        info!(
            restored = reconcile.restored,
            migrated = reconcile.migrated,
            "recovered cards from backup mirror"
        );
    }

    CardVaultContext {
        api,
        session,
        config,
        data_dir,
        reconcile,
    }
}
