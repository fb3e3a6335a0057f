//! # Configuration
//!
//! cardvault configuration is a [`confique`] struct loaded in layers:
//!
//! 1. **Environment variables**: `CARDVAULT_MIRROR_FILE`, `CARDVAULT_EXPORT_PREFIX`,
//!    `CARDVAULT_LOG_LEVEL`.
//! 2. **Config file**: `<data dir>/cardvault.toml`, if present.
//! 3. **Compiled defaults**: `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `mirror_file` | `cards-backup.json` | File name of the backup mirror inside the data dir |
//! | `export_prefix` | `cards` | Prefix of the default export file name |
//! | `log_level` | `warn` | Log filter used by the CLI when `RUST_LOG` is unset |

use crate::error::{CardError, Result};
use crate::store::fs_backend::DEFAULT_MIRROR_FILE;
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "cardvault.toml";

/// Configuration for cardvault, stored in `cardvault.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CardVaultConfig {
    /// File name of the backup mirror snapshot.
    #[config(default = "cards-backup.json", env = "CARDVAULT_MIRROR_FILE")]
    pub mirror_file: String,

    /// Prefix of the default export file name (`<prefix>-YYYY-MM-DD.json`).
    #[config(default = "cards", env = "CARDVAULT_EXPORT_PREFIX")]
    pub export_prefix: String,

    /// Log filter directive, e.g. "warn" or "cardvaultapp=debug".
    #[config(default = "warn", env = "CARDVAULT_LOG_LEVEL")]
    pub log_level: String,
}

impl Default for CardVaultConfig {
    fn default() -> Self {
        Self {
            mirror_file: DEFAULT_MIRROR_FILE.to_string(),
            export_prefix: "cards".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

impl CardVaultConfig {
    pub fn file_path(data_dir: &Path) -> PathBuf {
        data_dir.join(CONFIG_FILE)
    }

    /// Loads environment overrides over `<data_dir>/cardvault.toml` over defaults.
    /// A missing config file is fine; a malformed one is an error.
    pub fn load(data_dir: &Path) -> Result<Self> {
        Self::builder()
            .env()
            .file(Self::file_path(data_dir))
            .load()
            .map_err(|e| CardError::Config(e.to_string()))
    }
}
