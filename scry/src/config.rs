//! Configuration for SCRY.
//!
//! SCRY_ROOT resolution order:
//! 1. Explicit path passed to Config::with_root()
//! 2. SCRY_ROOT environment variable
//! 3. XDG data directory
//! 4. Default: ~/.local/share/scry

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::store::SortOrder;
use crate::{Error, Result};

/// SCRY configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root directory for all SCRY data.
    pub scry_root: PathBuf,

    /// Rows returned by a search when no limit is given.
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Show tokens, emblems and other non-game cards in searches.
    #[serde(default)]
    pub include_extras: bool,

    /// Default result ordering.
    #[serde(default)]
    pub order_by: SortOrder,
}

fn default_limit() -> usize {
    50
}

impl Config {
    /// Create a new config with the given SCRY_ROOT.
    pub fn with_root(scry_root: impl Into<PathBuf>) -> Self {
        Self {
            scry_root: scry_root.into(),
            default_limit: default_limit(),
            include_extras: false,
            order_by: SortOrder::default(),
        }
    }

    /// Create a config using default SCRY_ROOT resolution.
    pub fn default_location() -> Result<Self> {
        let scry_root = resolve_scry_root()?;
        Ok(Self::with_root(scry_root))
    }

    /// Load config from SCRY_ROOT/config.toml, or create default.
    pub fn load() -> Result<Self> {
        let scry_root = resolve_scry_root()?;
        Self::load_from(&scry_root)
    }

    /// Load config from a specific SCRY_ROOT.
    pub fn load_from(scry_root: &Path) -> Result<Self> {
        let config_path = scry_root.join("config.toml");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let mut config: Config = toml::from_str(&contents)
                .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
            // The directory wins over whatever the file says
            config.scry_root = scry_root.to_path_buf();
            Ok(config)
        } else {
            Ok(Self::with_root(scry_root))
        }
    }

    /// Save config to SCRY_ROOT/config.toml.
    pub fn save(&self) -> Result<()> {
        let config_path = self.config_path();
        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(config_path, contents)?;
        Ok(())
    }

    /// Path to config.toml.
    pub fn config_path(&self) -> PathBuf {
        self.scry_root.join("config.toml")
    }

    /// Path to the DuckDB database file.
    pub fn db_path(&self) -> PathBuf {
        self.scry_root.join("db/cards.duckdb")
    }
}

/// Resolve SCRY_ROOT using the standard resolution order.
fn resolve_scry_root() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("SCRY_ROOT") {
        return Ok(PathBuf::from(path));
    }

    if let Some(proj_dirs) = ProjectDirs::from("", "", "scry") {
        return Ok(proj_dirs.data_dir().to_path_buf());
    }

    let home = std::env::var("HOME")
        .map_err(|_| Error::Config("Could not determine home directory".to_string()))?;
    Ok(PathBuf::from(home).join(".local/share/scry"))
}
