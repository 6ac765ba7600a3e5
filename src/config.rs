//! Drill configuration.
//!
//! Loaded from `~/.drill/config.toml`. Every key is optional; a missing
//! file means defaults.
//!
//! ```toml
//! confirmation-seconds = 5
//! database = "/var/lib/drill/drill.sqlite"
//! ```
//!
//! `DRILL_DATABASE` in the environment overrides `database`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use jiff::SignedDuration;
use serde::{Deserialize, Serialize};

use crate::storage::Storage;

const DATABASE_ENV: &str = "DRILL_DATABASE";

/// Drill configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// How long a save confirmation stays up before closing itself.
    pub confirmation_seconds: u32,

    /// Database location. Defaults to `~/.drill/drill.sqlite`.
    pub database: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            confirmation_seconds: 5,
            database: None,
        }
    }
}

impl Config {
    /// Load config from `~/.drill/config.toml`, then apply the environment.
    pub fn load() -> Result<Self, String> {
        let mut config = match Self::path() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        if let Some(db) = env::var_os(DATABASE_ENV).filter(|v| !v.is_empty()) {
            config.database = Some(PathBuf::from(db));
        }
        Ok(config)
    }

    /// Load config from a specific file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;

        let config: Self = toml::from_str(&contents)
            .map_err(|e| format!("invalid config at {}: {e}", path.display()))?;

        if config.confirmation_seconds == 0 {
            return Err(format!(
                "confirmation-seconds must be at least 1 in {}",
                path.display()
            ));
        }

        Ok(config)
    }

    /// The config file path: `~/.drill/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".drill").join("config.toml"))
    }

    pub fn confirmation_duration(&self) -> SignedDuration {
        SignedDuration::from_secs(i64::from(self.confirmation_seconds))
    }

    /// The database to open: the configured path, else the default location.
    pub fn database_path(&self) -> Option<PathBuf> {
        self.database.clone().or_else(Storage::default_path)
    }
}
