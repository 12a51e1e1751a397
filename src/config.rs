//! Application configuration: where the database lives.
//!
//! ```toml
//! [db]
//! path = "db/db.sqlite"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Sentinel path SQLite treats as a private in-memory database.
pub const IN_MEMORY_PATH: &str = ":memory:";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub db: DbConfig,
}

/// Database configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DbConfig {
    /// Path to the SQLite database file
    pub path: String,
}

impl DbConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl Config {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).context("failed to parse configuration")
    }

    /// Load from a TOML file. A relative `db.path` is resolved against the
    /// directory containing the file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut config = Self::from_toml_str(&source)
            .with_context(|| format!("invalid config file {}", path.display()))?;

        if config.db.path != IN_MEMORY_PATH && Path::new(&config.db.path).is_relative() {
            if let Some(dir) = path.parent() {
                let resolved = dir.join(&config.db.path);
                config.db.path = resolved.to_string_lossy().into_owned();
            }
        }
        Ok(config)
    }
}
