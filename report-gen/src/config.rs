//! Connection settings, resolved once at startup and passed explicitly to
//! the data source.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

const CONFIG_DIR: &str = "report-gen";
const CONFIG_FILE: &str = "config.toml";

/// Settings for the report database connection.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionSettings {
    /// sqlx connection string, e.g. `sqlite://reports.db`.
    pub database_url: String,
}

#[derive(Debug, Deserialize)]
struct Config {
    connection: ConnectionSettings,
}

impl ConnectionSettings {
    /// Resolve settings: `DATABASE_URL` wins, then the given config file,
    /// then the default file under the user config directory.
    pub fn resolve(config_path: Option<&Path>) -> Result<Self> {
        if let Ok(database_url) = env::var("DATABASE_URL") {
            return Ok(Self { database_url });
        }
        let path = match config_path {
            Some(path) => path.to_path_buf(),
            None => default_config_path()
                .context("DATABASE_URL is not set and no user config directory exists")?,
        };
        Self::load_file(&path)
    }

    fn load_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Config = toml::from_str(&text)
            .with_context(|| format!("Failed to parse config in {}", path.display()))?;
        Ok(config.connection)
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}
