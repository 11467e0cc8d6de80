//! TOML configuration parsing and validation.
//!
//! ```toml
//! [catalog]
//! path = "data/mock_data.json"
//!
//! [history]
//! path = "data/search_history.json"
//! max_entries = 500      # optional
//! max_age_days = 90      # optional
//!
//! [pagination]
//! default_page_size = 20
//! max_page_size = 100
//!
//! [server]
//! bind = "127.0.0.1:5000"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use space_search_core::history::RetentionPolicy;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub history: HistoryConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    /// JSON feed the catalog is built from at startup.
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HistoryConfig {
    /// File the search history is persisted to.
    pub path: PathBuf,
    #[serde(default)]
    pub max_entries: Option<usize>,
    #[serde(default)]
    pub max_age_days: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PaginationConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

fn default_page_size() -> usize {
    20
}
fn default_max_page_size() -> usize {
    100
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

impl HistoryConfig {
    pub fn retention(&self) -> RetentionPolicy {
        RetentionPolicy {
            max_entries: self.max_entries,
            max_age: self
                .max_age_days
                .map(|days| Duration::from_secs(days * 24 * 60 * 60)),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    let pagination = &config.pagination;
    if pagination.max_page_size < 1 {
        anyhow::bail!("pagination.max_page_size must be >= 1");
    }
    if pagination.default_page_size < 1 || pagination.default_page_size > pagination.max_page_size
    {
        anyhow::bail!(
            "pagination.default_page_size must be in [1, {}]",
            pagination.max_page_size
        );
    }

    if config.history.max_entries == Some(0) {
        anyhow::bail!("history.max_entries must be >= 1 when set");
    }
    if config.history.max_age_days == Some(0) {
        anyhow::bail!("history.max_age_days must be >= 1 when set");
    }

    Ok(())
}
