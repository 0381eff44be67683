//! Subcommand implementations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use chrono::{Local, NaiveDate, NaiveDateTime};

use bolero_core::engine::PracticeEngine;
use bolero_store::{load_config_from, BoleroConfig, JsonFileStore};

pub mod import;
pub mod init;
pub mod list;
pub mod quiz;
pub mod report;
pub mod stats;
pub mod validate;
pub mod word;

/// Loaded configuration plus an engine over the configured store.
pub struct Session {
    pub config: BoleroConfig,
    pub engine: PracticeEngine,
}

/// Load the config and open the word store. `--store` wins over the config.
pub fn open(config_path: Option<&Path>, store: Option<PathBuf>) -> Result<Session> {
    let mut config = load_config_from(config_path)?;
    if let Some(store) = store {
        config.store_path = store;
    }
    tracing::debug!(store = %config.store_path.display(), "opening word store");

    let repository = Arc::new(JsonFileStore::new(config.store_path.clone()));
    let engine = PracticeEngine::new(repository, config.practice());
    Ok(Session { config, engine })
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Format a ratio as a percentage with one decimal.
pub fn percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}
