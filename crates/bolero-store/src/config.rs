//! Configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use bolero_core::engine::{default_report_start, PracticeConfig};
use bolero_core::quiz::DEFAULT_PRACTICE_BACKDATE_DAYS;

/// Environment variable that overrides `store_path`.
pub const STORE_ENV_VAR: &str = "BOLERO_STORE";

/// Largest accepted `practice_backdate_days`.
pub const MAX_BACKDATE_DAYS: i64 = 3650;

/// Top-level bolero configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoleroConfig {
    /// JSON document file holding the vocabulary.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    /// First day of the daily practice report.
    #[serde(default = "default_report_start")]
    pub report_start_date: NaiveDate,
    /// Rows in the last-failures table.
    #[serde(default = "default_last_failures_limit")]
    pub last_failures_limit: usize,
    /// Days quiz results are backdated by when logged.
    #[serde(default = "default_backdate_days")]
    pub practice_backdate_days: i64,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./bolero-words.json")
}
fn default_last_failures_limit() -> usize {
    10
}
fn default_backdate_days() -> i64 {
    DEFAULT_PRACTICE_BACKDATE_DAYS
}

impl Default for BoleroConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            report_start_date: default_report_start(),
            last_failures_limit: default_last_failures_limit(),
            practice_backdate_days: default_backdate_days(),
        }
    }
}

impl BoleroConfig {
    /// Engine settings derived from this configuration.
    pub fn practice(&self) -> PracticeConfig {
        PracticeConfig {
            backdate_days: self.practice_backdate_days,
            report_start: self.report_start_date,
            last_failures_limit: self.last_failures_limit,
        }
    }

    /// Render as TOML, as written by `bolero init`.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize config")
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `bolero.toml` in the current directory
/// 2. `~/.config/bolero/config.toml`
///
/// Environment variable override: `BOLERO_STORE`.
pub fn load_config() -> Result<BoleroConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<BoleroConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("bolero.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match &config_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<BoleroConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => BoleroConfig::default(),
    };

    // Apply env var override
    if let Ok(store) = std::env::var(STORE_ENV_VAR) {
        if !store.trim().is_empty() {
            config.store_path = PathBuf::from(store);
        }
    }

    let raw = config.store_path.to_string_lossy().into_owned();
    if raw.contains("${") {
        config.store_path = PathBuf::from(resolve_env_vars(&raw));
    }

    if config.last_failures_limit == 0 {
        anyhow::bail!("last_failures_limit must be at least 1");
    }
    if !(0..=MAX_BACKDATE_DAYS).contains(&config.practice_backdate_days) {
        anyhow::bail!(
            "practice_backdate_days must be between 0 and {MAX_BACKDATE_DAYS}, got {}",
            config.practice_backdate_days
        );
    }

    tracing::debug!(
        source = %config_path.as_deref().map_or("defaults".into(), |p| p.display().to_string()),
        store = %config.store_path.display(),
        "configuration loaded"
    );
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("bolero"))
}
