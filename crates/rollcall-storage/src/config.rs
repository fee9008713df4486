//! Tracker configuration and store factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use rollcall_core::model::ALL_COURSES;
use rollcall_core::statistics::{DEFAULT_GOOD_ATTENDANCE_PERCENT, DEFAULT_STREAK_THRESHOLD};
use rollcall_core::traits::Persistence;
use rollcall_core::StatisticsConfig;

use crate::file::JsonFileStore;
use crate::memory::MemoryStore;

/// Environment variable that overrides the configured data directory.
pub const DATA_DIR_ENV: &str = "ROLLCALL_DATA_DIR";

/// Where roster and attendance snapshots are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreConfig {
    /// One JSON file per key inside `data_dir`.
    File {
        #[serde(default = "default_data_dir")]
        data_dir: PathBuf,
    },
    /// Nothing survives the process.
    Memory,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::File {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./rollcall-data")
}

/// Top-level rollcall configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollcallConfig {
    /// Storage backend.
    #[serde(default)]
    pub store: StoreConfig,
    /// Consecutive absences that trigger a streak warning.
    #[serde(default = "default_streak_threshold")]
    pub streak_threshold: usize,
    /// Percentage at or above which a student is in good standing.
    #[serde(default = "default_good_attendance_percent")]
    pub good_attendance_percent: u32,
    /// Course used when a command is given no `--course`.
    #[serde(default = "default_course")]
    pub default_course: String,
}

fn default_streak_threshold() -> usize {
    DEFAULT_STREAK_THRESHOLD
}
fn default_good_attendance_percent() -> u32 {
    DEFAULT_GOOD_ATTENDANCE_PERCENT
}
fn default_course() -> String {
    ALL_COURSES.to_string()
}

impl Default for RollcallConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            streak_threshold: default_streak_threshold(),
            good_attendance_percent: default_good_attendance_percent(),
            default_course: default_course(),
        }
    }
}

impl RollcallConfig {
    /// Thresholds for the statistics engine.
    pub fn statistics(&self) -> StatisticsConfig {
        StatisticsConfig {
            streak_threshold: self.streak_threshold,
            good_attendance_percent: self.good_attendance_percent,
        }
    }

    /// Point the store at `data_dir`, switching to the file backend if needed.
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.store = StoreConfig::File {
            data_dir: data_dir.into(),
        };
        self
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not rescanned.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_store_config(config: &StoreConfig) -> StoreConfig {
    match config {
        StoreConfig::File { data_dir } => StoreConfig::File {
            data_dir: PathBuf::from(resolve_env_vars(&data_dir.to_string_lossy())),
        },
        StoreConfig::Memory => StoreConfig::Memory,
    }
}

fn apply_overrides(mut config: RollcallConfig, data_dir: Option<String>) -> RollcallConfig {
    if let Some(dir) = data_dir.filter(|d| !d.is_empty()) {
        config = config.with_data_dir(dir);
    }
    config.store = resolve_store_config(&config.store);
    config
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `rollcall.toml` in the current directory
/// 2. `~/.config/rollcall/config.toml`
///
/// `ROLLCALL_DATA_DIR` overrides the configured data directory.
pub fn load_config() -> Result<RollcallConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<RollcallConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("rollcall.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<RollcallConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => RollcallConfig::default(),
    };

    Ok(apply_overrides(config, std::env::var(DATA_DIR_ENV).ok()))
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("rollcall"))
}

/// Create a store instance from its configuration.
pub fn create_store(config: &StoreConfig) -> Result<Box<dyn Persistence>> {
    match config {
        StoreConfig::File { data_dir } => {
            let store = JsonFileStore::new(data_dir).with_context(|| {
                format!("failed to open data directory {}", data_dir.display())
            })?;
            Ok(Box::new(store))
        }
        StoreConfig::Memory => Ok(Box::new(MemoryStore::new())),
    }
}
