//! # Configuration Management Module
//!
//! Snoo-Clues is configured from a TOML file (default `config.toml`). Every section has
//! defaults, so a missing section falls back to [`Config::default`] values.
//!
//! ## Configuration Structure
//!
//! - [`GameConfig`] - display name, default post, puzzle selection and scoring
//! - [`StorageConfig`] - where the sled database lives
//! - [`LeaderboardConfig`] - default leaderboard length
//! - [`LoggingConfig`] - log level and optional log file
//!
//! ## Configuration File Format
//!
//! ```toml
//! [game]
//! name = "Snoo-Clues"
//! default_post = "t3_snooclues"
//! points_per_win = 10
//! max_attempts = 6
//!
//! [game.selection]
//! policy = "rotation"
//! epoch = "2026-02-01"
//!
//! [storage]
//! data_dir = "./data"
//!
//! [logging]
//! level = "info"
//! file = "snooclues.log"
//! ```
//!
//! Dates must be quoted strings (`"2026-02-01"`), not TOML date literals.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use snooclues::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     println!("Playing {} with {} points per win", config.game.name, config.game.points_per_win);
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::game::GameSettings;
use crate::puzzle::{Catalog, SelectionPolicy};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub leaderboard: LeaderboardConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub name: String,
    /// Post id used when the CLI is not given `--post`.
    pub default_post: String,
    /// Leaderboard points per solved day.
    #[serde(default = "default_points_per_win")]
    pub points_per_win: u64,
    /// Daily guess limit; unlimited when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,
    /// JSON catalog replacing the built-in puzzles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<String>,
    #[serde(default)]
    pub selection: SelectionPolicy,
}

fn default_points_per_win() -> u64 {
    10
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            name: "Snoo-Clues".to_string(),
            default_post: "t3_snooclues".to_string(),
            points_per_win: default_points_per_win(),
            max_attempts: None,
            catalog_path: None,
            selection: SelectionPolicy::Calendar,
        }
    }
}

impl GameConfig {
    pub fn settings(&self) -> GameSettings {
        GameSettings {
            selection: self.selection.clone(),
            points_per_win: self.points_per_win,
            max_attempts: self.max_attempts,
        }
    }

    /// The configured catalog, or the built-in one when no path is set.
    pub fn load_catalog(&self) -> Result<Catalog> {
        let catalog = match &self.catalog_path {
            Some(path) => Catalog::load_from_json(path)?,
            None => Catalog::builtin()?,
        };
        Ok(catalog)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
    /// Sled database directory name under `data_dir`.
    #[serde(default = "default_db_name")]
    pub db_name: String,
}

fn default_db_name() -> String {
    "snooclues.db".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
            db_name: default_db_name(),
        }
    }
}

impl StorageConfig {
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.db_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardConfig {
    /// Rows shown when `--top` is not given.
    pub default_top: usize,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self { default_top: 10 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Parsed level; unknown strings fall back to `info`.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        config.validate()?;
        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    /// Reject values the game cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.game.name.trim().is_empty() {
            bail!("game.name must not be empty");
        }
        if self.game.default_post.is_empty() || self.game.default_post.contains(':') {
            bail!("game.default_post must be a non-empty id without ':'");
        }
        if self.game.max_attempts == Some(0) {
            bail!("game.max_attempts must be at least 1 when set");
        }
        if self.storage.data_dir.trim().is_empty() {
            bail!("storage.data_dir must not be empty");
        }
        if self.leaderboard.default_top == 0 {
            bail!("leaderboard.default_top must be at least 1");
        }
        if self.logging.level.parse::<log::LevelFilter>().is_err() {
            bail!("logging.level '{}' is not a valid log level", self.logging.level);
        }
        Ok(())
    }
}
