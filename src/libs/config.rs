//! Configuration management for the curtain application.
//!
//! Settings are resolved in three layers, each overriding the previous one:
//!
//! 1. Built-in defaults (database file in the platform data directory,
//!    three attempts with a 100 ms pause for transient failures).
//! 2. `config.json` in the platform data directory, written by `curtain init`.
//! 3. Environment variables, optionally loaded from a `.env` file:
//!
//! | Variable                     | Field                       |
//! |------------------------------|-----------------------------|
//! | `CURTAIN_DB_PATH`            | `database.path`             |
//! | `CURTAIN_DB_BUSY_TIMEOUT_MS` | `database.busy_timeout_ms`  |
//! | `CURTAIN_DB_RETRIES`         | `database.retry_attempts`   |
//! | `CURTAIN_DB_RETRY_DELAY_MS`  | `database.retry_delay_ms`   |
//! | `CURTAIN_REPORTS_DIR`        | `reports_dir`               |
//!
//! ## Usage
//!
//! ```rust,no_run
//! use curtain::libs::config::Config;
//!
//! let config = Config::read()?;
//! println!("database: {}", config.database.path.display());
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::{msg_bail_anyhow, msg_print};
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration file name inside the data directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Default database file name inside the data directory.
pub const DB_FILE_NAME: &str = "curtain.db";

/// Path value selecting a private in-memory database.
pub const IN_MEMORY_PATH: &str = ":memory:";

/// Connection settings for the relational store.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DatabaseConfig {
    /// Database file, or `:memory:`.
    pub path: PathBuf,

    /// How long SQLite waits on a locked database before reporting `BUSY`.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Total attempts for a statement that fails transiently.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Fixed pause between attempts.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_busy_timeout_ms() -> u64 {
    2_000
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    100
}

impl DatabaseConfig {
    /// Settings for a throwaway in-memory store.
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::from(IN_MEMORY_PATH),
            ..Self::default()
        }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str() == IN_MEMORY_PATH
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: DataStorage::new().file_path(DB_FILE_NAME),
            busy_timeout_ms: default_busy_timeout_ms(),
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

/// Root configuration object.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Directory receiving exports and reports when no path is given.
    #[serde(default = "default_reports_dir")]
    pub reports_dir: PathBuf,
}

fn default_reports_dir() -> PathBuf {
    PathBuf::from("reports")
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database: DatabaseConfig::default(),
            reports_dir: default_reports_dir(),
        }
    }
}

impl Config {
    /// Loads the effective configuration: defaults, then `config.json`,
    /// then environment overrides.
    pub fn read() -> Result<Config> {
        let _ = dotenv::dotenv();

        let mut config = Self::read_file()?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Loads `config.json` only, falling back to defaults when it is absent.
    pub fn read_file() -> Result<Config> {
        let config_file_path = DataStorage::new().file_path(CONFIG_FILE_NAME);
        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    /// Applies `CURTAIN_*` overrides obtained through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("CURTAIN_DB_PATH").filter(|value| !value.trim().is_empty()) {
            self.database.path = PathBuf::from(path.trim());
        }
        if let Some(value) = lookup("CURTAIN_DB_BUSY_TIMEOUT_MS") {
            self.database.busy_timeout_ms = parse_env("CURTAIN_DB_BUSY_TIMEOUT_MS", &value)?;
        }
        if let Some(value) = lookup("CURTAIN_DB_RETRIES") {
            let attempts: u32 = parse_env("CURTAIN_DB_RETRIES", &value)?;
            if attempts == 0 {
                msg_bail_anyhow!(Message::ConfigInvalidValue("CURTAIN_DB_RETRIES".to_string(), value));
            }
            self.database.retry_attempts = attempts;
        }
        if let Some(value) = lookup("CURTAIN_DB_RETRY_DELAY_MS") {
            self.database.retry_delay_ms = parse_env("CURTAIN_DB_RETRY_DELAY_MS", &value)?;
        }
        if let Some(dir) = lookup("CURTAIN_REPORTS_DIR").filter(|value| !value.trim().is_empty()) {
            self.reports_dir = PathBuf::from(dir.trim());
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Interactive setup wizard seeded with the current file settings.
    pub fn init() -> Result<Self> {
        let defaults = Self::read_file().unwrap_or_default();

        msg_print!(Message::ConfigModuleDatabase);
        let path: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptDatabasePath.to_string())
            .default(defaults.database.path.display().to_string())
            .interact_text()?;
        let retry_attempts: u32 = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptRetryAttempts.to_string())
            .default(defaults.database.retry_attempts)
            .validate_with(|value: &u32| if *value > 0 { Ok(()) } else { Err(Message::RetryAttemptsRange.to_string()) })
            .interact_text()?;
        let retry_delay_ms: u64 = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptRetryDelay.to_string())
            .default(defaults.database.retry_delay_ms)
            .interact_text()?;

        msg_print!(Message::ConfigModuleReports);
        let reports_dir: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptReportsDir.to_string())
            .default(defaults.reports_dir.display().to_string())
            .interact_text()?;

        Ok(Config {
            database: DatabaseConfig {
                path: PathBuf::from(path),
                retry_attempts,
                retry_delay_ms,
                ..defaults.database
            },
            reports_dir: PathBuf::from(reports_dir),
        })
    }

    /// Removes `config.json`, if present.
    pub fn delete() -> Result<bool> {
        let config_file_path = DataStorage::new().file_path(CONFIG_FILE_NAME);
        if config_file_path.exists() {
            fs::remove_file(config_file_path)?;
            return Ok(true);
        }
        Ok(false)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    match value.trim().parse() {
        Ok(parsed) => Ok(parsed),
        Err(_) => msg_bail_anyhow!(Message::ConfigInvalidValue(key.to_string(), value.to_string())),
    }
}
