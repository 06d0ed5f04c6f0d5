// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Project configuration management.
//!
//! Configuration is stored in `.stow/config.toml` and includes:
//! - `endpoint`: Optional base URL that relative request URLs resolve against
//! - `[queue]`: Location and bounds of the durable queue
//! - `[transport]`: HTTP delivery settings
//! - `[monitor]`: Connectivity probing and background sync cadence

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use stow_core::validate::{DEFAULT_MAX_PENDING, DEFAULT_MAX_RETRIES};
use stow_core::QueueLimits;

use crate::env;
use crate::error::{Error, Result};

const STOW_DIR_NAME: &str = ".stow";
const CONFIG_FILE_NAME: &str = "config.toml";
const QUEUE_FILE_NAME: &str = "queue.db";
const GITIGNORE_FILE_NAME: &str = ".gitignore";

/// Project configuration stored in `.stow/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL for request URLs that start with `/`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
}

/// Durable queue configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueConfig {
    /// SQLite file, relative to `.stow/` or absolute (default: "queue.db").
    #[serde(default = "default_queue_path")]
    pub path: String,
    /// Maximum number of stored requests (default: 100).
    #[serde(default = "default_max_pending")]
    pub max_pending: usize,
    /// Failed deliveries allowed before a request is dropped (default: 5).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

/// HTTP delivery configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Per-request timeout in milliseconds (default: 10000).
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Connectivity monitor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// URL probed to decide whether the network is up. Without one the
    /// network is assumed up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe_url: Option<String>,
    /// Seconds between probes (default: 15).
    #[serde(default = "default_probe_interval_secs")]
    pub probe_interval_secs: u64,
    /// Seconds between background flushes while online (default: 60).
    #[serde(default = "default_sync_interval_secs")]
    pub sync_interval_secs: u64,
}

fn default_queue_path() -> String {
    QUEUE_FILE_NAME.to_string()
}

fn default_max_pending() -> usize {
    DEFAULT_MAX_PENDING
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_probe_interval_secs() -> u64 {
    15
}

fn default_sync_interval_secs() -> u64 {
    60
}

impl Default for QueueConfig {
    fn default() -> Self {
        QueueConfig {
            path: default_queue_path(),
            max_pending: default_max_pending(),
            max_retries: default_max_retries(),
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig {
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            probe_url: None,
            probe_interval_secs: default_probe_interval_secs(),
            sync_interval_secs: default_sync_interval_secs(),
        }
    }
}

impl QueueConfig {
    pub fn limits(&self) -> QueueLimits {
        QueueLimits::default()
            .with_max_pending(self.max_pending)
            .with_max_retries(self.max_retries)
    }
}

impl TransportConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl MonitorConfig {
    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.probe_interval_secs)
    }

    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_secs)
    }
}

impl Config {
    /// Creates a config with default settings and an optional endpoint.
    pub fn new(endpoint: Option<String>) -> Self {
        Config {
            endpoint,
            ..Default::default()
        }
    }

    /// Loads configuration from the given `.stow/` directory.
    pub fn load(stow_dir: &Path) -> Result<Self> {
        let config_path = stow_dir.join(CONFIG_FILE_NAME);
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the given `.stow/` directory.
    pub fn save(&self, stow_dir: &Path) -> Result<()> {
        let config_path = stow_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&config_path, content)?;
        Ok(())
    }

    /// Rejects settings that would make the queue or its loops unusable.
    pub fn validate(&self) -> Result<()> {
        if self.queue.max_pending == 0 {
            return Err(Error::Config("queue.max_pending must be at least 1".into()));
        }
        if self.transport.timeout_ms == 0 {
            return Err(Error::Config("transport.timeout_ms must be at least 1".into()));
        }
        if self.monitor.probe_interval_secs == 0 || self.monitor.sync_interval_secs == 0 {
            return Err(Error::Config("monitor intervals must be at least 1 second".into()));
        }
        if let Some(endpoint) = &self.endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(Error::Config(format!(
                    "invalid endpoint '{}': must start with http:// or https://",
                    endpoint
                )));
            }
        }
        Ok(())
    }

    /// Resolve a request URL against `endpoint`.
    ///
    /// Only URLs starting with `/` are resolved; anything else is returned
    /// as given and left for validation to judge.
    pub fn resolve_url(&self, url: &str) -> String {
        match (&self.endpoint, url.starts_with('/')) {
            (Some(endpoint), true) => format!("{}{}", endpoint.trim_end_matches('/'), url),
            _ => url.to_string(),
        }
    }
}

/// Get the queue database path from config.
pub fn get_queue_path(stow_dir: &Path, config: &Config) -> PathBuf {
    let path = Path::new(&config.queue.path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        stow_dir.join(path)
    }
}

/// Find the .stow directory from `STOW_DIR`, or by walking up from the
/// current directory.
pub fn find_stow_dir() -> Result<PathBuf> {
    if let Some(dir) = env::stow_dir() {
        return if dir.is_dir() {
            Ok(dir)
        } else {
            Err(Error::NotInitialized)
        };
    }
    find_stow_dir_from(&std::env::current_dir()?)
}

/// Walk up from `start` looking for a .stow directory.
pub fn find_stow_dir_from(start: &Path) -> Result<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let stow_dir = current.join(STOW_DIR_NAME);
        if stow_dir.is_dir() {
            return Ok(stow_dir);
        }
        if !current.pop() {
            return Err(Error::NotInitialized);
        }
    }
}

/// Initialize a new .stow directory at the given path.
pub fn init_stow_dir(path: &Path, config: &Config) -> Result<PathBuf> {
    config.validate()?;
    let stow_dir = path.join(STOW_DIR_NAME);

    if stow_dir.join(CONFIG_FILE_NAME).exists() {
        return Err(Error::AlreadyInitialized(stow_dir.display().to_string()));
    }

    fs::create_dir_all(&stow_dir)?;
    config.save(&stow_dir)?;
    write_gitignore(&stow_dir)?;

    Ok(stow_dir)
}

/// Write a .gitignore file that keeps the queue database out of version control.
pub fn write_gitignore(stow_dir: &Path) -> Result<()> {
    let content = "# Pending requests (machine-local)\nqueue.db\nqueue.db-wal\nqueue.db-shm\n";
    fs::write(stow_dir.join(GITIGNORE_FILE_NAME), content)?;
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
