use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::catalog::{artic, DEFAULT_PAGE_SIZE};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Base URL of the catalog API
    pub base_url: String,

    /// Records requested per page
    pub page_size: usize,

    /// Record fields requested from the catalog
    pub fields: Vec<String>,

    /// HTTP request timeout
    pub request_timeout_secs: u64,

    /// User agent sent with catalog requests
    pub user_agent: String,

    /// Directory for the log file
    pub data_dir: PathBuf,

    /// Enable mouse support
    pub mouse_enabled: bool,
}

/// Configuration as read from a file; every key is optional
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub base_url: Option<String>,
    pub page_size: Option<usize>,
    pub fields: Option<Vec<String>>,
    pub request_timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub mouse_enabled: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: artic::DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            fields: artic::DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect(),
            request_timeout_secs: 30,
            user_agent: format!("artpicker/{}", env!("CARGO_PKG_VERSION")),
            data_dir: dirs::data_local_dir()
                .map(|dir| dir.join("artpicker"))
                .unwrap_or_else(|| PathBuf::from("./data")),
            mouse_enabled: false,
        }
    }
}

impl Config {
    /// Initialize configuration from defaults, the first config file found,
    /// and `ARTPICKER_*` environment variables, in that order
    pub async fn init() -> Result<Self> {
        debug!("Initializing configuration");

        let mut config = Self::default();

        if let Some(file_config) = Self::load_from_file().await? {
            config.merge_with(file_config);
        }

        config.load_from_env();

        Ok(config)
    }

    /// Candidate config files, highest priority first:
    /// 1. ./.artpicker.json
    /// 2. ./artpicker.json
    /// 3. $CONFIG/artpicker/artpicker.json
    pub fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from("./.artpicker.json"),
            PathBuf::from("./artpicker.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("artpicker").join("artpicker.json"));
        }

        paths
    }

    pub async fn load_from_file() -> Result<Option<ConfigFile>> {
        for path in Self::config_paths() {
            if path.exists() {
                return Self::load_from_path(&path).await.map(Some);
            }
        }
        Ok(None)
    }

    pub async fn load_from_path(path: &Path) -> Result<ConfigFile> {
        debug!("Loading configuration from: {}", path.display());
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Merge values from a config file into this one
    pub fn merge_with(&mut self, other: ConfigFile) {
        if let Some(base_url) = other.base_url {
            self.base_url = base_url;
        }
        if let Some(page_size) = other.page_size {
            self.page_size = page_size;
        }
        if let Some(fields) = other.fields {
            self.fields = fields;
        }
        if let Some(timeout) = other.request_timeout_secs {
            self.request_timeout_secs = timeout;
        }
        if let Some(user_agent) = other.user_agent {
            self.user_agent = user_agent;
        }
        if let Some(data_dir) = other.data_dir {
            self.data_dir = data_dir;
        }
        if let Some(mouse_enabled) = other.mouse_enabled {
            self.mouse_enabled = mouse_enabled;
        }
    }

    /// Load configuration from environment variables
    pub fn load_from_env(&mut self) {
        self.apply_env(|key| std::env::var(key).ok());
    }

    fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup("ARTPICKER_BASE_URL") {
            self.base_url = base_url;
        }

        if let Some(page_size) = lookup("ARTPICKER_PAGE_SIZE").and_then(|v| v.parse().ok()) {
            self.page_size = page_size;
        }

        if let Some(fields) = lookup("ARTPICKER_FIELDS") {
            self.fields = fields
                .split(',')
                .map(|f| f.trim().to_string())
                .filter(|f| !f.is_empty())
                .collect();
        }

        if let Some(timeout) = lookup("ARTPICKER_TIMEOUT").and_then(|v| v.parse().ok()) {
            self.request_timeout_secs = timeout;
        }

        if let Some(data_dir) = lookup("ARTPICKER_DATA_DIR") {
            self.data_dir = PathBuf::from(data_dir);
        }

        if let Some(mouse) = lookup("ARTPICKER_MOUSE") {
            self.mouse_enabled = mouse.to_lowercase() == "true";
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(anyhow!("base_url is required"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(anyhow!("base_url must start with http:// or https://"));
        }

        if self.page_size == 0 {
            return Err(anyhow!("page_size must be greater than 0"));
        }

        if self.page_size > artic::MAX_PAGE_SIZE {
            return Err(anyhow!(
                "page_size must be at most {} (catalog API limit)",
                artic::MAX_PAGE_SIZE
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(anyhow!("request_timeout_secs must be greater than 0"));
        }

        Ok(())
    }
}
