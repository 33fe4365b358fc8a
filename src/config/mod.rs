use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{path::Path, path::PathBuf, time::Duration};
use tracing::debug;

use crate::api::{ApiClientOptions, PUBLIC_TENANT};
use crate::pagination::DEFAULT_PAGE_LIMIT;

/// Largest page size the console will request
pub const MAX_PAGE_SIZE: usize = 500;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the dashboard API
    pub api_url: String,

    /// API key sent as a bearer token
    pub api_key: Option<String>,

    /// Tenant whose users are listed
    pub tenant: String,

    /// Users per page
    pub page_size: usize,

    /// Request timeout as a humantime string, e.g. `10s`
    pub request_timeout: String,

    /// Data directory for logs
    pub data_dir: PathBuf,
}

/// Configuration as found in a file; every field is optional
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PartialConfig {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub tenant: Option<String>,
    pub page_size: Option<usize>,
    pub request_timeout: Option<String>,
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3001/auth/dashboard".to_string(),
            api_key: None,
            tenant: PUBLIC_TENANT.to_string(),
            page_size: DEFAULT_PAGE_LIMIT,
            request_timeout: "30s".to_string(),
            data_dir: Self::default_data_dir(),
        }
    }
}

impl Config {
    /// Initialize configuration from various sources
    pub async fn init() -> Result<Self> {
        debug!("Initializing configuration");

        let mut config = Self::default();

        // Files first so the environment can override them
        if let Some(file_config) = Self::load_from_file().await? {
            config.merge_with(file_config);
        }

        config.load_from_env();

        if !config.data_dir.exists() {
            std::fs::create_dir_all(&config.data_dir).with_context(|| {
                format!("Failed to create data directory {}", config.data_dir.display())
            })?;
        }

        Ok(config)
    }

    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|dir| dir.join("roster"))
            .unwrap_or_else(|| PathBuf::from("./.roster"))
    }

    /// Candidate configuration files, highest priority first
    pub fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./.roster.json"), PathBuf::from("./roster.json")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("roster").join("roster.json"));
        }
        paths
    }

    /// Load the first configuration file that exists
    pub async fn load_from_file() -> Result<Option<PartialConfig>> {
        for path in Self::config_paths() {
            if path.exists() {
                return Self::load_from_path(&path).await.map(Some);
            }
        }
        Ok(None)
    }

    pub async fn load_from_path(path: &Path) -> Result<PartialConfig> {
        debug!("Loading configuration from: {}", path.display());
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid configuration file {}", path.display()))
    }

    /// Load configuration from environment variables
    pub fn load_from_env(&mut self) {
        self.apply_env(|key| std::env::var(key).ok());
    }

    fn apply_env<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var("ROSTER_API_URL") {
            self.api_url = url;
        }
        if let Some(key) = var("ROSTER_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(tenant) = var("ROSTER_TENANT") {
            self.tenant = tenant;
        }
        if let Some(page_size) = var("ROSTER_PAGE_SIZE") {
            match page_size.parse() {
                Ok(page_size) => self.page_size = page_size,
                Err(_) => debug!("Ignoring unparsable ROSTER_PAGE_SIZE: {}", page_size),
            }
        }
        if let Some(timeout) = var("ROSTER_REQUEST_TIMEOUT") {
            self.request_timeout = timeout;
        }
        if let Some(data_dir) = var("ROSTER_DATA_DIR") {
            self.data_dir = PathBuf::from(data_dir);
        }
    }

    /// Merge a file configuration into this one
    pub fn merge_with(&mut self, other: PartialConfig) {
        if let Some(api_url) = other.api_url {
            self.api_url = api_url;
        }
        if other.api_key.is_some() {
            self.api_key = other.api_key;
        }
        if let Some(tenant) = other.tenant {
            self.tenant = tenant;
        }
        if let Some(page_size) = other.page_size {
            self.page_size = page_size;
        }
        if let Some(timeout) = other.request_timeout {
            self.request_timeout = timeout;
        }
        if let Some(data_dir) = other.data_dir {
            self.data_dir = data_dir;
        }
    }

    pub fn timeout(&self) -> Result<Duration> {
        humantime::parse_duration(&self.request_timeout)
            .map_err(|e| anyhow!("Invalid request timeout '{}': {}", self.request_timeout, e))
    }

    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join("logs").join("roster.log")
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_url.trim().is_empty() {
            return Err(anyhow!(
                "No API URL configured. Set ROSTER_API_URL or pass --api-url."
            ));
        }
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(anyhow!("API URL must start with http:// or https://"));
        }
        if self.tenant.trim().is_empty() {
            return Err(anyhow!("Tenant must not be empty"));
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(anyhow!(
                "Page size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE,
                self.page_size
            ));
        }
        self.timeout()?;
        Ok(())
    }

    pub fn client_options(&self) -> Result<ApiClientOptions> {
        Ok(ApiClientOptions {
            base_url: self.api_url.clone(),
            api_key: self.api_key.clone(),
            timeout: self.timeout()?,
            ..Default::default()
        })
    }
}
