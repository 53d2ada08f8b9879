use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend API endpoints
    pub api: ApiConfig,

    /// Application settings
    pub app: AppConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the local development backend
    pub dev_base_url: String,

    /// Base URL of the production backend, if deployed
    pub prod_base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// How long copy/download confirmations stay visible, in milliseconds
    pub confirm_duration_ms: u64,

    /// Directory for downloaded caption files (current directory if unset)
    pub download_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                dev_base_url: "http://localhost:8000/api".to_string(),
                prod_base_url: None,
            },
            app: AppConfig {
                confirm_duration_ms: 2000,
                download_dir: None,
            },
        }
    }
}

impl Config {
    /// Load configuration from file or create default
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content =
                fs_err::read_to_string(&config_path).context("Failed to read config file")?;

            let config: Config =
                serde_yaml::from_str(&content).context("Failed to parse config file")?;

            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save().await?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub async fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;

        fs_err::write(&config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path
    fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join("ytcap").join("config.yaml"))
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.api.dev_base_url.is_empty() {
            anyhow::bail!("Development base URL must be configured");
        }

        if self.app.confirm_duration_ms == 0 {
            anyhow::bail!("Confirmation duration must be greater than zero");
        }

        Ok(())
    }

    /// Resolve the backend base URL.
    ///
    /// Mirrors the original client's hostname switch: `local` forces the
    /// development endpoint, and an unset production URL falls back to it.
    pub fn api_base_url(&self, local: bool) -> &str {
        if local {
            return &self.api.dev_base_url;
        }

        self.api
            .prod_base_url
            .as_deref()
            .unwrap_or(&self.api.dev_base_url)
    }

    pub fn confirm_duration(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.app.confirm_duration_ms)
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Dev API: {}", self.api.dev_base_url);
        match &self.api.prod_base_url {
            Some(url) => println!("  Prod API: {}", url),
            None => println!("  Prod API: (not configured, falling back to dev)"),
        }
        println!("  Confirmation duration: {}ms", self.app.confirm_duration_ms);
        if let Some(dir) = &self.app.download_dir {
            println!("  Download directory: {}", dir.display());
        }
    }
}
