//! Configuration file handling.
//!
//! Reads from `~/.config/lostfound/lostfound.toml`

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// JSON snapshot of item records.
    #[serde(default = "default_items_path")]
    pub items_path: PathBuf,
    /// `username:digest` credential file.
    #[serde(default = "default_users_path")]
    pub users_path: PathBuf,
    /// Destination of the admin text export.
    #[serde(default = "default_export_path")]
    pub export_path: PathBuf,
    /// Records older than this many days are removed by the admin prune.
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
    #[serde(default = "default_admin_username")]
    pub admin_username: String,
    #[serde(default = "default_admin_password")]
    pub admin_password: String,
}

fn default_items_path() -> PathBuf {
    PathBuf::from("lostfound.json")
}

fn default_users_path() -> PathBuf {
    PathBuf::from("user.txt")
}

fn default_export_path() -> PathBuf {
    PathBuf::from("export.txt")
}

fn default_retention_days() -> u32 {
    30
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_admin_password() -> String {
    "admin123".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            items_path: default_items_path(),
            users_path: default_users_path(),
            export_path: default_export_path(),
            retention_days: default_retention_days(),
            admin_username: default_admin_username(),
            admin_password: default_admin_password(),
        }
    }
}

impl Config {
    /// Load configuration from the config file.
    ///
    /// If `custom_path` is provided, load from that path.
    /// Otherwise, load from the default XDG config location.
    /// Creates a default config file if it doesn't exist (only for default path).
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self> {
        let is_custom = custom_path.is_some();
        let config_path = match custom_path {
            Some(path) => path,
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            if !is_custom {
                let config = Config::default();
                config.save()?;
                tracing::info!("Created default config: {}", config_path.display());
                return Ok(config);
            }
            anyhow::bail!("Config file not found: {}", config_path.display());
        }

        let contents = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config = Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        tracing::info!("Loaded config from {}", config_path.display());
        Ok(config)
    }

    fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save configuration to the default config file.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_path, contents)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join("lostfound").join("lostfound.toml"))
    }
}
