//! Configuration Management
//!
//! Handles persistent configuration storage for ycinv.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Path to the service-account key file
    #[serde(default)]
    pub sa_key_file: Option<PathBuf>,
    /// Default cloud id
    #[serde(default)]
    pub cloud_id: Option<String>,
    /// Default folder id
    #[serde(default)]
    pub folder_id: Option<String>,
}

impl Config {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ycinv").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        Ok(())
    }

    /// Effective key file path (env > config)
    pub fn effective_sa_key_file(&self) -> Option<PathBuf> {
        if let Ok(path) = std::env::var("YC_SERVICE_ACCOUNT_KEY_FILE") {
            return Some(PathBuf::from(path));
        }
        self.sa_key_file.clone()
    }

    /// Effective cloud id (env > config)
    pub fn effective_cloud_id(&self) -> Option<String> {
        std::env::var("YC_CLOUD_ID")
            .ok()
            .or_else(|| self.cloud_id.clone())
    }

    /// Effective folder id (env > config)
    pub fn effective_folder_id(&self) -> Option<String> {
        std::env::var("YC_FOLDER_ID")
            .ok()
            .or_else(|| self.folder_id.clone())
    }
}

/// OAuth token from the environment, used when no key file is configured
pub fn oauth_token_from_env() -> Option<String> {
    std::env::var("YC_OAUTH_TOKEN")
        .ok()
        .filter(|t| !t.is_empty())
}
