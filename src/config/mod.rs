use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Service configuration, read from a TOML file. Sections omitted from the
/// file fall back to their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub web: WebConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
    /// Origin allowed by the CORS layer (the browser front-end).
    pub front_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Flat directory holding content-addressed item images plus the
    /// operator-provisioned `default.jpg` fallback.
    pub image_root: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://./data/bazaar.db".to_string(),
            max_connections: Some(10),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9000,
            front_url: "http://localhost:3000".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            image_root: PathBuf::from("./data/images"),
        }
    }
}

impl Config {
    /// Read the configuration at `path`. A missing file is not an error: the
    /// defaults are written there so the operator has something to edit.
    pub fn load(path: &str) -> Result<Self> {
        if std::path::Path::new(path).exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {path}"))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {path}"))
        } else {
            let config = Self::default();
            std::fs::write(path, toml::to_string_pretty(&config)?)
                .with_context(|| format!("Failed to write default config file: {path}"))?;
            Ok(config)
        }
    }
}
