use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";
pub const DEFAULT_SERVER_PORT: u16 = 8080;
pub const DEFAULT_LAT_RESOLUTION: u32 = 40;
pub const DEFAULT_LON_RESOLUTION: u32 = 80;
pub const DEFAULT_NUM_SAMPLES: u32 = 500;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub app: AppSection,
    pub logging: LoggingSection,
    #[serde(default)]
    pub model: Option<ModelSection>,
    #[serde(default)]
    pub dataset: Option<DatasetSection>,
    #[serde(default)]
    pub map: Option<MapSection>,
    #[serde(default)]
    pub server: Option<ServerSection>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSection {
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSection {
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelSection {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatasetSection {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MapSection {
    /// Default prediction grid latitude points (slider default: 40)
    pub lat_resolution: Option<u32>,
    /// Default prediction grid longitude points (slider default: 80)
    pub lon_resolution: Option<u32>,
    /// Default MC samples for prediction (slider default: 500)
    pub num_samples: Option<u32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSection {
    /// Port to listen on (default: 8080)
    pub port: Option<u16>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

pub fn load_default() -> Result<Config, ConfigError> {
    load_from_path(DEFAULT_CONFIG_PATH)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)?;
    Ok(config)
}

impl Config {
    pub fn model_path(&self) -> Option<&Path> {
        let path = self.model.as_ref()?.path.as_deref()?;
        if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        }
    }

    pub fn dataset_path(&self) -> Option<&Path> {
        let path = self.dataset.as_ref()?.path.as_deref()?;
        if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        }
    }

    /// Default grid latitude resolution used when a refresh request omits it.
    pub fn lat_resolution(&self) -> u32 {
        self.map
            .as_ref()
            .and_then(|m| m.lat_resolution)
            .unwrap_or(DEFAULT_LAT_RESOLUTION)
    }

    pub fn lon_resolution(&self) -> u32 {
        self.map
            .as_ref()
            .and_then(|m| m.lon_resolution)
            .unwrap_or(DEFAULT_LON_RESOLUTION)
    }

    pub fn num_samples(&self) -> u32 {
        self.map
            .as_ref()
            .and_then(|m| m.num_samples)
            .unwrap_or(DEFAULT_NUM_SAMPLES)
    }

    /// Returns the server port (default: 8080)
    pub fn server_port(&self) -> u16 {
        self.server
            .as_ref()
            .and_then(|s| s.port)
            .unwrap_or(DEFAULT_SERVER_PORT)
    }
}
