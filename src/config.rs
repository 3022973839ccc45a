use crate::state::DEFAULT_HISTORY_CAPACITY;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";
pub const DEFAULT_SERVER_PORT: u16 = 8080;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_CLASSROOMS_PATH: &str = "data/classrooms.json";
pub const DEFAULT_SCHEDULES_PATH: &str = "data/schedules.json";
pub const DEFAULT_STATIC_DIR: &str = "static";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub app: AppSection,
    pub logging: LoggingSection,
    #[serde(default)]
    pub data: Option<DataSection>,
    #[serde(default)]
    pub detector: Option<DetectorSection>,
    #[serde(default)]
    pub server: Option<ServerSection>,
    #[serde(default)]
    pub history: Option<HistorySection>,
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
pub struct DataSection {
    /// Classroom directory seed file (default: data/classrooms.json)
    pub classrooms_path: Option<PathBuf>,
    /// Timetable seed file (default: data/schedules.json)
    pub schedules_path: Option<PathBuf>,
    /// Directory serving annotated detection images (default: static)
    pub static_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DetectorSection {
    /// Whether the background detector loop runs (default: false)
    pub enabled: Option<bool>,
    /// Poll interval in seconds for the detector loop (default: 5)
    pub poll_interval_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSection {
    /// Port to listen on (default: 8080)
    pub port: Option<u16>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HistorySection {
    /// In-memory occupancy history rows kept per process (default: 10000)
    pub capacity: Option<usize>,
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
    /// Returns the server port (default: 8080)
    pub fn server_port(&self) -> u16 {
        self.server
            .as_ref()
            .and_then(|s| s.port)
            .unwrap_or(DEFAULT_SERVER_PORT)
    }

    /// Returns the detector poll interval as Duration (default: 5 seconds)
    pub fn poll_interval(&self) -> Duration {
        let secs = self
            .detector
            .as_ref()
            .and_then(|s| s.poll_interval_secs)
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);
        Duration::from_secs(secs)
    }

    /// Whether the background detector loop should run (default: false)
    pub fn detector_enabled(&self) -> bool {
        self.detector
            .as_ref()
            .and_then(|s| s.enabled)
            .unwrap_or(false)
    }

    pub fn classrooms_path(&self) -> PathBuf {
        self.data
            .as_ref()
            .and_then(|d| d.classrooms_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CLASSROOMS_PATH))
    }

    pub fn schedules_path(&self) -> PathBuf {
        self.data
            .as_ref()
            .and_then(|d| d.schedules_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCHEDULES_PATH))
    }

    pub fn static_dir(&self) -> PathBuf {
        self.data
            .as_ref()
            .and_then(|d| d.static_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR))
    }

    pub fn history_capacity(&self) -> usize {
        self.history
            .as_ref()
            .and_then(|h| h.capacity)
            .unwrap_or(DEFAULT_HISTORY_CAPACITY)
    }
}
