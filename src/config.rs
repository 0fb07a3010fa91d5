//! Service configuration
//!
//! Loaded from a TOML file; every field has a default so partial files work.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::series::SeriesOptions;
use crate::source::check_table_name;

/// Env var naming the config file when `--config` is not given
pub const CONFIG_ENV: &str = "CHARTFLOW_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub charts: ChartConfig,

    #[serde(default)]
    pub funnel: FunnelConfig,

    /// Event log used when a funnel request carries no events
    #[serde(default)]
    pub event_store: Option<EventStoreConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Label for empty group keys and categories
    #[serde(default = "default_unknown_label")]
    pub unknown_label: String,

    /// Legend of the mean reference line
    #[serde(default = "default_trend_label")]
    pub trend_label: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            unknown_label: default_unknown_label(),
            trend_label: default_trend_label(),
        }
    }
}

impl ChartConfig {
    pub fn series_options(&self, include_trend: bool) -> SeriesOptions {
        SeriesOptions {
            include_trend,
            unknown_label: self.unknown_label.clone(),
            trend_label: self.trend_label.clone(),
        }
    }
}

/// Defaults for funnel requests that leave parameters out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunnelConfig {
    #[serde(default = "default_steps")]
    pub steps: usize,

    #[serde(default = "default_limit")]
    pub limit: usize,

    #[serde(default = "default_window_days")]
    pub window_days: i64,
}

impl Default for FunnelConfig {
    fn default() -> Self {
        Self {
            steps: default_steps(),
            limit: default_limit(),
            window_days: default_window_days(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventStoreConfig {
    /// SQLite database file
    pub path: PathBuf,

    #[serde(default = "default_table")]
    pub table: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_unknown_label() -> String {
    "Unknown".to_string()
}

fn default_trend_label() -> String {
    "Average".to_string()
}

fn default_steps() -> usize {
    3
}

fn default_limit() -> usize {
    5
}

fn default_window_days() -> i64 {
    30
}

fn default_table() -> String {
    "page_events".to_string()
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, AppError> {
        let config: AppConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Resolve the config file from `--config <path>` or [`CONFIG_ENV`], falling back
    /// to defaults when neither is present.
    pub fn load(args: &[String]) -> Result<Self, AppError> {
        let from_args = args
            .windows(2)
            .find(|pair| pair[0] == "--config")
            .map(|pair| PathBuf::from(&pair[1]));
        let path = from_args.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        match path {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.funnel.window_days <= 0 {
            return Err(AppError::Config(
                "funnel.window_days must be positive".to_string(),
            ));
        }
        if let Some(store) = &self.event_store {
            check_table_name(&store.table)?;
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
