//! Application configuration module
//!
//! `AppConfig` is assembled from three layers, lowest priority first:
//! built-in defaults, an optional TOML file named by `CHATLINE_CONFIG`,
//! and process environment variables.
//!
//! ```toml
//! server_port = 8080
//! database_url = "sqlite://chat.db"
//! hub_queue_capacity = 64
//! static_dir = "./webui/dist"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_SERVER_PORT: u16 = 3000;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://chatline.db";
pub const DEFAULT_HUB_QUEUE_CAPACITY: usize = 256;

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Port the HTTP server listens on (all interfaces)
    pub server_port: u16,
    /// SQLite connection url
    pub database_url: String,
    /// Bound of every connection's outbound event queue
    pub hub_queue_capacity: usize,
    /// Directory served under `/static`
    pub static_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_SERVER_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            hub_queue_capacity: DEFAULT_HUB_QUEUE_CAPACITY,
            static_dir: None,
        }
    }
}

/// Optional TOML layer; every key may be omitted
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    server_port: Option<u16>,
    database_url: Option<String>,
    hub_queue_capacity: Option<usize>,
    static_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = match lookup("CHATLINE_CONFIG").filter(|p| !p.is_empty()) {
            Some(path) => AppConfigBuilder::from_toml_file(Path::new(&path))?,
            None => AppConfigBuilder::default(),
        };

        if let Some(port) = lookup("SERVER_PORT") {
            let port = port
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidValue("SERVER_PORT", port))?;
            builder = builder.server_port(port);
        }
        if let Some(url) = lookup("DATABASE_URL").filter(|u| !u.is_empty()) {
            builder = builder.database_url(url);
        }
        if let Some(capacity) = lookup("HUB_QUEUE_CAPACITY") {
            let capacity = capacity
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidValue("HUB_QUEUE_CAPACITY", capacity))?;
            builder = builder.hub_queue_capacity(capacity);
        }
        if let Some(dir) = lookup("STATIC_DIR").filter(|d| !d.is_empty()) {
            builder = builder.static_dir(dir);
        }

        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hub_queue_capacity == 0 {
            return Err(ConfigError::InvalidValue(
                "hub_queue_capacity",
                "0".to_string(),
            ));
        }
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::MissingValue("database_url"));
        }
        Ok(())
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    server_port: Option<u16>,
    database_url: Option<String>,
    hub_queue_capacity: Option<usize>,
    static_dir: Option<PathBuf>,
}

impl AppConfigBuilder {
    /// Seed a builder from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(text)?;
        Ok(Self {
            server_port: file.server_port,
            database_url: file.database_url,
            hub_queue_capacity: file.hub_queue_capacity,
            static_dir: file.static_dir,
        })
    }

    /// Seed a builder from a TOML file on disk
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn server_port(mut self, port: u16) -> Self {
        self.server_port = Some(port);
        self
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn hub_queue_capacity(mut self, capacity: usize) -> Self {
        self.hub_queue_capacity = Some(capacity);
        self
    }

    pub fn static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    /// Build the configuration, filling defaults and validating
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            server_port: self.server_port.unwrap_or(defaults.server_port),
            database_url: self.database_url.unwrap_or(defaults.database_url),
            hub_queue_capacity: self
                .hub_queue_capacity
                .unwrap_or(defaults.hub_queue_capacity),
            static_dir: self.static_dir,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1:?}")]
    InvalidValue(&'static str, String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
}
