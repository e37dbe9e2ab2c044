//! Configuration loading and path resolution
//!
//! Settings are resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing config file is not an error: the service logs a warning and
//! starts on compiled defaults. A config file that exists but cannot be parsed
//! is reported as [`Error::Config`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "KARAOKE_CONFIG";

/// Application directory name used below the platform config/data dirs
const APP_DIR_NAME: &str = "karaoke-queue";

/// Database file name inside the data folder
const DATABASE_FILE_NAME: &str = "karaoke.db";

/// Bootstrap configuration loaded from TOML
///
/// Every field has a compiled default, so an empty file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Path to the SQLite song catalog. Defaults to the platform data folder.
    pub database_path: Option<PathBuf>,

    /// Interface to bind the HTTP server to
    pub bind_address: IpAddr,

    /// HTTP server port
    pub port: u16,

    /// Bearer token required on moderator routes.
    /// `None` (or an empty string) disables moderator authentication.
    pub moderator_token: Option<String>,

    pub logging: LoggingConfig,

    /// Initial queue policy; moderators can change it at runtime
    pub policy: PolicySettings,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            bind_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: default_port(),
            moderator_token: None,
            logging: LoggingConfig::default(),
            policy: PolicySettings::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` wins if set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Queue policy values as written in the config file
///
/// Plain integers here; validation happens when the engine builds its
/// policy from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicySettings {
    pub time_between_same_song_secs: i64,
    pub max_times_song_can_be_sung: i64,
    pub time_between_submissions_secs: i64,
    pub queue_is_open: bool,
}

impl Default for PolicySettings {
    fn default() -> Self {
        Self {
            time_between_same_song_secs: 3600,
            max_times_song_can_be_sung: 2,
            time_between_submissions_secs: 3600,
            queue_is_open: true,
        }
    }
}

/// Command-line (or environment) overrides applied on top of the TOML file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub database_path: Option<PathBuf>,
    pub bind_address: Option<IpAddr>,
    pub port: Option<u16>,
}

fn default_port() -> u16 {
    5730
}

impl TomlConfig {
    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Load and parse a config file that must exist
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load a config file if present, otherwise fall back to compiled defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) if path.exists() => Self::load(path),
            Some(path) => {
                warn!(
                    "Config file {} not found, using built-in defaults",
                    path.display()
                );
                Ok(Self::default())
            }
            None => {
                warn!("No config file location available, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    /// Apply CLI/env overrides (highest priority)
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(path) = overrides.database_path {
            self.database_path = Some(path);
        }
        if let Some(address) = overrides.bind_address {
            self.bind_address = address;
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        self
    }

    /// Effective database path (configured, else default data folder)
    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| default_data_folder().join(DATABASE_FILE_NAME))
    }

    /// Socket address for the HTTP listener
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }

    /// Moderator token, treating an empty string as "auth disabled"
    pub fn moderator_token(&self) -> Option<&str> {
        self.moderator_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }
}

/// Resolve which config file to read
///
/// Priority: CLI argument, then `KARAOKE_CONFIG`, then the platform default
/// (`<config dir>/karaoke-queue/config.toml`).
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    default_config_path()
}

/// Platform default config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join("config.toml"))
}

/// OS-dependent default data folder
pub fn default_data_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("./karaoke_data"))
}
