//! # Server Configuration
//!
//! Configuration management for the catalog server.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CATALOG_PORT=9000                                                  │
//! │     DATABASE_URL=sqlite://./data/catalog.db                            │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $CATALOG_CONFIG, else                                              │
//! │     ~/.config/catalog/catalog.toml (Linux)                             │
//! │     ~/Library/Application Support/com.catalog.catalog/catalog.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     0.0.0.0:8080, sqlite://catalog.db                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # catalog.toml
//! [server]
//! bind_addr = "127.0.0.1"
//! port = 8080
//! swagger = true
//!
//! [database]
//! url = "sqlite://./data/catalog.db"
//! max_connections = 5
//! connect_timeout_secs = 30
//! run_migrations = true
//!
//! [antiforgery]
//! secret = "long-random-string"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "CATALOG_CONFIG";

// =============================================================================
// Errors
// =============================================================================

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Server Settings
// =============================================================================

/// Listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Bind address (default: 0.0.0.0 for all interfaces).
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// HTTP port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Serve the OpenAPI document and Swagger UI under `/swagger`.
    #[serde(default = "default_true")]
    pub swagger: bool,
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            bind_addr: default_bind_addr(),
            port: default_port(),
            swagger: true,
        }
    }
}

impl ServerSettings {
    /// Returns the full bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

// =============================================================================
// Database Settings
// =============================================================================

/// Record store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite connection string.
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Maximum pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Seconds to wait for a pooled connection.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Apply pending migrations at startup. When off, `/health` reports
    /// 503 until the schema is migrated out of band.
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

fn default_database_url() -> String {
    "sqlite://catalog.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_connect_timeout_secs() -> u64 {
    30
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            url: default_database_url(),
            max_connections: default_max_connections(),
            connect_timeout_secs: default_connect_timeout_secs(),
            run_migrations: true,
        }
    }
}

// =============================================================================
// Anti-forgery Settings
// =============================================================================

/// Anti-forgery token settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AntiforgerySettings {
    /// HMAC key for session tokens. A random key is generated at startup
    /// when unset, so tokens do not survive a restart.
    #[serde(default)]
    pub secret: Option<String>,
}

// =============================================================================
// Catalog Config
// =============================================================================

/// Complete server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub antiforgery: AntiforgerySettings,

    /// Log filter directive, e.g. `info,catalog_web=debug`.
    #[serde(default)]
    pub log: Option<String>,
}

impl CatalogConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (catalog.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from))
            .or_else(Self::default_config_path);

        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading catalog config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML document; missing sections keep their defaults.
    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue(
                "server.port must be greater than 0".into(),
            ));
        }

        if self.database.url.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "database.url must not be empty".into(),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        if self.database.connect_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "database.connect_timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    ///
    /// Unparsable numeric values are rejected rather than ignored.
    fn apply_env_overrides(&mut self) -> ConfigResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<()> {
        if let Some(addr) = lookup("CATALOG_BIND_ADDR") {
            self.server.bind_addr = addr;
        }

        if let Some(port) = lookup("CATALOG_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidValue("CATALOG_PORT".to_string()))?;
            debug!(port = self.server.port, "Overriding port from environment");
        }

        if let Some(swagger) = lookup("CATALOG_SWAGGER") {
            self.server.swagger = swagger
                .parse()
                .map_err(|_| ConfigError::InvalidValue("CATALOG_SWAGGER".to_string()))?;
        }

        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        }

        if let Some(max) = lookup("CATALOG_DB_MAX_CONNECTIONS") {
            self.database.max_connections = max.parse().map_err(|_| {
                ConfigError::InvalidValue("CATALOG_DB_MAX_CONNECTIONS".to_string())
            })?;
        }

        if let Some(secret) = lookup("CATALOG_ANTIFORGERY_SECRET") {
            if secret.is_empty() {
                warn!("CATALOG_ANTIFORGERY_SECRET is empty, ignoring");
            } else {
                self.antiforgery.secret = Some(secret);
            }
        }

        if let Some(filter) = lookup("CATALOG_LOG") {
            self.log = Some(filter);
        }

        Ok(())
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "catalog", "catalog")
            .map(|dirs| dirs.config_dir().join("catalog.toml"))
    }

    /// Connection string shortened for logs.
    pub fn database_url_for_log(&self) -> String {
        self.database.url.chars().take(30).collect()
    }
}
