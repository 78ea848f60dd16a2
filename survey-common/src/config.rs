//! Configuration loading for the survey service
//!
//! Settings are resolved in priority order:
//! 1. Command-line arguments / environment variables (applied as `Overrides`)
//! 2. TOML configuration file
//! 3. Built-in defaults (code constants)
//!
//! Database credentials have no built-in default. They must arrive through
//! the TOML file, the environment or the command line.

use crate::{Error, Result};
use serde::Deserialize;
use sqlx::mysql::MySqlConnectOptions;
use sqlx::sqlite::SqliteConnectOptions;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest request body accepted by the survey endpoint
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// Database connection parameters
///
/// Either `url` is set, or `host`, `name` and `user` together describe a
/// MySQL server. `url` wins when both are present.
#[derive(Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub host: Option<String>,

    #[serde(default = "default_db_port")]
    pub port: u16,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub user: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default = "default_charset")]
    pub charset: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: None,
            port: default_db_port(),
            name: None,
            user: None,
            password: None,
            charset: default_charset(),
        }
    }
}

// Credentials stay out of logs: url may embed a password as well.
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("charset", &self.charset)
            .finish()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` takes precedence
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

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}

fn default_db_port() -> u16 {
    3306
}

fn default_charset() -> String {
    "utf8mb4".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub max_body_bytes: Option<usize>,
    pub database_url: Option<String>,
    pub db_host: Option<String>,
    pub db_port: Option<u16>,
    pub db_name: Option<String>,
    pub db_user: Option<String>,
    pub db_password: Option<String>,
    pub db_charset: Option<String>,
    pub log_level: Option<String>,
}

/// Resolved database connection target
#[derive(Clone)]
pub enum DatabaseTarget {
    MySql(MySqlConnectOptions),
    Sqlite(SqliteConnectOptions),
}

// Connect options carry the password, so only the backend is shown.
impl fmt::Debug for DatabaseTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseTarget::MySql(_) => f.write_str("MySql(..)"),
            DatabaseTarget::Sqlite(_) => f.write_str("Sqlite(..)"),
        }
    }
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Load configuration, degrading to defaults when the file is absent
    ///
    /// A file that exists but cannot be parsed is still an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) if path.exists() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    /// Apply command-line / environment values on top of the file values
    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(host) = overrides.host {
            self.server.host = host;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(max_body_bytes) = overrides.max_body_bytes {
            self.server.max_body_bytes = max_body_bytes;
        }
        if let Some(url) = overrides.database_url {
            self.database.url = Some(url);
        }
        if let Some(host) = overrides.db_host {
            self.database.host = Some(host);
        }
        if let Some(port) = overrides.db_port {
            self.database.port = port;
        }
        if let Some(name) = overrides.db_name {
            self.database.name = Some(name);
        }
        if let Some(user) = overrides.db_user {
            self.database.user = Some(user);
        }
        if let Some(password) = overrides.db_password {
            self.database.password = Some(password);
        }
        if let Some(charset) = overrides.db_charset {
            self.database.charset = charset;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }
}

impl DatabaseConfig {
    /// Resolve the connection target
    ///
    /// Accepts `mysql://`, `mariadb://` and `sqlite:` URLs, or discrete
    /// MySQL parameters when no URL is configured.
    pub fn target(&self) -> Result<DatabaseTarget> {
        if let Some(url) = self.url.as_deref().filter(|u| !u.trim().is_empty()) {
            return Self::target_from_url(url.trim());
        }

        let host = required(&self.host, "database host")?;
        let name = required(&self.name, "database name")?;
        let user = required(&self.user, "database user")?;

        let mut options = MySqlConnectOptions::new()
            .host(host)
            .port(self.port)
            .database(name)
            .username(user)
            .charset(&self.charset);
        if let Some(password) = &self.password {
            options = options.password(password);
        }

        Ok(DatabaseTarget::MySql(options))
    }

    fn target_from_url(url: &str) -> Result<DatabaseTarget> {
        let scheme = url.split(':').next().unwrap_or_default().to_ascii_lowercase();
        match scheme.as_str() {
            "mysql" | "mariadb" => MySqlConnectOptions::from_str(url)
                .map(DatabaseTarget::MySql)
                .map_err(|e| Error::Config(format!("Invalid MySQL URL: {}", e))),
            "sqlite" => SqliteConnectOptions::from_str(url)
                .map(|options| DatabaseTarget::Sqlite(options.create_if_missing(true)))
                .map_err(|e| Error::Config(format!("Invalid SQLite URL: {}", e))),
            other => Err(Error::Config(format!(
                "Unsupported database URL scheme: '{}'",
                other
            ))),
        }
    }
}

fn required<'a>(value: &'a Option<String>, what: &str) -> Result<&'a str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::Config(format!("Missing {} (set a database URL or host/name/user)", what)))
}
