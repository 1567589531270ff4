//! Database Configuration
//!
//! Connection settings for the MySQL pool, read from the process
//! environment (`DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`,
//! `DB_DATABASE`, `DB_POOL_SIZE`). A `.env` file in the working directory
//! is merged in first; variables already set keep their values.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sqlx::mysql::MySqlConnectOptions;

use super::errors::{DbError, DbResult};

/// MySQL connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Server host (default: "localhost")
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port (default: 3306)
    #[serde(default = "default_port")]
    pub port: u16,

    /// User name (default: "root")
    #[serde(default = "default_user")]
    pub user: String,

    /// Password (default: empty)
    #[serde(default)]
    pub password: String,

    /// Schema holding the `patient` table
    #[serde(default)]
    pub database: Option<String>,

    /// Maximum pooled connections (default: 10)
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    3306
}

fn default_user() -> String {
    "root".to_string()
}

fn default_pool_size() -> u32 {
    10
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            user: default_user(),
            password: String::new(),
            database: None,
            pool_size: default_pool_size(),
        }
    }
}

/// Load `.env` from the working directory, if there is one.
///
/// Returns the file that was loaded. A file that exists but does not parse
/// is a configuration error.
pub fn load_dotenv() -> DbResult<Option<PathBuf>> {
    let path = match std::env::current_dir() {
        Ok(dir) => dir.join(".env"),
        Err(_) => return Ok(None),
    };
    if !path.is_file() {
        return Ok(None);
    }
    load_env_file(&path)?;
    Ok(Some(path))
}

/// Merge `KEY=VALUE` lines from `path` into the process environment
pub fn load_env_file(path: &Path) -> DbResult<()> {
    dotenvy::from_path(path)
        .map_err(|e| DbError::InvalidConfig(format!("{}: {}", path.display(), e)))
}

impl DatabaseConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> DbResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Unset or empty keys fall back to defaults; numeric keys that do not
    /// parse are an error.
    pub fn from_lookup<F>(lookup: F) -> DbResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let port = match get("DB_PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| DbError::InvalidConfig(format!("DB_PORT must be a port number, got '{}'", raw)))?,
            None => defaults.port,
        };

        let pool_size = match get("DB_POOL_SIZE") {
            Some(raw) => match raw.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(DbError::InvalidConfig(format!(
                        "DB_POOL_SIZE must be a positive integer, got '{}'",
                        raw
                    )))
                }
            },
            None => defaults.pool_size,
        };

        Ok(Self {
            host: get("DB_HOST").unwrap_or(defaults.host),
            port,
            user: get("DB_USER").unwrap_or(defaults.user),
            password: get("DB_PASSWORD").unwrap_or(defaults.password),
            database: get("DB_DATABASE"),
            pool_size,
        })
    }

    /// Connection options for the sqlx pool
    pub fn connect_options(&self) -> MySqlConnectOptions {
        let options = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password);

        match &self.database {
            Some(database) => options.database(database),
            None => options,
        }
    }

    /// `host:port/database` for log lines; never includes the password
    pub fn display_target(&self) -> String {
        format!(
            "{}:{}/{}",
            self.host,
            self.port,
            self.database.as_deref().unwrap_or("")
        )
    }
}
