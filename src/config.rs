//! Configuration module for Treehole.

use serde::Deserialize;
use std::path::Path;

use crate::{Result, TreeholeError};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the primary (write) SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
    /// Paths of read replicas. Listing queries are spread over these;
    /// when empty, reads go to the primary.
    #[serde(default)]
    pub replica_paths: Vec<String>,
    /// Maximum connections per pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// How long a writer waits for the database lock, in milliseconds.
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_ms: u64,
}

fn default_db_path() -> String {
    "data/treehole.db".to_string()
}

fn default_max_connections() -> u32 {
    8
}

fn default_busy_timeout() -> u64 {
    5000
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            replica_paths: vec![],
            max_connections: default_max_connections(),
            busy_timeout_ms: default_busy_timeout(),
        }
    }
}

/// Favorites configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FavoriteConfig {
    /// Maximum number of active favorite groups per user, default group included.
    #[serde(default = "default_max_groups")]
    pub max_groups_per_user: i64,
    /// Name given to the implicitly created default group.
    #[serde(default = "default_group_name")]
    pub default_group_name: String,
}

fn default_max_groups() -> i64 {
    10
}

fn default_group_name() -> String {
    "默认".to_string()
}

impl Default for FavoriteConfig {
    fn default() -> Self {
        Self {
            max_groups_per_user: default_max_groups(),
            default_group_name: default_group_name(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file. Empty means console only.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/treehole.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Favorites configuration.
    #[serde(default)]
    pub favorites: FavoriteConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(TreeholeError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| TreeholeError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `TREEHOLE_DB_PATH`: primary database path
    /// - `TREEHOLE_DB_REPLICAS`: comma separated replica paths
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("TREEHOLE_DB_PATH") {
            if !path.is_empty() {
                self.database.path = path;
            }
        }
        if let Ok(replicas) = std::env::var("TREEHOLE_DB_REPLICAS") {
            let paths: Vec<String> = replicas
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
            if !paths.is_empty() {
                self.database.replica_paths = paths;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.database.max_connections == 0 {
            return Err(TreeholeError::Config(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        if self.favorites.max_groups_per_user < 1 {
            return Err(TreeholeError::Config(
                "favorites.max_groups_per_user must be at least 1 (the default group)"
                    .to_string(),
            ));
        }
        if self.favorites.default_group_name.trim().is_empty() {
            return Err(TreeholeError::Config(
                "favorites.default_group_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert!(config.server.cors_origins.is_empty());

        assert_eq!(config.database.path, "data/treehole.db");
        assert!(config.database.replica_paths.is_empty());
        assert_eq!(config.database.max_connections, 8);
        assert_eq!(config.database.busy_timeout_ms, 5000);

        assert_eq!(config.favorites.max_groups_per_user, 10);
        assert_eq!(config.favorites.default_group_name, "默认");

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, "logs/treehole.log");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000
cors_origins = ["http://localhost:5173"]

[database]
path = "custom/primary.db"
replica_paths = ["custom/replica1.db", "custom/replica2.db"]
max_connections = 4
busy_timeout_ms = 1000

[favorites]
max_groups_per_user = 3
default_group_name = "Default"

[logging]
level = "debug"
file = ""
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.cors_origins, vec!["http://localhost:5173"]);

        assert_eq!(config.database.path, "custom/primary.db");
        assert_eq!(config.database.replica_paths.len(), 2);
        assert_eq!(config.database.max_connections, 4);
        assert_eq!(config.database.busy_timeout_ms, 1000);

        assert_eq!(config.favorites.max_groups_per_user, 3);
        assert_eq!(config.favorites.default_group_name, "Default");

        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.file.is_empty());
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[favorites]
max_groups_per_user = 5
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.favorites.max_groups_per_user, 5);
        // Default values
        assert_eq!(config.favorites.default_group_name, "默认");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.database.path, "data/treehole.db");
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.database.path, "data/treehole.db");
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("this is not valid toml [[[");

        assert!(result.is_err());
        if let Err(TreeholeError::Config(msg)) = result {
            assert!(msg.contains("config parse error"));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load("nonexistent.toml");
        assert!(matches!(result, Err(TreeholeError::Io(_))));
    }

    #[test]
    fn test_apply_env_overrides() {
        let original_path = std::env::var("TREEHOLE_DB_PATH").ok();
        let original_replicas = std::env::var("TREEHOLE_DB_REPLICAS").ok();

        std::env::set_var("TREEHOLE_DB_PATH", "env/primary.db");
        std::env::set_var("TREEHOLE_DB_REPLICAS", "env/r1.db, env/r2.db,");

        let mut config = Config::default();
        config.apply_env_overrides();

        assert_eq!(config.database.path, "env/primary.db");
        assert_eq!(
            config.database.replica_paths,
            vec!["env/r1.db".to_string(), "env/r2.db".to_string()]
        );

        match original_path {
            Some(val) => std::env::set_var("TREEHOLE_DB_PATH", val),
            None => std::env::remove_var("TREEHOLE_DB_PATH"),
        }
        match original_replicas {
            Some(val) => std::env::set_var("TREEHOLE_DB_REPLICAS", val),
            None => std::env::remove_var("TREEHOLE_DB_REPLICAS"),
        }
    }

    #[test]
    fn test_validate_default() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_groups() {
        let mut config = Config::default();
        config.favorites.max_groups_per_user = 0;

        let result = config.validate();
        if let Err(TreeholeError::Config(msg)) = result {
            assert!(msg.contains("max_groups_per_user"));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_validate_zero_connections() {
        let mut config = Config::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());
    }
}
