use config::builder::DefaultState;
use config::ConfigBuilder;
use serde::Deserialize;
use std::net::SocketAddr;

use persistence::db::database_env_overrides;
pub use persistence::db::DatabaseConfig;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// How long in-flight requests get to finish after a shutdown signal
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Console format: `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Write a size-rotated log file next to the console output
    #[serde(default = "default_true")]
    pub file_enabled: bool,

    #[serde(default = "default_log_dir")]
    pub dir: String,

    #[serde(default = "default_log_file_name")]
    pub file_name: String,

    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,

    #[serde(default = "default_max_backup_files")]
    pub max_backup_files: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Only enable behind proper TLS termination
    #[serde(default)]
    pub hsts_enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_pool_metrics_interval")]
    pub pool_metrics_interval_secs: u64,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    5000
}
fn default_request_timeout() -> u64 {
    30
}
fn default_shutdown_timeout() -> u64 {
    10
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "pretty".to_string()
}
fn default_true() -> bool {
    true
}
fn default_log_dir() -> String {
    "logs".to_string()
}
fn default_log_file_name() -> String {
    "app.log".to_string()
}
fn default_max_file_size() -> u64 {
    5 * 1024 * 1024
}
fn default_max_backup_files() -> usize {
    3
}
fn default_pool_metrics_interval() -> u64 {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file_enabled: true,
            dir: default_log_dir(),
            file_name: default_log_file_name(),
            max_file_size_bytes: default_max_file_size(),
            max_backup_files: default_max_backup_files(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            pool_metrics_interval_secs: default_pool_metrics_interval(),
        }
    }
}

/// Unprefixed variable for the log directory; the `PG_*` set lives next to
/// [`DatabaseConfig`].
const LOG_DIR_ENV_VAR: &str = "LOG_DIR";

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. built-in defaults
    /// 2. config/default.toml (optional)
    /// 3. config/local.toml (optional, not in git)
    /// 4. Environment variables with CONTACTS__ prefix
    /// 5. PG_HOST, PG_PORT, PG_DB, PG_USER, PG_PASSWORD, LOG_DIR
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("CONTACTS").separator("__"));
        let builder = apply_legacy_env(builder, |var| std::env::var(var).ok())?;

        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// Ignores config files and the process environment.
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }
        builder.build()?.try_deserialize()
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        for (value, name) in [
            (&self.database.host, "database.host (PG_HOST)"),
            (&self.database.name, "database.name (PG_DB)"),
            (&self.database.user, "database.user (PG_USER)"),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigValidationError::MissingRequired(name.to_string()));
            }
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigValidationError::InvalidValue(
                "min_connections cannot exceed max_connections".to_string(),
            ));
        }

        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigValidationError::InvalidValue(format!(
                "logging.format must be `pretty` or `json`, got `{}`",
                self.logging.format
            )));
        }

        self.socket_addr()?;
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigValidationError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|_| {
                ConfigValidationError::InvalidValue(format!(
                    "Invalid socket address {}:{}",
                    self.server.host, self.server.port
                ))
            })
    }
}

/// Maps the unprefixed legacy variables onto their configuration keys.
fn apply_legacy_env<F>(
    mut builder: ConfigBuilder<DefaultState>,
    lookup: F,
) -> Result<ConfigBuilder<DefaultState>, config::ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    for (key, value) in database_env_overrides(&lookup) {
        builder = builder.set_override(key, value)?;
    }
    builder.set_override_option("logging.dir", lookup(LOG_DIR_ENV_VAR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_load_with_defaults() {
        let config = Config::load_for_test(&[]).expect("Failed to load config");

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.name, "test_db");
        assert_eq!(config.database.user, "postgres");
        assert_eq!(config.database.password, "postgres");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file_name, "app.log");
        assert_eq!(config.logging.max_file_size_bytes, 5 * 1024 * 1024);
        assert_eq!(config.logging.max_backup_files, 3);
        assert!(config.metrics.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_override() {
        let config = Config::load_for_test(&[
            ("server.port", "9000"),
            ("logging.level", "debug"),
            ("database.name", "contacts"),
        ])
        .expect("Failed to load config");

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.database.name, "contacts");
    }

    #[test]
    fn test_legacy_env_vars_map_to_database_keys() {
        let builder = apply_legacy_env(config::Config::builder(), |var| match var {
            "PG_HOST" => Some("db.internal".to_string()),
            "PG_PORT" => Some("6543".to_string()),
            "PG_DB" => Some("addressbook".to_string()),
            "LOG_DIR" => Some("/var/log/contacts".to_string()),
            _ => None,
        })
        .unwrap();
        let config: Config = builder.build().unwrap().try_deserialize().unwrap();

        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 6543);
        assert_eq!(config.database.name, "addressbook");
        assert_eq!(config.database.user, "postgres");
        assert_eq!(config.logging.dir, "/var/log/contacts");
    }

    #[test]
    fn test_config_validation_port_zero() {
        let config = Config::load_for_test(&[("server.port", "0")]).unwrap();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("port"));
    }

    #[test]
    fn test_config_validation_missing_db_name() {
        let config = Config::load_for_test(&[("database.name", "")]).unwrap();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("PG_DB"));
    }

    #[test]
    fn test_config_validation_invalid_pool_settings() {
        let config = Config::load_for_test(&[
            ("database.min_connections", "100"),
            ("database.max_connections", "10"),
        ])
        .expect("Failed to load config");

        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("min_connections"));
    }

    #[test]
    fn test_config_validation_log_format() {
        let config = Config::load_for_test(&[("logging.format", "xml")]).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config =
            Config::load_for_test(&[("server.host", "127.0.0.1"), ("server.port", "3000")])
                .expect("Failed to load config");

        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn test_socket_addr_invalid_host() {
        let config = Config::load_for_test(&[("server.host", "not a host")]).unwrap();
        assert!(config.socket_addr().is_err());
    }
}
