//! Database connection pool management.

use serde::Deserialize;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgPoolOptions};
use sqlx::{Connection, PgPool, Postgres};
use std::fmt;
use std::time::Duration;
use tracing::info;

use crate::error::PersistenceError;

/// Database configuration.
///
/// Every field has a fallback so the address book starts against a local
/// Postgres with no configuration at all.
#[derive(Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_user")]
    pub user: String,

    #[serde(default = "default_password")]
    pub password: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

fn default_host() -> String {
    "localhost".to_string()
}
fn default_port() -> u16 {
    5432
}
fn default_name() -> String {
    "test_db".to_string()
}
fn default_user() -> String {
    "postgres".to_string()
}
fn default_password() -> String {
    "postgres".to_string()
}
fn default_max_connections() -> u32 {
    10
}
fn default_min_connections() -> u32 {
    1
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_idle_timeout() -> u64 {
    600
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            name: default_name(),
            user: default_user(),
            password: default_password(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("idle_timeout_secs", &self.idle_timeout_secs)
            .finish()
    }
}

impl DatabaseConfig {
    /// Builds driver connect options from the individual settings.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.name)
            .username(&self.user)
            .password(&self.password)
    }

    /// Connection target without credentials, safe for logs.
    pub fn target(&self) -> String {
        format!("{}@{}:{}/{}", self.user, self.host, self.port, self.name)
    }
}

/// Unprefixed variables accepted for the connection settings, each with the
/// configuration key it overrides. Both front-ends honour them above every
/// other source.
pub const DATABASE_ENV_VARS: &[(&str, &str)] = &[
    ("PG_HOST", "database.host"),
    ("PG_PORT", "database.port"),
    ("PG_DB", "database.name"),
    ("PG_USER", "database.user"),
    ("PG_PASSWORD", "database.password"),
];

/// Returns `(key, value)` overrides for every [`DATABASE_ENV_VARS`] entry
/// that `lookup` resolves.
pub fn database_env_overrides<F>(lookup: F) -> Vec<(&'static str, String)>
where
    F: Fn(&str) -> Option<String>,
{
    DATABASE_ENV_VARS
        .iter()
        .filter_map(|(var, key)| lookup(var).map(|value| (*key, value)))
        .collect()
}

/// Creates a PostgreSQL connection pool with the given configuration.
///
/// A first connection is opened directly, outside the pool, so an
/// unreachable host, bad credentials or an unknown database fail here with
/// [`PersistenceError::Connection`] carrying the driver error. No retry is
/// attempted; only `connect_timeout_secs` bounds the attempt.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, PersistenceError> {
    let options = config.connect_options();
    let connect_timeout = Duration::from_secs(config.connect_timeout_secs);

    let conn = tokio::time::timeout(connect_timeout, PgConnection::connect_with(&options))
        .await
        .map_err(|_| {
            PersistenceError::connection(sqlx::Error::Io(std::io::Error::from(
                std::io::ErrorKind::TimedOut,
            )))
        })??;
    conn.close().await?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(connect_timeout)
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect_lazy_with(options);

    info!(target_db = %config.target(), "Database pool created");
    Ok(pool)
}

/// Checks out a scoped connection.
///
/// The returned handle goes back to the pool when dropped, on every exit
/// path of the caller.
pub async fn acquire(pool: &PgPool) -> Result<PoolConnection<Postgres>, PersistenceError> {
    pool.acquire().await.map_err(PersistenceError::connection)
}
