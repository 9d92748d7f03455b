//! Persistence error taxonomy.

use sqlx::migrate::MigrateError;
use thiserror::Error;

/// Errors raised by the persistence layer.
///
/// `Connection` covers every failure to reach or authenticate against the
/// store. It is never handled inside this crate.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Database connection error: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("Database query error: {0}")]
    Query(#[source] sqlx::Error),

    #[error("Schema migration failed: {0}")]
    Migration(#[source] MigrateError),
}

impl PersistenceError {
    /// Wraps an error that is known to come from connection acquisition.
    pub fn connection(err: sqlx::Error) -> Self {
        PersistenceError::Connection(err)
    }

    /// Returns true if the store was unreachable or rejected the session.
    pub fn is_connection(&self) -> bool {
        matches!(self, PersistenceError::Connection(_))
    }
}

impl From<sqlx::Error> for PersistenceError {
    fn from(err: sqlx::Error) -> Self {
        if is_connection_failure(&err) {
            PersistenceError::Connection(err)
        } else {
            PersistenceError::Query(err)
        }
    }
}

impl From<MigrateError> for PersistenceError {
    fn from(err: MigrateError) -> Self {
        match err {
            MigrateError::Execute(inner) if is_connection_failure(&inner) => {
                PersistenceError::Connection(inner)
            }
            other => PersistenceError::Migration(other),
        }
    }
}

/// Classifies a driver error as a connection-level failure.
pub fn is_connection_failure(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Configuration(_)
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => true,
        sqlx::Error::Database(db_err) => db_err
            .code()
            .map(|code| is_connection_sqlstate(&code))
            .unwrap_or(false),
        _ => false,
    }
}

/// SQLSTATE codes that mean the session could not be established or kept.
///
/// - class `08`: connection exception
/// - class `28`: invalid authorization specification
/// - `3D000`: database does not exist
/// - `53300`: too many connections
/// - `57P03`: server is starting up or shutting down
pub fn is_connection_sqlstate(code: &str) -> bool {
    code.starts_with("08")
        || code.starts_with("28")
        || code == "3D000"
        || code == "53300"
        || code == "57P03"
}
