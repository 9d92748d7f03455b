//! Schema initialization.
//!
//! The schema is shipped as embedded sqlx migrations. Applying them is
//! idempotent: already-applied versions are skipped, and the first migration
//! uses `CREATE TABLE IF NOT EXISTS` so a pre-existing `contacts` table is
//! adopted as-is.

use sqlx::migrate::Migrator;
use sqlx::PgPool;
use tracing::info;

use crate::error::PersistenceError;

/// Embedded migrations from `src/migrations`.
pub static MIGRATOR: Migrator = sqlx::migrate!("./src/migrations");

/// Ensures the `contacts` table exists.
///
/// Call once at process start, before serving any request.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), PersistenceError> {
    info!("Ensuring database schema...");
    MIGRATOR.run(pool).await?;
    info!(
        latest_version = latest_version().unwrap_or_default(),
        "Database schema is up to date"
    );
    Ok(())
}

/// Latest migration version known by this binary.
pub fn latest_version() -> Option<i64> {
    MIGRATOR.iter().map(|m| m.version).max()
}
