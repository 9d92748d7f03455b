//! Database metrics collection.
//!
//! Provides functions for recording database-related metrics.

use metrics::{counter, gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

/// Record database query duration.
pub fn record_query_duration(query_name: &'static str, duration_secs: f64) {
    histogram!("database_query_duration_seconds", "query" => query_name).record(duration_secs);
}

/// Record a failed database query.
pub fn record_query_error(query_name: &'static str) {
    counter!("database_query_errors_total", "query" => query_name).increment(1);
}

/// Record database connection pool metrics.
///
/// Call this function periodically to track pool health.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();
    let active = size.saturating_sub(idle);

    gauge!("database_connections_active").set(active as f64);
    gauge!("database_connections_idle").set(idle as f64);
    gauge!("database_connections_total").set(size as f64);
}

/// Times one repository statement.
///
/// Usage:
/// ```ignore
/// let timer = QueryTimer::new("list_contacts");
/// let result = sqlx::query_as::<_, ContactEntity>(...).fetch_all(&mut *conn).await;
/// timer.observe(result)
/// ```
pub struct QueryTimer {
    query_name: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query_name: &'static str) -> Self {
        Self {
            query_name,
            start: Instant::now(),
        }
    }

    pub fn query_name(&self) -> &'static str {
        self.query_name
    }

    /// Records the elapsed time, counts the failure if any, and hands the
    /// result back unchanged.
    pub fn observe<T, E>(self, result: Result<T, E>) -> Result<T, E> {
        record_query_duration(self.query_name, self.start.elapsed().as_secs_f64());
        if result.is_err() {
            record_query_error(self.query_name);
        }
        result
    }
}
