//! Background job to record connection pool metrics.

use sqlx::PgPool;
use std::time::Duration;

use super::scheduler::Job;

/// Periodically publishes pool size and idle count as gauges.
pub struct PoolMetricsJob {
    pool: PgPool,
    interval: Duration,
}

impl PoolMetricsJob {
    pub fn new(pool: PgPool, interval_secs: u64) -> Self {
        Self {
            pool,
            interval: Duration::from_secs(interval_secs.max(1)),
        }
    }
}

#[async_trait::async_trait]
impl Job for PoolMetricsJob {
    fn name(&self) -> &'static str {
        "pool_metrics"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn execute(&self) -> anyhow::Result<()> {
        persistence::metrics::record_pool_metrics(&self.pool);
        Ok(())
    }
}
