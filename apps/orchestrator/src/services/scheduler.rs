//! Spawns the three periodic ticks (alert evaluation, hourly
//! reconciliation, nightly partition maintenance) as independent tokio
//! tasks, each guarded by its own Postgres advisory lock so a
//! multi-instance deployment never runs two copies of the same tick
//! concurrently.

use crate::services::alert_engine::AlertEngine;
use crate::services::partition_maintenance::PartitionMaintenanceJob;
use crate::services::reconciliation::ReconciliationJob;
use mdm_db::{locks, DbPool};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, trace, warn};

pub fn spawn_alert_tick(pool: DbPool, engine: Arc<AlertEngine>, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            run_locked(&pool, locks::ALERT_TICK_LOCK_KEY, "alert_tick", || engine.tick()).await.ok();
        }
    });
}

pub fn spawn_reconciliation(pool: DbPool, job: Arc<ReconciliationJob>, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            run_locked(&pool, locks::RECONCILIATION_LOCK_KEY, "reconciliation", || job.run()).await.ok();
        }
    });
}

pub fn spawn_partition_maintenance(pool: DbPool, job: Arc<PartitionMaintenanceJob>, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            run_locked(&pool, locks::NIGHTLY_MAINTENANCE_LOCK_KEY, "partition_maintenance", || job.run())
                .await
                .ok();
        }
    });
}

/// Runs `job` under the named Postgres advisory lock, shared by the
/// background tick and the admin-triggered manual run so the two can
/// never execute the same job concurrently. Returns `Ok(true)` if the
/// lock was acquired and the job ran, `Ok(false)` if another instance
/// (or another caller of this same function) already held it.
pub(crate) async fn run_locked<F, Fut>(pool: &DbPool, key: i64, job_name: &str, job: F) -> Result<bool, mdm_db::DbError>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<(), mdm_db::DbError>>,
{
    let acquired = match locks::try_advisory_lock(pool.pool(), key).await {
        Ok(acquired) => acquired,
        Err(error) => {
            error!(%error, job = job_name, "advisory lock request failed");
            return Err(error);
        }
    };
    if !acquired {
        trace!(job = job_name, "skipping tick, another instance holds the lock");
        return Ok(false);
    }

    let result = job().await;
    if let Err(error) = &result {
        error!(%error, job = job_name, "periodic job failed");
    }

    if let Err(error) = locks::advisory_unlock(pool.pool(), key).await {
        warn!(%error, job = job_name, "failed to release advisory lock");
    }

    result.map(|()| true)
}
