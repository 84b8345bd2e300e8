//! Hourly reconciliation tick: re-derives `last_status` from recent
//! heartbeat history to repair any projection left stale by a dropped or
//! out-of-order write, and sweeps bulk-execution children that never
//! acked within the liveness window, per §4.1/§4.2.

use mdm_db::{BulkRepository, HeartbeatRepository};
use std::sync::Arc;
use tracing::{info, instrument, warn};

const MAX_UPDATES_PER_TICK: i64 = 5_000;
const BULK_LIVENESS_TIMEOUT_SECONDS: i64 = 60;

pub struct ReconciliationJob {
    heartbeat_repo: Arc<HeartbeatRepository>,
    bulk_repo: Arc<BulkRepository>,
}

impl ReconciliationJob {
    pub fn new(heartbeat_repo: Arc<HeartbeatRepository>, bulk_repo: Arc<BulkRepository>) -> Self {
        Self { heartbeat_repo, bulk_repo }
    }

    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<(), mdm_db::DbError> {
        let updated = self.heartbeat_repo.reconcile_recent(MAX_UPDATES_PER_TICK).await?;
        if updated > 0 {
            info!(updated, "reconciliation tick repaired stale last_status rows");
        }

        self.sweep_stalled_bulk_children().await?;
        Ok(())
    }

    /// Demotes child rows that have sat non-terminal for over a minute to
    /// `timeout`, counted as errored, so a bulk execution with a
    /// never-acking device still reaches `completed` instead of staying
    /// `running` indefinitely.
    async fn sweep_stalled_bulk_children(&self) -> Result<(), mdm_db::DbError> {
        let stalled = self.bulk_repo.list_stalled(BULK_LIVENESS_TIMEOUT_SECONDS).await?;
        if stalled.is_empty() {
            return Ok(());
        }

        let mut swept = 0u32;
        for (exec_id, device_id) in stalled {
            match self
                .bulk_repo
                .apply_child_ack(exec_id, &device_id, false, "timeout", None, None, Some("liveness timeout"))
                .await
            {
                Ok(true) => swept += 1,
                Ok(false) => {}
                Err(error) => {
                    warn!(%error, %exec_id, device_id = %device_id, "failed to sweep stalled bulk child");
                }
            }
        }
        if swept > 0 {
            info!(swept, "reconciliation tick demoted stalled bulk children to timeout");
        }
        Ok(())
    }
}
