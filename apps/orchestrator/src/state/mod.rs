//! Shared application state handed to every handler and background job.

use crate::config::Config;
use crate::services::alert_engine::AlertEngine;
use crate::services::artifact_store::ArtifactStore;
use crate::services::partition_maintenance::PartitionMaintenanceJob;
use crate::services::push_provider::PushProvider;
use crate::services::reconciliation::ReconciliationJob;
use crate::services::webhook_notifier::WebhookNotifier;
use crate::services::EventBus;
use governor::{Quota, RateLimiter};
use governor::clock::DefaultClock;
use governor::state::keyed::DefaultKeyedStateStore;
use mdm_crypto::HmacKeyring;
use mdm_db::{AlertRepository, BulkRepository, DbPool, DeviceRepository, DispatchRepository, HeartbeatRepository, OtaRepository, PartitionRepository, SnapshotRepository};
use std::net::IpAddr;
use std::sync::{Arc, RwLock};
use tracing::{info, warn, instrument};

/// Liveness gate evaluated by `health_guard`: a process in `Maintenance`
/// rejects new device and admin traffic with 503 while background jobs
/// keep running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemMode {
    Operational,
    Maintenance(String),
}

/// Keyed by client IP per §4.5: the general tier is a per-IP bucket, not a
/// single fleet-wide one, so 500-2,000 devices heartbeating concurrently
/// don't starve each other out of the same 60/min allowance.
pub type GeneralRateLimiter = RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub device_repo: Arc<DeviceRepository>,
    pub heartbeat_repo: Arc<HeartbeatRepository>,
    pub dispatch_repo: Arc<DispatchRepository>,
    pub bulk_repo: Arc<BulkRepository>,
    pub alert_repo: Arc<AlertRepository>,
    pub ota_repo: Arc<OtaRepository>,
    pub partition_repo: Arc<PartitionRepository>,
    pub snapshot_repo: Arc<SnapshotRepository>,

    pub event_bus: Arc<EventBus>,
    pub hmac_keyring: HmacKeyring,
    pub config: Arc<Config>,

    pub push_provider: Arc<dyn PushProvider>,
    pub webhook_notifier: Arc<dyn WebhookNotifier>,
    pub artifact_store: Arc<dyn ArtifactStore>,

    pub general_rate_limiter: Arc<GeneralRateLimiter>,
    pub mode: Arc<RwLock<SystemMode>>,
    pub http_client: reqwest::Client,

    /// Shared with the background schedulers so an admin-triggered manual
    /// run and the periodic tick are the exact same code path.
    pub alert_engine: Arc<AlertEngine>,
    pub reconciliation_job: Arc<ReconciliationJob>,
    pub partition_maintenance_job: Arc<PartitionMaintenanceJob>,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        db: DbPool,
        config: Arc<Config>,
        push_provider: Arc<dyn PushProvider>,
        webhook_notifier: Arc<dyn WebhookNotifier>,
        artifact_store: Arc<dyn ArtifactStore>,
    ) -> Self {
        let pool = db.pool().clone();
        let hmac_keyring = HmacKeyring::new(
            config.hmac_primary_key.clone().into_bytes(),
            config.hmac_secondary_key.clone().map(String::into_bytes),
        );

        let general_quota = Quota::per_minute(
            std::num::NonZeroU32::new(60).expect("60 is nonzero"),
        );

        let device_repo = Arc::new(DeviceRepository::new(pool.clone()));
        let heartbeat_repo = Arc::new(HeartbeatRepository::new(pool.clone()));
        let dispatch_repo = Arc::new(DispatchRepository::new(pool.clone()));
        let alert_repo = Arc::new(AlertRepository::new(pool.clone()));
        let partition_repo = Arc::new(PartitionRepository::new(pool.clone()));
        let bulk_repo = Arc::new(BulkRepository::new(pool.clone()));

        let alert_engine = Arc::new(AlertEngine::new(
            alert_repo.clone(),
            heartbeat_repo.clone(),
            device_repo.clone(),
            dispatch_repo.clone(),
            hmac_keyring.clone(),
            push_provider.clone(),
            webhook_notifier.clone(),
            config.clone(),
        ));
        let reconciliation_job = Arc::new(ReconciliationJob::new(heartbeat_repo.clone(), bulk_repo.clone()));
        let partition_maintenance_job = Arc::new(PartitionMaintenanceJob::new(
            partition_repo.clone(),
            artifact_store.clone(),
        ));

        Self {
            db,
            device_repo,
            heartbeat_repo,
            dispatch_repo,
            bulk_repo,
            alert_repo,
            ota_repo: Arc::new(OtaRepository::new(pool.clone())),
            partition_repo,
            snapshot_repo: Arc::new(SnapshotRepository::new(pool)),

            event_bus: Arc::new(EventBus::new()),
            hmac_keyring,
            config,

            push_provider,
            webhook_notifier,
            artifact_store,

            general_rate_limiter: Arc::new(RateLimiter::keyed(general_quota)),
            mode: Arc::new(RwLock::new(SystemMode::Operational)),
            http_client: reqwest::Client::new(),

            alert_engine,
            reconciliation_job,
            partition_maintenance_job,
        }
    }

    #[instrument(skip(self))]
    pub fn set_mode(&self, mode: SystemMode) {
        match self.mode.write() {
            Ok(mut guard) => {
                info!(?mode, "system mode transition");
                *guard = mode;
            }
            Err(poisoned) => {
                warn!(%poisoned, "system mode lock poisoned");
            }
        }
    }

    pub fn is_operational(&self) -> Result<(), String> {
        let guard = self.mode.read().map_err(|e| format!("system mode lock poisoned: {e}"))?;
        match &*guard {
            SystemMode::Operational => Ok(()),
            SystemMode::Maintenance(reason) => Err(reason.clone()),
        }
    }

    /// Whether the database pool is saturated enough that new writes
    /// should back off rather than queue behind an exhausted pool.
    pub fn pool_saturated(&self) -> bool {
        self.db.utilization_pct(self.config.db_max_connections) >= 95
    }
}
