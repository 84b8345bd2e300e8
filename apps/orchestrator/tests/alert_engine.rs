//! Alert tick lifecycle against a real Postgres instance: raise, per-device
//! cooldown suppression, recovery, the tri-state suppression for an
//! uninstalled monitored app, and the rollup-vs-individual split from a
//! burst crossing the configured threshold. Gated behind `sqlx::test`, so
//! these require `DATABASE_URL` to point at a reachable Postgres server
//! to run.

use chrono::{DateTime, Duration, Utc};
use mdm_domain::alert::{AlertCondition, NotificationKind};
use mdm_domain::heartbeat::{AppVersionInfo, HeartbeatPayload};
use mdm_orchestrator::config::Config;
use mdm_orchestrator::services::alert_engine::AlertEngine;
use mdm_orchestrator::services::push_provider::{FakePushProvider, PushOutcome};
use mdm_orchestrator::services::webhook_notifier::FakeWebhookNotifier;
use mdm_crypto::HmacKeyring;
use mdm_db::{AlertRepository, DeviceRepository, DispatchRepository, HeartbeatRepository};
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;

const MONITORED_PACKAGE: &str = "com.example.monitored";

/// `offset_secs` seconds after a fixed recent instant: offline evaluation
/// compares against the real wall clock inside `tick()`, so fixtures must
/// stay recent (and strictly increasing across heartbeats for the same
/// device) or every case here would spuriously also trip the offline
/// condition or get rejected as an out-of-order write.
fn at(offset_secs: i64) -> DateTime<Utc> {
    Utc::now() + Duration::seconds(offset_secs)
}

fn config() -> Arc<Config> {
    Arc::new(Config {
        database_url: "postgres://localhost/test".into(),
        db_max_connections: 20,
        port: 3000,
        hmac_primary_key: "primary-key-value-that-is-long-enough".into(),
        hmac_secondary_key: None,
        admin_key: "admin".into(),
        session_secret: "secret".into(),
        alert_offline_minutes: 20,
        alert_low_battery_pct: 15,
        alert_device_cooldown_minutes: 30,
        alert_global_cap_per_min: 60,
        alert_rollup_threshold: 3,
        alerts_enable_autoremediation: false,
        unity_down_require_consecutive: false,
        push_provider_credentials: None,
        webhook_url: None,
        artifact_store_root: "./artifacts".into(),
        read_from_last_status: true,
    })
}

fn engine(pool: &PgPool, webhook: Arc<FakeWebhookNotifier>) -> AlertEngine {
    AlertEngine::new(
        Arc::new(AlertRepository::new(pool.clone())),
        Arc::new(HeartbeatRepository::new(pool.clone())),
        Arc::new(DeviceRepository::new(pool.clone())),
        Arc::new(DispatchRepository::new(pool.clone())),
        HmacKeyring::new(b"test-primary-key".to_vec(), None),
        Arc::new(FakePushProvider::new(PushOutcome::Unreachable)),
        webhook,
        config(),
    )
}

fn payload(ts: DateTime<Utc>, foreground_recent_s: i64, battery_pct: i16, installed: bool) -> HeartbeatPayload {
    let mut app_versions = HashMap::new();
    app_versions.insert(
        MONITORED_PACKAGE.to_string(),
        AppVersionInfo {
            installed,
            version_code: Some(1),
            version_name: Some("1.0.0".to_string()),
        },
    );
    HeartbeatPayload {
        ts,
        battery_pct,
        charging: false,
        network_type: "wifi".to_string(),
        signal_dbm: -60,
        uptime_s: 3600,
        ram_used_mb: 512,
        agent_version: "1.0.0".to_string(),
        monitored_foreground_recent_s: foreground_recent_s,
        app_versions,
    }
}

async fn enroll_monitored(devices: &DeviceRepository, device_id: &str, threshold_minutes: i32) {
    devices
        .enroll(device_id, &format!("{device_id}-alias"), "token-1", "hash-1", Some(MONITORED_PACKAGE), Some("Monitored App"), threshold_minutes)
        .await
        .expect("enroll device");
}

#[sqlx::test(migrations = "../../libs/infra/db-turso/migrations")]
async fn service_down_raises_then_cooldown_suppresses_repeat(pool: PgPool) {
    let devices = DeviceRepository::new(pool.clone());
    let heartbeats = HeartbeatRepository::new(pool.clone());
    enroll_monitored(&devices, "dev-svc", 10).await;

    // Foreground recency far past the 10-minute threshold: service_down.
    heartbeats
        .ingest("dev-svc", &payload(at(0), 900, 80, true), Some(MONITORED_PACKAGE), 10, true)
        .await
        .expect("ingest");

    let webhook = Arc::new(FakeWebhookNotifier::new());
    let engine = engine(&pool, webhook.clone());

    engine.tick().await.expect("first tick raises");
    {
        let notifications = webhook.notifications.lock().expect("lock");
        assert_eq!(notifications.len(), 1, "service_down must raise exactly once");
        assert_eq!(notifications[0].condition, AlertCondition::ServiceDown);
        assert_eq!(notifications[0].transition, NotificationKind::Raised);
    }

    // Immediately ticking again: still in the 30-minute device cooldown,
    // so the still-firing condition must not produce a second notification.
    engine.tick().await.expect("second tick suppressed by cooldown");
    let notifications = webhook.notifications.lock().expect("lock");
    assert_eq!(notifications.len(), 1, "cooldown must suppress the repeat raise");
}

#[sqlx::test(migrations = "../../libs/infra/db-turso/migrations")]
async fn service_down_recovers_once_foreground_is_fresh(pool: PgPool) {
    let devices = DeviceRepository::new(pool.clone());
    let heartbeats = HeartbeatRepository::new(pool.clone());
    enroll_monitored(&devices, "dev-recover", 10).await;

    heartbeats
        .ingest("dev-recover", &payload(at(0), 900, 80, true), Some(MONITORED_PACKAGE), 10, true)
        .await
        .expect("ingest stale heartbeat");

    let webhook = Arc::new(FakeWebhookNotifier::new());
    let engine = engine(&pool, webhook.clone());
    engine.tick().await.expect("tick raises service_down");

    // Foreground recency now well inside the threshold: the device recovers.
    heartbeats
        .ingest("dev-recover", &payload(at(60), 30, 80, true), Some(MONITORED_PACKAGE), 10, true)
        .await
        .expect("ingest fresh heartbeat");
    engine.tick().await.expect("tick recovers");

    let notifications = webhook.notifications.lock().expect("lock");
    assert_eq!(notifications.len(), 2, "raise then recovery, one notification each");
    assert_eq!(notifications[1].transition, NotificationKind::Recovered);
}

#[sqlx::test(migrations = "../../libs/infra/db-turso/migrations")]
async fn tri_state_never_raises_service_down_for_uninstalled_app(pool: PgPool) {
    let devices = DeviceRepository::new(pool.clone());
    let heartbeats = HeartbeatRepository::new(pool.clone());
    enroll_monitored(&devices, "dev-uninstalled", 10).await;

    heartbeats
        .ingest("dev-uninstalled", &payload(at(0), 900, 80, false), Some(MONITORED_PACKAGE), 10, true)
        .await
        .expect("ingest");

    let webhook = Arc::new(FakeWebhookNotifier::new());
    let engine = engine(&pool, webhook.clone());
    engine.tick().await.expect("tick");

    let notifications = webhook.notifications.lock().expect("lock");
    assert!(notifications.is_empty(), "unknown service state must never raise");
}

#[sqlx::test(migrations = "../../libs/infra/db-turso/migrations")]
async fn burst_past_rollup_threshold_sends_rollup_not_individual(pool: PgPool) {
    let devices = DeviceRepository::new(pool.clone());
    let heartbeats = HeartbeatRepository::new(pool.clone());

    // Rollup threshold in `config()` is 3: raise low-battery on 4 devices
    // in the same tick to cross it.
    for i in 0..4 {
        let device_id = format!("dev-batt-{i}");
        enroll_monitored(&devices, &device_id, 10).await;
        heartbeats
            .ingest(&device_id, &payload(at(0), 30, 5, true), Some(MONITORED_PACKAGE), 10, true)
            .await
            .expect("ingest low battery heartbeat");
    }

    let webhook = Arc::new(FakeWebhookNotifier::new());
    let engine = engine(&pool, webhook.clone());
    engine.tick().await.expect("tick rolls up the burst");

    let notifications = webhook.notifications.lock().expect("lock");
    assert!(notifications.is_empty(), "a rolled-up condition must not also send individual notifications");

    let rollups = webhook.rollups.lock().expect("lock");
    assert_eq!(rollups.len(), 1, "exactly one rollup for the low_battery burst");
    assert_eq!(rollups[0].condition, AlertCondition::LowBattery);
    assert_eq!(rollups[0].aliases.len() + rollups[0].additional_count, 4);
}

#[sqlx::test(migrations = "../../libs/infra/db-turso/migrations")]
async fn small_batch_under_threshold_sends_individual_notifications(pool: PgPool) {
    let devices = DeviceRepository::new(pool.clone());
    let heartbeats = HeartbeatRepository::new(pool.clone());

    // Below the threshold of 3: each raise stays individual.
    for i in 0..2 {
        let device_id = format!("dev-lowbatt-{i}");
        enroll_monitored(&devices, &device_id, 10).await;
        heartbeats
            .ingest(&device_id, &payload(at(0), 30, 5, true), Some(MONITORED_PACKAGE), 10, true)
            .await
            .expect("ingest low battery heartbeat");
    }

    let webhook = Arc::new(FakeWebhookNotifier::new());
    let engine = engine(&pool, webhook.clone());
    engine.tick().await.expect("tick");

    let notifications = webhook.notifications.lock().expect("lock");
    assert_eq!(notifications.len(), 2, "below threshold, each device gets its own notification");
    assert!(webhook.rollups.lock().expect("lock").is_empty(), "no rollup below threshold");
}
