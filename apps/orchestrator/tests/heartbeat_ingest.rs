//! Dedupe and out-of-order delivery against a real Postgres instance,
//! per the seed scenarios in §8. Gated behind `sqlx::test`'s per-test
//! database provisioning, so these require `DATABASE_URL` to point at a
//! reachable Postgres server to run.

use chrono::{DateTime, TimeZone, Utc};
use mdm_db::{DeviceRepository, HeartbeatRepository};
use mdm_domain::device::ServiceUp;
use mdm_domain::heartbeat::HeartbeatPayload;
use sqlx::PgPool;
use std::collections::HashMap;

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).single().unwrap()
}

fn payload(ts: DateTime<Utc>) -> HeartbeatPayload {
    HeartbeatPayload {
        ts,
        battery_pct: 80,
        charging: false,
        network_type: "wifi".to_string(),
        signal_dbm: -60,
        uptime_s: 3600,
        ram_used_mb: 512,
        agent_version: "1.0.0".to_string(),
        monitored_foreground_recent_s: -1,
        app_versions: HashMap::new(),
    }
}

async fn enroll(devices: &DeviceRepository, device_id: &str) {
    devices
        .enroll(device_id, &format!("{device_id}-alias"), "token-1", "hash-1", None, None, 20)
        .await
        .expect("enroll device");
}

#[sqlx::test(migrations = "../../libs/infra/db-turso/migrations")]
async fn dedupe_absorbs_burst(pool: PgPool) {
    let devices = DeviceRepository::new(pool.clone());
    let heartbeats = HeartbeatRepository::new(pool.clone());
    enroll(&devices, "dev-burst").await;

    // 5 heartbeats at t, t+1s, t+3s, t+7s, t+9s: all within the same
    // 10-second dedupe bucket.
    for offset in [0, 1, 3, 7, 9] {
        heartbeats
            .ingest("dev-burst", &payload(at(offset)), None, 20, true)
            .await
            .expect("ingest");
    }

    let count: (i64,) = sqlx::query_as("SELECT count(*) FROM device_heartbeats WHERE device_id = $1")
        .bind("dev-burst")
        .fetch_one(&pool)
        .await
        .expect("count rows");
    assert_eq!(count.0, 1, "only one row should survive the dedupe bucket");

    let last_ts: (DateTime<Utc>,) = sqlx::query_as("SELECT last_ts FROM last_status WHERE device_id = $1")
        .bind("dev-burst")
        .fetch_one(&pool)
        .await
        .expect("fetch projection");
    assert_eq!(last_ts.0, at(9), "projection reflects the last payload in the burst");
}

#[sqlx::test(migrations = "../../libs/infra/db-turso/migrations")]
async fn out_of_order_delivery_keeps_latest_timestamp(pool: PgPool) {
    let devices = DeviceRepository::new(pool.clone());
    let heartbeats = HeartbeatRepository::new(pool.clone());
    enroll(&devices, "dev-ooo").await;

    // t+30s arrives first, then t+10s.
    heartbeats.ingest("dev-ooo", &payload(at(30)), None, 20, true).await.expect("ingest t+30s");
    heartbeats.ingest("dev-ooo", &payload(at(10)), None, 20, true).await.expect("ingest t+10s");

    let last_ts: (DateTime<Utc>,) = sqlx::query_as("SELECT last_ts FROM last_status WHERE device_id = $1")
        .bind("dev-ooo")
        .fetch_one(&pool)
        .await
        .expect("fetch projection");
    assert_eq!(last_ts.0, at(30), "projection must not regress to the out-of-order timestamp");

    let count: (i64,) = sqlx::query_as("SELECT count(*) FROM device_heartbeats WHERE device_id = $1")
        .bind("dev-ooo")
        .fetch_one(&pool)
        .await
        .expect("count rows");
    assert_eq!(count.0, 2, "both heartbeats land in the history partition");
}

#[sqlx::test(migrations = "../../libs/infra/db-turso/migrations")]
async fn tri_state_suppresses_when_app_not_installed(pool: PgPool) {
    let devices = DeviceRepository::new(pool.clone());
    let heartbeats = HeartbeatRepository::new(pool.clone());
    enroll(&devices, "dev-tristate").await;

    let outcome = heartbeats
        .ingest("dev-tristate", &payload(at(0)), Some("com.example.monitored"), 10, true)
        .await
        .expect("ingest");

    assert_eq!(outcome.new_service_up, ServiceUp::Unknown, "absent monitored app must report unknown, not down");
}
