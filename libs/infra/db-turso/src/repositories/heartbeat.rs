//! Dual-write heartbeat ingestion: append to the day's partition and
//! upsert the last-status projection under the ordering guard, both inside
//! one transaction.

use crate::errors::DbError;
use chrono::{DateTime, TimeZone, Utc};
use mdm_domain::device::ServiceUp;
use mdm_domain::heartbeat::HeartbeatPayload;
use sqlx::{FromRow, PgPool};
use tracing::instrument;

pub struct HeartbeatOutcome {
    /// `false` if the insert was absorbed by the dedupe-bucket unique index.
    pub inserted: bool,
    pub previous_service_up: Option<ServiceUp>,
    pub new_service_up: ServiceUp,
}

#[derive(FromRow)]
struct ServiceUpRow {
    service_up: String,
}

/// Per-device projection the alert tick needs: just enough of `devices`
/// joined with `last_status` to evaluate offline/low-battery/service-down,
/// without pulling the full `Device`/`LastStatus` rows.
pub struct AlertTickRow {
    pub device_id: String,
    pub alias: String,
    pub last_ts: DateTime<Utc>,
    pub battery_pct: i16,
    pub service_up: ServiceUp,
    pub monitoring_enabled: bool,
}

#[derive(FromRow)]
struct AlertTickSqlRow {
    device_id: String,
    alias: String,
    last_ts: DateTime<Utc>,
    battery_pct: i16,
    service_up: String,
    monitoring_enabled: bool,
}

pub struct HeartbeatRepository {
    pool: PgPool,
}

impl HeartbeatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self, payload), fields(device_id = %device_id))]
    pub async fn ingest(
        &self,
        device_id: &str,
        payload: &HeartbeatPayload,
        monitored_package: Option<&str>,
        threshold_minutes: i32,
        monitoring_enabled: bool,
    ) -> Result<HeartbeatOutcome, DbError> {
        let bucket = payload.dedupe_bucket();
        let minute_bucket: DateTime<Utc> = Utc
            .timestamp_opt(bucket.minute_epoch * 60, 0)
            .single()
            .ok_or_else(|| DbError::Mapping("minute bucket out of range".into()))?;

        let app_installed = payload.monitored_app_installed(monitored_package);
        let fg_unknown = payload.foreground_recency_unknown();
        let threshold_s = i64::from(threshold_minutes) * 60;
        let new_service_up = if monitoring_enabled {
            ServiceUp::evaluate(app_installed, fg_unknown, payload.monitored_foreground_recent_s, threshold_s)
        } else {
            ServiceUp::Unknown
        };

        let mut tx = self.pool.begin().await?;

        let previous: Option<ServiceUpRow> = sqlx::query_as("SELECT service_up FROM last_status WHERE device_id = $1")
            .bind(device_id)
            .fetch_optional(&mut *tx)
            .await?;
        let previous_service_up = previous.map(|row| ServiceUp::from_str(&row.service_up));

        let inserted_id: Option<(i64,)> = sqlx::query_as(
            r#"
            INSERT INTO device_heartbeats (
                device_id, ts, minute_bucket, bucket_index,
                battery_pct, charging, network_type, signal_dbm,
                uptime_s, ram_used_mb, foreground_recency_s, agent_version, app_versions
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (partition_day, device_id, minute_bucket, bucket_index) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(device_id)
        .bind(payload.ts)
        .bind(minute_bucket)
        .bind(bucket.bucket_in_minute as i16)
        .bind(payload.battery_pct)
        .bind(payload.charging)
        .bind(&payload.network_type)
        .bind(payload.signal_dbm)
        .bind(payload.uptime_s)
        .bind(payload.ram_used_mb)
        .bind(payload.monitored_foreground_recent_s)
        .bind(&payload.agent_version)
        .bind(serde_json::to_value(&payload.app_versions).map_err(|e| DbError::Mapping(e.to_string()))?)
        .fetch_optional(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO last_status (
                device_id, last_ts, battery_pct, charging, network_type, signal_dbm,
                uptime_s, ram_used_mb, foreground_recency_s, agent_version,
                service_up, threshold_minutes, monitoring_enabled, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, now())
            ON CONFLICT (device_id) DO UPDATE SET
                last_ts = EXCLUDED.last_ts,
                battery_pct = EXCLUDED.battery_pct,
                charging = EXCLUDED.charging,
                network_type = EXCLUDED.network_type,
                signal_dbm = EXCLUDED.signal_dbm,
                uptime_s = EXCLUDED.uptime_s,
                ram_used_mb = EXCLUDED.ram_used_mb,
                foreground_recency_s = EXCLUDED.foreground_recency_s,
                agent_version = EXCLUDED.agent_version,
                service_up = EXCLUDED.service_up,
                threshold_minutes = EXCLUDED.threshold_minutes,
                monitoring_enabled = EXCLUDED.monitoring_enabled,
                updated_at = now()
            WHERE last_status.last_ts < EXCLUDED.last_ts
            "#,
        )
        .bind(device_id)
        .bind(payload.ts)
        .bind(payload.battery_pct)
        .bind(payload.charging)
        .bind(&payload.network_type)
        .bind(payload.signal_dbm)
        .bind(payload.uptime_s)
        .bind(payload.ram_used_mb)
        .bind(payload.monitored_foreground_recent_s)
        .bind(&payload.agent_version)
        .bind(new_service_up.as_str())
        .bind(threshold_minutes as i16)
        .bind(monitoring_enabled)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(HeartbeatOutcome {
            inserted: inserted_id.is_some(),
            previous_service_up,
            new_service_up,
        })
    }

    /// Hourly reconciliation: re-derive each device's last-status row from
    /// heartbeat history within the last 24h, advancing the projection only
    /// where it is stale. Bounded to protect the hot path.
    #[instrument(skip(self))]
    pub async fn reconcile_recent(&self, max_updates: i64) -> Result<u64, DbError> {
        let result = sqlx::query(
            r#"
            WITH latest AS (
                SELECT DISTINCT ON (device_id)
                    device_id, ts, battery_pct, charging, network_type, signal_dbm,
                    uptime_s, ram_used_mb, foreground_recency_s, agent_version
                FROM device_heartbeats
                WHERE ts > now() - interval '24 hours'
                ORDER BY device_id, ts DESC
            ),
            candidates AS (
                SELECT latest.* FROM latest
                JOIN last_status ON last_status.device_id = latest.device_id
                WHERE last_status.last_ts < latest.ts
                LIMIT $1
            )
            UPDATE last_status ls SET
                last_ts = c.ts,
                battery_pct = c.battery_pct,
                charging = c.charging,
                network_type = c.network_type,
                signal_dbm = c.signal_dbm,
                uptime_s = c.uptime_s,
                ram_used_mb = c.ram_used_mb,
                foreground_recency_s = c.foreground_recency_s,
                agent_version = c.agent_version,
                updated_at = now()
            FROM candidates c
            WHERE ls.device_id = c.device_id
            "#,
        )
        .bind(max_updates)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Snapshot for one alert-engine tick: every device's last-status row
    /// joined with its alias, per §4.3.
    #[instrument(skip(self))]
    pub async fn list_for_alert_tick(&self) -> Result<Vec<AlertTickRow>, DbError> {
        let rows = sqlx::query_as::<_, AlertTickSqlRow>(
            r#"
            SELECT d.device_id, d.alias, ls.last_ts, ls.battery_pct, ls.service_up, ls.monitoring_enabled
            FROM last_status ls
            JOIN devices d ON d.device_id = ls.device_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| AlertTickRow {
                device_id: r.device_id,
                alias: r.alias,
                last_ts: r.last_ts,
                battery_pct: r.battery_pct,
                service_up: ServiceUp::from_str(&r.service_up),
                monitoring_enabled: r.monitoring_enabled,
            })
            .collect())
    }
}
