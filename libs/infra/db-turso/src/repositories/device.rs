//! Device registry: enrollment, token lookup, and monitoring configuration.

use crate::errors::DbError;
use chrono::{DateTime, Utc};
use mdm_domain::device::Device;
use sqlx::{FromRow, PgPool};
use tracing::instrument;

#[derive(FromRow)]
struct DeviceRow {
    device_id: String,
    alias: String,
    token_id: String,
    token_hash: String,
    token_revoked_at: Option<DateTime<Utc>>,
    push_token: Option<String>,
    monitored_package: Option<String>,
    monitored_display_name: Option<String>,
    threshold_minutes: i16,
    monitoring_enabled: bool,
    owner_mode: bool,
    last_heartbeat_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<DeviceRow> for Device {
    fn from(row: DeviceRow) -> Self {
        Device {
            device_id: row.device_id,
            alias: row.alias,
            token_id: row.token_id,
            token_hash: row.token_hash,
            token_revoked_at: row.token_revoked_at,
            push_token: row.push_token,
            monitored_package: row.monitored_package,
            monitored_display_name: row.monitored_display_name,
            threshold_minutes: i32::from(row.threshold_minutes),
            monitoring_enabled: row.monitoring_enabled,
            device_owner_mode: row.owner_mode,
            last_heartbeat_at: row.last_heartbeat_at,
            created_at: row.created_at,
        }
    }
}

const SELECT_DEVICE_COLUMNS: &str = r#"
    device_id, alias, token_id, token_hash, token_revoked_at,
    push_token, monitored_package, monitored_display_name,
    threshold_minutes, monitoring_enabled, owner_mode, last_heartbeat_at, created_at
"#;

pub struct DeviceRepository {
    pool: PgPool,
}

impl DeviceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self, token_hash))]
    pub async fn enroll(
        &self,
        device_id: &str,
        alias: &str,
        token_id: &str,
        token_hash: &str,
        monitored_package: Option<&str>,
        monitored_display_name: Option<&str>,
        threshold_minutes: i32,
    ) -> Result<Device, DbError> {
        let query = format!(
            r#"
            INSERT INTO devices (
                device_id, alias, token_id, token_hash,
                monitored_package, monitored_display_name, threshold_minutes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {SELECT_DEVICE_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, DeviceRow>(&query)
            .bind(device_id)
            .bind(alias)
            .bind(token_id)
            .bind(token_hash)
            .bind(monitored_package)
            .bind(monitored_display_name)
            .bind(threshold_minutes as i16)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.is_unique_violation() => DbError::AliasConflict,
                _ => DbError::Query(e),
            })?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, device_id: &str) -> Result<Device, DbError> {
        let query = format!("SELECT {SELECT_DEVICE_COLUMNS} FROM devices WHERE device_id = $1");
        let row = sqlx::query_as::<_, DeviceRow>(&query)
            .bind(device_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DbError::DeviceNotFound)?;

        Ok(row.into())
    }

    /// O(1) lookup by the bearer token's indexed prefix; the caller still
    /// needs to bcrypt-verify the secret half against `token_hash`.
    #[instrument(skip(self))]
    pub async fn get_by_token_id(&self, token_id: &str) -> Result<Device, DbError> {
        let query = format!("SELECT {SELECT_DEVICE_COLUMNS} FROM devices WHERE token_id = $1");
        let row = sqlx::query_as::<_, DeviceRow>(&query)
            .bind(token_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DbError::DeviceNotFound)?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    pub async fn revoke_token(&self, device_id: &str) -> Result<(), DbError> {
        sqlx::query("UPDATE devices SET token_revoked_at = now() WHERE device_id = $1")
            .bind(device_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn touch_last_heartbeat(&self, device_id: &str, ts: DateTime<Utc>) -> Result<(), DbError> {
        sqlx::query(
            "UPDATE devices SET last_heartbeat_at = $2 WHERE device_id = $1 AND (last_heartbeat_at IS NULL OR last_heartbeat_at < $2)",
        )
        .bind(device_id)
        .bind(ts)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_by_ids(&self, device_ids: &[String]) -> Result<Vec<Device>, DbError> {
        let query = format!("SELECT {SELECT_DEVICE_COLUMNS} FROM devices WHERE device_id = ANY($1)");
        let rows = sqlx::query_as::<_, DeviceRow>(&query)
            .bind(device_ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Device::from).collect())
    }

    /// Devices with a push token, optionally filtered to those currently
    /// online (heartbeat within the last `online_window_minutes`), for
    /// bulk-dispatch target resolution.
    #[instrument(skip(self))]
    pub async fn list_with_push_token(&self, online_only: bool, online_window_minutes: i64) -> Result<Vec<String>, DbError> {
        let rows: Vec<(String,)> = if online_only {
            sqlx::query_as(
                r#"
                SELECT device_id FROM devices
                WHERE push_token IS NOT NULL
                  AND last_heartbeat_at IS NOT NULL
                  AND last_heartbeat_at > now() - make_interval(mins => $1)
                "#,
            )
            .bind(online_window_minutes as i32)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as("SELECT device_id FROM devices WHERE push_token IS NOT NULL")
                .fetch_all(&self.pool)
                .await?
        };

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    #[instrument(skip(self))]
    pub async fn list_by_aliases(&self, aliases: &[String]) -> Result<Vec<String>, DbError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT device_id FROM devices WHERE alias = ANY($1) AND push_token IS NOT NULL",
        )
        .bind(aliases)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
