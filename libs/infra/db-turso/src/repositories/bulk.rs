//! Bulk/remote-exec parent record and per-device child results.

use crate::errors::DbError;
use chrono::{DateTime, Utc};
use mdm_domain::dispatch::{BulkExecution, BulkMode, BulkStatus};
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use uuid::Uuid;

#[derive(FromRow)]
struct BulkRow {
    exec_id: Uuid,
    mode: String,
    raw_request: serde_json::Value,
    target_spec: serde_json::Value,
    sent: i32,
    acked: i32,
    errored: i32,
    status: String,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

fn parse_mode(value: &str) -> BulkMode {
    if value == "push" {
        BulkMode::Push
    } else {
        BulkMode::Shell
    }
}

fn parse_status(value: &str) -> BulkStatus {
    match value {
        "running" => BulkStatus::Running,
        "failed" => BulkStatus::Failed,
        _ => BulkStatus::Completed,
    }
}

impl From<BulkRow> for BulkExecution {
    fn from(row: BulkRow) -> Self {
        BulkExecution {
            exec_id: row.exec_id,
            mode: parse_mode(&row.mode),
            raw_request: row.raw_request,
            target_spec: row.target_spec,
            sent: row.sent,
            acked: row.acked,
            errored: row.errored,
            status: parse_status(&row.status),
            created_at: row.created_at,
            completed_at: row.completed_at,
        }
    }
}

pub struct BulkRepository {
    pool: PgPool,
}

impl BulkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self, raw_request, target_spec))]
    pub async fn create(
        &self,
        exec_id: Uuid,
        mode: BulkMode,
        raw_request: &serde_json::Value,
        target_spec: &serde_json::Value,
        device_count: i32,
    ) -> Result<(), DbError> {
        let mode_str = match mode {
            BulkMode::Push => "push",
            BulkMode::Shell => "shell",
        };
        sqlx::query(
            "INSERT INTO bulk_execution (exec_id, mode, raw_request, target_spec, sent) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(exec_id)
        .bind(mode_str)
        .bind(raw_request)
        .bind(target_spec)
        .bind(device_count)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn insert_pending_child(&self, exec_id: Uuid, device_id: &str, request_id: Uuid) -> Result<(), DbError> {
        sqlx::query(
            "INSERT INTO bulk_execution_result (exec_id, device_id, request_id) VALUES ($1, $2, $3)",
        )
        .bind(exec_id)
        .bind(device_id)
        .bind(request_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, exec_id: Uuid) -> Result<BulkExecution, DbError> {
        let row = sqlx::query_as::<_, BulkRow>(
            r#"
            SELECT exec_id, mode, raw_request, target_spec, sent, acked, errored, status, created_at, completed_at
            FROM bulk_execution WHERE exec_id = $1
            "#,
        )
        .bind(exec_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::BulkExecutionNotFound)?;

        Ok(row.into())
    }

    /// Children still non-terminal `older_than_seconds` after dispatch:
    /// the liveness sweep's candidates for demotion to `timeout`, since a
    /// device that never acks would otherwise leave its parent execution
    /// stuck in `running` forever.
    #[instrument(skip(self))]
    pub async fn list_stalled(&self, older_than_seconds: i64) -> Result<Vec<(Uuid, String)>, DbError> {
        let rows: Vec<(Uuid, String)> = sqlx::query_as(
            r#"
            SELECT exec_id, device_id FROM bulk_execution_result
            WHERE status IN ('pending', 'sent')
              AND created_at < now() - make_interval(secs => $1)
            "#,
        )
        .bind(older_than_seconds as f64)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Records a terminal ack for one child row and atomically bumps the
    /// parent's `acked`/`errored` counter with a database-side `c = c + 1`,
    /// never a read-modify-write in application memory. Completes the
    /// parent when `acked + errored = sent`. Idempotent: a child already
    /// terminal is left untouched and the counters are not re-incremented.
    #[instrument(skip(self))]
    pub async fn apply_child_ack(
        &self,
        exec_id: Uuid,
        device_id: &str,
        counted_as_ack: bool,
        status: &str,
        exit_code: Option<i32>,
        output_preview: Option<&str>,
        error: Option<&str>,
    ) -> Result<bool, DbError> {
        let mut tx = self.pool.begin().await?;

        let updated: Option<(Uuid,)> = sqlx::query_as(
            r#"
            UPDATE bulk_execution_result SET
                status = $3, exit_code = $4, output_preview = $5, error = $6, updated_at = now()
            WHERE exec_id = $1 AND device_id = $2
              AND status IN ('pending', 'sent')
            RETURNING exec_id
            "#,
        )
        .bind(exec_id)
        .bind(device_id)
        .bind(status)
        .bind(exit_code)
        .bind(output_preview)
        .bind(error)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            tx.commit().await?;
            return Ok(false);
        }

        let counter_column = if counted_as_ack { "acked" } else { "errored" };
        let update_sql = format!(
            r#"
            UPDATE bulk_execution SET {counter_column} = {counter_column} + 1
            WHERE exec_id = $1
            "#
        );
        sqlx::query(&update_sql).bind(exec_id).execute(&mut *tx).await?;

        sqlx::query(
            r#"
            UPDATE bulk_execution SET status = 'completed', completed_at = now()
            WHERE exec_id = $1 AND status = 'running' AND acked + errored = sent
            "#,
        )
        .bind(exec_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }
}
