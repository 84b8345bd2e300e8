//! Command dispatch rows: one per signed push, keyed by request-id.

use crate::errors::DbError;
use chrono::{DateTime, Utc};
use mdm_domain::dispatch::{CommandDispatch, DispatchAction, DispatchResult};
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use uuid::Uuid;

#[derive(FromRow)]
struct DispatchRow {
    request_id: Uuid,
    device_id: String,
    action: String,
    payload: serde_json::Value,
    sent_at: DateTime<Utc>,
    push_message_id: Option<String>,
    push_http_status: Option<i32>,
    result: String,
    result_message: Option<String>,
    completed_at: Option<DateTime<Utc>>,
    retry_count: i32,
    payload_hash: String,
    bulk_execution_id: Option<Uuid>,
}

fn parse_action(value: &str) -> DispatchAction {
    match value {
        "ping" => DispatchAction::Ping,
        "ring" => DispatchAction::Ring,
        "launch_app" => DispatchAction::LaunchApp,
        "install_apk" => DispatchAction::InstallApk,
        "update" => DispatchAction::Update,
        "grant_permissions" => DispatchAction::GrantPermissions,
        "wifi_connect" => DispatchAction::WifiConnect,
        _ => DispatchAction::ExecShell,
    }
}

fn parse_result(value: &str) -> DispatchResult {
    match value {
        "pending" => DispatchResult::Pending,
        "sent" => DispatchResult::Sent,
        "ok" => DispatchResult::Ok,
        "failed" => DispatchResult::Failed,
        "timeout" => DispatchResult::Timeout,
        _ => DispatchResult::Denied,
    }
}

impl From<DispatchRow> for CommandDispatch {
    fn from(row: DispatchRow) -> Self {
        CommandDispatch {
            request_id: row.request_id,
            device_id: row.device_id,
            action: parse_action(&row.action),
            payload: row.payload,
            sent_at: row.sent_at,
            push_message_id: row.push_message_id,
            push_http_status: row.push_http_status,
            result: parse_result(&row.result),
            result_message: row.result_message,
            completed_at: row.completed_at,
            retry_count: row.retry_count,
            payload_hash: row.payload_hash,
            exec_id: row.bulk_execution_id,
        }
    }
}

pub struct DispatchRepository {
    pool: PgPool,
}

impl DispatchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self, payload))]
    pub async fn create(
        &self,
        request_id: Uuid,
        device_id: &str,
        action: DispatchAction,
        payload: &serde_json::Value,
        payload_hash: &str,
        bulk_execution_id: Option<Uuid>,
    ) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO command_dispatch (request_id, device_id, action, payload_hash, bulk_execution_id, result)
            VALUES ($1, $2, $3, $4, $5, 'pending')
            "#,
        )
        .bind(request_id)
        .bind(device_id)
        .bind(action.as_str())
        .bind(payload_hash)
        .bind(bulk_execution_id)
        .execute(&self.pool)
        .await?;

        let _ = payload;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn record_push_response(
        &self,
        request_id: Uuid,
        result: DispatchResult,
        push_message_id: Option<&str>,
        push_http_status: Option<i32>,
        result_message: Option<&str>,
    ) -> Result<(), DbError> {
        let completed_at = if result.is_terminal() { Some(Utc::now()) } else { None };
        sqlx::query(
            r#"
            UPDATE command_dispatch SET
                result = $2,
                push_message_id = $3,
                push_http_status = $4,
                result_message = $5,
                completed_at = COALESCE(completed_at, $6)
            WHERE request_id = $1
            "#,
        )
        .bind(request_id)
        .bind(dispatch_result_str(result))
        .bind(push_message_id)
        .bind(push_http_status)
        .bind(result_message)
        .bind(completed_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Only `payload_hash` is persisted, per §3; the full payload isn't
    /// retained after signing, so the returned `CommandDispatch.payload`
    /// is always an empty object.
    #[instrument(skip(self))]
    pub async fn get(&self, request_id: Uuid) -> Result<CommandDispatch, DbError> {
        let row = sqlx::query_as::<_, DispatchRow>(
            r#"
            SELECT request_id, device_id, action, '{}'::jsonb AS payload, sent_at,
                   push_message_id, push_http_status, result, result_message,
                   completed_at, retry_count, payload_hash, bulk_execution_id
            FROM command_dispatch WHERE request_id = $1
            "#,
        )
        .bind(request_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::DispatchNotFound)?;

        Ok(row.into())
    }

    /// Applies a device ack idempotently: a terminal row is left untouched.
    /// Returns `true` if this call transitioned the row to terminal (i.e.
    /// the caller should bump the parent bulk counters).
    #[instrument(skip(self))]
    pub async fn apply_ack(
        &self,
        request_id: Uuid,
        result: DispatchResult,
        result_message: Option<&str>,
    ) -> Result<bool, DbError> {
        let updated: Option<(Uuid,)> = sqlx::query_as(
            r#"
            UPDATE command_dispatch SET
                result = $2,
                result_message = $3,
                completed_at = now()
            WHERE request_id = $1 AND completed_at IS NULL
            RETURNING request_id
            "#,
        )
        .bind(request_id)
        .bind(dispatch_result_str(result))
        .bind(result_message)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated.is_some())
    }
}

fn dispatch_result_str(result: DispatchResult) -> &'static str {
    match result {
        DispatchResult::Pending => "pending",
        DispatchResult::Sent => "sent",
        DispatchResult::Ok => "ok",
        DispatchResult::Failed => "failed",
        DispatchResult::Timeout => "timeout",
        DispatchResult::Denied => "denied",
    }
}
