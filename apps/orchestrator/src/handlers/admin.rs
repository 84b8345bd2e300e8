//! Operational control surface: manual tick triggers, system-mode
//! transitions, and pool-health introspection. All routes sit behind
//! `admin_auth`.

use crate::error::AppError;
use crate::services::scheduler::run_locked;
use crate::state::{AppState, SystemMode};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use mdm_db::locks;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

#[derive(Debug, Serialize)]
pub struct PoolHealth {
    pub in_use: u32,
    pub max_connections: u32,
    pub utilization_pct: u32,
    pub saturated: bool,
}

#[instrument(skip(state))]
pub async fn get_pool_health(State(state): State<AppState>) -> Json<PoolHealth> {
    Json(PoolHealth {
        in_use: state.db.in_use(),
        max_connections: state.config.db_max_connections,
        utilization_pct: state.db.utilization_pct(state.config.db_max_connections),
        saturated: state.pool_saturated(),
    })
}

/// Manual triggers run through the exact same advisory lock as the
/// background tick, so an operator kicking a job by hand can't race the
/// scheduler (or another instance's admin endpoint) into a double run.
#[instrument(skip(state))]
pub async fn trigger_alert_tick(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    let engine = state.alert_engine.clone();
    let acquired = run_locked(&state.db, locks::ALERT_TICK_LOCK_KEY, "alert_tick", || async move {
        engine.tick().await
    })
    .await
    .map_err(|e| AppError::UpstreamFailure(e.to_string()))?;
    if !acquired {
        return Err(AppError::Conflict("alert tick already running on another instance".to_string()));
    }
    Ok(StatusCode::OK)
}

#[instrument(skip(state))]
pub async fn trigger_reconciliation(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    let job = state.reconciliation_job.clone();
    let acquired = run_locked(&state.db, locks::RECONCILIATION_LOCK_KEY, "reconciliation", || async move {
        job.run().await
    })
    .await
    .map_err(|e| AppError::UpstreamFailure(e.to_string()))?;
    if !acquired {
        return Err(AppError::Conflict("reconciliation already running on another instance".to_string()));
    }
    Ok(StatusCode::OK)
}

#[instrument(skip(state))]
pub async fn trigger_partition_maintenance(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    let job = state.partition_maintenance_job.clone();
    let acquired = run_locked(
        &state.db,
        locks::NIGHTLY_MAINTENANCE_LOCK_KEY,
        "partition_maintenance",
        || async move { job.run().await },
    )
    .await
    .map_err(|e| AppError::UpstreamFailure(e.to_string()))?;
    if !acquired {
        return Err(AppError::Conflict(
            "partition maintenance already running on another instance".to_string(),
        ));
    }
    Ok(StatusCode::OK)
}

#[derive(Debug, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SetModeRequest {
    Operational,
    Maintenance { reason: String },
}

#[instrument(skip(state, request))]
pub async fn set_system_mode(
    State(state): State<AppState>,
    Json(request): Json<SetModeRequest>,
) -> StatusCode {
    let mode = match request {
        SetModeRequest::Operational => SystemMode::Operational,
        SetModeRequest::Maintenance { reason } => SystemMode::Maintenance(reason),
    };
    state.set_mode(mode);
    StatusCode::OK
}

#[instrument(skip(state))]
pub async fn get_system_mode(State(state): State<AppState>) -> Json<serde_json::Value> {
    let value = match state.is_operational() {
        Ok(()) => serde_json::json!({ "mode": "operational" }),
        Err(reason) => {
            warn!(%reason, "system mode queried while in maintenance");
            serde_json::json!({ "mode": "maintenance", "reason": reason })
        }
    };
    Json(value)
}
