//! `POST /v1/action-result`: the device's ack for a previously dispatched
//! command. Idempotent — a second ack for an already-terminal request-id
//! is accepted and ignored rather than rejected.

use crate::error::AppError;
use crate::middleware::DeviceIdentity;
use crate::state::AppState;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use mdm_db::DbError;
use mdm_domain::dispatch::{truncate_preview, ActionResultPayload, AckStatus};
use mdm_domain::event::DeviceEvent;
use tracing::instrument;

fn ack_status_str(status: AckStatus) -> &'static str {
    match status {
        AckStatus::Ok => "ok",
        AckStatus::Failed => "failed",
        AckStatus::Denied => "denied",
        AckStatus::Timeout => "timeout",
    }
}

#[instrument(skip(state, payload), fields(device_id = %identity.device_id, request_id = %payload.request_id))]
pub async fn submit_action_result(
    State(state): State<AppState>,
    Extension(identity): Extension<DeviceIdentity>,
    Json(payload): Json<ActionResultPayload>,
) -> Result<StatusCode, AppError> {
    let dispatch = match state.dispatch_repo.get(payload.request_id).await {
        Ok(dispatch) => dispatch,
        Err(DbError::DispatchNotFound) => return Err(AppError::NotFound),
        Err(error) => return Err(error.into()),
    };

    if dispatch.device_id != identity.device_id {
        return Err(AppError::AuthFailure);
    }

    let result = payload.status.into_dispatch_result();
    let output_preview = payload.output.as_deref().map(truncate_preview);

    let transitioned = state
        .dispatch_repo
        .apply_ack(payload.request_id, result, payload.error.as_deref())
        .await?;

    if transitioned {
        if let Some(exec_id) = dispatch.exec_id {
            state
                .bulk_repo
                .apply_child_ack(
                    exec_id,
                    &identity.device_id,
                    payload.status.counts_as_ack(),
                    ack_status_str(payload.status),
                    payload.exit_code,
                    output_preview.as_deref(),
                    payload.error.as_deref(),
                )
                .await?;
        }

        state.event_bus.publish(DeviceEvent::CommandResult {
            device_id: identity.device_id.clone(),
            request_id: payload.request_id,
            outcome: ack_status_str(payload.status).to_string(),
            at: Utc::now(),
        });
    }

    Ok(StatusCode::OK)
}
