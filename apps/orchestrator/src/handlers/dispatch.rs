//! Admin-facing command dispatch: single-device `POST
//! /v1/devices/{id}/command` and fleet-wide `POST /v1/remote-exec`.

use crate::error::AppError;
use crate::services::dispatch_service::{create_dispatch_record, dispatch_one, send_dispatch_record};
use crate::state::AppState;
use axum::extract::{Json, Path, State};
use mdm_domain::dispatch::{
    BulkDispatchRequest, BulkMode, BulkTarget, DispatchAction, SingleCommandRequest,
};
use mdm_domain::partition::DEVICE_SELECTION_SNAPSHOT_TTL_MINUTES;
use serde::Serialize;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct SingleCommandResponse {
    pub request_id: Uuid,
}

#[instrument(skip(state, request), fields(device_id = %device_id))]
pub async fn dispatch_single_command(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
    Json(request): Json<SingleCommandRequest>,
) -> Result<Json<SingleCommandResponse>, AppError> {
    let device = state.device_repo.get_by_id(&device_id).await?;
    if device.token_revoked_at.is_some() {
        return Err(AppError::TokenRevoked);
    }

    let outcome = dispatch_one(
        &state.dispatch_repo,
        &state.hmac_keyring,
        state.push_provider.as_ref(),
        &device_id,
        device.push_token.as_deref(),
        request.action,
        request.payload,
        None,
        None,
    )
    .await?;

    Ok(Json(SingleCommandResponse {
        request_id: outcome.request_id,
    }))
}

#[derive(Debug, Serialize)]
pub struct BulkDispatchResponse {
    pub exec_id: Uuid,
}

#[instrument(skip(state, request))]
pub async fn dispatch_bulk(
    State(state): State<AppState>,
    Json(request): Json<BulkDispatchRequest>,
) -> Result<Json<BulkDispatchResponse>, AppError> {
    let device_ids = resolve_targets(&state, &request.targets).await?;
    if device_ids.is_empty() {
        return Err(AppError::ValidationFailure("no eligible devices matched the target selector".into()));
    }

    let snapshot_id = state
        .snapshot_repo
        .create(&device_ids, DEVICE_SELECTION_SNAPSHOT_TTL_MINUTES)
        .await?;

    let exec_id = Uuid::new_v4();
    let raw_request = json!({
        "mode": match request.mode { BulkMode::Push => "push", BulkMode::Shell => "shell" },
        "action": request.action,
        "command": request.command,
        "payload": request.payload,
    });
    let target_spec = json!({ "snapshot_id": snapshot_id, "resolved_count": device_ids.len() });

    state
        .bulk_repo
        .create(exec_id, request.mode, &raw_request, &target_spec, device_ids.len() as i32)
        .await?;

    let action = match request.mode {
        BulkMode::Push => request
            .action
            .ok_or_else(|| AppError::ValidationFailure("push mode requires an action".into()))?,
        BulkMode::Shell => DispatchAction::ExecShell,
    };

    let payload = match request.mode {
        BulkMode::Push => request.payload.clone(),
        BulkMode::Shell => {
            let command = request
                .command
                .clone()
                .ok_or_else(|| AppError::ValidationFailure("shell mode requires a command".into()))?;
            json!({ "command": command })
        }
    };

    let devices = state.device_repo.list_by_ids(&device_ids).await?;
    let mut devices_iter = devices.iter().peekable();
    while let Some(device) = devices_iter.next() {
        let record = match create_dispatch_record(
            &state.dispatch_repo,
            &state.hmac_keyring,
            &device.device_id,
            action,
            &payload,
            Some(exec_id),
            None,
        )
        .await
        {
            Ok(record) => record,
            Err(error) => {
                tracing::warn!(%error, device_id = %device.device_id, exec_id = %exec_id, "failed to create bulk dispatch record");
                continue;
            }
        };

        // Inserted before the push attempt, not after: `sent` on the
        // parent row is set up front (see `bulk_repo.create` above), so a
        // push-time failure must still leave a child row behind or the
        // parent can never reconcile acked+errored against sent. Must come
        // after `create_dispatch_record`, since this row's `request_id`
        // foreign-keys against the `command_dispatch` row that call just
        // created.
        if let Err(error) = state
            .bulk_repo
            .insert_pending_child(exec_id, &device.device_id, record.request_id)
            .await
        {
            tracing::warn!(%error, device_id = %device.device_id, exec_id = %exec_id, "failed to insert pending bulk child row");
            continue;
        }

        if let Err(error) = send_dispatch_record(
            &state.dispatch_repo,
            state.push_provider.as_ref(),
            &record,
            action,
            device.push_token.as_deref(),
        )
        .await
        {
            tracing::warn!(%error, device_id = %device.device_id, exec_id = %exec_id, "bulk dispatch attempt failed");
        }

        if devices_iter.peek().is_some() {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }
    }

    Ok(Json(BulkDispatchResponse { exec_id }))
}

async fn resolve_targets(state: &AppState, targets: &BulkTarget) -> Result<Vec<String>, AppError> {
    match targets {
        BulkTarget::All { .. } => Ok(state.device_repo.list_with_push_token(false, 0).await?),
        BulkTarget::Filter { filter } => Ok(state
            .device_repo
            .list_with_push_token(filter.online, state.config.alert_offline_minutes)
            .await?),
        BulkTarget::Aliases { aliases } => Ok(state.device_repo.list_by_aliases(aliases).await?),
    }
}
