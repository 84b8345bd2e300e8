//! `POST /v1/heartbeat`: the hot ingestion path. Device-authenticated;
//! dual-writes the day's partition and the `last_status` projection, then
//! fans out a service-transition event to any connected admin sockets.

use crate::error::AppError;
use crate::middleware::DeviceIdentity;
use crate::state::AppState;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use mdm_domain::device::ServiceUp;
use mdm_domain::event::DeviceEvent;
use mdm_domain::heartbeat::HeartbeatPayload;
use mdm_telemetry::metrics::{HB_WRITE_LATENCY_MS, HEARTBEATS_ACCEPTED, HEARTBEATS_DEDUPED};
use tracing::instrument;

#[instrument(skip(state, payload), fields(device_id = %identity.device_id))]
pub async fn ingest_heartbeat(
    State(state): State<AppState>,
    Extension(identity): Extension<DeviceIdentity>,
    Json(payload): Json<HeartbeatPayload>,
) -> Result<StatusCode, AppError> {
    payload.validate().map_err(AppError::ValidationFailure)?;

    if state.pool_saturated() {
        return Err(AppError::Backpressure { retry_after_secs: 2 });
    }

    let device = state.device_repo.get_by_id(&identity.device_id).await?;
    if device.token_revoked_at.is_some() {
        return Err(AppError::TokenRevoked);
    }

    let started = std::time::Instant::now();
    let outcome = state
        .heartbeat_repo
        .ingest(
            &identity.device_id,
            &payload,
            device.monitored_package.as_deref(),
            device.threshold_minutes,
            device.monitoring_enabled,
        )
        .await?;
    HB_WRITE_LATENCY_MS.observe(started.elapsed().as_secs_f64() * 1000.0);

    if outcome.inserted {
        HEARTBEATS_ACCEPTED.inc();
    } else {
        HEARTBEATS_DEDUPED.inc();
    }

    state.device_repo.touch_last_heartbeat(&identity.device_id, payload.ts).await?;

    if outcome.previous_service_up != Some(outcome.new_service_up) {
        let event = match outcome.new_service_up {
            ServiceUp::True => Some(DeviceEvent::ServiceUp {
                device_id: identity.device_id.clone(),
                at: Utc::now(),
            }),
            ServiceUp::False => Some(DeviceEvent::ServiceDown {
                device_id: identity.device_id.clone(),
                at: Utc::now(),
            }),
            ServiceUp::Unknown => None,
        };
        if let Some(event) = event {
            state.event_bus.publish(event);
        }
    }

    Ok(StatusCode::OK)
}
