//! Perimeter guards: liveness, device bearer-token auth, admin key auth,
//! and per-IP rate limiting.

pub mod admin_auth;
pub mod device_auth;
pub mod rate_limit;

use crate::state::AppState;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::warn;

pub use admin_auth::admin_auth;
pub use device_auth::{device_auth, DeviceIdentity};
pub use rate_limit::general_rate_limit;

/// Rejects traffic with 503 while the process is in `SystemMode::Maintenance`.
pub async fn health_guard(State(state): State<AppState>, req: Request, next: Next) -> Response {
    if let Err(reason) = state.is_operational() {
        warn!(%reason, "rejecting request, system in maintenance mode");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": "maintenance", "reason": reason })),
        )
            .into_response();
    }
    next.run(req).await
}
