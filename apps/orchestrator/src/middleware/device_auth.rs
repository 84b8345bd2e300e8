//! Device bearer-token authentication: `{token_id}.{secret}` looked up by
//! `token_id` then verified against the bcrypt hash, per §4.7.

use crate::state::AppState;
use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use mdm_crypto::{split_bearer_token, verify_secret};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct DeviceIdentity {
    pub device_id: String,
}

pub async fn device_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Result<Response, StatusCode> {
    let token_raw = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let (token_id, secret) = split_bearer_token(token_raw).map_err(|_| StatusCode::UNAUTHORIZED)?;

    let device = state
        .device_repo
        .get_by_token_id(token_id)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    if device.token_revoked_at.is_some() {
        warn!(device_id = %device.device_id, "rejected revoked device token");
        return Err(StatusCode::GONE);
    }

    let verified = verify_secret(secret, &device.token_hash).map_err(|_| StatusCode::UNAUTHORIZED)?;
    if !verified {
        return Err(StatusCode::UNAUTHORIZED);
    }

    req.extensions_mut().insert(DeviceIdentity {
        device_id: device.device_id,
    });
    Ok(next.run(req).await)
}
