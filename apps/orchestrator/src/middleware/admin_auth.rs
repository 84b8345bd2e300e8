//! Admin-key authentication for the operator-facing endpoints (command
//! dispatch, bulk ops, OTA rollout control, manual job triggers).

use crate::state::AppState;
use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use subtle::ConstantTimeEq;

pub async fn admin_auth(State(state): State<AppState>, req: Request, next: Next) -> Result<Response, StatusCode> {
    let provided = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let matches: bool = provided
        .as_bytes()
        .ct_eq(state.config.admin_key.as_bytes())
        .into();
    if !matches {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(next.run(req).await)
}
