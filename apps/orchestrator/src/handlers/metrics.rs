//! `GET /metrics`: Prometheus text exposition, admin-auth protected.

use crate::error::AppError;
use crate::state::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use mdm_telemetry::metrics::{render, DB_POOL_IN_USE, DB_POOL_UTILIZATION_PCT};
use tracing::instrument;

#[instrument(skip(state))]
pub async fn scrape(State(state): State<AppState>) -> Result<Response, AppError> {
    DB_POOL_IN_USE.set(i64::from(state.db.in_use()));
    DB_POOL_UTILIZATION_PCT.set(i64::from(state.db.utilization_pct(state.config.db_max_connections)));

    let body = render().map_err(|e| AppError::UpstreamFailure(e.to_string()))?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
        .into_response())
}
