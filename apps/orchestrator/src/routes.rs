//! Route topology and middleware layering. Device-facing routes sit
//! behind `device_auth`; operator-facing routes sit behind `admin_auth`.
//! Both groups pass through the maintenance liveness gate and the general
//! rate limiter; `/ws/admin` carries its own query-string auth and is
//! mounted outside both middleware stacks.

use crate::handlers::{action_result, admin, dispatch, heartbeat, metrics, ota, ws};
use crate::middleware::{admin_auth, device_auth, general_rate_limit, health_guard};
use crate::state::AppState;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{middleware, Router};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

const MAX_BODY_BYTES: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let device_routes = Router::new()
        .route("/heartbeat", post(heartbeat::ingest_heartbeat))
        .route("/action-result", post(action_result::submit_action_result))
        .route("/agent/update", get(ota::get_manifest))
        .route("/agent/install-progress", post(ota::report_install_progress))
        .layer(middleware::from_fn_with_state(state.clone(), device_auth));

    let admin_routes = Router::new()
        .route("/devices/:device_id/command", post(dispatch::dispatch_single_command))
        .route("/remote-exec", post(dispatch::dispatch_bulk))
        .route("/ota/builds", post(ota::register_build))
        .route("/ota/builds/:build_id/stats", get(ota::get_deployment_stats))
        .route("/ota/promote", post(ota::promote_build))
        .route("/ota/rollout", post(ota::adjust_rollout))
        .route("/ota/rollback", post(ota::rollback_build))
        .route("/ota/nudge", post(ota::nudge))
        .route("/admin/pool", get(admin::get_pool_health))
        .route("/admin/mode", get(admin::get_system_mode).post(admin::set_system_mode))
        .route("/admin/jobs/alert-tick", post(admin::trigger_alert_tick))
        .route("/admin/jobs/reconciliation", post(admin::trigger_reconciliation))
        .route("/admin/jobs/partition-maintenance", post(admin::trigger_partition_maintenance))
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth));

    let metrics_routes = Router::new()
        .route("/metrics", get(metrics::scrape))
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth));

    let v1 = Router::new()
        .merge(device_routes)
        .merge(admin_routes)
        .layer(middleware::from_fn_with_state(state.clone(), health_guard))
        .layer(middleware::from_fn_with_state(state.clone(), general_rate_limit));

    Router::new()
        .route("/healthz", get(|| async { StatusCode::OK }))
        .nest("/v1", v1)
        .merge(metrics_routes)
        .route("/ws/admin", get(ws::upgrade))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
