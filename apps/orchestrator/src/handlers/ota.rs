//! OTA update surface: the device-facing manifest poll and the
//! operator-facing build registration / promote / rollout / rollback /
//! nudge endpoints, per §4.4.

use crate::error::AppError;
use crate::middleware::DeviceIdentity;
use crate::services::dispatch_service::dispatch_one;
use crate::state::AppState;
use axum::extract::{Extension, Json, Path, Query, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use mdm_crypto::cohort::is_in_cohort;
use mdm_db::{DeploymentStatColumn, DbError};
use mdm_domain::dispatch::DispatchAction;
use mdm_domain::ota::{
    ManifestNotEligibleReason, ManifestQuery, OtaManifest, PromoteRequest, RollbackRequest,
    RolloutAdjustRequest,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

const MANIFEST_REASON_HEADER: &str = "x-manifest-reason";

#[instrument(skip(state), fields(device_id = %identity.device_id))]
pub async fn get_manifest(
    State(state): State<AppState>,
    Extension(identity): Extension<DeviceIdentity>,
    Query(query): Query<ManifestQuery>,
) -> Result<Response, AppError> {
    let Some(build) = state.ota_repo.current_for_package(&query.package_name).await? else {
        return Ok(not_eligible(ManifestNotEligibleReason::NoCurrentBuild));
    };

    state.ota_repo.increment_stat(build.build_id, DeploymentStatColumn::TotalChecks).await?;

    if query.current_version_code >= build.version_code {
        return Ok(not_eligible(ManifestNotEligibleReason::UpToDate));
    }

    if !is_in_cohort(&identity.device_id, build.staged_rollout_percent) {
        return Ok(not_eligible(ManifestNotEligibleReason::NotInCohort));
    }

    state.ota_repo.increment_stat(build.build_id, DeploymentStatColumn::TotalEligible).await?;

    let manifest = OtaManifest {
        build_id: build.build_id,
        version_code: build.version_code,
        version_name: build.version_name,
        download_url: state.artifact_store.presign_url(&build.storage_url),
        sha256: build.sha256,
        signer_fingerprint: build.signer_fingerprint,
        wifi_only: build.wifi_only,
        must_install: build.must_install,
        effective_rollout_percent: build.staged_rollout_percent,
    };

    Ok((StatusCode::OK, Json(manifest)).into_response())
}

fn not_eligible(reason: ManifestNotEligibleReason) -> Response {
    let mut response = StatusCode::NOT_MODIFIED.into_response();
    if let Ok(value) = HeaderValue::from_str(reason.as_str()) {
        response.headers_mut().insert(MANIFEST_REASON_HEADER, value);
    }
    response
}

#[derive(Debug, Deserialize)]
pub struct RegisterBuildRequest {
    pub package_name: String,
    pub version_code: i64,
    pub version_name: String,
    pub sha256: String,
    pub signer_fingerprint: String,
    pub storage_url: String,
}

#[instrument(skip(state, request))]
pub async fn register_build(
    State(state): State<AppState>,
    Json(request): Json<RegisterBuildRequest>,
) -> Result<Json<mdm_domain::ota::OtaBuild>, AppError> {
    let build = state
        .ota_repo
        .register_build(
            &request.package_name,
            request.version_code,
            &request.version_name,
            &request.sha256,
            &request.signer_fingerprint,
            &request.storage_url,
        )
        .await?;
    Ok(Json(build))
}

#[instrument(skip(state, request))]
pub async fn promote_build(
    State(state): State<AppState>,
    Json(request): Json<PromoteRequest>,
) -> Result<Json<mdm_domain::ota::OtaBuild>, AppError> {
    mdm_domain::ota::OtaBuild::validate_rollout_percent(request.staged_rollout_percent)
        .map_err(AppError::ValidationFailure)?;
    let build = state
        .ota_repo
        .promote(request.build_id, request.staged_rollout_percent, &request.promoted_by)
        .await?;
    Ok(Json(build))
}

#[instrument(skip(state, request))]
pub async fn adjust_rollout(
    State(state): State<AppState>,
    Json(request): Json<RolloutAdjustRequest>,
) -> Result<StatusCode, AppError> {
    mdm_domain::ota::OtaBuild::validate_rollout_percent(request.staged_rollout_percent)
        .map_err(AppError::ValidationFailure)?;
    state
        .ota_repo
        .adjust_rollout(request.build_id, request.staged_rollout_percent)
        .await?;
    Ok(StatusCode::OK)
}

#[instrument(skip(state, request))]
pub async fn rollback_build(
    State(state): State<AppState>,
    Json(request): Json<RollbackRequest>,
) -> Result<Json<mdm_domain::ota::OtaBuild>, AppError> {
    mdm_domain::ota::OtaBuild::validate_rollout_percent(request.staged_rollout_percent)
        .map_err(AppError::ValidationFailure)?;
    let build = state
        .ota_repo
        .rollback(
            &request.package_name,
            request.staged_rollout_percent,
            request.must_install,
            &request.promoted_by,
        )
        .await?;
    Ok(Json(build))
}

#[derive(Debug, Deserialize)]
pub struct NudgeRequest {
    pub package_name: String,
    #[serde(default)]
    pub device_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct NudgeResponse {
    pub dispatched: usize,
}

/// Fan-out of an `update` command, reusing the single-command dispatch
/// primitive rather than the bulk-execution bookkeeping (a nudge doesn't
/// track a parent execution record, just best-effort pushes).
#[instrument(skip(state, request))]
pub async fn nudge(
    State(state): State<AppState>,
    Json(request): Json<NudgeRequest>,
) -> Result<Json<NudgeResponse>, AppError> {
    let targets = if request.device_ids.is_empty() {
        state.device_repo.list_with_push_token(false, 0).await?
    } else {
        request.device_ids.clone()
    };

    let devices = state.device_repo.list_by_ids(&targets).await?;
    let mut dispatched = 0usize;
    for device in &devices {
        let outcome = dispatch_one(
            &state.dispatch_repo,
            &state.hmac_keyring,
            state.push_provider.as_ref(),
            &device.device_id,
            device.push_token.as_deref(),
            DispatchAction::Update,
            json!({ "package_name": request.package_name }),
            None,
            None,
        )
        .await;
        if outcome.is_ok() {
            dispatched += 1;
        }
    }

    Ok(Json(NudgeResponse { dispatched }))
}

#[derive(Debug, Deserialize)]
pub struct InstallReportRequest {
    pub build_id: Uuid,
    pub outcome: InstallOutcome,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallOutcome {
    DownloadComplete,
    InstallSuccess,
    InstallFailed,
    VerifyFailed,
}

/// Device-reported install-pipeline progress, bumping the matching
/// deployment-stats counter and fanning out an `install.progress` event.
#[instrument(skip(state), fields(device_id = %identity.device_id))]
pub async fn report_install_progress(
    State(state): State<AppState>,
    Extension(identity): Extension<DeviceIdentity>,
    Json(request): Json<InstallReportRequest>,
) -> Result<StatusCode, AppError> {
    let column = match request.outcome {
        InstallOutcome::DownloadComplete => DeploymentStatColumn::TotalDownloads,
        InstallOutcome::InstallSuccess => DeploymentStatColumn::InstallsSuccess,
        InstallOutcome::InstallFailed => DeploymentStatColumn::InstallsFailed,
        InstallOutcome::VerifyFailed => DeploymentStatColumn::VerifyFailed,
    };

    match state.ota_repo.get(request.build_id).await {
        Ok(_) => {}
        Err(DbError::BuildNotFound) => return Err(AppError::NotFound),
        Err(error) => return Err(error.into()),
    }
    state.ota_repo.increment_stat(request.build_id, column).await?;

    let stage = match request.outcome {
        InstallOutcome::DownloadComplete => "download_complete",
        InstallOutcome::InstallSuccess => "install_success",
        InstallOutcome::InstallFailed => "install_failed",
        InstallOutcome::VerifyFailed => "verify_failed",
    };
    state.event_bus.publish(mdm_domain::event::DeviceEvent::InstallProgress {
        device_id: identity.device_id.clone(),
        build_id: request.build_id,
        stage: stage.to_string(),
        at: chrono::Utc::now(),
    });

    Ok(StatusCode::OK)
}

#[instrument(skip(state))]
pub async fn get_deployment_stats(
    State(state): State<AppState>,
    Path(build_id): Path<Uuid>,
) -> Result<Json<mdm_domain::ota::DeploymentStats>, AppError> {
    let stats = state.ota_repo.get_stats(build_id).await?;
    Ok(Json(stats))
}
