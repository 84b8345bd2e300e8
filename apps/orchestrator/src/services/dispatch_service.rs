//! Shared command-dispatch primitive: sign, persist, push. The single
//! command handler, alert auto-remediation, and OTA nudges funnel through
//! `dispatch_one`; the bulk dispatcher needs a bookkeeping row in between
//! signing and sending, so it calls `create_dispatch_record` and
//! `send_dispatch_record` directly. Either way the signing/persistence/
//! push sequence only lives in one place.

use crate::services::push_provider::{PushOutcome, PushPayload, PushProvider};
use chrono::Utc;
use mdm_crypto::{rfc3339_seconds, HmacKeyring};
use mdm_db::{DbError, DispatchRepository};
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::instrument;
use uuid::Uuid;

pub struct DispatchOutcome {
    pub request_id: Uuid,
    pub push_outcome: PushOutcome,
}

/// A signed command already persisted to `command_dispatch`, not yet sent.
/// Split out of `dispatch_one` so a caller dispatching to many devices can
/// insert its own bookkeeping row that foreign-keys against `request_id`
/// (e.g. `bulk_execution_result`) before the slow, possibly-failing push
/// attempt, while still guaranteeing `command_dispatch` exists first.
pub struct DispatchRecord {
    pub request_id: Uuid,
    envelope: serde_json::Value,
}

/// Signs and records one command against `device_id`. Fast and
/// network-free: only a couple of inserts and an HMAC computation, safe to
/// call ahead of any per-device bookkeeping that needs `request_id` to
/// already exist in `command_dispatch`.
#[instrument(skip(dispatch_repo, hmac_keyring, action_payload))]
pub async fn create_dispatch_record(
    dispatch_repo: &DispatchRepository,
    hmac_keyring: &HmacKeyring,
    device_id: &str,
    action: mdm_domain::dispatch::DispatchAction,
    action_payload: &serde_json::Value,
    bulk_execution_id: Option<Uuid>,
    request_id: Option<Uuid>,
) -> Result<DispatchRecord, DbError> {
    let request_id = request_id.unwrap_or_else(Uuid::new_v4);
    let now = Utc::now();
    let payload_hash = hex::encode(Sha256::digest(action_payload.to_string().as_bytes()));

    dispatch_repo
        .create(request_id, device_id, action, action_payload, &payload_hash, bulk_execution_id)
        .await?;

    let signature = hmac_keyring
        .sign(&request_id.to_string(), device_id, action.as_str(), now)
        .map_err(|e| DbError::Mapping(e.to_string()))?;

    // Same formatting as the signed message: a device reconstructing the
    // canonical string from this envelope's own `ts` must land on the
    // exact bytes that were signed.
    let envelope = json!({
        "request_id": request_id,
        "device_id": device_id,
        "action": action.as_str(),
        "ts": rfc3339_seconds(now),
        "signature": signature,
        "payload": action_payload,
    });

    Ok(DispatchRecord { request_id, envelope })
}

/// Attempts push delivery for an already-created record and records the
/// outcome. A missing push token or an unreachable provider still leaves a
/// valid, queryable `command_dispatch` row in `sent`/`pending` state, per
/// §4.2's at-least-once delivery note.
#[instrument(skip(dispatch_repo, push_provider, record))]
pub async fn send_dispatch_record(
    dispatch_repo: &DispatchRepository,
    push_provider: &dyn PushProvider,
    record: &DispatchRecord,
    action: mdm_domain::dispatch::DispatchAction,
    device_push_token: Option<&str>,
) -> Result<DispatchOutcome, DbError> {
    let send_result = match device_push_token {
        Some(token) => {
            let payload = PushPayload {
                request_id: record.request_id,
                action: action.as_str(),
                signed_envelope: &record.envelope,
            };
            push_provider.send(token, &payload).await
        }
        None => crate::services::push_provider::PushSendResult::default(),
    };
    let push_outcome = send_result.outcome();

    let dispatch_result = match push_outcome {
        PushOutcome::Sent => mdm_domain::dispatch::DispatchResult::Sent,
        PushOutcome::TokenInvalid | PushOutcome::Unreachable => mdm_domain::dispatch::DispatchResult::Pending,
        PushOutcome::Timeout => mdm_domain::dispatch::DispatchResult::Timeout,
        PushOutcome::Failed => mdm_domain::dispatch::DispatchResult::Failed,
    };

    dispatch_repo
        .record_push_response(
            record.request_id,
            dispatch_result,
            send_result.push_message_id.as_deref(),
            send_result.http_status,
            send_result.result_message.as_deref(),
        )
        .await?;

    Ok(DispatchOutcome {
        request_id: record.request_id,
        push_outcome,
    })
}

/// Signs, records, and sends one command in one call: the combined path
/// used wherever no intermediate bookkeeping row needs `request_id` to
/// exist before the push attempt (the single-device handler, alert
/// auto-remediation, OTA nudges).
#[instrument(skip(dispatch_repo, hmac_keyring, push_provider, action_payload))]
#[allow(clippy::too_many_arguments)]
pub async fn dispatch_one(
    dispatch_repo: &DispatchRepository,
    hmac_keyring: &HmacKeyring,
    push_provider: &dyn PushProvider,
    device_id: &str,
    device_push_token: Option<&str>,
    action: mdm_domain::dispatch::DispatchAction,
    action_payload: serde_json::Value,
    bulk_execution_id: Option<Uuid>,
    request_id: Option<Uuid>,
) -> Result<DispatchOutcome, DbError> {
    let record = create_dispatch_record(
        dispatch_repo,
        hmac_keyring,
        device_id,
        action,
        &action_payload,
        bulk_execution_id,
        request_id,
    )
    .await?;

    send_dispatch_record(dispatch_repo, push_provider, &record, action, device_push_token).await
}
