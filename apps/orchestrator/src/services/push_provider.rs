//! Push delivery: signed dispatch payloads go out over a vendor push
//! service. The trait keeps that vendor behind one seam so tests and local
//! runs can swap in a fake without touching the dispatch service.

use async_trait::async_trait;
use mdm_domain::dispatch::truncate_preview;
use serde::Serialize;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{instrument, warn};

const PUSH_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Sent,
    TokenInvalid,
    Unreachable,
    Timeout,
    Failed,
}

/// What actually happened on the wire, carried back to the dispatch
/// service so the `command_dispatch` row records the provider's own
/// message id / HTTP status / response body rather than nulls.
#[derive(Debug, Clone, Default)]
pub struct PushSendResult {
    pub outcome_detail: Option<PushOutcome>,
    pub push_message_id: Option<String>,
    pub http_status: Option<i32>,
    pub result_message: Option<String>,
}

impl PushSendResult {
    fn new(outcome: PushOutcome) -> Self {
        Self {
            outcome_detail: Some(outcome),
            ..Default::default()
        }
    }

    pub fn outcome(&self) -> PushOutcome {
        self.outcome_detail.unwrap_or(PushOutcome::Unreachable)
    }
}

#[derive(Debug, Serialize)]
pub struct PushPayload<'a> {
    pub request_id: uuid::Uuid,
    pub action: &'a str,
    pub signed_envelope: &'a serde_json::Value,
}

#[async_trait]
pub trait PushProvider: Send + Sync {
    async fn send(&self, device_push_token: &str, payload: &PushPayload<'_>) -> PushSendResult;
}

/// reqwest-backed implementation posting to a vendor push gateway.
/// `credentials` is an opaque bearer value read once at startup from
/// `PUSH_PROVIDER_CREDENTIALS`; the endpoint itself is a constant because
/// the spec names exactly one push backend, not a pluggable registry.
pub struct HttpPushProvider {
    client: reqwest::Client,
    endpoint: String,
    credentials: String,
}

impl HttpPushProvider {
    pub fn new(client: reqwest::Client, endpoint: String, credentials: String) -> Self {
        Self {
            client,
            endpoint,
            credentials,
        }
    }
}

#[async_trait]
impl PushProvider for HttpPushProvider {
    #[instrument(skip(self, payload))]
    async fn send(&self, device_push_token: &str, payload: &PushPayload<'_>) -> PushSendResult {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.credentials)
            .timeout(PUSH_REQUEST_TIMEOUT)
            .json(&serde_json::json!({
                "to": device_push_token,
                "data": payload,
            }))
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                let http_status = resp.status().as_u16() as i32;
                let push_message_id = resp
                    .headers()
                    .get("x-message-id")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                PushSendResult {
                    outcome_detail: Some(PushOutcome::Sent),
                    push_message_id,
                    http_status: Some(http_status),
                    result_message: None,
                }
            }
            Ok(resp) if resp.status() == reqwest::StatusCode::GONE => {
                let http_status = resp.status().as_u16() as i32;
                PushSendResult {
                    outcome_detail: Some(PushOutcome::TokenInvalid),
                    push_message_id: None,
                    http_status: Some(http_status),
                    result_message: None,
                }
            }
            Ok(resp) => {
                let http_status = resp.status().as_u16() as i32;
                warn!(status = %resp.status(), "push provider returned non-success status");
                let body = resp.text().await.unwrap_or_default();
                PushSendResult {
                    outcome_detail: Some(PushOutcome::Failed),
                    push_message_id: None,
                    http_status: Some(http_status),
                    result_message: Some(truncate_preview(&body)),
                }
            }
            Err(error) if error.is_timeout() => {
                warn!(%error, "push provider request timed out");
                let mut result = PushSendResult::new(PushOutcome::Timeout);
                result.result_message = Some(truncate_preview(&error.to_string()));
                result
            }
            Err(error) => {
                warn!(%error, "push provider request failed");
                let mut result = PushSendResult::new(PushOutcome::Unreachable);
                result.result_message = Some(truncate_preview(&error.to_string()));
                result
            }
        }
    }
}

/// In-memory fake recording every send for assertions in handler/service
/// tests, avoiding a live HTTP dependency.
pub struct FakePushProvider {
    pub sent: Mutex<Vec<(String, uuid::Uuid)>>,
    pub outcome: PushOutcome,
}

impl FakePushProvider {
    pub fn new(outcome: PushOutcome) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            outcome,
        }
    }
}

#[async_trait]
impl PushProvider for FakePushProvider {
    async fn send(&self, device_push_token: &str, payload: &PushPayload<'_>) -> PushSendResult {
        self.sent
            .lock()
            .expect("fake push provider lock poisoned")
            .push((device_push_token.to_string(), payload.request_id));
        PushSendResult::new(self.outcome)
    }
}
