//! Command dispatch, bulk execution, and the device-acknowledgement wire shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The allow-listed action set; §4.2 forbids anything outside this closed
/// enum from reaching the push provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchAction {
    Ping,
    Ring,
    LaunchApp,
    InstallApk,
    Update,
    GrantPermissions,
    WifiConnect,
    /// Allow-listed shell subset only; never an arbitrary interactive shell.
    ExecShell,
}

impl DispatchAction {
    pub fn as_str(self) -> &'static str {
        match self {
            DispatchAction::Ping => "ping",
            DispatchAction::Ring => "ring",
            DispatchAction::LaunchApp => "launch_app",
            DispatchAction::InstallApk => "install_apk",
            DispatchAction::Update => "update",
            DispatchAction::GrantPermissions => "grant_permissions",
            DispatchAction::WifiConnect => "wifi_connect",
            DispatchAction::ExecShell => "exec_shell",
        }
    }
}

impl fmt::Display for DispatchAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal and non-terminal states of a single dispatch row, per the §4.2
/// state machine: `pending -> (sent | failed | timeout)`, then for
/// push-and-ack actions `sent -> (ok | failed | denied | timeout)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchResult {
    Pending,
    Sent,
    Ok,
    Failed,
    Timeout,
    Denied,
}

impl DispatchResult {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            DispatchResult::Ok | DispatchResult::Failed | DispatchResult::Timeout | DispatchResult::Denied
        )
    }
}

/// A single HMAC-signed dispatch row, keyed by request-id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandDispatch {
    pub request_id: uuid::Uuid,
    pub device_id: String,
    pub action: DispatchAction,
    pub payload: serde_json::Value,
    pub sent_at: DateTime<Utc>,
    pub push_message_id: Option<String>,
    pub push_http_status: Option<i32>,
    pub result: DispatchResult,
    pub result_message: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub retry_count: i32,
    pub payload_hash: String,
    pub exec_id: Option<uuid::Uuid>,
}

/// `POST /v1/devices/{id}/command` request body.
#[derive(Debug, Clone, Deserialize)]
pub struct SingleCommandRequest {
    pub action: DispatchAction,
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// Target selector for a bulk fan-out, per `POST /v1/remote-exec`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkTarget {
    All { all: bool },
    Filter { filter: BulkFilter },
    Aliases { aliases: Vec<String> },
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkFilter {
    #[serde(default)]
    pub online: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkMode {
    Push,
    Shell,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkDispatchRequest {
    pub mode: BulkMode,
    pub action: Option<DispatchAction>,
    pub command: Option<String>,
    pub targets: BulkTarget,
    #[serde(default)]
    pub payload: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkStatus {
    Running,
    Completed,
    Failed,
}

/// Parent record for a bulk/remote-exec run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkExecution {
    pub exec_id: uuid::Uuid,
    pub mode: BulkMode,
    pub raw_request: serde_json::Value,
    pub target_spec: serde_json::Value,
    pub sent: i32,
    pub acked: i32,
    pub errored: i32,
    pub status: BulkStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// `POST /v1/action-result` request body.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionResultPayload {
    pub request_id: uuid::Uuid,
    #[serde(rename = "type")]
    pub ack_type: String,
    pub status: AckStatus,
    pub exit_code: Option<i32>,
    pub output: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AckStatus {
    Ok,
    Failed,
    Denied,
    Timeout,
}

impl AckStatus {
    pub fn into_dispatch_result(self) -> DispatchResult {
        match self {
            AckStatus::Ok => DispatchResult::Ok,
            AckStatus::Failed => DispatchResult::Failed,
            AckStatus::Denied => DispatchResult::Denied,
            AckStatus::Timeout => DispatchResult::Timeout,
        }
    }

    /// Whether the outcome counts toward the parent's `acked` or `errored`
    /// counter, per the §3 Bulk execution record invariant.
    pub fn counts_as_ack(self) -> bool {
        matches!(self, AckStatus::Ok)
    }
}

/// Output preview truncation limit (§4.2: "output preview (≤ 2 KiB)").
pub const OUTPUT_PREVIEW_MAX_BYTES: usize = 2048;

pub fn truncate_preview(s: &str) -> String {
    if s.len() <= OUTPUT_PREVIEW_MAX_BYTES {
        s.to_string()
    } else {
        let mut end = OUTPUT_PREVIEW_MAX_BYTES;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        s[..end].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_ok_counts_as_ack() {
        assert!(AckStatus::Ok.counts_as_ack());
        assert!(!AckStatus::Failed.counts_as_ack());
        assert!(!AckStatus::Denied.counts_as_ack());
        assert!(!AckStatus::Timeout.counts_as_ack());
    }

    #[test]
    fn ack_status_maps_onto_matching_dispatch_result() {
        assert_eq!(AckStatus::Ok.into_dispatch_result(), DispatchResult::Ok);
        assert_eq!(AckStatus::Failed.into_dispatch_result(), DispatchResult::Failed);
        assert_eq!(AckStatus::Denied.into_dispatch_result(), DispatchResult::Denied);
        assert_eq!(AckStatus::Timeout.into_dispatch_result(), DispatchResult::Timeout);
    }

    #[test]
    fn dispatch_result_terminality() {
        assert!(!DispatchResult::Pending.is_terminal());
        assert!(!DispatchResult::Sent.is_terminal());
        assert!(DispatchResult::Ok.is_terminal());
        assert!(DispatchResult::Failed.is_terminal());
        assert!(DispatchResult::Timeout.is_terminal());
        assert!(DispatchResult::Denied.is_terminal());
    }

    #[test]
    fn preview_under_limit_is_unchanged() {
        let short = "hello world";
        assert_eq!(truncate_preview(short), short);
    }

    #[test]
    fn preview_over_limit_is_truncated_to_max_bytes() {
        let long = "a".repeat(OUTPUT_PREVIEW_MAX_BYTES + 500);
        let truncated = truncate_preview(&long);
        assert_eq!(truncated.len(), OUTPUT_PREVIEW_MAX_BYTES);
    }

    #[test]
    fn preview_truncation_respects_utf8_boundaries() {
        let long = "é".repeat(OUTPUT_PREVIEW_MAX_BYTES);
        let truncated = truncate_preview(&long);
        assert!(truncated.len() <= OUTPUT_PREVIEW_MAX_BYTES);
        assert!(truncated.is_char_boundary(truncated.len()));
    }
}
