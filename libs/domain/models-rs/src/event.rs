//! WebSocket event envelope broadcast on `/ws/admin`, per §4.7 / §6.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeviceEvent {
    #[serde(rename = "device.online")]
    DeviceOnline { device_id: String, at: DateTime<Utc> },
    #[serde(rename = "device.offline")]
    DeviceOffline { device_id: String, at: DateTime<Utc> },
    #[serde(rename = "service.up")]
    ServiceUp { device_id: String, at: DateTime<Utc> },
    #[serde(rename = "service.down")]
    ServiceDown { device_id: String, at: DateTime<Utc> },
    #[serde(rename = "command.result")]
    CommandResult {
        device_id: String,
        request_id: uuid::Uuid,
        outcome: String,
        at: DateTime<Utc>,
    },
    #[serde(rename = "install.progress")]
    InstallProgress {
        device_id: String,
        build_id: uuid::Uuid,
        stage: String,
        at: DateTime<Utc>,
    },
}
