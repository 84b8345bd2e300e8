//! Partition catalog: lifecycle of the per-day heartbeat partitions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionState {
    Active,
    Archived,
    ArchiveFailed,
    Dropped,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionCatalogEntry {
    pub name: String,
    pub range_start: NaiveDate,
    pub range_end: NaiveDate,
    pub state: PartitionState,
    pub row_count: Option<i64>,
    pub byte_size: Option<i64>,
    pub checksum_sha256: Option<String>,
    pub archive_url: Option<String>,
    pub error_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PartitionCatalogEntry {
    pub fn name_for_date(date: NaiveDate) -> String {
        format!("heartbeats_{}", date.format("%Y%m%d"))
    }

    pub fn archive_path(&self) -> String {
        format!(
            "device_heartbeats_{}.csv.gz",
            self.range_start.format("%Y%m%d")
        )
    }

    /// Valid forward transitions, per §3: monotonic except
    /// `archive_failed -> active` (retry).
    pub fn can_transition_to(&self, next: PartitionState) -> bool {
        use PartitionState::*;
        matches!(
            (self.state, next),
            (Active, Archived)
                | (Active, ArchiveFailed)
                | (Archived, Dropped)
                | (ArchiveFailed, Active)
                | (ArchiveFailed, ArchiveFailed)
        )
    }
}

/// Opaque frozen device-id list used so a long-running bulk operation
/// targets a stable set even if the fleet changes mid-flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSelectionSnapshot {
    pub snapshot_id: uuid::Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub device_ids: Vec<String>,
}

pub const DEVICE_SELECTION_SNAPSHOT_TTL_MINUTES: i64 = 15;

impl DeviceSelectionSnapshot {
    pub fn new(device_ids: Vec<String>, now: DateTime<Utc>) -> Self {
        Self {
            snapshot_id: uuid::Uuid::new_v4(),
            created_at: now,
            expires_at: now + chrono::Duration::minutes(DEVICE_SELECTION_SNAPSHOT_TTL_MINUTES),
            device_ids,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
