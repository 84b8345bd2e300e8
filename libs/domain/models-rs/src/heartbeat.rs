//! Append-only heartbeat rows and the wire payload devices POST.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// `POST /v1/heartbeat` body.
#[derive(Debug, Clone, Deserialize)]
pub struct HeartbeatPayload {
    pub ts: DateTime<Utc>,
    pub battery_pct: i16,
    pub charging: bool,
    pub network_type: String,
    pub signal_dbm: i16,
    pub uptime_s: i64,
    pub ram_used_mb: i32,
    pub agent_version: String,
    /// Negative (or absent) means "unknown" per §4.1.
    #[serde(default = "default_unknown_recency")]
    pub monitored_foreground_recent_s: i64,
    #[serde(default)]
    pub app_versions: HashMap<String, AppVersionInfo>,
}

fn default_unknown_recency() -> i64 {
    -1
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppVersionInfo {
    pub installed: bool,
    #[serde(default)]
    pub version_code: Option<i64>,
    #[serde(default)]
    pub version_name: Option<String>,
}

impl HeartbeatPayload {
    /// Fields required for validation beyond what serde's `Deserialize`
    /// already enforces (range checks, not just type checks).
    pub fn validate(&self) -> Result<(), String> {
        if !(0..=100).contains(&self.battery_pct) {
            return Err("battery_pct out of range".into());
        }
        if self.network_type.trim().is_empty() {
            return Err("network_type must not be empty".into());
        }
        if self.agent_version.trim().is_empty() {
            return Err("agent_version must not be empty".into());
        }
        Ok(())
    }

    /// Whether the payload reports the monitored package as installed.
    pub fn monitored_app_installed(&self, monitored_package: Option<&str>) -> bool {
        match monitored_package {
            Some(pkg) => self
                .app_versions
                .get(pkg)
                .map(|info| info.installed)
                .unwrap_or(false),
            None => false,
        }
    }

    /// Whether the foreground-recency field should be treated as unknown.
    pub fn foreground_recency_unknown(&self) -> bool {
        self.monitored_foreground_recent_s < 0
    }

    /// The 10-second dedupe bucket this heartbeat falls into, per §4.1:
    /// `(minute-of-timestamp, floor(seconds/10))`.
    pub fn dedupe_bucket(&self) -> DedupeBucket {
        DedupeBucket::from_timestamp(self.ts)
    }
}

/// `(device-id, minute, bucket-in-minute)` triple backing the unique index
/// that absorbs retried heartbeats within the same 10-second window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DedupeBucket {
    pub minute_epoch: i64,
    pub bucket_in_minute: i8,
}

impl DedupeBucket {
    pub fn from_timestamp(ts: DateTime<Utc>) -> Self {
        let epoch_seconds = ts.timestamp();
        let minute_epoch = epoch_seconds.div_euclid(60);
        let second_of_minute = epoch_seconds.rem_euclid(60);
        let bucket_in_minute = (second_of_minute / 10) as i8;
        Self {
            minute_epoch,
            bucket_in_minute,
        }
    }
}

/// One row in the day's heartbeat partition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartbeatRecord {
    pub id: i64,
    pub device_id: String,
    pub ts: DateTime<Utc>,
    pub battery_pct: i16,
    pub charging: bool,
    pub network_type: String,
    pub signal_dbm: i16,
    pub uptime_s: i64,
    pub ram_used_mb: i32,
    pub monitored_foreground_recent_s: i64,
    pub agent_version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn same_ten_second_window_shares_a_bucket() {
        let base = chrono::Utc.with_ymd_and_hms(2026, 7, 28, 10, 30, 1).unwrap();
        let later = chrono::Utc.with_ymd_and_hms(2026, 7, 28, 10, 30, 9).unwrap();
        assert_eq!(
            DedupeBucket::from_timestamp(base),
            DedupeBucket::from_timestamp(later)
        );
    }

    #[test]
    fn crossing_a_ten_second_boundary_changes_the_bucket() {
        let before = chrono::Utc.with_ymd_and_hms(2026, 7, 28, 10, 30, 9).unwrap();
        let after = chrono::Utc.with_ymd_and_hms(2026, 7, 28, 10, 30, 10).unwrap();
        assert_ne!(
            DedupeBucket::from_timestamp(before),
            DedupeBucket::from_timestamp(after)
        );
    }
}
