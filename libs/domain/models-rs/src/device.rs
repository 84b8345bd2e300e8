//! Device registration, monitoring configuration, and the last-status projection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single enrolled Android endpoint.
///
/// The bcrypt hash and `token_id` prefix are never serialized back to API
/// callers; this type represents the authoritative row, not the wire DTO.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub device_id: String,
    pub alias: String,
    /// Short indexed prefix of the bearer token, used for O(1) lookup before
    /// the constant-time bcrypt comparison of the remainder.
    pub token_id: String,
    #[serde(skip_serializing)]
    pub token_hash: String,
    pub token_revoked_at: Option<DateTime<Utc>>,
    pub push_token: Option<String>,
    pub monitored_package: Option<String>,
    pub monitored_display_name: Option<String>,
    pub threshold_minutes: i32,
    pub monitoring_enabled: bool,
    pub last_heartbeat_at: Option<DateTime<Utc>>,
    pub device_owner_mode: bool,
    pub created_at: DateTime<Utc>,
}

impl Device {
    pub fn threshold_seconds(&self) -> i64 {
        i64::from(self.threshold_minutes) * 60
    }
}

/// Tri-state health of the monitored package, derived on every heartbeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceUp {
    True,
    False,
    Unknown,
}

impl ServiceUp {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceUp::True => "true",
            ServiceUp::False => "false",
            ServiceUp::Unknown => "unknown",
        }
    }

    pub fn from_str(value: &str) -> Self {
        match value {
            "true" => ServiceUp::True,
            "false" => ServiceUp::False,
            _ => ServiceUp::Unknown,
        }
    }

    /// Tri-state evaluation per §4.1: unknown whenever the monitored app
    /// isn't installed or its foreground recency wasn't reported, never a
    /// hard `false` from absence of signal alone.
    pub fn evaluate(app_installed: bool, foreground_recency_unknown: bool, foreground_recency_s: i64, threshold_s: i64) -> Self {
        if !app_installed || foreground_recency_unknown {
            ServiceUp::Unknown
        } else if foreground_recency_s <= threshold_s {
            ServiceUp::True
        } else {
            ServiceUp::False
        }
    }
}

/// One row per device: the read-optimized projection of the most recent
/// heartbeat, kept in sync under the ordering guard in §4.1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastStatus {
    pub device_id: String,
    pub last_ts: DateTime<Utc>,
    pub battery_pct: i16,
    pub charging: bool,
    pub network_type: String,
    pub signal_dbm: i16,
    pub uptime_s: i64,
    pub ram_used_mb: i32,
    /// Raw foreground recency as reported; negative means "unknown".
    pub monitored_foreground_recent_s: i64,
    pub agent_version: String,
    pub service_up: ServiceUp,
    /// Threshold (minutes) snapshot at evaluation time, so changing a
    /// device's threshold takes effect on the *next* heartbeat without a
    /// recompute pass over history.
    pub threshold_minutes_snapshot: i32,
    pub updated_at: DateTime<Utc>,
}

/// Minimal registration payload for a device enrolling into the fleet.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceEnrollment {
    pub alias: String,
    pub monitored_package: Option<String>,
    pub monitored_display_name: Option<String>,
    pub threshold_minutes: i32,
}

impl DeviceEnrollment {
    pub fn validate(&self) -> Result<(), String> {
        if self.alias.trim().is_empty() {
            return Err("alias must not be empty".into());
        }
        if !(1..=120).contains(&self.threshold_minutes) {
            return Err("threshold_minutes must be in [1,120]".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_up_is_unknown_when_app_not_installed() {
        assert_eq!(ServiceUp::evaluate(false, false, 0, 600), ServiceUp::Unknown);
    }

    #[test]
    fn service_up_is_unknown_when_recency_unreported() {
        assert_eq!(ServiceUp::evaluate(true, true, 0, 600), ServiceUp::Unknown);
    }

    #[test]
    fn service_up_is_true_within_threshold() {
        assert_eq!(ServiceUp::evaluate(true, false, 300, 600), ServiceUp::True);
    }

    #[test]
    fn service_up_is_true_exactly_at_threshold() {
        assert_eq!(ServiceUp::evaluate(true, false, 600, 600), ServiceUp::True);
    }

    #[test]
    fn service_up_is_false_past_threshold() {
        assert_eq!(ServiceUp::evaluate(true, false, 601, 600), ServiceUp::False);
    }

    #[test]
    fn enrollment_rejects_blank_alias() {
        let enrollment = DeviceEnrollment {
            alias: "   ".to_string(),
            monitored_package: None,
            monitored_display_name: None,
            threshold_minutes: 20,
        };
        assert!(enrollment.validate().is_err());
    }

    #[test]
    fn enrollment_rejects_threshold_out_of_range() {
        let mut enrollment = DeviceEnrollment {
            alias: "pixel-7".to_string(),
            monitored_package: None,
            monitored_display_name: None,
            threshold_minutes: 0,
        };
        assert!(enrollment.validate().is_err());
        enrollment.threshold_minutes = 121;
        assert!(enrollment.validate().is_err());
        enrollment.threshold_minutes = 120;
        assert!(enrollment.validate().is_ok());
    }
}
