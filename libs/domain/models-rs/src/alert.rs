//! Alert condition state machine and notification shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertCondition {
    Offline,
    LowBattery,
    ServiceDown,
}

impl fmt::Display for AlertCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AlertCondition::Offline => "offline",
            AlertCondition::LowBattery => "low_battery",
            AlertCondition::ServiceDown => "service_down",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertPhase {
    Ok,
    Firing,
}

/// One row per (device, condition), per §3's Alert state entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertState {
    pub device_id: String,
    pub condition: AlertCondition,
    pub phase: AlertPhase,
    pub last_raised: Option<DateTime<Utc>>,
    pub last_recovered: Option<DateTime<Utc>>,
    pub cooldown_until: Option<DateTime<Utc>>,
    pub consecutive_violations: i32,
    pub last_value: Option<f64>,
}

impl AlertState {
    pub fn new(device_id: impl Into<String>, condition: AlertCondition) -> Self {
        Self {
            device_id: device_id.into(),
            condition,
            phase: AlertPhase::Ok,
            last_raised: None,
            last_recovered: None,
            cooldown_until: None,
            consecutive_violations: 0,
            last_value: None,
        }
    }

    pub fn is_in_cooldown(&self, now: DateTime<Utc>) -> bool {
        self.cooldown_until.map(|until| until > now).unwrap_or(false)
    }
}

/// The transition produced by a single tick's evaluation of one
/// (device, condition) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertTransition {
    /// `ok -> firing`: a notification should be raised (subject to gates).
    Raise,
    /// `firing -> ok`: a recovery notification should be raised.
    Recover,
    /// `firing -> firing` or `ok -> ok`: no notification.
    Suppressed,
}

/// A single outbound alert notification, destined for the chat-webhook
/// collaborator (§6 `WebhookNotifier`).
#[derive(Debug, Clone, Serialize)]
pub struct AlertNotification {
    pub device_id: String,
    pub alias: String,
    pub condition: AlertCondition,
    pub transition: NotificationKind,
    pub value: Option<f64>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Raised,
    Recovered,
}

/// A roll-up summary produced when more than `ALERT_ROLLUP_THRESHOLD`
/// devices enter `firing` for the same condition within 60s.
#[derive(Debug, Clone, Serialize)]
pub struct AlertRollup {
    pub condition: AlertCondition,
    pub aliases: Vec<String>,
    pub additional_count: usize,
    pub occurred_at: DateTime<Utc>,
}
