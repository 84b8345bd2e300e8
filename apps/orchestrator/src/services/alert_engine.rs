//! 60-second alert tick: evaluates every device against the offline,
//! low-battery, and service-down conditions, applies per-device cooldown
//! and the global per-minute rate cap, rolls up bursts past the
//! configured threshold, and optionally fires auto-remediation commands.

use crate::config::Config;
use crate::services::dispatch_service::dispatch_one;
use crate::services::push_provider::PushProvider;
use crate::services::webhook_notifier::WebhookNotifier;
use chrono::Utc;
use mdm_db::{AlertRepository, AlertTickRow, DeviceRepository, DispatchRepository};
use mdm_domain::alert::{AlertCondition, AlertNotification, AlertRollup, AlertTransition, NotificationKind};
use mdm_domain::device::ServiceUp;
use mdm_domain::dispatch::DispatchAction;
use mdm_telemetry::metrics::{ALERT_DEDUPE_HIT, ALERT_RATE_LIMITED};
use mdm_crypto::HmacKeyring;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// A device is offline once it has been silent strictly longer than the
/// threshold, not the instant it reaches it: a heartbeat landing exactly on
/// the boundary is still on time.
fn offline_exceeds_threshold(offline_minutes: i64, threshold_minutes: i64) -> bool {
    offline_minutes > threshold_minutes
}

/// Mirrors `offline_exceeds_threshold`: the cutoff itself still counts as
/// charged enough, only strictly below it is low.
fn battery_below_cutoff(battery_pct: i32, cutoff_pct: i32) -> bool {
    battery_pct < cutoff_pct
}

pub struct AlertEngine {
    alert_repo: Arc<AlertRepository>,
    heartbeat_repo: Arc<mdm_db::HeartbeatRepository>,
    device_repo: Arc<DeviceRepository>,
    dispatch_repo: Arc<DispatchRepository>,
    hmac_keyring: HmacKeyring,
    push_provider: Arc<dyn PushProvider>,
    webhook_notifier: Arc<dyn WebhookNotifier>,
    config: Arc<Config>,
}

impl AlertEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        alert_repo: Arc<AlertRepository>,
        heartbeat_repo: Arc<mdm_db::HeartbeatRepository>,
        device_repo: Arc<DeviceRepository>,
        dispatch_repo: Arc<DispatchRepository>,
        hmac_keyring: HmacKeyring,
        push_provider: Arc<dyn PushProvider>,
        webhook_notifier: Arc<dyn WebhookNotifier>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            alert_repo,
            heartbeat_repo,
            device_repo,
            dispatch_repo,
            hmac_keyring,
            push_provider,
            webhook_notifier,
            config,
        }
    }

    #[instrument(skip(self))]
    pub async fn tick(&self) -> Result<(), mdm_db::DbError> {
        let now = Utc::now();
        let rows = self.heartbeat_repo.list_for_alert_tick().await?;

        let mut budget = self.config.alert_global_cap_per_min;
        let mut raised_this_tick: Vec<(AlertCondition, String)> = Vec::new();
        let mut pending_notifications: Vec<AlertNotification> = Vec::new();

        for row in &rows {
            if !row.monitoring_enabled {
                continue;
            }
            self.evaluate_offline(row, now, &mut budget, &mut raised_this_tick, &mut pending_notifications)
                .await?;
            self.evaluate_low_battery(row, now, &mut budget, &mut raised_this_tick, &mut pending_notifications)
                .await?;
            self.evaluate_service_down(row, now, &mut budget, &mut raised_this_tick, &mut pending_notifications)
                .await?;
        }

        self.flush_rollups(raised_this_tick, pending_notifications, now).await;
        Ok(())
    }

    async fn evaluate_offline(
        &self,
        row: &AlertTickRow,
        now: chrono::DateTime<Utc>,
        budget: &mut u32,
        raised: &mut Vec<(AlertCondition, String)>,
        pending: &mut Vec<AlertNotification>,
    ) -> Result<(), mdm_db::DbError> {
        let offline_for = now.signed_duration_since(row.last_ts).num_minutes();
        let is_offline = offline_exceeds_threshold(offline_for, self.config.alert_offline_minutes);
        self.apply_transition(
            row,
            AlertCondition::Offline,
            is_offline,
            Some(offline_for as f64),
            now,
            budget,
            raised,
            pending,
        )
        .await
    }

    async fn evaluate_low_battery(
        &self,
        row: &AlertTickRow,
        now: chrono::DateTime<Utc>,
        budget: &mut u32,
        raised: &mut Vec<(AlertCondition, String)>,
        pending: &mut Vec<AlertNotification>,
    ) -> Result<(), mdm_db::DbError> {
        let is_low = row.battery_pct >= 0 && battery_below_cutoff(i32::from(row.battery_pct), i32::from(self.config.alert_low_battery_pct));
        self.apply_transition(
            row,
            AlertCondition::LowBattery,
            is_low,
            Some(f64::from(row.battery_pct)),
            now,
            budget,
            raised,
            pending,
        )
        .await
    }

    async fn evaluate_service_down(
        &self,
        row: &AlertTickRow,
        now: chrono::DateTime<Utc>,
        budget: &mut u32,
        raised: &mut Vec<(AlertCondition, String)>,
        pending: &mut Vec<AlertNotification>,
    ) -> Result<(), mdm_db::DbError> {
        let is_down = row.service_up == ServiceUp::False;

        if !is_down {
            self.apply_transition(row, AlertCondition::ServiceDown, false, None, now, budget, raised, pending)
                .await?;
            return Ok(());
        }

        let required = self.config.service_down_consecutive_required();
        if required > 1 {
            let consecutive = self
                .alert_repo
                .bump_consecutive(&row.device_id, AlertCondition::ServiceDown, None)
                .await?;
            if consecutive < required {
                return Ok(());
            }
        }

        self.apply_transition(row, AlertCondition::ServiceDown, true, None, now, budget, raised, pending)
            .await
    }

    #[instrument(skip(self, row, budget, raised, pending))]
    async fn apply_transition(
        &self,
        row: &AlertTickRow,
        condition: AlertCondition,
        violating: bool,
        value: Option<f64>,
        now: chrono::DateTime<Utc>,
        budget: &mut u32,
        raised: &mut Vec<(AlertCondition, String)>,
        pending: &mut Vec<AlertNotification>,
    ) -> Result<(), mdm_db::DbError> {
        let state = self.alert_repo.get(&row.device_id, condition).await?;
        let currently_firing = state.as_ref().map(|s| s.phase == mdm_domain::alert::AlertPhase::Firing).unwrap_or(false);
        let in_cooldown = state.as_ref().map(|s| s.is_in_cooldown(now)).unwrap_or(false);

        let transition = match (currently_firing, violating) {
            (false, true) => AlertTransition::Raise,
            (true, false) => AlertTransition::Recover,
            _ => AlertTransition::Suppressed,
        };

        match transition {
            AlertTransition::Raise => {
                if in_cooldown {
                    ALERT_DEDUPE_HIT.inc();
                    return Ok(());
                }
                if *budget == 0 {
                    ALERT_RATE_LIMITED.inc();
                    return Ok(());
                }
                *budget -= 1;

                self.alert_repo
                    .raise(&row.device_id, condition, now, self.config.alert_device_cooldown_minutes, value)
                    .await?;
                raised.push((condition, row.alias.clone()));

                // Buffered rather than sent here: whether this becomes an
                // individual notification or gets folded into a rollup is
                // only known once the whole tick's raises are counted, in
                // flush_rollups.
                pending.push(AlertNotification {
                    device_id: row.device_id.clone(),
                    alias: row.alias.clone(),
                    condition,
                    transition: NotificationKind::Raised,
                    value,
                    occurred_at: now,
                });

                if self.config.alerts_enable_autoremediation && condition == AlertCondition::ServiceDown {
                    self.attempt_autoremediation(row).await;
                }
            }
            AlertTransition::Recover => {
                self.alert_repo.recover(&row.device_id, condition, now).await?;
                let notification = AlertNotification {
                    device_id: row.device_id.clone(),
                    alias: row.alias.clone(),
                    condition,
                    transition: NotificationKind::Recovered,
                    value,
                    occurred_at: now,
                };
                if let Err(error) = self.webhook_notifier.notify(&notification).await {
                    warn!(%error, device_id = %row.device_id, "failed to deliver alert recovery notification");
                }
            }
            AlertTransition::Suppressed => {}
        }
        Ok(())
    }

    /// Relaunches the monitored app once, per the opt-in auto-remediation
    /// path in §4.3. Best-effort: a dispatch failure here is logged, not
    /// propagated, since the tick must keep evaluating the rest of the fleet.
    async fn attempt_autoremediation(&self, row: &AlertTickRow) {
        let device = match self.device_repo.get_by_id(&row.device_id).await {
            Ok(device) => device,
            Err(error) => {
                warn!(%error, device_id = %row.device_id, "could not load device for auto-remediation");
                return;
            }
        };
        let Some(package) = device.monitored_package.clone() else {
            return;
        };
        let outcome = dispatch_one(
            &self.dispatch_repo,
            &self.hmac_keyring,
            self.push_provider.as_ref(),
            &row.device_id,
            device.push_token.as_deref(),
            DispatchAction::LaunchApp,
            json!({ "package": package }),
            None,
            None,
        )
        .await;
        if let Err(error) = outcome {
            warn!(%error, device_id = %row.device_id, "auto-remediation dispatch failed");
        } else {
            info!(device_id = %row.device_id, "auto-remediation relaunch dispatched");
        }
    }

    /// Sends each buffered individual raise notification, except for
    /// conditions whose raise count this tick crossed the rollup
    /// threshold — those are collapsed into a single rollup notification
    /// instead, so a burst never produces both.
    async fn flush_rollups(
        &self,
        raised: Vec<(AlertCondition, String)>,
        pending: Vec<AlertNotification>,
        now: chrono::DateTime<Utc>,
    ) {
        let threshold = self.config.alert_rollup_threshold;
        let mut by_condition: std::collections::HashMap<AlertCondition, Vec<String>> = std::collections::HashMap::new();
        for (condition, alias) in raised {
            by_condition.entry(condition).or_default().push(alias);
        }

        let rolled_up: HashSet<AlertCondition> = by_condition
            .iter()
            .filter(|(_, aliases)| aliases.len() >= threshold)
            .map(|(condition, _)| *condition)
            .collect();

        for notification in &pending {
            if rolled_up.contains(&notification.condition) {
                continue;
            }
            if let Err(error) = self.webhook_notifier.notify(notification).await {
                warn!(%error, device_id = %notification.device_id, "failed to deliver alert notification");
            }
        }

        for (condition, aliases) in by_condition {
            if !rolled_up.contains(&condition) {
                continue;
            }
            let rollup = AlertRollup {
                condition,
                aliases: aliases.iter().take(threshold).cloned().collect(),
                additional_count: aliases.len().saturating_sub(threshold),
                occurred_at: now,
            };
            if let Err(error) = self.webhook_notifier.notify_rollup(&rollup).await {
                warn!(%error, ?condition, "failed to deliver alert rollup");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_boundary_is_not_yet_offline() {
        assert!(!offline_exceeds_threshold(20, 20), "exactly at the threshold must not fire");
        assert!(offline_exceeds_threshold(21, 20), "one minute past the threshold must fire");
    }

    #[test]
    fn low_battery_boundary_is_not_yet_low() {
        assert!(!battery_below_cutoff(15, 15), "exactly at the cutoff must not fire");
        assert!(battery_below_cutoff(14, 15), "one point below the cutoff must fire");
    }
}
