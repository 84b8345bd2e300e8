//! Per-(device, condition) alert state machine rows.

use crate::errors::DbError;
use chrono::{DateTime, Utc};
use mdm_domain::alert::{AlertCondition, AlertPhase, AlertState};
use sqlx::{FromRow, PgPool};
use tracing::instrument;

#[derive(FromRow)]
struct AlertStateRow {
    device_id: String,
    condition: String,
    phase: String,
    last_raised_at: Option<DateTime<Utc>>,
    last_recovered_at: Option<DateTime<Utc>>,
    cooldown_until: Option<DateTime<Utc>>,
    consecutive_violations: i32,
    last_value: Option<f64>,
}

pub fn condition_str(condition: AlertCondition) -> &'static str {
    match condition {
        AlertCondition::Offline => "offline",
        AlertCondition::LowBattery => "low_battery",
        AlertCondition::ServiceDown => "service_down",
    }
}

fn parse_condition(value: &str) -> AlertCondition {
    match value {
        "offline" => AlertCondition::Offline,
        "low_battery" => AlertCondition::LowBattery,
        _ => AlertCondition::ServiceDown,
    }
}

impl From<AlertStateRow> for AlertState {
    fn from(row: AlertStateRow) -> Self {
        AlertState {
            device_id: row.device_id,
            condition: parse_condition(&row.condition),
            phase: if row.phase == "firing" { AlertPhase::Firing } else { AlertPhase::Ok },
            last_raised: row.last_raised_at,
            last_recovered: row.last_recovered_at,
            cooldown_until: row.cooldown_until,
            consecutive_violations: row.consecutive_violations,
            last_value: row.last_value,
        }
    }
}

pub struct AlertRepository {
    pool: PgPool,
}

impl AlertRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All alert-state rows, for the tick to join against the last-status
    /// projection it already holds in memory.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<AlertState>, DbError> {
        let rows = sqlx::query_as::<_, AlertStateRow>(
            "SELECT device_id, condition, phase, last_raised_at, last_recovered_at, cooldown_until, consecutive_violations, last_value FROM alert_state",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(AlertState::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, device_id: &str, condition: AlertCondition) -> Result<Option<AlertState>, DbError> {
        let row = sqlx::query_as::<_, AlertStateRow>(
            "SELECT device_id, condition, phase, last_raised_at, last_recovered_at, cooldown_until, consecutive_violations, last_value FROM alert_state WHERE device_id = $1 AND condition = $2",
        )
        .bind(device_id)
        .bind(condition_str(condition))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AlertState::from))
    }

    /// Raises the alert: `phase := firing`, `last_raised := now`,
    /// `cooldown_until := now + cooldown`, `consecutive_violations += 1`.
    #[instrument(skip(self))]
    pub async fn raise(
        &self,
        device_id: &str,
        condition: AlertCondition,
        now: DateTime<Utc>,
        cooldown_minutes: i64,
        value: Option<f64>,
    ) -> Result<(), DbError> {
        let cooldown_until = now + chrono::Duration::minutes(cooldown_minutes);
        sqlx::query(
            r#"
            INSERT INTO alert_state (device_id, condition, phase, last_raised_at, cooldown_until, consecutive_violations, last_value)
            VALUES ($1, $2, 'firing', $3, $4, 1, $5)
            ON CONFLICT (device_id, condition) DO UPDATE SET
                phase = 'firing',
                last_raised_at = $3,
                cooldown_until = $4,
                consecutive_violations = alert_state.consecutive_violations + 1,
                last_value = $5
            "#,
        )
        .bind(device_id)
        .bind(condition_str(condition))
        .bind(now)
        .bind(cooldown_until)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Recovers the alert: `phase := ok`, `last_recovered := now`,
    /// `cooldown_until` cleared, `consecutive_violations` reset.
    #[instrument(skip(self))]
    pub async fn recover(&self, device_id: &str, condition: AlertCondition, now: DateTime<Utc>) -> Result<(), DbError> {
        sqlx::query(
            r#"
            UPDATE alert_state SET
                phase = 'ok',
                last_recovered_at = $3,
                cooldown_until = NULL,
                consecutive_violations = 0
            WHERE device_id = $1 AND condition = $2
            "#,
        )
        .bind(device_id)
        .bind(condition_str(condition))
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Bumps `consecutive_violations` without a phase transition, used by
    /// the `consecutive_required` gate on `service_down` before the first
    /// raise.
    #[instrument(skip(self))]
    pub async fn bump_consecutive(&self, device_id: &str, condition: AlertCondition, value: Option<f64>) -> Result<i32, DbError> {
        let (count,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO alert_state (device_id, condition, phase, consecutive_violations, last_value)
            VALUES ($1, $2, 'ok', 1, $3)
            ON CONFLICT (device_id, condition) DO UPDATE SET
                consecutive_violations = alert_state.consecutive_violations + 1,
                last_value = $3
            RETURNING consecutive_violations
            "#,
        )
        .bind(device_id)
        .bind(condition_str(condition))
        .bind(value)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
