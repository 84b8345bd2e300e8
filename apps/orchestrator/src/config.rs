//! Closed configuration struct, parsed once at startup from the environment.
//!
//! Per the redesign note on "dynamic keyword-style configuration": there is
//! no generic key-value bag here, and no key is silently defaulted when it's
//! required. `Config::load` either returns a fully populated struct or an
//! error naming the offending variable; `main` treats a load failure as
//! fatal, the same way `kernel.rs` treats a failed database connection.

use std::env;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),
    #[error("environment variable {0} has an invalid value: {1}")]
    Invalid(&'static str, String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub port: u16,

    pub hmac_primary_key: String,
    pub hmac_secondary_key: Option<String>,
    pub admin_key: String,
    pub session_secret: String,

    pub alert_offline_minutes: i64,
    pub alert_low_battery_pct: i16,
    pub alert_device_cooldown_minutes: i64,
    pub alert_global_cap_per_min: u32,
    pub alert_rollup_threshold: usize,
    pub alerts_enable_autoremediation: bool,
    pub unity_down_require_consecutive: bool,

    pub push_provider_credentials: Option<String>,
    pub webhook_url: Option<String>,
    pub artifact_store_root: String,
    pub read_from_last_status: bool,
}

impl Config {
    /// Loads and validates every variable in the closed set named in §6.
    /// Unknown variables are simply ignored by the process environment;
    /// this struct is what "rejecting unknown keys" means in Rust terms —
    /// nothing downstream ever consults `std::env::var` again once this
    /// returns.
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            db_max_connections: optional_parse("DB_MAX_CONNECTIONS", 20)?,
            port: optional_parse("PORT", 3000)?,

            hmac_primary_key: required("HMAC_PRIMARY_KEY")?,
            hmac_secondary_key: env::var("HMAC_SECONDARY_KEY").ok().filter(|s| !s.is_empty()),
            admin_key: required("ADMIN_KEY")?,
            session_secret: required("SESSION_SECRET")?,

            alert_offline_minutes: optional_parse("ALERT_OFFLINE_MINUTES", 20)?,
            alert_low_battery_pct: optional_parse("ALERT_LOW_BATTERY_PCT", 15)?,
            alert_device_cooldown_minutes: optional_parse("ALERT_DEVICE_COOLDOWN_MIN", 30)?,
            alert_global_cap_per_min: optional_parse("ALERT_GLOBAL_CAP_PER_MIN", 60)?,
            alert_rollup_threshold: optional_parse("ALERT_ROLLUP_THRESHOLD", 10)?,
            alerts_enable_autoremediation: optional_parse("ALERTS_ENABLE_AUTOREMEDIATION", false)?,
            unity_down_require_consecutive: optional_parse("UNITY_DOWN_REQUIRE_CONSECUTIVE", false)?,

            push_provider_credentials: env::var("PUSH_PROVIDER_CREDENTIALS").ok().filter(|s| !s.is_empty()),
            webhook_url: env::var("WEBHOOK_URL").ok().filter(|s| !s.is_empty()),
            artifact_store_root: env::var("ARTIFACT_STORE_ROOT").unwrap_or_else(|_| "./artifacts".to_string()),
            read_from_last_status: optional_parse("READ_FROM_LAST_STATUS", true)?,
        })
    }

    pub fn alert_tick_interval(&self) -> Duration {
        Duration::from_secs(60)
    }

    pub fn reconciliation_interval(&self) -> Duration {
        Duration::from_secs(3600)
    }

    pub fn nightly_maintenance_interval(&self) -> Duration {
        Duration::from_secs(24 * 3600)
    }

    /// Dispatch's consecutive-violation requirement for `service_down`: 1
    /// unless `UNITY_DOWN_REQUIRE_CONSECUTIVE` raises it to 2.
    pub fn service_down_consecutive_required(&self) -> i32 {
        if self.unity_down_require_consecutive {
            2
        } else {
            1
        }
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}

trait FromEnvStr: Sized {
    fn parse_env(raw: &str) -> Option<Self>;
}

impl FromEnvStr for u32 {
    fn parse_env(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}
impl FromEnvStr for u16 {
    fn parse_env(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}
impl FromEnvStr for i64 {
    fn parse_env(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}
impl FromEnvStr for i16 {
    fn parse_env(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}
impl FromEnvStr for usize {
    fn parse_env(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}
impl FromEnvStr for bool {
    fn parse_env(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        }
    }
}

fn optional_parse<T: FromEnvStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) if !raw.is_empty() => T::parse_env(&raw).ok_or_else(|| ConfigError::Invalid(name, raw)),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_down_consecutive_defaults_to_one() {
        let mut config = load_minimal();
        config.unity_down_require_consecutive = false;
        assert_eq!(config.service_down_consecutive_required(), 1);
        config.unity_down_require_consecutive = true;
        assert_eq!(config.service_down_consecutive_required(), 2);
    }

    fn load_minimal() -> Config {
        Config {
            database_url: "postgres://localhost/test".into(),
            db_max_connections: 20,
            port: 3000,
            hmac_primary_key: "primary".into(),
            hmac_secondary_key: None,
            admin_key: "admin".into(),
            session_secret: "secret".into(),
            alert_offline_minutes: 20,
            alert_low_battery_pct: 15,
            alert_device_cooldown_minutes: 30,
            alert_global_cap_per_min: 60,
            alert_rollup_threshold: 10,
            alerts_enable_autoremediation: false,
            unity_down_require_consecutive: false,
            push_provider_credentials: None,
            webhook_url: None,
            artifact_store_root: "./artifacts".into(),
            read_from_last_status: true,
        }
    }
}
