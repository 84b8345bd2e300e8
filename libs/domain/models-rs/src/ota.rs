//! OTA build, rollout, and deployment-stats types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtaBuild {
    pub build_id: uuid::Uuid,
    pub package_name: String,
    pub version_code: i64,
    pub version_name: String,
    pub sha256: String,
    pub signer_fingerprint: String,
    pub storage_url: String,
    pub is_current: bool,
    pub staged_rollout_percent: i16,
    pub wifi_only: bool,
    pub must_install: bool,
    pub rollback_from_build_id: Option<uuid::Uuid>,
    pub promoted_at: Option<DateTime<Utc>>,
    pub promoted_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl OtaBuild {
    pub fn validate_rollout_percent(percent: i16) -> Result<(), String> {
        if !(0..=100).contains(&percent) {
            return Err("staged_rollout_percent must be in [0,100]".into());
        }
        Ok(())
    }
}

/// `GET /v1/agent/update` query parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestQuery {
    pub device_id: String,
    pub current_version_code: i64,
    pub package_name: String,
}

/// The 200 manifest response body.
#[derive(Debug, Clone, Serialize)]
pub struct OtaManifest {
    pub build_id: uuid::Uuid,
    pub version_code: i64,
    pub version_name: String,
    pub download_url: String,
    pub sha256: String,
    pub signer_fingerprint: String,
    pub wifi_only: bool,
    pub must_install: bool,
    pub effective_rollout_percent: i16,
}

/// Reason carried on the 304 response's diagnostic header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ManifestNotEligibleReason {
    NoCurrentBuild,
    UpToDate,
    NotInCohort,
}

impl ManifestNotEligibleReason {
    pub fn as_str(self) -> &'static str {
        match self {
            ManifestNotEligibleReason::NoCurrentBuild => "no_current_build",
            ManifestNotEligibleReason::UpToDate => "up_to_date",
            ManifestNotEligibleReason::NotInCohort => "not_in_cohort",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PromoteRequest {
    pub build_id: uuid::Uuid,
    pub staged_rollout_percent: i16,
    pub promoted_by: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RolloutAdjustRequest {
    pub build_id: uuid::Uuid,
    pub staged_rollout_percent: i16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RollbackRequest {
    pub package_name: String,
    pub staged_rollout_percent: i16,
    pub must_install: bool,
    pub promoted_by: String,
}

/// Per-build counters, derived adoption-rate computed on read.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DeploymentStats {
    pub build_id: uuid::Uuid,
    pub total_checks: i64,
    pub total_eligible: i64,
    pub total_downloads: i64,
    pub installs_success: i64,
    pub installs_failed: i64,
    pub verify_failed: i64,
}

impl DeploymentStats {
    pub fn adoption_rate(&self) -> f64 {
        if self.total_eligible == 0 {
            0.0
        } else {
            self.installs_success as f64 / self.total_eligible as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rollout_percent_accepts_full_range() {
        assert!(OtaBuild::validate_rollout_percent(0).is_ok());
        assert!(OtaBuild::validate_rollout_percent(50).is_ok());
        assert!(OtaBuild::validate_rollout_percent(100).is_ok());
    }

    #[test]
    fn rollout_percent_rejects_out_of_range() {
        assert!(OtaBuild::validate_rollout_percent(-1).is_err());
        assert!(OtaBuild::validate_rollout_percent(101).is_err());
    }

    #[test]
    fn adoption_rate_is_zero_with_no_eligible_checks() {
        let stats = DeploymentStats::default();
        assert_eq!(stats.adoption_rate(), 0.0);
    }

    #[test]
    fn adoption_rate_divides_successes_by_eligible() {
        let stats = DeploymentStats {
            total_eligible: 200,
            installs_success: 150,
            ..Default::default()
        };
        assert_eq!(stats.adoption_rate(), 0.75);
    }

    #[test]
    fn not_eligible_reason_strings_are_stable() {
        assert_eq!(ManifestNotEligibleReason::NoCurrentBuild.as_str(), "no_current_build");
        assert_eq!(ManifestNotEligibleReason::UpToDate.as_str(), "up_to_date");
        assert_eq!(ManifestNotEligibleReason::NotInCohort.as_str(), "not_in_cohort");
    }
}
