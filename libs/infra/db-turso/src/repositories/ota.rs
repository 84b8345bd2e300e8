//! OTA build catalog, promote/rollback transactions, and deployment stats.

use crate::errors::DbError;
use chrono::{DateTime, Utc};
use mdm_domain::ota::{DeploymentStats, OtaBuild};
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use uuid::Uuid;

#[derive(FromRow)]
struct OtaBuildRow {
    build_id: Uuid,
    package_name: String,
    version_code: i64,
    version_name: String,
    sha256: String,
    signer_fingerprint: String,
    storage_url: String,
    is_current: bool,
    staged_rollout_percent: i16,
    wifi_only: bool,
    must_install: bool,
    rollback_from_build_id: Option<Uuid>,
    promoted_at: Option<DateTime<Utc>>,
    promoted_by: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<OtaBuildRow> for OtaBuild {
    fn from(row: OtaBuildRow) -> Self {
        OtaBuild {
            build_id: row.build_id,
            package_name: row.package_name,
            version_code: row.version_code,
            version_name: row.version_name,
            sha256: row.sha256,
            signer_fingerprint: row.signer_fingerprint,
            storage_url: row.storage_url,
            is_current: row.is_current,
            staged_rollout_percent: row.staged_rollout_percent,
            wifi_only: row.wifi_only,
            must_install: row.must_install,
            rollback_from_build_id: row.rollback_from_build_id,
            promoted_at: row.promoted_at,
            promoted_by: row.promoted_by,
            created_at: row.created_at,
        }
    }
}

const SELECT_BUILD_COLUMNS: &str = r#"
    build_id, package_name, version_code, version_name, sha256, signer_fingerprint,
    storage_url, is_current, staged_rollout_percent, wifi_only, must_install,
    rollback_from_build_id, promoted_at, promoted_by, created_at
"#;

pub struct OtaRepository {
    pool: PgPool,
}

impl OtaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self))]
    pub async fn current_for_package(&self, package_name: &str) -> Result<Option<OtaBuild>, DbError> {
        let query = format!("SELECT {SELECT_BUILD_COLUMNS} FROM ota_build WHERE package_name = $1 AND is_current");
        let row = sqlx::query_as::<_, OtaBuildRow>(&query)
            .bind(package_name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(OtaBuild::from))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, build_id: Uuid) -> Result<OtaBuild, DbError> {
        let query = format!("SELECT {SELECT_BUILD_COLUMNS} FROM ota_build WHERE build_id = $1");
        let row = sqlx::query_as::<_, OtaBuildRow>(&query)
            .bind(build_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DbError::BuildNotFound)?;
        Ok(row.into())
    }

    #[instrument(skip(self))]
    #[allow(clippy::too_many_arguments)]
    pub async fn register_build(
        &self,
        package_name: &str,
        version_code: i64,
        version_name: &str,
        sha256: &str,
        signer_fingerprint: &str,
        storage_url: &str,
    ) -> Result<OtaBuild, DbError> {
        let query = format!(
            r#"
            INSERT INTO ota_build (package_name, version_code, version_name, sha256, signer_fingerprint, storage_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {SELECT_BUILD_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, OtaBuildRow>(&query)
            .bind(package_name)
            .bind(version_code)
            .bind(version_name)
            .bind(sha256)
            .bind(signer_fingerprint)
            .bind(storage_url)
            .fetch_one(&self.pool)
            .await?;

        sqlx::query("INSERT INTO deployment_stats (build_id) VALUES ($1)")
            .bind(row.build_id)
            .execute(&self.pool)
            .await?;

        Ok(row.into())
    }

    /// Promotes `build_id` to current for its package, demoting the
    /// previously current build in the same transaction, per the §3
    /// invariant "promoting build B to current atomically demotes the
    /// previously current build for that package."
    #[instrument(skip(self))]
    pub async fn promote(&self, build_id: Uuid, staged_rollout_percent: i16, promoted_by: &str) -> Result<OtaBuild, DbError> {
        let mut tx = self.pool.begin().await?;

        let package_name: (String,) = sqlx::query_as("SELECT package_name FROM ota_build WHERE build_id = $1")
            .bind(build_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(DbError::BuildNotFound)?;

        sqlx::query("UPDATE ota_build SET is_current = FALSE WHERE package_name = $1 AND is_current")
            .bind(&package_name.0)
            .execute(&mut *tx)
            .await?;

        let query = format!(
            r#"
            UPDATE ota_build SET
                is_current = TRUE,
                staged_rollout_percent = $2,
                promoted_at = now(),
                promoted_by = $3
            WHERE build_id = $1
            RETURNING {SELECT_BUILD_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, OtaBuildRow>(&query)
            .bind(build_id)
            .bind(staged_rollout_percent)
            .bind(promoted_by)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row.into())
    }

    #[instrument(skip(self))]
    pub async fn adjust_rollout(&self, build_id: Uuid, staged_rollout_percent: i16) -> Result<(), DbError> {
        let result = sqlx::query("UPDATE ota_build SET staged_rollout_percent = $2 WHERE build_id = $1")
            .bind(build_id)
            .bind(staged_rollout_percent)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::BuildNotFound);
        }
        Ok(())
    }

    /// Promotes `rollback_from_build_id` back to current. The caller
    /// resolves which build that is for the package before calling this;
    /// the demote/promote pair mirrors `promote`.
    #[instrument(skip(self))]
    pub async fn rollback(&self, package_name: &str, staged_rollout_percent: i16, must_install: bool, promoted_by: &str) -> Result<OtaBuild, DbError> {
        let mut tx = self.pool.begin().await?;

        let current: (Uuid, Option<Uuid>) =
            sqlx::query_as("SELECT build_id, rollback_from_build_id FROM ota_build WHERE package_name = $1 AND is_current")
                .bind(package_name)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(DbError::BuildNotFound)?;

        let target = current.1.ok_or(DbError::NoRollbackTarget)?;

        sqlx::query("UPDATE ota_build SET is_current = FALSE WHERE build_id = $1")
            .bind(current.0)
            .execute(&mut *tx)
            .await?;

        let query = format!(
            r#"
            UPDATE ota_build SET
                is_current = TRUE,
                staged_rollout_percent = $2,
                must_install = $3,
                promoted_at = now(),
                promoted_by = $4
            WHERE build_id = $1
            RETURNING {SELECT_BUILD_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, OtaBuildRow>(&query)
            .bind(target)
            .bind(staged_rollout_percent)
            .bind(must_install)
            .bind(promoted_by)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row.into())
    }

    #[instrument(skip(self))]
    pub async fn increment_stat(&self, build_id: Uuid, column: DeploymentStatColumn) -> Result<(), DbError> {
        let sql = format!("UPDATE deployment_stats SET {} = {} + 1 WHERE build_id = $1", column.as_str(), column.as_str());
        sqlx::query(&sql).bind(build_id).execute(&self.pool).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get_stats(&self, build_id: Uuid) -> Result<DeploymentStats, DbError> {
        let row: (i64, i64, i64, i64, i64, i64) = sqlx::query_as(
            "SELECT total_checks, total_eligible, total_downloads, installs_success, installs_failed, verify_failed FROM deployment_stats WHERE build_id = $1",
        )
        .bind(build_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::BuildNotFound)?;

        Ok(DeploymentStats {
            build_id,
            total_checks: row.0,
            total_eligible: row.1,
            total_downloads: row.2,
            installs_success: row.3,
            installs_failed: row.4,
            verify_failed: row.5,
        })
    }
}

/// Closed set of `deployment_stats` counter columns; kept as an enum so
/// `increment_stat` never interpolates caller-supplied column names.
#[derive(Debug, Clone, Copy)]
pub enum DeploymentStatColumn {
    TotalChecks,
    TotalEligible,
    TotalDownloads,
    InstallsSuccess,
    InstallsFailed,
    VerifyFailed,
}

impl DeploymentStatColumn {
    fn as_str(self) -> &'static str {
        match self {
            DeploymentStatColumn::TotalChecks => "total_checks",
            DeploymentStatColumn::TotalEligible => "total_eligible",
            DeploymentStatColumn::TotalDownloads => "total_downloads",
            DeploymentStatColumn::InstallsSuccess => "installs_success",
            DeploymentStatColumn::InstallsFailed => "installs_failed",
            DeploymentStatColumn::VerifyFailed => "verify_failed",
        }
    }
}
