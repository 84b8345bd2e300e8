//! Daily heartbeat partition lifecycle: creation, catalog bookkeeping,
//! archival, and drop.

use crate::errors::DbError;
use chrono::{Duration, NaiveDate, Utc};
use mdm_domain::partition::{PartitionCatalogEntry, PartitionState};
use sqlx::{FromRow, PgPool};
use tracing::{info, instrument};

#[derive(FromRow)]
struct PartitionRow {
    name: String,
    range_start: NaiveDate,
    range_end: NaiveDate,
    state: String,
    row_count: Option<i64>,
    byte_size: Option<i64>,
    checksum_sha256: Option<String>,
    archive_url: Option<String>,
    error_note: Option<String>,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
}

fn parse_state(value: &str) -> PartitionState {
    match value {
        "archived" => PartitionState::Archived,
        "archive_failed" => PartitionState::ArchiveFailed,
        "dropped" => PartitionState::Dropped,
        _ => PartitionState::Active,
    }
}

fn state_str(state: PartitionState) -> &'static str {
    match state {
        PartitionState::Active => "active",
        PartitionState::Archived => "archived",
        PartitionState::ArchiveFailed => "archive_failed",
        PartitionState::Dropped => "dropped",
    }
}

impl From<PartitionRow> for PartitionCatalogEntry {
    fn from(row: PartitionRow) -> Self {
        PartitionCatalogEntry {
            name: row.name,
            range_start: row.range_start,
            range_end: row.range_end,
            state: parse_state(&row.state),
            row_count: row.row_count,
            byte_size: row.byte_size,
            checksum_sha256: row.checksum_sha256,
            archive_url: row.archive_url,
            error_note: row.error_note,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct PartitionRepository {
    pool: PgPool,
}

impl PartitionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the physical partition (if absent) and its catalog row for
    /// `range_start`'s day. Safe to call repeatedly; both the `CREATE TABLE
    /// ... PARTITION OF` and the catalog insert are no-ops on a day that
    /// already exists.
    #[instrument(skip(self))]
    pub async fn ensure_partition(&self, range_start: NaiveDate) -> Result<(), DbError> {
        let range_end = range_start + Duration::days(1);
        let name = PartitionCatalogEntry::name_for_date(range_start);

        let exists: (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM partition_catalog WHERE range_start = $1)")
            .bind(range_start)
            .fetch_one(&self.pool)
            .await?;
        if exists.0 {
            return Ok(());
        }

        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {name} PARTITION OF device_heartbeats FOR VALUES FROM ('{range_start}') TO ('{range_end}')"
        );
        sqlx::query(&ddl).execute(&self.pool).await?;

        sqlx::query("INSERT INTO partition_catalog (name, range_start, range_end) VALUES ($1, $2, $3) ON CONFLICT (range_start) DO NOTHING")
            .bind(&name)
            .bind(range_start)
            .bind(range_end)
            .execute(&self.pool)
            .await?;

        info!(partition = %name, "created heartbeat partition");
        Ok(())
    }

    /// Ensures every day in `[today - 1, today + 14]` has a partition, per
    /// the nightly-maintenance and startup-bootstrap obligation in §4.1.
    #[instrument(skip(self))]
    pub async fn ensure_forward_window(&self, today: NaiveDate) -> Result<(), DbError> {
        for offset in -1..=14 {
            self.ensure_partition(today + Duration::days(offset)).await?;
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_due_for_archive(&self, today: NaiveDate, retention_days: i64) -> Result<Vec<PartitionCatalogEntry>, DbError> {
        let cutoff = today - Duration::days(retention_days);
        let rows = sqlx::query_as::<_, PartitionRow>(
            r#"
            SELECT name, range_start, range_end, state, row_count, byte_size, checksum_sha256, archive_url, error_note, created_at, updated_at
            FROM partition_catalog
            WHERE range_start < $1 AND state IN ('active', 'archive_failed')
            ORDER BY range_start ASC
            "#,
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PartitionCatalogEntry::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn refresh_row_and_byte_counts(&self, name: &str) -> Result<(), DbError> {
        let (row_count,): (i64,) = sqlx::query_as(&format!("SELECT count(*) FROM {name}"))
            .fetch_one(&self.pool)
            .await?;
        let (byte_size,): (i64,) = sqlx::query_as("SELECT pg_total_relation_size($1::regclass)")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;

        sqlx::query("UPDATE partition_catalog SET row_count = $2, byte_size = $3, updated_at = now() WHERE name = $1")
            .bind(name)
            .bind(row_count)
            .bind(byte_size)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[instrument(skip(self, checksum_sha256, archive_url))]
    pub async fn mark_archived(&self, name: &str, checksum_sha256: &str, archive_url: &str) -> Result<(), DbError> {
        sqlx::query(
            "UPDATE partition_catalog SET state = 'archived', checksum_sha256 = $2, archive_url = $3, error_note = NULL, updated_at = now() WHERE name = $1",
        )
        .bind(name)
        .bind(checksum_sha256)
        .bind(archive_url)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn mark_archive_failed(&self, name: &str, error_note: &str) -> Result<(), DbError> {
        sqlx::query("UPDATE partition_catalog SET state = 'archive_failed', error_note = $2, updated_at = now() WHERE name = $1")
            .bind(name)
            .bind(error_note)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Drops the physical partition table after a successful archive.
    #[instrument(skip(self))]
    pub async fn drop_partition(&self, name: &str) -> Result<(), DbError> {
        let ddl = format!("DROP TABLE IF EXISTS {name}");
        sqlx::query(&ddl).execute(&self.pool).await?;

        sqlx::query("UPDATE partition_catalog SET state = 'dropped', updated_at = now() WHERE name = $1")
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[allow(dead_code)]
    fn state_str_for_doc(state: PartitionState) -> &'static str {
        state_str(state)
    }

    /// Streams `name`'s contents out as CSV via Postgres `COPY`, for the
    /// nightly archive job to hand to the artifact store before dropping
    /// the partition.
    #[instrument(skip(self))]
    pub async fn export_csv(&self, name: &str) -> Result<Vec<u8>, DbError> {
        use futures_util::TryStreamExt;

        let mut conn = self.pool.acquire().await?;
        let mut stream = conn.copy_out_raw(&format!("COPY {name} TO STDOUT WITH CSV HEADER")).await?;
        let mut buffer = Vec::new();
        while let Some(chunk) = stream.try_next().await? {
            buffer.extend_from_slice(&chunk);
        }
        Ok(buffer)
    }
}

pub struct SnapshotRepository {
    pool: PgPool,
}

impl SnapshotRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self, device_ids))]
    pub async fn create(&self, device_ids: &[String], ttl_minutes: i64) -> Result<uuid::Uuid, DbError> {
        let (snapshot_id,): (uuid::Uuid,) = sqlx::query_as(
            "INSERT INTO device_selection_snapshot (expires_at, device_ids) VALUES (now() + make_interval(mins => $1), $2) RETURNING snapshot_id",
        )
        .bind(ttl_minutes as i32)
        .bind(device_ids)
        .fetch_one(&self.pool)
        .await?;
        Ok(snapshot_id)
    }

    #[instrument(skip(self))]
    pub async fn get_unexpired(&self, snapshot_id: uuid::Uuid) -> Result<Vec<String>, DbError> {
        let row: Option<(Vec<String>,)> =
            sqlx::query_as("SELECT device_ids FROM device_selection_snapshot WHERE snapshot_id = $1 AND expires_at > now()")
                .bind(snapshot_id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(|r| r.0).ok_or(DbError::SnapshotExpired)
    }
}
