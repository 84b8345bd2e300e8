//! Process-wide advisory locks guarding the three periodic jobs.
//!
//! Each job gets a fixed, stable lock key so only one running instance of
//! the process ever executes a given tick at a time. Keys are plain
//! constants rather than derived hashes since the lock set is small and
//! fixed, unlike per-entity locking.

use sqlx::PgPool;

pub const ALERT_TICK_LOCK_KEY: i64 = 0x414c_4552_5400; // "ALERT\0"
pub const RECONCILIATION_LOCK_KEY: i64 = 0x5245_434f_4e00; // "RECON\0"
pub const NIGHTLY_MAINTENANCE_LOCK_KEY: i64 = 0x4e49_4748_5400; // "NIGHT\0"

/// Attempts to acquire a session-level advisory lock without blocking.
/// Returns `false` if another session already holds it; the caller should
/// skip this tick rather than wait.
pub async fn try_advisory_lock(pool: &PgPool, key: i64) -> Result<bool, sqlx::Error> {
    let (acquired,): (bool,) = sqlx::query_as("SELECT pg_try_advisory_lock($1)")
        .bind(key)
        .fetch_one(pool)
        .await?;
    Ok(acquired)
}

/// Releases a session-level advisory lock acquired with `try_advisory_lock`.
/// Must run on the same pool; with a generic `PgPool` this may land on a
/// different physical connection, which is why callers are expected to
/// release promptly after the guarded work completes rather than holding
/// the lock across a long-lived connection checkout.
pub async fn advisory_unlock(pool: &PgPool, key: i64) -> Result<bool, sqlx::Error> {
    let (released,): (bool,) = sqlx::query_as("SELECT pg_advisory_unlock($1)")
        .bind(key)
        .fetch_one(pool)
        .await?;
    Ok(released)
}
