//! Database connection pool.
//!
//! A single process-wide `PgPool` with a ceiling kept well below the
//! backend's own connection maximum; see the pool governor in the
//! orchestrator for the utilization alert thresholds.

use crate::errors::DbError;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tracing::{info, instrument};

#[derive(Clone)]
pub struct DbPool {
    pool: sqlx::PgPool,
}

impl DbPool {
    #[instrument(skip(database_url))]
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, DbError> {
        if database_url.is_empty() {
            return Err(DbError::Configuration("DATABASE_URL is empty".into()));
        }

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Some(Duration::from_secs(300)))
            .connect(database_url)
            .await
            .map_err(|e| DbError::Connection(e.to_string()))?;

        info!(max_connections, "database pool ready");
        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<(), DbError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DbError::Configuration(e.to_string()))?;
        Ok(())
    }

    pub fn pool(&self) -> &sqlx::PgPool {
        &self.pool
    }

    /// Connections currently checked out, for the `db_pool_in_use` gauge.
    pub fn in_use(&self) -> u32 {
        let size = self.pool.size();
        let idle = self.pool.num_idle() as u32;
        size.saturating_sub(idle)
    }

    /// Integer percentage of `max_connections` currently in use, for
    /// `db_pool_utilization_pct`.
    pub fn utilization_pct(&self, max_connections: u32) -> u32 {
        if max_connections == 0 {
            return 0;
        }
        (self.in_use() * 100) / max_connections
    }
}
