//! Error taxonomy for the persistence layer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database connection failed: {0}")]
    Connection(String),

    #[error("database configuration is invalid: {0}")]
    Configuration(String),

    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("device not found")]
    DeviceNotFound,

    #[error("device token has been revoked")]
    DeviceRevoked,

    #[error("device alias already in use")]
    AliasConflict,

    #[error("command dispatch not found")]
    DispatchNotFound,

    #[error("bulk execution not found")]
    BulkExecutionNotFound,

    #[error("bulk dispatch matched no eligible devices")]
    NoEligibleDevices,

    #[error("ota build not found")]
    BuildNotFound,

    #[error("rollback source build not set")]
    NoRollbackTarget,

    #[error("device selection snapshot not found or expired")]
    SnapshotExpired,

    #[error("row mapping failed: {0}")]
    Mapping(String),
}

impl DbError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DbError::DeviceNotFound
                | DbError::DispatchNotFound
                | DbError::BulkExecutionNotFound
                | DbError::BuildNotFound
                | DbError::SnapshotExpired
        )
    }
}
