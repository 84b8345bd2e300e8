//! Nightly maintenance tick: keeps the forward partition window primed,
//! archives partitions past the retention window to the artifact store,
//! and drops them once archived, per §4.1/§9.

use crate::services::artifact_store::ArtifactStore;
use chrono::Utc;
use flate2::write::GzEncoder;
use flate2::Compression;
use mdm_db::PartitionRepository;
use sha2::{Digest, Sha256};
use std::io::Write;
use std::sync::Arc;
use tracing::{error, info, instrument};

const RETENTION_DAYS: i64 = 90;

pub struct PartitionMaintenanceJob {
    partition_repo: Arc<PartitionRepository>,
    artifact_store: Arc<dyn ArtifactStore>,
}

impl PartitionMaintenanceJob {
    pub fn new(partition_repo: Arc<PartitionRepository>, artifact_store: Arc<dyn ArtifactStore>) -> Self {
        Self {
            partition_repo,
            artifact_store,
        }
    }

    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<(), mdm_db::DbError> {
        let today = Utc::now().date_naive();
        self.partition_repo.ensure_forward_window(today).await?;

        let due = self.partition_repo.list_due_for_archive(today, RETENTION_DAYS).await?;
        for entry in due {
            self.partition_repo.refresh_row_and_byte_counts(&entry.name).await?;

            match self.archive_one(&entry).await {
                Ok(()) => info!(partition = %entry.name, "archived and dropped heartbeat partition"),
                Err(error) => {
                    error!(partition = %entry.name, %error, "partition archive failed");
                    self.partition_repo.mark_archive_failed(&entry.name, &error.to_string()).await?;
                }
            }
        }
        Ok(())
    }

    async fn archive_one(&self, entry: &mdm_domain::partition::PartitionCatalogEntry) -> Result<(), anyhow::Error> {
        let csv_bytes = self.partition_repo.export_csv(&entry.name).await?;

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&csv_bytes)?;
        let gz_bytes = encoder.finish()?;
        let checksum = hex::encode(Sha256::digest(&gz_bytes));

        let archive_path = entry.archive_path();
        let url = self.artifact_store.put(&archive_path, gz_bytes).await?;
        self.artifact_store
            .put(&format!("{archive_path}.sha256"), checksum.as_bytes().to_vec())
            .await?;

        self.partition_repo.mark_archived(&entry.name, &checksum, &url).await?;
        self.partition_repo.drop_partition(&entry.name).await?;
        Ok(())
    }
}
