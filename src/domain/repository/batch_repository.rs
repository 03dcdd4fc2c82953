use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entity::ingest_batch::IngestBatch;
use crate::domain::entity::row_outcome::RowOutcome;

/// Ledger of ingestion batches and their per-row outcomes. Survives deletion
/// of the facilities it produced.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BatchRepository: Send + Sync {
    async fn create(&self, batch: &IngestBatch) -> anyhow::Result<IngestBatch>;

    async fn mark_processing(&self, batch_id: Uuid) -> anyhow::Result<()>;

    /// Appends one row outcome and bumps the matching counter in the same
    /// transaction, so pollers never see an outcome without its count.
    async fn record_outcome(&self, outcome: &RowOutcome) -> anyhow::Result<()>;

    /// Derives the terminal status from the stored counters, stamps the
    /// finish time and returns the final batch.
    async fn finalize(&self, batch_id: Uuid) -> anyhow::Result<IngestBatch>;

    async fn find_by_id(&self, batch_id: Uuid) -> anyhow::Result<Option<IngestBatch>>;

    /// Outcomes for a batch ordered by row number.
    async fn list_outcomes(&self, batch_id: Uuid) -> anyhow::Result<Vec<RowOutcome>>;
}
