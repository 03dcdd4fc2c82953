use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::entity::ingest_batch::IngestBatch;
use crate::domain::entity::row_outcome::RowOutcome;
use crate::domain::repository::batch_repository::BatchRepository;

/// Batch header plus its per-row outcomes, for audit views.
#[derive(Debug, Serialize)]
pub struct BatchReport {
    #[serde(flatten)]
    pub batch: IngestBatch,
    pub outcomes: Vec<RowOutcome>,
}

/// Read-only polling against the batch ledger. Safe to call while the batch
/// is still processing; incremental batches show counters moving.
pub struct BatchStatusUsecase {
    batch_repo: Arc<dyn BatchRepository>,
}

impl BatchStatusUsecase {
    pub fn new(batch_repo: Arc<dyn BatchRepository>) -> Self {
        Self { batch_repo }
    }

    pub async fn status(&self, batch_id: Uuid) -> anyhow::Result<Option<IngestBatch>> {
        self.batch_repo.find_by_id(batch_id).await
    }

    pub async fn report(&self, batch_id: Uuid) -> anyhow::Result<Option<BatchReport>> {
        let Some(batch) = self.batch_repo.find_by_id(batch_id).await? else {
            return Ok(None);
        };
        let outcomes = self.batch_repo.list_outcomes(batch_id).await?;
        Ok(Some(BatchReport { batch, outcomes }))
    }
}
