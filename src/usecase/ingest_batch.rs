use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entity::facility::NewFacility;
use crate::domain::entity::ingest_batch::{BatchStatus, IngestBatch, PersistStrategy};
use crate::domain::entity::row_outcome::RowOutcome;
use crate::domain::repository::batch_repository::BatchRepository;
use crate::domain::repository::facility_repository::FacilityRepository;
use crate::domain::service::csv_decoder::{self, FormatError};
use crate::domain::service::pacer::Pacer;
use crate::domain::service::row_validator;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("delay_per_row must be between 0 and {0} seconds")]
    DelayOutOfRange(u64),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Copy)]
pub struct IngestOptions {
    pub strategy: PersistStrategy,
    /// Pause after each committed row, seconds. Incremental mode only.
    pub delay_per_row: Option<f64>,
    /// Activate the whole batch when every row lands.
    pub auto_activate: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            strategy: PersistStrategy::Atomic,
            delay_per_row: None,
            auto_activate: false,
        }
    }
}

/// Summary returned to the uploader once the batch reaches a terminal state.
#[derive(Debug, Serialize)]
pub struct BatchIngestResult {
    pub batch_id: Uuid,
    pub status: BatchStatus,
    pub total_rows: i32,
    pub processed_rows: i32,
    pub failed_rows: i32,
    pub processing_time_seconds: f64,
    pub batch_activated: bool,
    pub outcomes: Vec<RowOutcome>,
}

/// A row that passed validation, still carrying its position in the upload.
pub struct ValidatedRow {
    pub row_number: i32,
    pub input: NewFacility,
}

/// How validated rows reach the facility store. Validation failures never get
/// here; strategies only decide the fate of rows that could be persisted.
#[async_trait]
trait PersistenceStrategy {
    async fn persist(
        &self,
        batch_id: Uuid,
        rows: &[ValidatedRow],
    ) -> anyhow::Result<Vec<RowOutcome>>;
}

/// Single transaction for the whole batch. One bad write rolls back every row.
struct AtomicStrategy<'a> {
    facilities: &'a dyn FacilityRepository,
    ledger: &'a dyn BatchRepository,
}

#[async_trait]
impl PersistenceStrategy for AtomicStrategy<'_> {
    async fn persist(
        &self,
        batch_id: Uuid,
        rows: &[ValidatedRow],
    ) -> anyhow::Result<Vec<RowOutcome>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let inputs: Vec<NewFacility> = rows.iter().map(|r| r.input.clone()).collect();
        let mut outcomes = Vec::with_capacity(rows.len());
        match self.facilities.insert_all(batch_id, &inputs).await {
            Ok(facilities) => {
                for (row, facility) in rows.iter().zip(facilities) {
                    outcomes.push(RowOutcome::created(
                        batch_id,
                        row.row_number,
                        facility.name.clone(),
                        facility.id,
                    ));
                }
            }
            Err(e) => {
                tracing::warn!(batch_id = %batch_id, error = %e, "atomic persist rolled back");
                for row in rows {
                    outcomes.push(RowOutcome::failed(
                        batch_id,
                        row.row_number,
                        row.input.name.clone(),
                        "persistence failure: batch transaction rolled back".to_string(),
                        None,
                    ));
                }
            }
        }

        for outcome in &outcomes {
            self.ledger.record_outcome(outcome).await?;
        }
        Ok(outcomes)
    }
}

/// One commit per row. Each row's outcome is in the ledger, and its facility
/// visible to pollers, before the optional pause starts.
struct IncrementalStrategy<'a> {
    facilities: &'a dyn FacilityRepository,
    ledger: &'a dyn BatchRepository,
    pacer: &'a dyn Pacer,
    delay: Duration,
}

#[async_trait]
impl PersistenceStrategy for IncrementalStrategy<'_> {
    async fn persist(
        &self,
        batch_id: Uuid,
        rows: &[ValidatedRow],
    ) -> anyhow::Result<Vec<RowOutcome>> {
        let mut outcomes = Vec::with_capacity(rows.len());
        for row in rows {
            let outcome = match self.facilities.insert_one(batch_id, &row.input).await {
                Ok(facility) => {
                    RowOutcome::created(batch_id, row.row_number, facility.name, facility.id)
                }
                Err(e) => {
                    tracing::warn!(
                        batch_id = %batch_id,
                        row_number = row.row_number,
                        error = %e,
                        "row persist failed"
                    );
                    RowOutcome::failed(
                        batch_id,
                        row.row_number,
                        row.input.name.clone(),
                        format!("persistence failure: {}", e),
                        None,
                    )
                }
            };
            let created = outcome.facility_id.is_some();
            self.ledger.record_outcome(&outcome).await?;
            outcomes.push(outcome);
            if created && !self.delay.is_zero() {
                self.pacer.pause(self.delay).await;
            }
        }
        Ok(outcomes)
    }
}

/// Runs one CSV upload end to end: decode, validate, persist per strategy,
/// finalize the ledger.
pub struct IngestBatchUsecase {
    facility_repo: Arc<dyn FacilityRepository>,
    batch_repo: Arc<dyn BatchRepository>,
    pacer: Arc<dyn Pacer>,
    max_csv_rows: usize,
    max_delay_seconds: u64,
}

impl IngestBatchUsecase {
    pub fn new(
        facility_repo: Arc<dyn FacilityRepository>,
        batch_repo: Arc<dyn BatchRepository>,
        pacer: Arc<dyn Pacer>,
        max_csv_rows: usize,
        max_delay_seconds: u64,
    ) -> Self {
        Self {
            facility_repo,
            batch_repo,
            pacer,
            max_csv_rows,
            max_delay_seconds,
        }
    }

    pub async fn execute(
        &self,
        bytes: &[u8],
        options: IngestOptions,
    ) -> Result<BatchIngestResult, IngestError> {
        let delay = self.resolve_delay(options.delay_per_row)?;
        let records = csv_decoder::decode(bytes, self.max_csv_rows)?;

        let started = Instant::now();
        let batch = self
            .batch_repo
            .create(&IngestBatch::new(options.strategy, records.len() as i32))
            .await?;
        self.batch_repo.mark_processing(batch.id).await?;
        tracing::info!(
            batch_id = %batch.id,
            strategy = options.strategy.as_str(),
            total_rows = records.len(),
            "batch ingestion started"
        );

        let mut validation_failures = Vec::new();
        let mut validated = Vec::new();
        for record in &records {
            match row_validator::validate(record) {
                Ok(input) => validated.push(ValidatedRow {
                    row_number: record.row_number,
                    input,
                }),
                Err(e) => {
                    let outcome = RowOutcome::failed(
                        batch.id,
                        record.row_number,
                        record.name.clone().unwrap_or_default(),
                        e.to_string(),
                        Some(record.source.clone()),
                    );
                    self.batch_repo.record_outcome(&outcome).await?;
                    validation_failures.push(outcome);
                }
            }
        }

        let persisted = match options.strategy {
            PersistStrategy::Atomic => {
                AtomicStrategy {
                    facilities: self.facility_repo.as_ref(),
                    ledger: self.batch_repo.as_ref(),
                }
                .persist(batch.id, &validated)
                .await?
            }
            PersistStrategy::Incremental => {
                IncrementalStrategy {
                    facilities: self.facility_repo.as_ref(),
                    ledger: self.batch_repo.as_ref(),
                    pacer: self.pacer.as_ref(),
                    delay,
                }
                .persist(batch.id, &validated)
                .await?
            }
        };

        let mut outcomes = validation_failures;
        outcomes.extend(persisted);
        outcomes.sort_by_key(|o| o.row_number);

        let finalized = self.batch_repo.finalize(batch.id).await?;

        let mut batch_activated = false;
        if options.auto_activate && finalized.failed_rows == 0 && finalized.processed_rows > 0 {
            self.facility_repo
                .set_active_by_batch(finalized.id, true)
                .await?;
            batch_activated = true;
        }

        tracing::info!(
            batch_id = %finalized.id,
            status = finalized.status.as_str(),
            processed_rows = finalized.processed_rows,
            failed_rows = finalized.failed_rows,
            "batch ingestion finished"
        );

        Ok(BatchIngestResult {
            batch_id: finalized.id,
            status: finalized.status,
            total_rows: finalized.total_rows,
            processed_rows: finalized.processed_rows,
            failed_rows: finalized.failed_rows,
            processing_time_seconds: round_seconds(started.elapsed().as_secs_f64()),
            batch_activated,
            outcomes,
        })
    }

    fn resolve_delay(&self, delay_per_row: Option<f64>) -> Result<Duration, IngestError> {
        let seconds = delay_per_row.unwrap_or(0.0);
        let max = self.max_delay_seconds;
        if !seconds.is_finite() || !(0.0..=max as f64).contains(&seconds) {
            return Err(IngestError::DelayOutOfRange(max));
        }
        Ok(Duration::from_secs_f64(seconds))
    }
}

fn round_seconds(seconds: f64) -> f64 {
    (seconds * 100.0).round() / 100.0
}
