use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of an ingestion batch. A batch is immutable once it reaches one
/// of the three terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    Queued,
    Processing,
    Completed,
    Partial,
    Failed,
}

impl BatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStatus::Queued => "queued",
            BatchStatus::Processing => "processing",
            BatchStatus::Completed => "completed",
            BatchStatus::Partial => "partial",
            BatchStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BatchStatus::Completed | BatchStatus::Partial | BatchStatus::Failed
        )
    }
}

impl std::str::FromStr for BatchStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(BatchStatus::Queued),
            "processing" => Ok(BatchStatus::Processing),
            "completed" => Ok(BatchStatus::Completed),
            "partial" => Ok(BatchStatus::Partial),
            "failed" => Ok(BatchStatus::Failed),
            other => Err(anyhow::anyhow!("unknown batch status: {}", other)),
        }
    }
}

/// How validated rows are written to the facility store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersistStrategy {
    /// All validated rows in a single transaction; an infrastructure error
    /// fails every row in the batch together.
    Atomic,
    /// One commit per row, with an optional inter-row delay so concurrent
    /// pollers can observe progress.
    Incremental,
}

impl PersistStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersistStrategy::Atomic => "atomic",
            PersistStrategy::Incremental => "incremental",
        }
    }
}

impl std::str::FromStr for PersistStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "atomic" => Ok(PersistStrategy::Atomic),
            "incremental" => Ok(PersistStrategy::Incremental),
            other => Err(anyhow::anyhow!("unknown persist strategy: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestBatch {
    pub id: Uuid,
    pub status: BatchStatus,
    pub strategy: PersistStrategy,
    pub total_rows: i32,
    pub processed_rows: i32,
    pub failed_rows: i32,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl IngestBatch {
    pub fn new(strategy: PersistStrategy, total_rows: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            status: BatchStatus::Queued,
            strategy,
            total_rows,
            processed_rows: 0,
            failed_rows: 0,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Terminal status from the final counters: `completed` when nothing
    /// failed, `failed` when nothing succeeded, `partial` otherwise.
    pub fn resolve_terminal(processed_rows: i32, failed_rows: i32) -> BatchStatus {
        if failed_rows == 0 {
            BatchStatus::Completed
        } else if processed_rows == 0 {
            BatchStatus::Failed
        } else {
            BatchStatus::Partial
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_batch_starts_queued_with_zero_counters() {
        let batch = IngestBatch::new(PersistStrategy::Atomic, 3);
        assert_eq!(batch.status, BatchStatus::Queued);
        assert_eq!(batch.total_rows, 3);
        assert_eq!(batch.processed_rows, 0);
        assert_eq!(batch.failed_rows, 0);
        assert!(batch.finished_at.is_none());
    }

    #[test]
    fn terminal_status_table() {
        assert_eq!(IngestBatch::resolve_terminal(3, 0), BatchStatus::Completed);
        assert_eq!(IngestBatch::resolve_terminal(2, 1), BatchStatus::Partial);
        assert_eq!(IngestBatch::resolve_terminal(0, 3), BatchStatus::Failed);
    }

    #[test]
    fn terminal_states_are_terminal() {
        assert!(!BatchStatus::Queued.is_terminal());
        assert!(!BatchStatus::Processing.is_terminal());
        assert!(BatchStatus::Completed.is_terminal());
        assert!(BatchStatus::Partial.is_terminal());
        assert!(BatchStatus::Failed.is_terminal());
    }

    #[test]
    fn status_round_trips_through_str() {
        for status in [
            BatchStatus::Queued,
            BatchStatus::Processing,
            BatchStatus::Completed,
            BatchStatus::Partial,
            BatchStatus::Failed,
        ] {
            assert_eq!(status.as_str().parse::<BatchStatus>().unwrap(), status);
        }
        assert!("done".parse::<BatchStatus>().is_err());
    }

    #[test]
    fn strategy_round_trips_through_str() {
        assert_eq!(
            "atomic".parse::<PersistStrategy>().unwrap(),
            PersistStrategy::Atomic
        );
        assert_eq!(
            "incremental".parse::<PersistStrategy>().unwrap(),
            PersistStrategy::Incremental
        );
        assert!("bulk".parse::<PersistStrategy>().is_err());
    }
}
