use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::ingest_batch::{BatchStatus, IngestBatch, PersistStrategy};
use crate::domain::entity::row_outcome::{RowOutcome, RowStatus};
use crate::domain::repository::batch_repository::BatchRepository;

pub struct BatchRepositoryImpl {
    pool: PgPool,
}

impl BatchRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BatchRow {
    id: Uuid,
    status: String,
    strategy: String,
    total_rows: i32,
    processed_rows: i32,
    failed_rows: i32,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
}

impl TryFrom<BatchRow> for IngestBatch {
    type Error = anyhow::Error;

    fn try_from(row: BatchRow) -> Result<Self, Self::Error> {
        Ok(IngestBatch {
            id: row.id,
            status: row.status.parse::<BatchStatus>()?,
            strategy: row.strategy.parse::<PersistStrategy>()?,
            total_rows: row.total_rows,
            processed_rows: row.processed_rows,
            failed_rows: row.failed_rows,
            started_at: row.started_at,
            finished_at: row.finished_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OutcomeRow {
    batch_id: Uuid,
    row_number: i32,
    name: String,
    status: String,
    facility_id: Option<i64>,
    error: Option<String>,
    raw_data: Option<String>,
}

impl TryFrom<OutcomeRow> for RowOutcome {
    type Error = anyhow::Error;

    fn try_from(row: OutcomeRow) -> Result<Self, Self::Error> {
        Ok(RowOutcome {
            batch_id: row.batch_id,
            row_number: row.row_number,
            name: row.name,
            status: row.status.parse::<RowStatus>()?,
            facility_id: row.facility_id,
            error: row.error,
            raw_data: row.raw_data,
        })
    }
}

const SELECT_BATCH_SQL: &str = r#"
    SELECT id, status, strategy, total_rows, processed_rows, failed_rows,
           started_at, finished_at
    FROM facility_registry.ingest_batches
    WHERE id = $1
"#;

#[async_trait]
impl BatchRepository for BatchRepositoryImpl {
    async fn create(&self, batch: &IngestBatch) -> anyhow::Result<IngestBatch> {
        let row = sqlx::query_as::<_, BatchRow>(
            r#"
            INSERT INTO facility_registry.ingest_batches
                (id, status, strategy, total_rows, processed_rows, failed_rows, started_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, status, strategy, total_rows, processed_rows, failed_rows,
                      started_at, finished_at
            "#,
        )
        .bind(batch.id)
        .bind(batch.status.as_str())
        .bind(batch.strategy.as_str())
        .bind(batch.total_rows)
        .bind(batch.processed_rows)
        .bind(batch.failed_rows)
        .bind(batch.started_at)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn mark_processing(&self, batch_id: Uuid) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE facility_registry.ingest_batches
            SET status = $2
            WHERE id = $1
            "#,
        )
        .bind(batch_id)
        .bind(BatchStatus::Processing.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn record_outcome(&self, outcome: &RowOutcome) -> anyhow::Result<()> {
        let counter_sql = match outcome.status {
            RowStatus::Created => {
                r#"
                UPDATE facility_registry.ingest_batches
                SET processed_rows = processed_rows + 1
                WHERE id = $1
                "#
            }
            RowStatus::Failed => {
                r#"
                UPDATE facility_registry.ingest_batches
                SET failed_rows = failed_rows + 1
                WHERE id = $1
                "#
            }
        };

        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO facility_registry.ingest_row_outcomes
                (batch_id, row_number, name, status, facility_id, error, raw_data)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(outcome.batch_id)
        .bind(outcome.row_number)
        .bind(&outcome.name)
        .bind(outcome.status.as_str())
        .bind(outcome.facility_id)
        .bind(&outcome.error)
        .bind(&outcome.raw_data)
        .execute(&mut *tx)
        .await?;
        sqlx::query(counter_sql)
            .bind(outcome.batch_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn finalize(&self, batch_id: Uuid) -> anyhow::Result<IngestBatch> {
        // Status is derived from the counters already on the row, so a crash
        // between the last outcome and this update loses nothing but the
        // terminal stamp.
        let row = sqlx::query_as::<_, BatchRow>(
            r#"
            UPDATE facility_registry.ingest_batches
            SET status = CASE
                    WHEN failed_rows = 0 THEN 'completed'
                    WHEN processed_rows = 0 THEN 'failed'
                    ELSE 'partial'
                END,
                finished_at = now()
            WHERE id = $1
            RETURNING id, status, strategy, total_rows, processed_rows, failed_rows,
                      started_at, finished_at
            "#,
        )
        .bind(batch_id)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn find_by_id(&self, batch_id: Uuid) -> anyhow::Result<Option<IngestBatch>> {
        let row = sqlx::query_as::<_, BatchRow>(SELECT_BATCH_SQL)
            .bind(batch_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(TryInto::try_into).transpose()
    }

    async fn list_outcomes(&self, batch_id: Uuid) -> anyhow::Result<Vec<RowOutcome>> {
        let rows = sqlx::query_as::<_, OutcomeRow>(
            r#"
            SELECT batch_id, row_number, name, status, facility_id, error, raw_data
            FROM facility_registry.ingest_row_outcomes
            WHERE batch_id = $1
            ORDER BY row_number
            "#,
        )
        .bind(batch_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(TryInto::try_into).collect()
    }
}
