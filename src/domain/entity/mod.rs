pub mod facility;
pub mod ingest_batch;
pub mod row_outcome;
