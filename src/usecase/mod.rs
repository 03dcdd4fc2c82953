pub mod batch_status;
pub mod ingest_batch;
pub mod manage_batch;
pub mod manage_facilities;
pub mod validate_csv;
