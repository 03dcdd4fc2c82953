pub mod error;
pub mod facility_handler;
pub mod ingest_handler;

use std::sync::Arc;

use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::usecase;

/// Uploads are small CSVs; anything past this is a mistake.
const MAX_UPLOAD_BYTES: usize = 2 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub ingest_uc: Arc<usecase::ingest_batch::IngestBatchUsecase>,
    pub batch_status_uc: Arc<usecase::batch_status::BatchStatusUsecase>,
    pub manage_batch_uc: Arc<usecase::manage_batch::ManageBatchUsecase>,
    pub validate_csv_uc: Arc<usecase::validate_csv::ValidateCsvUsecase>,
    pub manage_facilities_uc: Arc<usecase::manage_facilities::ManageFacilitiesUsecase>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(facility_handler::healthz))
        .route("/readyz", get(facility_handler::readyz))
        .route(
            "/api/v1/facilities",
            get(facility_handler::list_facilities).post(facility_handler::create_facility),
        )
        .route(
            "/api/v1/facilities/{id}",
            get(facility_handler::get_facility)
                .put(facility_handler::update_facility)
                .delete(facility_handler::delete_facility),
        )
        .route("/api/v1/facilities/bulk", post(ingest_handler::ingest_csv))
        .route(
            "/api/v1/facilities/bulk/validate",
            post(ingest_handler::validate_csv),
        )
        .route(
            "/api/v1/facilities/batch/{id}",
            get(ingest_handler::list_batch_facilities).delete(ingest_handler::delete_batch),
        )
        .route(
            "/api/v1/facilities/batch/{id}/activate",
            patch(ingest_handler::activate_batch),
        )
        .route(
            "/api/v1/facilities/batch/{id}/deactivate",
            patch(ingest_handler::deactivate_batch),
        )
        .route("/api/v1/ingest-batches/{id}", get(ingest_handler::get_batch))
        .route(
            "/api/v1/ingest-batches/{id}/outcomes",
            get(ingest_handler::get_batch_outcomes),
        )
        .layer(RequestBodyLimitLayer::new(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
