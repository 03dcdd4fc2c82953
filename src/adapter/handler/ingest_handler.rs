use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::adapter::handler::error::AppError;
use crate::adapter::handler::AppState;
use crate::adapter::presenter::response::ApiResponse;
use crate::domain::entity::facility::Facility;
use crate::domain::entity::ingest_batch::{IngestBatch, PersistStrategy};
use crate::usecase::batch_status::BatchReport;
use crate::usecase::ingest_batch::{BatchIngestResult, IngestOptions};
use crate::usecase::validate_csv::CsvValidationReport;

#[derive(Debug, Deserialize)]
pub struct IngestQuery {
    pub strategy: Option<PersistStrategy>,
    pub delay_per_row: Option<f64>,
    pub auto_activate: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct BatchMutationResponse {
    pub batch_id: Uuid,
    pub affected: u64,
}

/// Pulls the `file` part out of the multipart body and rejects anything that
/// does not look like a CSV upload.
async fn read_csv_upload(multipart: &mut Multipart) -> Result<Vec<u8>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request("FAC_REG_INVALID_UPLOAD", &e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("").to_ascii_lowercase();
        if !file_name.ends_with(".csv") {
            return Err(AppError::bad_request(
                "FAC_REG_INVALID_UPLOAD",
                "only CSV files are allowed",
            ));
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request("FAC_REG_INVALID_UPLOAD", &e.to_string()))?;
        return Ok(bytes.to_vec());
    }
    Err(AppError::bad_request(
        "FAC_REG_INVALID_UPLOAD",
        "multipart field 'file' is required",
    ))
}

pub async fn ingest_csv(
    State(state): State<AppState>,
    Query(query): Query<IngestQuery>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<BatchIngestResult>), AppError> {
    let bytes = read_csv_upload(&mut multipart).await?;
    let options = IngestOptions {
        strategy: query.strategy.unwrap_or(PersistStrategy::Atomic),
        delay_per_row: query.delay_per_row,
        auto_activate: query.auto_activate.unwrap_or(false),
    };
    let result = state.ingest_uc.execute(&bytes, options).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

pub async fn validate_csv(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<CsvValidationReport>, AppError> {
    let bytes = read_csv_upload(&mut multipart).await?;
    let report = state.validate_csv_uc.execute(&bytes)?;
    Ok(Json(report))
}

pub async fn get_batch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<IngestBatch>, AppError> {
    state
        .batch_status_uc
        .status(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("FAC_REG_BATCH_NOT_FOUND", &format!("batch {} not found", id)))
}

pub async fn get_batch_outcomes(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BatchReport>, AppError> {
    state
        .batch_status_uc
        .report(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("FAC_REG_BATCH_NOT_FOUND", &format!("batch {} not found", id)))
}

pub async fn list_batch_facilities(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Facility>>>, AppError> {
    let facilities = state.manage_batch_uc.list_facilities(id).await?;
    Ok(Json(ApiResponse { data: facilities }))
}

pub async fn activate_batch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BatchMutationResponse>, AppError> {
    let affected = state.manage_batch_uc.activate(id).await?;
    Ok(Json(BatchMutationResponse {
        batch_id: id,
        affected,
    }))
}

pub async fn deactivate_batch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BatchMutationResponse>, AppError> {
    let affected = state.manage_batch_uc.deactivate(id).await?;
    Ok(Json(BatchMutationResponse {
        batch_id: id,
        affected,
    }))
}

pub async fn delete_batch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BatchMutationResponse>, AppError> {
    let affected = state.manage_batch_uc.delete(id).await?;
    Ok(Json(BatchMutationResponse {
        batch_id: id,
        affected,
    }))
}
