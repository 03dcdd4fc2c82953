use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::adapter::handler::error::AppError;
use crate::adapter::handler::AppState;
use crate::adapter::presenter::response::ApiResponse;
use crate::domain::entity::facility::{Facility, FacilityUpdate};
use crate::usecase::manage_facilities::FacilityPage;

pub async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn readyz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ready" }))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateFacilityRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub batch_id: Option<Uuid>,
}

pub async fn list_facilities(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<FacilityPage>, AppError> {
    let page = state
        .manage_facilities_uc
        .list(query.page, query.page_size)
        .await?;
    Ok(Json(page))
}

pub async fn create_facility(
    State(state): State<AppState>,
    Json(body): Json<CreateFacilityRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Facility>>), AppError> {
    let facility = state
        .manage_facilities_uc
        .create(
            body.name.as_deref(),
            body.address.as_deref(),
            body.phone.as_deref(),
            body.batch_id,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse { data: facility })))
}

pub async fn get_facility(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Facility>>, AppError> {
    let facility = state.manage_facilities_uc.get(id).await?;
    Ok(Json(ApiResponse { data: facility }))
}

pub async fn update_facility(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(changes): Json<FacilityUpdate>,
) -> Result<Json<ApiResponse<Facility>>, AppError> {
    let facility = state.manage_facilities_uc.update(id, changes).await?;
    Ok(Json(ApiResponse { data: facility }))
}

pub async fn delete_facility(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.manage_facilities_uc.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
