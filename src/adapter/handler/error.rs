use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapter::presenter::response::{ErrorDetail, ErrorResponse};
use crate::domain::service::csv_decoder::FormatError;
use crate::usecase::ingest_batch::IngestError;
use crate::usecase::manage_batch::ManageBatchError;
use crate::usecase::manage_facilities::FacilityError;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl AppError {
    pub fn not_found(code: &str, message: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            code: code.to_string(),
            message: message.to_string(),
            details: None,
        }
    }

    pub fn bad_request(code: &str, message: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: code.to_string(),
            message: message.to_string(),
            details: None,
        }
    }

    pub fn internal(code: &str, message: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: code.to_string(),
            message: message.to_string(),
            details: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
                request_id: None,
                details: self.details,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!(error = %err, "unhandled internal error");
        Self::internal("FAC_REG_INTERNAL_ERROR", &err.to_string())
    }
}

impl From<FormatError> for AppError {
    fn from(err: FormatError) -> Self {
        Self::bad_request("FAC_REG_INVALID_CSV", &err.to_string())
    }
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::Format(e) => e.into(),
            IngestError::DelayOutOfRange(_) => {
                Self::bad_request("FAC_REG_INVALID_DELAY", &err.to_string())
            }
            IngestError::Internal(e) => e.into(),
        }
    }
}

impl From<ManageBatchError> for AppError {
    fn from(err: ManageBatchError) -> Self {
        match err {
            ManageBatchError::NotFound(_) => {
                Self::not_found("FAC_REG_BATCH_NOT_FOUND", &err.to_string())
            }
            ManageBatchError::Internal(e) => e.into(),
        }
    }
}

impl From<FacilityError> for AppError {
    fn from(err: FacilityError) -> Self {
        match err {
            FacilityError::Invalid(_) => {
                Self::bad_request("FAC_REG_VALIDATION_FAILED", &err.to_string())
            }
            FacilityError::NotFound(_) => {
                Self::not_found("FAC_REG_FACILITY_NOT_FOUND", &err.to_string())
            }
            FacilityError::Internal(e) => e.into(),
        }
    }
}
