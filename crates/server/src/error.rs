use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use netwood_core::error::{ApiError, ErrorEnvelope};
use netwood_ingest::pipeline::IngestError;

/// Newtype wrapper so we can implement `IntoResponse` in this crate.
pub struct AppError(pub ApiError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let envelope = ErrorEnvelope::from(&self.0);
        (status, Json(envelope)).into_response()
    }
}

impl From<ApiError> for AppError {
    fn from(e: ApiError) -> Self {
        Self(e)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        Self(ApiError::Internal(e.to_string()))
    }
}

impl From<IngestError> for AppError {
    fn from(e: IngestError) -> Self {
        match e {
            IngestError::Upstream(e) => Self(ApiError::Upstream(e.to_string())),
            IngestError::Storage(e) => Self(ApiError::Internal(e.to_string())),
        }
    }
}
