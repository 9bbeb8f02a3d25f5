use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bestrate_common::Currency;
use bestrate_fx::FxError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum ApiError {
    /// Query rejected before any ticker is fetched.
    #[error("{0}")]
    Validation(String),
    #[error("No conversion path found for {origin}-{destination}")]
    NoPath {
        origin: Currency,
        destination: Currency,
    },
    #[error("{0}")]
    Fx(#[from] FxError),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            ApiError::Validation(reason) => (StatusCode::UNPROCESSABLE_ENTITY, reason.clone()),
            ApiError::NoPath { .. } => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Fx(e) if e.is_retryable() => {
                warn!(code = e.error_code(), error = %e, "Upstream unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Service temporarily unavailable".to_string(),
                )
            }
            ApiError::Fx(e) => {
                error!(code = e.error_code(), error = %e, "Conversion failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Unexpected error processing conversion: {}", e),
                )
            }
        };
        let body = Json(ErrorBody {
            code: status.as_u16(),
            detail,
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
