//! Mapping of orchestration results to HTTP responses.
//!
//! - success outcomes → 200 `{"message": ...}`
//! - both dependencies failed → 503 `{"detail": ...}`
//! - anything else → 500 `{"detail": ...}`, never a raw error

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::gateway::{GatewayError, Outcome};

pub const BOTH_FAILED_DETAIL: &str = "Both services B and C failed";
pub const UNEXPECTED_DETAIL: &str = "Unexpected failure in Service A";

#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthBody {
    pub status: &'static str,
    pub service: &'static str,
}

fn error_response(status: StatusCode, detail: &'static str) -> Response {
    (status, Json(ErrorBody { detail })).into_response()
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        match self.message() {
            Some(message) => Json(MessageBody { message }).into_response(),
            None => error_response(StatusCode::SERVICE_UNAVAILABLE, BOTH_FAILED_DETAIL),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match self {
            GatewayError::SecondaryTransport(_) => {
                error_response(StatusCode::SERVICE_UNAVAILABLE, BOTH_FAILED_DETAIL)
            }
            other => {
                tracing::error!(
                    component = "service-a",
                    status_code = 500,
                    error = ?other,
                    "Unexpected failure in Service A: {}",
                    other
                );
                error_response(StatusCode::INTERNAL_SERVER_ERROR, UNEXPECTED_DETAIL)
            }
        }
    }
}
