use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde_json::Value;
use thiserror::Error;

use crate::sender::{SendFailure, CREDENTIALS_NOT_CONFIGURED};
use crate::types::ErrorResponse;

pub const MISSING_FIELDS: &str = "Phone and message are required";
pub const TEST_PHONE_NOT_CONFIGURED: &str =
    "TEST_PHONE not configured in .env file. Please add it to test WhatsApp connection.";
pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{}", MISSING_FIELDS)]
    MissingFields,

    #[error("{}", CREDENTIALS_NOT_CONFIGURED)]
    NotConfigured,

    #[error("{}", TEST_PHONE_NOT_CONFIGURED)]
    TestPhoneNotConfigured,

    #[error(transparent)]
    Send(#[from] SendFailure),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::MissingFields | Self::TestPhoneNotConfigured => StatusCode::BAD_REQUEST,
            Self::NotConfigured | Self::Send(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error = match &self {
            Self::Send(failure) => failure.payload(),
            Self::Internal(err) => {
                error!("Unexpected server error: {:#}", err);
                Value::from(INTERNAL_SERVER_ERROR)
            }
            other => Value::from(other.to_string()),
        };

        (
            self.status(),
            Json(ErrorResponse {
                success: false,
                error,
            }),
        )
            .into_response()
    }
}

/// Turns a handler panic into the generic 500 body. Used with `CatchPanicLayer`.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());

    AppError::Internal(anyhow::anyhow!("handler panicked: {}", detail)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::json;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn missing_fields_is_bad_request() {
        let (status, body) = render(AppError::MissingFields).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"success": false, "error": MISSING_FIELDS}));
    }

    #[tokio::test]
    async fn provider_payload_is_passed_through() {
        let payload = json!({"error": {"code": 131030, "message": "Recipient not in allowed list"}});
        let (status, body) = render(SendFailure::Provider(payload.clone()).into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"success": false, "error": payload}));
    }

    #[tokio::test]
    async fn internal_detail_is_not_leaked() {
        let (status, body) = render(anyhow::anyhow!("db password is hunter2").into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"success": false, "error": INTERNAL_SERVER_ERROR}));
    }

    #[tokio::test]
    async fn panic_maps_to_generic_error() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
