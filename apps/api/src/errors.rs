use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::PayloadError;
use crate::render::{DocxError, RenderError};
use crate::storage::StorageError;
use crate::tailoring::TailorError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Webhook error: {0}")]
    Webhook(String),

    #[error("Not configured: {0}")]
    NotConfigured(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<PayloadError> for AppError {
    fn from(e: PayloadError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<DocxError> for AppError {
    fn from(e: DocxError) -> Self {
        AppError::Render(RenderError::from(e))
    }
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotGenerated(_) => AppError::NotFound(e.to_string()),
            other => AppError::Storage(other.to_string()),
        }
    }
}

impl From<TailorError> for AppError {
    fn from(e: TailorError) -> Self {
        match e {
            TailorError::NotConfigured(_) => AppError::NotConfigured(e.to_string()),
            other => AppError::Webhook(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Render(e) => {
                tracing::error!("Render error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "RENDER_ERROR",
                    "Failed to render the document".to_string(),
                )
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "Failed to store the generated document".to_string(),
                )
            }
            AppError::Webhook(msg) => {
                tracing::error!("Webhook error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "WEBHOOK_ERROR",
                    "The tailoring service request failed".to_string(),
                )
            }
            AppError::NotConfigured(msg) => {
                tracing::warn!("Not configured: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "NOT_CONFIGURED",
                    msg.clone(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DocumentFormat;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::from(PayloadError::NoData), StatusCode::BAD_REQUEST),
            (
                AppError::from(StorageError::NotGenerated(DocumentFormat::Pdf)),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::from(TailorError::NotConfigured("TAILOR_WEBHOOK_URL")),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AppError::from(TailorError::EmptyResponse),
                StatusCode::BAD_GATEWAY,
            ),
            (
                AppError::from(RenderError::Pdf("boom".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_no_data_message_is_preserved() {
        match AppError::from(PayloadError::NoData) {
            AppError::Validation(msg) => assert_eq!(msg, "No data provided"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
