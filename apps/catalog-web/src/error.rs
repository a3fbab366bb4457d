//! # HTTP Error Mapping
//!
//! Every failure a handler can return, and what the client sees for it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      ApiError → Response                                │
//! │                                                                         │
//! │  NotFound      → 404 text/plain    "Product with ID 7 not found."      │
//! │  BadRequest    → 400 text/plain    "A search keyword is required."     │
//! │  Validation    → 400 text/plain    (Create re-renders the form first)  │
//! │  Antiforgery   → 400 text/plain                                         │
//! │  Internal      → 500 application/json  {"message": "..."}               │
//! │                                                                         │
//! │  Panics never reach this type: CatchPanicLayer renders them with       │
//! │  [`internal_error_response`] directly.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::any::Any;
use thiserror::Error;
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::antiforgery::AntiforgeryError;
use catalog_core::{CoreError, ValidationErrors};
use catalog_db::DbError;

/// Errors returned by handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("Anti-forgery token validation failed: {0}")]
    Antiforgery(#[from] AntiforgeryError),

    #[error("{0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Body of every 500 response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub message: String,
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(_) => ApiError::NotFound(err.to_string()),
            CoreError::MissingSearchKeyword => ApiError::BadRequest(err.to_string()),
            CoreError::Validation(errors) => ApiError::Validation(errors),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();

        match self {
            ApiError::NotFound(_) => {
                warn!(status = 404, %message, "Request failed");
                plain_text(StatusCode::NOT_FOUND, message)
            }
            ApiError::BadRequest(_) | ApiError::Validation(_) | ApiError::Antiforgery(_) => {
                warn!(status = 400, %message, "Request failed");
                plain_text(StatusCode::BAD_REQUEST, message)
            }
            ApiError::Internal(_) => internal_error_response(message),
        }
    }
}

fn plain_text(status: StatusCode, message: String) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        message,
    )
        .into_response()
}

/// Renders a 500 with `{"message": ...}` and logs it at error level.
pub fn internal_error_response(message: String) -> Response {
    error!(status = 500, %message, "Unhandled error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody { message }),
    )
        .into_response()
}

/// `CatchPanicLayer` callback: turns a handler panic into a 500 JSON body.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic message".to_string()
    };

    internal_error_response(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_is_plain_text() {
        let response = ApiError::from(CoreError::ProductNotFound(7)).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, "Product with ID 7 not found.");
    }

    #[tokio::test]
    async fn test_missing_keyword_is_bad_request() {
        let response = ApiError::from(CoreError::MissingSearchKeyword).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "A search keyword is required.");
    }

    #[tokio::test]
    async fn test_db_error_is_json_500() {
        let response = ApiError::from(DbError::PoolExhausted).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["message"], "Connection pool exhausted");
    }

    #[tokio::test]
    async fn test_panic_payload_becomes_message() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["message"], "boom");
    }
}
