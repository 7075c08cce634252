//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers should return
//! `Result<T, AppError>`. Error payloads are JSON (`{"error": "..."}`) to
//! match the API surface.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::orders::OrderError;

/// Application-level error type for the ordering service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed or data violated an invariant.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Order composition or lifecycle operation failed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// The HTTP status this error maps to.
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Order(err) => match err {
                OrderError::EmptyCart
                | OrderError::InvalidProduct(_)
                | OrderError::InvalidQuantity(_)
                | OrderError::InvalidModifier(_)
                | OrderError::NoFulfillmentTarget(_)
                | OrderError::InvalidStatus(_)
                | OrderError::TerminalState { .. } => StatusCode::BAD_REQUEST,
                OrderError::NotFound(_) => StatusCode::NOT_FOUND,
                OrderError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// The client-visible message. Internal detail is not exposed.
    fn client_message(&self) -> String {
        if self.status().is_server_error() {
            "Internal error".to_string()
        } else {
            self.to_string()
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.status().is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (self.status(), Json(json!({ "error": self.client_message() }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use curbside_core::{OrderId, ProductId};

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("order 123".to_string());
        assert_eq!(err.to_string(), "Not found: order 123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn validation_failures_are_client_errors() {
        assert_eq!(
            get_status(AppError::Order(OrderError::EmptyCart)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Order(OrderError::InvalidProduct(
                ProductId::new("x")
            ))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Order(OrderError::InvalidStatus(
                "bogus".to_string()
            ))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Order(OrderError::NotFound(OrderId::new("x")))),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn store_failures_are_server_errors() {
        assert_eq!(
            get_status(AppError::Database(RepositoryError::DataCorruption(
                "spot orphaned".to_string()
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn server_errors_hide_internal_detail() {
        let err = AppError::Database(RepositoryError::DataCorruption(
            "domain mapping x references a missing business".to_string(),
        ));
        assert_eq!(err.client_message(), "Internal error");

        let err = AppError::Order(OrderError::EmptyCart);
        assert_eq!(err.client_message(), "Order error: cart is empty");
    }
}
