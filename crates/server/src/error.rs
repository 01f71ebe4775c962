//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return `Result<T, AppError>`.
//!
//! # Response mapping
//!
//! | Error                                  | Status | Body        |
//! |----------------------------------------|--------|-------------|
//! | missing / invalid signature            | 401    | plain text  |
//! | visitor not logged in                  | 401    | JSON        |
//! | missing shop, malformed customer id    | 400    | JSON        |
//! | missing `product_id`, bad request body | 400    | JSON        |
//! | storage failure                        | 500    | JSON        |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use wishlist_proxy_core::ProxyAuthError;

use crate::db::RepositoryError;

/// Body returned for every signature failure, whatever the cause.
pub const SIGNATURE_REJECTED_BODY: &str = "Unauthorized";

/// Application-level error type for the wishlist server.
#[derive(Debug, Error)]
pub enum AppError {
    /// The App Proxy authentication chain rejected the request.
    #[error("Auth error: {0}")]
    Auth(#[from] ProxyAuthError),

    /// A write or delete did not name a product.
    #[error("Missing product_id")]
    MissingProductId,

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Database operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] RepositoryError),
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub ok: bool,
    pub error: String,
}

impl ErrorBody {
    fn new(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: error.into(),
        }
    }
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Auth(err) => match err {
                ProxyAuthError::MissingSignature
                | ProxyAuthError::InvalidSignature
                | ProxyAuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
                ProxyAuthError::MissingShop | ProxyAuthError::MalformedCustomerId => {
                    StatusCode::BAD_REQUEST
                }
            },
            Self::MissingProductId | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            // Signature failures get an opaque text body; nothing about the
            // canonical string or digests leaves the process.
            Self::Auth(err) if err.is_signature_failure() => {
                tracing::warn!(reason = %err, "Rejected App Proxy request");
                (status, SIGNATURE_REJECTED_BODY).into_response()
            }
            Self::Auth(err) => {
                tracing::debug!(reason = %err, "App Proxy identity not resolved");
                (status, Json(ErrorBody::new(err.to_string()))).into_response()
            }
            Self::MissingProductId => {
                (status, Json(ErrorBody::new("product_id is required"))).into_response()
            }
            Self::BadRequest(msg) => (status, Json(ErrorBody::new(msg.clone()))).into_response(),
            // Don't expose internal error details to clients
            Self::Storage(_) => {
                let event_id = sentry::capture_error(&self);
                tracing::error!(
                    error = %self,
                    sentry_event_id = %event_id,
                    "Request error"
                );
                (status, Json(ErrorBody::new("Internal server error"))).into_response()
            }
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for a wishlist action.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, &str)]) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data {
        breadcrumb.data.insert(
            (*key).to_string(),
            serde_json::Value::String((*value).to_string()),
        );
    }

    sentry::add_breadcrumb(breadcrumb);
}
