use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

/// Common error types used across the application.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // Plain-text body, e.g. "Missing token"
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            // The provider's error object is passed through untouched
            AppError::Provider(err) => (StatusCode::INTERNAL_SERVER_ERROR, Json(err)).into_response(),
            other => {
                let body = json!({ "error": other.to_string() });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

/// Failure reported by (or while talking to) the push-notification provider.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{status}: {message}")]
pub struct ProviderError {
    /// HTTP status code returned by the provider, if a response was received
    pub code: Option<u16>,
    /// Canonical provider status, e.g. `INVALID_ARGUMENT` or `UNREGISTERED`
    pub status: String,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: Option<u16>, status: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            status: status.into(),
            message: message.into(),
        }
    }

    /// The provider could not be reached at all.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(None, "UNAVAILABLE", message)
    }
}

impl From<AuthError> for ProviderError {
    fn from(err: AuthError) -> Self {
        Self::new(None, "UNAUTHENTICATED", err.to_string())
    }
}

/// The document store could not be reached or returned something unreadable.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),
}

/// Service-account credential and token-exchange failures.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials: {0}")]
    Credentials(String),

    #[error("Failed to sign assertion: {0}")]
    Sign(#[from] jsonwebtoken::errors::Error),

    #[error("Token exchange failed: {0}")]
    Exchange(String),
}
