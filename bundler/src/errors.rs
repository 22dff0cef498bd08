//! Error types for the bundler

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

/// Main error type for the bundler
#[derive(Error, Debug)]
pub enum BundlerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Archive error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Invalid request payload: {0}")]
    InvalidPayload(String),

    #[error("Endpoint error: {0}")]
    Endpoint(String),

    #[error("Cluster identity error: {0}")]
    Identity(String),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Failed to write entry {path}: {reason}")]
    Archive { path: String, reason: String },

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Server error: {0}")]
    ServerError(String),
}

impl BundlerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            BundlerError::InvalidPayload(_) | BundlerError::InvalidPath(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for BundlerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            BundlerError::InvalidPayload(_) => "Invalid request payload".to_string(),
            other => other.to_string(),
        };
        error!("Request failed ({}): {}", status, self);
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
