// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use crate::storage::StorageError;
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Each variant maps to an HTTP status code; the body is
/// always `{"error": "<message>"}`
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found")]
    NotFound,

    /// Malformed body or missing required field ("Not a JSON", "Missing name")
    #[error("{0}")]
    BadRequest(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// "Missing <field>" for a required body field
    pub fn missing(field: &str) -> Self {
        ApiError::BadRequest(format!("Missing {}", field))
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::InvalidInput(errors.to_string())
    }
}

/// Convert ApiError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        let message = match self {
            ApiError::Storage(e) => {
                log::error!("Request failed: {}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
