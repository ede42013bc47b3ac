//! Error handling and custom error types
//!
//! Provides unified error handling across the relay using thiserror. Every
//! variant maps to the HTTP status the caller receives.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Configuration(String),

    #[error("{0}")]
    Validation(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("{0}")]
    AiProvider(String),

    #[error("{0}")]
    Timeout(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// HTTP status reported to the caller for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.status().is_server_error()
    }
}

/// Failure body: `{"error": "<message>"}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_validation_is_bad_request() {
        assert_eq!(
            Error::Validation("missing".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert!(!Error::Validation("missing".to_string()).is_server_error());
    }

    #[test]
    fn test_server_errors_are_internal() {
        for err in [
            Error::Configuration("no key".to_string()),
            Error::InvalidBody("bad json".to_string()),
            Error::AiProvider("boom".to_string()),
            Error::Timeout("slow".to_string()),
        ] {
            assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
            assert!(err.is_server_error());
        }
    }

    #[test]
    fn test_invalid_body_message_is_prefixed() {
        let err = Error::InvalidBody("expected value at line 1 column 1".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid request body: expected value at line 1 column 1"
        );
    }

    #[tokio::test]
    async fn test_into_response_renders_error_json() {
        let response = Error::Validation("Both fields are required".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Both fields are required" }));
    }
}
