//! Handler error taxonomy and its HTTP mapping.

use std::fmt::Display;

use axum::{
    extract::rejection::{BytesRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::http::response::{write_json, ErrorResponse};
use crate::model::ValidationErrors;
use crate::storage::StorageError;

/// Every way a request can fail once it reaches a handler.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The path exists but not for this verb.
    #[error("Invalid request method")]
    MethodNotAllowed,

    /// No route matches the path.
    #[error("Route not found")]
    RouteNotFound,

    /// The request did not complete within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// Client-caused problem with the body or path parameters.
    #[error("{message}")]
    InvalidInput {
        message: &'static str,
        status: StatusCode,
        detail: Option<String>,
    },

    /// One or more fields failed validation.
    #[error("Validation failed")]
    Validation(#[from] ValidationErrors),

    /// The requested student does not exist.
    #[error("Student not found")]
    NotFound(#[source] StorageError),

    /// The repository failed.
    #[error("{message}")]
    Storage {
        message: &'static str,
        #[source]
        source: StorageError,
    },

    /// Failure outside the repository, e.g. a blocking task that did not join.
    #[error("{message}")]
    Internal {
        message: &'static str,
        detail: String,
    },
}

impl ApiError {
    pub fn empty_body() -> Self {
        ApiError::InvalidInput {
            message: "Request body is empty",
            status: StatusCode::BAD_REQUEST,
            detail: None,
        }
    }

    pub fn malformed_body(err: serde_json::Error) -> Self {
        ApiError::InvalidInput {
            message: "Failed to decode request body",
            status: StatusCode::BAD_REQUEST,
            detail: Some(err.to_string()),
        }
    }

    pub fn unreadable_body(rejection: BytesRejection) -> Self {
        ApiError::InvalidInput {
            message: "Failed to read request body",
            status: rejection.status(),
            detail: Some(rejection.body_text()),
        }
    }

    pub fn missing_id() -> Self {
        ApiError::InvalidInput {
            message: "Student ID is required",
            status: StatusCode::BAD_REQUEST,
            detail: None,
        }
    }

    /// The router could not extract the id segment, e.g. invalid UTF-8.
    pub fn unreadable_id(rejection: PathRejection) -> Self {
        ApiError::InvalidInput {
            message: "Invalid student ID",
            status: rejection.status(),
            detail: Some(rejection.body_text()),
        }
    }

    pub fn invalid_id(err: std::num::ParseIntError) -> Self {
        ApiError::InvalidInput {
            message: "Invalid student ID",
            status: StatusCode::BAD_REQUEST,
            detail: Some(err.to_string()),
        }
    }

    /// Classify a repository error, keeping `message` for the generic case.
    pub fn storage(message: &'static str, source: StorageError) -> Self {
        match source {
            StorageError::NotFound { .. } => ApiError::NotFound(source),
            source => ApiError::Storage { message, source },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::InvalidInput { status, .. } => *status,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Storage { .. } | ApiError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The `{message, error}` body for this error.
    pub fn to_body(&self) -> ErrorResponse {
        match self {
            ApiError::Validation(errors) => ErrorResponse::validation(errors),
            ApiError::InvalidInput {
                message, detail, ..
            } => ErrorResponse::general(*message, detail.as_ref().map(|d| d as &dyn Display)),
            ApiError::NotFound(source) => ErrorResponse::general(self.to_string(), Some(source)),
            ApiError::Storage { message, source } => ErrorResponse::general(*message, Some(source)),
            ApiError::Internal { message, detail } => ErrorResponse::general(*message, Some(detail)),
            ApiError::MethodNotAllowed | ApiError::RouteNotFound | ApiError::Timeout => {
                ErrorResponse::general(self.to_string(), None)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = self.to_body();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), message = %body.message, error = %body.error, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), message = %body.message, error = %body.error, "Request rejected");
        }

        write_json(status, body)
    }
}
