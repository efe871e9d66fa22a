//! Response payloads.
//!
//! # Responsibilities
//! - Define the JSON bodies emitted by handlers
//! - Build `{message, error}` bodies from any error value
//!
//! # Design Decisions
//! - Building an error body never fails; an absent cause renders as ""
//! - Validation failures join every violation into a single string

use std::fmt::Display;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::model::{StudentId, ValidationErrors};

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    pub error: String,
}

impl ErrorResponse {
    /// Error body for a category and an optional underlying cause.
    pub fn general(message: impl Into<String>, cause: Option<&dyn Display>) -> Self {
        Self {
            message: message.into(),
            error: cause.map(|c| c.to_string()).unwrap_or_default(),
        }
    }

    /// Error body listing every failed field.
    pub fn validation(errors: &ValidationErrors) -> Self {
        Self {
            message: "Validation failed".to_string(),
            error: errors.to_string(),
        }
    }
}

/// Body returned after a successful create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub message: String,
    pub id: StudentId,
}

/// Bare acknowledgement for update and delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub env: String,
    pub version: String,
}

/// Serialize `data` as the JSON body of a response with `status`.
pub fn write_json<T: Serialize>(status: StatusCode, data: T) -> Response {
    (status, Json(data)).into_response()
}
