//! JSON body for requests cut off by the timeout layer.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::http::error::ApiError;

/// Replace the bare 408 emitted by `TimeoutLayer` with an error body.
///
/// Must sit outside the timeout layer. Handlers never return 408 themselves.
pub async fn timeout_response(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        return ApiError::Timeout.into_response();
    }
    response
}
