//! Axum middleware.

pub mod metrics;
pub mod timeout;

pub use metrics::track_metrics;
pub use timeout::timeout_response;
