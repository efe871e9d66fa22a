//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, tracing span)
//!     → handlers.rs (decode → validate → repository → respond)
//!     → error.rs / response.rs (JSON bodies and status codes)
//!     → Send to client
//! ```

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use error::ApiError;
pub use request::X_REQUEST_ID;
pub use response::{CreatedResponse, ErrorResponse, HealthResponse, MessageResponse};
pub use server::{AppState, HttpServer};
