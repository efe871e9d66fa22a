//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, limits, request ID, timeout, metrics)
//! - Bind server to listener
//! - Stop accepting on shutdown and let in-flight requests finish

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::http::error::ApiError;
use crate::http::handlers;
use crate::http::middleware::{timeout_response, track_metrics};
use crate::http::request::{make_request_span, propagate_request_id_layer, set_request_id_layer};
use crate::lifecycle::wait_for;
use crate::storage::{StorageResult, StudentRepository};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn StudentRepository>,
    pub env: Arc<str>,
}

impl AppState {
    pub fn new(repository: Arc<dyn StudentRepository>, env: impl Into<Arc<str>>) -> Self {
        Self {
            repository,
            env: env.into(),
        }
    }

    /// Run a repository call on the blocking pool.
    ///
    /// The outer error covers a task that panicked or was cancelled; the
    /// inner result is the repository's own.
    pub async fn with_repository<T, F>(&self, f: F) -> Result<StorageResult<T>, ApiError>
    where
        F: FnOnce(&dyn StudentRepository) -> StorageResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let repository = Arc::clone(&self.repository);
        tokio::task::spawn_blocking(move || f(repository.as_ref()))
            .await
            .map_err(|e| ApiError::Internal {
                message: "Storage task failed",
                detail: e.to_string(),
            })
    }
}

/// HTTP server for the students API.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and repository.
    pub fn new(config: AppConfig, repository: Arc<dyn StudentRepository>) -> Self {
        let state = AppState::new(repository, config.env.as_str());
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        let students = get(handlers::list_students)
            .post(handlers::create_student)
            .fallback(handlers::method_not_allowed);
        let student = get(handlers::get_student)
            .put(handlers::update_student)
            .delete(handlers::delete_student)
            .fallback(handlers::method_not_allowed);

        Router::new()
            .route("/health", get(handlers::health))
            .route("/api/students", students)
            .route("/api/students/{id}", student)
            .fallback(handlers::route_not_found)
            .with_state(state)
            .layer(middleware::from_fn(track_metrics))
            .layer(DefaultBodyLimit::max(config.limits.max_body_bytes))
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                    .layer(propagate_request_id_layer())
                    .layer(middleware::map_response(timeout_response))
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// A clone of the fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then wait for in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            env = %self.config.env,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(wait_for(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
