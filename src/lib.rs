//! Students API Library
//!
//! CRUD over a single `student` entity, served as JSON over HTTP and
//! persisted in SQLite.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod model;
pub mod observability;
pub mod storage;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use model::{Student, StudentId};
pub use storage::{SqliteStorage, StorageError, StudentRepository};
