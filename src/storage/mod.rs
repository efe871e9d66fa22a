//! Storage subsystem.
//!
//! # Data Flow
//! ```text
//! handler
//!     → StudentRepository (trait object held in AppState)
//!     → sqlite.rs (one statement per call, connection behind a mutex)
//!     → StorageError (NotFound kept distinct from driver failures)
//! ```
//!
//! # Design Decisions
//! - The repository is built once at startup and injected, never global
//! - Update and delete are permissive: a missing id is not an error
//! - Listing order is insertion order

pub mod sqlite;

use thiserror::Error;

use crate::model::{Student, StudentId};

pub use sqlite::SqliteStorage;

pub type StorageResult<T> = Result<T, StorageError>;

/// Errors surfaced by a student repository.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No row matches the requested id.
    #[error("student not found with id {id}")]
    NotFound { id: StudentId },

    /// The underlying driver failed while performing `operation`.
    #[error("failed to {operation}: {source}")]
    Database {
        operation: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    /// A previous holder of the connection panicked.
    #[error("storage connection is unavailable")]
    Unavailable,
}

impl StorageError {
    pub(crate) fn database(operation: &'static str) -> impl FnOnce(rusqlite::Error) -> Self {
        move |source| StorageError::Database { operation, source }
    }
}

/// Data access contract for student rows.
pub trait StudentRepository: Send + Sync {
    /// Insert a row and return its new id.
    fn create_student(&self, name: &str, email: &str, age: i32) -> StorageResult<StudentId>;

    /// Fetch exactly one row.
    fn get_student_by_id(&self, id: StudentId) -> StorageResult<Student>;

    /// Fetch every row in insertion order.
    fn get_students(&self) -> StorageResult<Vec<Student>>;

    /// Overwrite every field of a row.
    fn update_student_by_id(
        &self,
        id: StudentId,
        name: &str,
        email: &str,
        age: i32,
    ) -> StorageResult<()>;

    /// Remove a row.
    fn delete_student_by_id(&self, id: StudentId) -> StorageResult<()>;
}
