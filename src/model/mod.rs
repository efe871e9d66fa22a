//! Domain model.
//!
//! # Data Flow
//! ```text
//! JSON body
//!     → student.rs (StudentPayload, every field optional)
//!     → validation.rs (collects all violations)
//!     → NewStudent (validated, ready for the repository)
//!     → Student (row read back from the store)
//! ```

pub mod student;
pub mod validation;

pub use student::{NewStudent, Student, StudentId, StudentPayload};
pub use validation::{FieldViolation, ValidationErrors, Violation};
