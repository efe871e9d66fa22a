//! Student payload validation.
//!
//! # Responsibilities
//! - Check every field of a `StudentPayload` in one pass
//! - Report absence separately from other violations
//! - Produce a `NewStudent` only when nothing was violated
//!
//! # Design Decisions
//! - Returns all violations, not just the first
//! - Field names are reported capitalized, in declaration order
//! - A zero age counts as absent

use std::fmt;

use crate::model::student::{NewStudent, StudentPayload};

/// Inclusive upper bound for a plausible age.
pub const MAX_AGE: i64 = 150;

/// Kind of constraint a field failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    Required,
    Invalid,
}

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub violation: Violation,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.violation {
            Violation::Required => write!(f, "{} is required", self.field),
            Violation::Invalid => write!(f, "{} is not valid", self.field),
        }
    }
}

/// Every violation found in one payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    fn push(&mut self, field: &'static str, violation: Violation) {
        self.violations.push(FieldViolation { field, violation });
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl StudentPayload {
    /// Validate the payload, collecting every violation.
    pub fn validate(self) -> Result<NewStudent, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let name = match self.name.map(|n| n.trim().to_string()) {
            Some(name) if !name.is_empty() => Some(name),
            _ => {
                errors.push("Name", Violation::Required);
                None
            }
        };

        let email = match self.email.map(|e| e.trim().to_string()) {
            Some(email) if email.is_empty() => {
                errors.push("Email", Violation::Required);
                None
            }
            Some(email) if !is_valid_email(&email) => {
                errors.push("Email", Violation::Invalid);
                None
            }
            Some(email) => Some(email),
            None => {
                errors.push("Email", Violation::Required);
                None
            }
        };

        let age = match self.age {
            None | Some(0) => {
                errors.push("Age", Violation::Required);
                None
            }
            Some(age) if !(1..=MAX_AGE).contains(&age) => {
                errors.push("Age", Violation::Invalid);
                None
            }
            Some(age) => i32::try_from(age).ok(),
        };

        match (name, email, age) {
            (Some(name), Some(email), Some(age)) if errors.is_empty() => {
                Ok(NewStudent { name, email, age })
            }
            _ => Err(errors),
        }
    }
}

/// Minimal address shape check: `local@domain.tld`, no whitespace.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}
