//! SQLite-backed student repository.
//!
//! # Responsibilities
//! - Open file or in-memory databases
//! - Ensure the `students` table exists before first use
//! - Translate repository calls into single SQL statements
//!
//! # Invariants
//! - Returned storage always has the schema applied
//! - `get_student_by_id` reports a missing row as `NotFound`, never as a
//!   driver error

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::model::{Student, StudentId};
use crate::storage::{StorageError, StorageResult, StudentRepository};

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS students (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    age INTEGER,
    email TEXT
)";

const STUDENT_SELECT_SQL: &str = "SELECT id, name, email, age FROM students";

/// Student repository over a single SQLite connection.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Open (or create) the database file at `path` and apply the schema.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let started_at = Instant::now();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!(path = %parent.display(), error = %e, "Failed to create storage directory");
            }
        }

        let conn = Connection::open(path).map_err(StorageError::database("open database"))?;
        let storage = Self::bootstrap(conn)?;

        tracing::info!(
            path = %path.display(),
            duration_ms = started_at.elapsed().as_millis() as u64,
            "Storage opened"
        );
        Ok(storage)
    }

    /// Open a private in-memory database with the schema applied.
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(StorageError::database("open in-memory database"))?;
        Self::bootstrap(conn)
    }

    fn bootstrap(conn: Connection) -> StorageResult<Self> {
        conn.busy_timeout(Duration::from_secs(5))
            .map_err(StorageError::database("configure connection"))?;
        conn.execute_batch(CREATE_TABLE_SQL)
            .map_err(StorageError::database("create students table"))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::Unavailable)
    }
}

impl StudentRepository for SqliteStorage {
    fn create_student(&self, name: &str, email: &str, age: i32) -> StorageResult<StudentId> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO students (name, email, age) VALUES (?1, ?2, ?3)",
            params![name, email, age],
        )
        .map_err(StorageError::database("insert student"))?;

        Ok(conn.last_insert_rowid())
    }

    fn get_student_by_id(&self, id: StudentId) -> StorageResult<Student> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare_cached(&format!("{STUDENT_SELECT_SQL} WHERE id = ?1 LIMIT 1"))
            .map_err(StorageError::database("prepare student query"))?;

        stmt.query_row([id], parse_student_row)
            .optional()
            .map_err(StorageError::database("query student"))?
            .ok_or(StorageError::NotFound { id })
    }

    fn get_students(&self) -> StorageResult<Vec<Student>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare_cached(&format!("{STUDENT_SELECT_SQL} ORDER BY id ASC"))
            .map_err(StorageError::database("prepare students query"))?;

        let rows = stmt
            .query_map([], parse_student_row)
            .map_err(StorageError::database("query students"))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(StorageError::database("read student row"))
    }

    fn update_student_by_id(
        &self,
        id: StudentId,
        name: &str,
        email: &str,
        age: i32,
    ) -> StorageResult<()> {
        let conn = self.conn()?;
        let changed = conn
            .execute(
                "UPDATE students SET name = ?1, email = ?2, age = ?3 WHERE id = ?4",
                params![name, email, age, id],
            )
            .map_err(StorageError::database("update student"))?;

        if changed == 0 {
            tracing::debug!(id, "Update matched no rows");
        }
        Ok(())
    }

    fn delete_student_by_id(&self, id: StudentId) -> StorageResult<()> {
        let conn = self.conn()?;
        let changed = conn
            .execute("DELETE FROM students WHERE id = ?1", [id])
            .map_err(StorageError::database("delete student"))?;

        if changed == 0 {
            tracing::debug!(id, "Delete matched no rows");
        }
        Ok(())
    }
}

fn parse_student_row(row: &Row<'_>) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        age: row.get("age")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> SqliteStorage {
        SqliteStorage::open_in_memory().unwrap()
    }

    #[test]
    fn test_create_then_get() {
        let storage = storage();
        let id = storage.create_student("Ada", "ada@x.io", 30).unwrap();
        assert!(id > 0);

        let student = storage.get_student_by_id(id).unwrap();
        assert_eq!(
            student,
            Student {
                id,
                name: "Ada".into(),
                email: "ada@x.io".into(),
                age: 30,
            }
        );
    }

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let storage = storage();
        let a = storage.create_student("A", "a@x.io", 20).unwrap();
        let b = storage.create_student("B", "b@x.io", 21).unwrap();
        assert!(b > a);
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let storage = storage();
        let err = storage.get_student_by_id(42).unwrap_err();
        assert!(matches!(err, StorageError::NotFound { id: 42 }));
        assert_eq!(err.to_string(), "student not found with id 42");
    }

    #[test]
    fn test_list_empty() {
        assert!(storage().get_students().unwrap().is_empty());
    }

    #[test]
    fn test_list_in_insertion_order() {
        let storage = storage();
        let names = ["Ada", "Grace", "Edsger"];
        for (i, name) in names.iter().enumerate() {
            storage
                .create_student(name, &format!("{}@x.io", name.to_lowercase()), 20 + i as i32)
                .unwrap();
        }

        let students = storage.get_students().unwrap();
        assert_eq!(students.len(), 3);
        let listed: Vec<&str> = students.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(listed, names);
    }

    #[test]
    fn test_update_overwrites_all_fields() {
        let storage = storage();
        let id = storage.create_student("Ada", "ada@x.io", 30).unwrap();
        storage
            .update_student_by_id(id, "Ada Lovelace", "lovelace@x.io", 36)
            .unwrap();

        let student = storage.get_student_by_id(id).unwrap();
        assert_eq!(student.id, id);
        assert_eq!(student.name, "Ada Lovelace");
        assert_eq!(student.email, "lovelace@x.io");
        assert_eq!(student.age, 36);
    }

    #[test]
    fn test_update_and_delete_missing_are_permissive() {
        let storage = storage();
        storage.update_student_by_id(7, "X", "x@x.io", 20).unwrap();
        storage.delete_student_by_id(7).unwrap();
    }

    #[test]
    fn test_delete_removes_row() {
        let storage = storage();
        let id = storage.create_student("Ada", "ada@x.io", 30).unwrap();
        storage.delete_student_by_id(id).unwrap();
        assert!(matches!(
            storage.get_student_by_id(id),
            Err(StorageError::NotFound { .. })
        ));
        assert!(storage.get_students().unwrap().is_empty());
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let storage = storage();
        let first = storage.create_student("Ada", "ada@x.io", 30).unwrap();
        storage.delete_student_by_id(first).unwrap();
        let second = storage.create_student("Grace", "grace@x.io", 40).unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_reopen_file_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("students.db");

        let id = {
            let storage = SqliteStorage::open(&path).unwrap();
            storage.create_student("Ada", "ada@x.io", 30).unwrap()
        };

        let storage = SqliteStorage::open(&path).unwrap();
        assert_eq!(storage.get_student_by_id(id).unwrap().name, "Ada");
    }
}
