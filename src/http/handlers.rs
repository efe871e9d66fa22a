//! Student request handlers.
//!
//! Each handler follows the same sequence: acquire input (body or path id),
//! validate, call the repository on the blocking pool, then emit the
//! success payload. Any failure short-circuits into an [`ApiError`].

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};

use crate::http::error::ApiError;
use crate::http::response::{CreatedResponse, HealthResponse, MessageResponse};
use crate::http::server::AppState;
use crate::model::{Student, StudentId, StudentPayload};

/// POST /api/students
pub async fn create_student(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    tracing::info!("Creating a new student");

    let student = decode_payload(body)?.validate()?;
    let id = state
        .with_repository(move |repo| repo.create_student(&student.name, &student.email, student.age))
        .await?
        .map_err(|e| ApiError::storage("Failed to create student", e))?;

    tracing::info!(id, "Student created successfully");
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Student created successfully".to_string(),
            id,
        }),
    ))
}

/// GET /api/students/{id}
pub async fn get_student(
    State(state): State<AppState>,
    raw_id: Result<Path<String>, PathRejection>,
) -> Result<Json<Student>, ApiError> {
    tracing::info!("Fetching student by id");

    let id = parse_id(raw_id)?;
    let student = state
        .with_repository(move |repo| repo.get_student_by_id(id))
        .await?
        .map_err(|e| ApiError::storage("Failed to fetch student", e))?;

    tracing::info!(id, "Student fetched successfully");
    Ok(Json(student))
}

/// GET /api/students
pub async fn list_students(State(state): State<AppState>) -> Result<Json<Vec<Student>>, ApiError> {
    tracing::info!("Fetching all students");

    let students = state
        .with_repository(|repo| repo.get_students())
        .await?
        .map_err(|e| ApiError::storage("Failed to fetch students", e))?;

    tracing::info!(count = students.len(), "Students fetched successfully");
    Ok(Json(students))
}

/// PUT /api/students/{id}
pub async fn update_student(
    State(state): State<AppState>,
    raw_id: Result<Path<String>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    tracing::info!("Updating student");

    let id = parse_id(raw_id)?;
    let student = decode_payload(body)?.validate()?;
    state
        .with_repository(move |repo| {
            repo.update_student_by_id(id, &student.name, &student.email, student.age)
        })
        .await?
        .map_err(|e| ApiError::storage("Failed to update student", e))?;

    tracing::info!(id, "Student updated successfully");
    Ok(Json(MessageResponse::new("Student updated successfully")))
}

/// DELETE /api/students/{id}
pub async fn delete_student(
    State(state): State<AppState>,
    raw_id: Result<Path<String>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    tracing::info!("Deleting student");

    let id = parse_id(raw_id)?;
    state
        .with_repository(move |repo| repo.delete_student_by_id(id))
        .await?
        .map_err(|e| ApiError::storage("Failed to delete student", e))?;

    tracing::info!(id, "Student deleted successfully");
    Ok(Json(MessageResponse::new("Student deleted successfully")))
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        env: state.env.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Fallback for a known path requested with the wrong verb.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Fallback for unknown paths.
pub async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}

/// Decode a JSON student payload, telling an empty body apart from a malformed one.
fn decode_payload(body: Result<Bytes, BytesRejection>) -> Result<StudentPayload, ApiError> {
    let body = body.map_err(ApiError::unreadable_body)?;
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::empty_body());
    }
    // A JSON `null` decodes to an empty payload and fails validation per field.
    serde_json::from_slice::<Option<StudentPayload>>(&body)
        .map(Option::unwrap_or_default)
        .map_err(ApiError::malformed_body)
}

fn parse_id(raw: Result<Path<String>, PathRejection>) -> Result<StudentId, ApiError> {
    let Path(raw) = raw.map_err(ApiError::unreadable_id)?;
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ApiError::missing_id());
    }
    raw.parse::<StudentId>().map_err(ApiError::invalid_id)
}
