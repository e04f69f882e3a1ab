use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json,
};

use crate::{
    auth::require_enrollment,
    db::{catalog, progress},
    errors::{AppError, Result},
    models::{CurrentUser, LessonStatusResponse, SetStatusRequest},
    state::AppState,
};

/// Resolve a lesson to its course, or NotFound. Every progress write
/// and read is gated on enrollment in that course.
async fn lesson_course_id(state: &AppState, lesson_id: i64) -> Result<i64> {
    catalog::lesson_course(&state.pool, lesson_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Lesson not found".to_string()))
}

/// Mark a lesson completed. Idempotent; repeated calls succeed.
pub async fn complete_lesson(
    Extension(user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(lesson_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let course_id = lesson_course_id(&state, lesson_id).await?;
    require_enrollment(&state.pool, user.id, course_id).await?;

    let record = progress::mark_completed(&state.pool, user.id, lesson_id).await?;

    Ok(Json(LessonStatusResponse {
        lesson_id,
        status: record.status,
    }))
}

/// Set a lesson's progress status explicitly
pub async fn set_lesson_status(
    Extension(user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(lesson_id): Path<i64>,
    Json(payload): Json<SetStatusRequest>,
) -> Result<impl IntoResponse> {
    let course_id = lesson_course_id(&state, lesson_id).await?;
    require_enrollment(&state.pool, user.id, course_id).await?;

    let record = progress::set_status(&state.pool, user.id, lesson_id, payload.status).await?;

    Ok(Json(LessonStatusResponse {
        lesson_id,
        status: record.status,
    }))
}

/// Get the caller's status for a lesson; not_started when untouched
pub async fn get_lesson_status(
    Extension(user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(lesson_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let course_id = lesson_course_id(&state, lesson_id).await?;
    require_enrollment(&state.pool, user.id, course_id).await?;

    let status = progress::get_status(&state.pool, user.id, lesson_id).await?;

    Ok(Json(LessonStatusResponse { lesson_id, status }))
}

/// Course-level completion percentage for the caller.
/// The enrollment guard runs before any aggregate is computed.
pub async fn course_progress(
    Extension(user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
) -> Result<impl IntoResponse> {
    catalog::get_course(&state.pool, course_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

    require_enrollment(&state.pool, user.id, course_id).await?;

    let summary = progress::course_progress(&state.pool, user.id, course_id).await?;

    Ok(Json(summary))
}

/// Section-level completion percentage. Enrollment is checked against
/// the parent course; a section outside the course is NotFound.
pub async fn section_progress(
    Extension(user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path((course_id, section_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse> {
    let section = catalog::get_section(&state.pool, section_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Section not found".to_string()))?;

    if section.course_id != course_id {
        return Err(AppError::NotFound("Section not found".to_string()));
    }

    require_enrollment(&state.pool, user.id, course_id).await?;

    let summary = progress::section_progress(&state.pool, user.id, section_id).await?;

    Ok(Json(summary))
}
