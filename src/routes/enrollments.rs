use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};

use crate::{
    auth::{require_course_owner, require_role},
    db::{catalog, enrollments},
    errors::{AppError, Result},
    models::{CourseStatus, CurrentUser, UserRole},
    state::AppState,
};

/// Enroll the caller in a published course.
///
/// The ledger insert itself is a primitive; existence and publish
/// status are guarded here. Unpublished courses are reported as
/// NotFound so drafts stay invisible to students.
pub async fn enroll(
    Extension(user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
) -> Result<impl IntoResponse> {
    require_role(&user, UserRole::Student)?;

    let course = catalog::get_course(&state.pool, course_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

    if course.status != CourseStatus::Published {
        return Err(AppError::NotFound("Course not found".to_string()));
    }

    let enrollment = enrollments::enroll(&state.pool, user.id, course_id).await?;

    tracing::info!("User {} enrolled in course {}", user.id, course_id);

    Ok((StatusCode::CREATED, Json(enrollment)))
}

/// List the caller's enrollments (the "my courses" view)
pub async fn my_enrollments(
    Extension(user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let records = enrollments::list_for_user(&state.pool, user.id).await?;
    Ok(Json(records))
}

/// List students enrolled in a course (instructor analytics,
/// ownership-gated)
pub async fn course_students(
    Extension(user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
) -> Result<impl IntoResponse> {
    require_course_owner(&state.pool, &user, course_id).await?;

    let students = enrollments::list_students(&state.pool, course_id).await?;
    Ok(Json(students))
}
