use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};

use crate::{
    auth::{authz::require_course_access, require_course_owner, require_instructor},
    db::catalog,
    errors::{AppError, Result},
    models::{CourseStatus, CreateCourseRequest, CreateLessonRequest, CreateSectionRequest, CurrentUser},
    state::AppState,
};

/// List published courses (the student-facing catalog)
pub async fn list_courses(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let courses = catalog::list_published_courses(&state.pool).await?;
    Ok(Json(courses))
}

/// Create a draft course owned by the caller
pub async fn create_course(
    Extension(user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Json(payload): Json<CreateCourseRequest>,
) -> Result<impl IntoResponse> {
    require_instructor(&user)?;

    if payload.title.trim().is_empty() {
        return Err(AppError::BadRequest("Title cannot be empty".to_string()));
    }

    let course = catalog::create_course(
        &state.pool,
        user.id,
        payload.title.trim(),
        payload.description.as_deref().map(str::trim),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(course)))
}

/// Publish a course so students can see and enroll in it
pub async fn publish_course(
    Extension(user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
) -> Result<impl IntoResponse> {
    require_course_owner(&state.pool, &user, course_id).await?;

    let course = catalog::set_course_status(&state.pool, course_id, CourseStatus::Published).await?;

    tracing::info!("Course {} published by user {}", course_id, user.id);

    Ok(Json(course))
}

/// Archive a course
pub async fn archive_course(
    Extension(user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
) -> Result<impl IntoResponse> {
    require_course_owner(&state.pool, &user, course_id).await?;

    let course = catalog::set_course_status(&state.pool, course_id, CourseStatus::Archived).await?;

    Ok(Json(course))
}

/// Add a section to a course
pub async fn create_section(
    Extension(user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
    Json(payload): Json<CreateSectionRequest>,
) -> Result<impl IntoResponse> {
    require_course_owner(&state.pool, &user, course_id).await?;

    if payload.title.trim().is_empty() {
        return Err(AppError::BadRequest("Title cannot be empty".to_string()));
    }

    let section = catalog::create_section(
        &state.pool,
        course_id,
        payload.title.trim(),
        payload.position,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(section)))
}

/// Add a lesson to a section (ownership checked via the parent course)
pub async fn create_lesson(
    Extension(user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(section_id): Path<i64>,
    Json(payload): Json<CreateLessonRequest>,
) -> Result<impl IntoResponse> {
    let section = catalog::get_section(&state.pool, section_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Section not found".to_string()))?;

    require_course_owner(&state.pool, &user, section.course_id).await?;

    if payload.title.trim().is_empty() {
        return Err(AppError::BadRequest("Title cannot be empty".to_string()));
    }

    let lesson = catalog::create_lesson(
        &state.pool,
        section_id,
        payload.title.trim(),
        payload.position,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(lesson)))
}

/// List a course's sections in (position, id) order.
/// Enrollment-gated; the owning instructor and admins are exempt.
pub async fn list_sections(
    Extension(user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
) -> Result<impl IntoResponse> {
    require_course_access(&state.pool, &user, course_id).await?;

    let sections = catalog::list_sections(&state.pool, course_id).await?;
    Ok(Json(sections))
}

/// List a section's lessons in (position, id) order, same gating
pub async fn list_lessons(
    Extension(user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(section_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let section = catalog::get_section(&state.pool, section_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Section not found".to_string()))?;

    require_course_access(&state.pool, &user, section.course_id).await?;

    let lessons = catalog::list_lessons(&state.pool, section_id).await?;
    Ok(Json(lessons))
}
