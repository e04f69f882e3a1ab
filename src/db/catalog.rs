//! Course/section/lesson topology: ordered reads for the progress
//! aggregator and content listings, plus the thin authoring writes the
//! ownership guard fronts.
//!
//! Listings order by (position, id) so ties on position stay stable.

use sqlx::PgPool;

use crate::models::{Course, CourseStatus, Lesson, Section};

pub async fn get_course(pool: &PgPool, course_id: i64) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(
        r#"
        SELECT id, instructor_id, title, description, status, created_at, updated_at
        FROM courses
        WHERE id = $1
        "#,
    )
    .bind(course_id)
    .fetch_optional(pool)
    .await
}

/// Courses visible to students: published only, newest first.
pub async fn list_published_courses(pool: &PgPool) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(
        r#"
        SELECT id, instructor_id, title, description, status, created_at, updated_at
        FROM courses
        WHERE status = 'published'
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn create_course(
    pool: &PgPool,
    instructor_id: i64,
    title: &str,
    description: Option<&str>,
) -> Result<Course, sqlx::Error> {
    sqlx::query_as::<_, Course>(
        r#"
        INSERT INTO courses (instructor_id, title, description)
        VALUES ($1, $2, $3)
        RETURNING id, instructor_id, title, description, status, created_at, updated_at
        "#,
    )
    .bind(instructor_id)
    .bind(title)
    .bind(description)
    .fetch_one(pool)
    .await
}

pub async fn set_course_status(
    pool: &PgPool,
    course_id: i64,
    status: CourseStatus,
) -> Result<Course, sqlx::Error> {
    sqlx::query_as::<_, Course>(
        r#"
        UPDATE courses
        SET status = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING id, instructor_id, title, description, status, created_at, updated_at
        "#,
    )
    .bind(course_id)
    .bind(status)
    .fetch_one(pool)
    .await
}

pub async fn get_section(pool: &PgPool, section_id: i64) -> Result<Option<Section>, sqlx::Error> {
    sqlx::query_as::<_, Section>(
        r#"
        SELECT id, course_id, title, position, created_at
        FROM sections
        WHERE id = $1
        "#,
    )
    .bind(section_id)
    .fetch_optional(pool)
    .await
}

pub async fn list_sections(pool: &PgPool, course_id: i64) -> Result<Vec<Section>, sqlx::Error> {
    sqlx::query_as::<_, Section>(
        r#"
        SELECT id, course_id, title, position, created_at
        FROM sections
        WHERE course_id = $1
        ORDER BY position, id
        "#,
    )
    .bind(course_id)
    .fetch_all(pool)
    .await
}

/// Appends at the end of the course when no position is given.
pub async fn create_section(
    pool: &PgPool,
    course_id: i64,
    title: &str,
    position: Option<i32>,
) -> Result<Section, sqlx::Error> {
    sqlx::query_as::<_, Section>(
        r#"
        INSERT INTO sections (course_id, title, position)
        VALUES (
            $1,
            $2,
            COALESCE($3, (SELECT COALESCE(MAX(position) + 1, 0) FROM sections WHERE course_id = $1))
        )
        RETURNING id, course_id, title, position, created_at
        "#,
    )
    .bind(course_id)
    .bind(title)
    .bind(position)
    .fetch_one(pool)
    .await
}

pub async fn list_lessons(pool: &PgPool, section_id: i64) -> Result<Vec<Lesson>, sqlx::Error> {
    sqlx::query_as::<_, Lesson>(
        r#"
        SELECT id, section_id, title, position, created_at
        FROM lessons
        WHERE section_id = $1
        ORDER BY position, id
        "#,
    )
    .bind(section_id)
    .fetch_all(pool)
    .await
}

pub async fn create_lesson(
    pool: &PgPool,
    section_id: i64,
    title: &str,
    position: Option<i32>,
) -> Result<Lesson, sqlx::Error> {
    sqlx::query_as::<_, Lesson>(
        r#"
        INSERT INTO lessons (section_id, title, position)
        VALUES (
            $1,
            $2,
            COALESCE($3, (SELECT COALESCE(MAX(position) + 1, 0) FROM lessons WHERE section_id = $1))
        )
        RETURNING id, section_id, title, position, created_at
        "#,
    )
    .bind(section_id)
    .bind(title)
    .bind(position)
    .fetch_one(pool)
    .await
}

/// The course a lesson belongs to, derived transitively via its section.
pub async fn lesson_course(pool: &PgPool, lesson_id: i64) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT s.course_id
        FROM lessons l
        JOIN sections s ON s.id = l.section_id
        WHERE l.id = $1
        "#,
    )
    .bind(lesson_id)
    .fetch_optional(pool)
    .await
}
