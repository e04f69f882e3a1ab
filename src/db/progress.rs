//! Lesson progress tracker and the derived progress aggregates.
//!
//! Writes are idempotent upserts keyed on UNIQUE(user_id, lesson_id).
//! Aggregates are computed in a single statement each, so one request
//! always sees one consistent snapshot of the progress rows.

use sqlx::PgPool;

use crate::models::{LessonProgress, LessonStatus, ProgressSummary};

/// Upsert the status for a (user, lesson) pair, refreshing the access
/// timestamp. Concurrent calls for the same pair serialize on the
/// unique constraint; none can create a second row.
pub async fn set_status(
    pool: &PgPool,
    user_id: i64,
    lesson_id: i64,
    status: LessonStatus,
) -> Result<LessonProgress, sqlx::Error> {
    sqlx::query_as::<_, LessonProgress>(
        r#"
        INSERT INTO lesson_progress (user_id, lesson_id, status, last_accessed_at)
        VALUES ($1, $2, $3, NOW())
        ON CONFLICT (user_id, lesson_id)
        DO UPDATE SET status = EXCLUDED.status, last_accessed_at = NOW()
        RETURNING id, user_id, lesson_id, status, last_accessed_at
        "#,
    )
    .bind(user_id)
    .bind(lesson_id)
    .bind(status)
    .fetch_one(pool)
    .await
}

/// Idempotent completion: any number of calls leaves exactly one row
/// with status completed.
pub async fn mark_completed(
    pool: &PgPool,
    user_id: i64,
    lesson_id: i64,
) -> Result<LessonProgress, sqlx::Error> {
    set_status(pool, user_id, lesson_id, LessonStatus::Completed).await
}

/// Absence of a row is the initial state, not an error.
pub async fn get_status(
    pool: &PgPool,
    user_id: i64,
    lesson_id: i64,
) -> Result<LessonStatus, sqlx::Error> {
    let status = sqlx::query_scalar::<_, LessonStatus>(
        r#"
        SELECT status FROM lesson_progress
        WHERE user_id = $1 AND lesson_id = $2
        "#,
    )
    .bind(user_id)
    .bind(lesson_id)
    .fetch_optional(pool)
    .await?;

    Ok(status.unwrap_or(LessonStatus::NotStarted))
}

/// Course-level completion: counts every lesson under every section of
/// the course against the user's completed rows. One statement, one
/// snapshot; the percentage cannot exceed 100 mid-update.
pub async fn course_progress(
    pool: &PgPool,
    user_id: i64,
    course_id: i64,
) -> Result<ProgressSummary, sqlx::Error> {
    let (total, completed) = sqlx::query_as::<_, (i64, i64)>(
        r#"
        SELECT
            COUNT(l.id),
            COUNT(lp.lesson_id) FILTER (WHERE lp.status = 'completed')
        FROM lessons l
        JOIN sections s ON s.id = l.section_id
        LEFT JOIN lesson_progress lp
            ON lp.lesson_id = l.id AND lp.user_id = $2
        WHERE s.course_id = $1
        "#,
    )
    .bind(course_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(ProgressSummary::new(total, completed))
}

/// Section-level completion, same shape scoped to one section. Sibling
/// sections of the course never leak into the counts.
pub async fn section_progress(
    pool: &PgPool,
    user_id: i64,
    section_id: i64,
) -> Result<ProgressSummary, sqlx::Error> {
    let (total, completed) = sqlx::query_as::<_, (i64, i64)>(
        r#"
        SELECT
            COUNT(l.id),
            COUNT(lp.lesson_id) FILTER (WHERE lp.status = 'completed')
        FROM lessons l
        LEFT JOIN lesson_progress lp
            ON lp.lesson_id = l.id AND lp.user_id = $2
        WHERE l.section_id = $1
        "#,
    )
    .bind(section_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(ProgressSummary::new(total, completed))
}
