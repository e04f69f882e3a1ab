//! Enrollment ledger: which user is enrolled in which course.
//!
//! At most one row exists per (user_id, course_id); the database unique
//! constraint is the backstop for concurrent enrolls, and a losing
//! insert is translated to `AlreadyEnrolled` rather than leaked as a
//! storage error.

use sqlx::PgPool;

use crate::{
    errors::{is_unique_violation, AppError, Result},
    models::{EnrolledStudent, Enrollment},
};

/// Record a new active enrollment.
///
/// The pair is permanent once created: a cancelled enrollment still
/// blocks re-enrollment, matching the unique constraint. The ledger
/// does not check course existence or publish status; that guard runs
/// at the route boundary.
pub async fn enroll(pool: &PgPool, user_id: i64, course_id: i64) -> Result<Enrollment> {
    let mut tx = pool.begin().await?;

    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM enrollments WHERE user_id = $1 AND course_id = $2)",
    )
    .bind(user_id)
    .bind(course_id)
    .fetch_one(&mut *tx)
    .await?;

    if exists {
        return Err(AppError::AlreadyEnrolled);
    }

    // The check above is advisory; a concurrent enroll can still win
    // the race, in which case the unique constraint fires here.
    let enrollment = sqlx::query_as::<_, Enrollment>(
        r#"
        INSERT INTO enrollments (user_id, course_id, status, enrolled_at)
        VALUES ($1, $2, 'active', NOW())
        RETURNING id, user_id, course_id, status, enrolled_at
        "#,
    )
    .bind(user_id)
    .bind(course_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::AlreadyEnrolled
        } else {
            AppError::Database(e)
        }
    })?;

    tx.commit().await?;

    Ok(enrollment)
}

/// True iff an active enrollment exists for the pair.
pub async fn is_enrolled(pool: &PgPool, user_id: i64, course_id: i64) -> Result<bool> {
    let enrolled = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM enrollments
            WHERE user_id = $1 AND course_id = $2 AND status = 'active'
        )
        "#,
    )
    .bind(user_id)
    .bind(course_id)
    .fetch_one(pool)
    .await?;

    Ok(enrolled)
}

/// All of a user's enrollments, any status, newest first. Backs the
/// "my courses" view.
pub async fn list_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<Enrollment>> {
    let enrollments = sqlx::query_as::<_, Enrollment>(
        r#"
        SELECT id, user_id, course_id, status, enrolled_at
        FROM enrollments
        WHERE user_id = $1
        ORDER BY enrolled_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(enrollments)
}

/// Actively enrolled students joined to the user directory, for
/// instructor analytics.
pub async fn list_students(pool: &PgPool, course_id: i64) -> Result<Vec<EnrolledStudent>> {
    let students = sqlx::query_as::<_, EnrolledStudent>(
        r#"
        SELECT e.user_id, u.email, u.full_name, e.enrolled_at
        FROM enrollments e
        JOIN users u ON u.id = e.user_id
        WHERE e.course_id = $1 AND e.status = 'active'
        ORDER BY e.enrolled_at DESC
        "#,
    )
    .bind(course_id)
    .fetch_all(pool)
    .await?;

    Ok(students)
}
