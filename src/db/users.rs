use sqlx::PgPool;

use crate::models::{User, UserRole};

pub async fn get_user(pool: &PgPool, user_id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, full_name, role, created_at, updated_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn list_users(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, full_name, role, created_at, updated_at
        FROM users
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Promote a student to instructor. The update is constrained to
/// student rows so an instructor or admin target is never rewritten;
/// returns None when no student row matched.
pub async fn promote_to_instructor(
    pool: &PgPool,
    user_id: i64,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET role = $2, updated_at = NOW()
        WHERE id = $1 AND role = 'student'
        RETURNING id, email, full_name, role, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(UserRole::Instructor)
    .fetch_optional(pool)
    .await
}
