use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json,
};

use crate::{
    auth::require_admin,
    db::users,
    errors::{AppError, Result},
    models::{CurrentUser, UserResponse, UserRole},
};
use crate::state::AppState;

/// Get current user info
pub async fn me(
    Extension(user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let record = users::get_user(&state.pool, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from(record)))
}

/// List all users (admin only)
pub async fn list_users(
    Extension(user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    require_admin(&user)?;

    let records = users::list_users(&state.pool).await?;
    let response: Vec<UserResponse> = records.into_iter().map(UserResponse::from).collect();

    Ok(Json(response))
}

/// Promote a student to instructor (admin only)
pub async fn promote_user(
    Extension(user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse> {
    require_admin(&user)?;

    let target = users::get_user(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if target.role != UserRole::Student {
        return Err(AppError::BadRequest(
            "Only students can be promoted to instructor".to_string(),
        ));
    }

    // The update is role-constrained, so a concurrent role change
    // between the check and the write still cannot demote anyone.
    let promoted = users::promote_to_instructor(&state.pool, user_id)
        .await?
        .ok_or_else(|| {
            AppError::BadRequest("Only students can be promoted to instructor".to_string())
        })?;

    tracing::info!("User {} promoted to instructor by {}", user_id, user.id);

    Ok(Json(UserResponse::from(promoted)))
}
