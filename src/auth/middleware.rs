use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{auth::jwt::decode_jwt, errors::AppError, models::CurrentUser, state::AppState};

/// Resolve the caller's identity from the Authorization header.
///
/// The resolved `CurrentUser` is inserted into request extensions so
/// that handlers receive identity as an explicit value rather than
/// re-reading any ambient context. All failures here are authentication
/// failures and surface as 401 Unauthorized.
pub async fn auth_required(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extract Bearer token from Authorization header
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization token".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired token".to_string()))?;

    let claims = decode_jwt(token, &state.config.jwt.secret)
        .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

    // The subject must be a user id; anything else is a bad token, not
    // a handler concern.
    let user_id: i64 = claims
        .sub
        .parse()
        .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

    req.extensions_mut().insert(CurrentUser {
        id: user_id,
        email: claims.email,
        role: claims.role,
    });

    Ok(next.run(req).await)
}
