use sqlx::PgPool;

use crate::{
    db::{catalog, enrollments},
    errors::AppError,
    models::{Course, CurrentUser, UserRole},
};

/// Role guard: satisfied by the exact role, or by Admin everywhere.
pub fn role_satisfies(have: UserRole, required: UserRole) -> bool {
    have == required || have == UserRole::Admin
}

/// Check if user has a specific role
pub fn require_role(user: &CurrentUser, required: UserRole) -> Result<(), AppError> {
    if !role_satisfies(user.role, required) {
        return Err(AppError::Forbidden(format!(
            "Required role: {:?}, got: {:?}",
            required, user.role
        )));
    }
    Ok(())
}

pub fn require_admin(user: &CurrentUser) -> Result<(), AppError> {
    require_role(user, UserRole::Admin)
}

pub fn require_instructor(user: &CurrentUser) -> Result<(), AppError> {
    if user.role != UserRole::Instructor && user.role != UserRole::Admin {
        return Err(AppError::Forbidden("Instructor role required".to_string()));
    }
    Ok(())
}

/// Ownership guard for instructor course mutations.
///
/// Loads the course (NotFound if absent), then passes when the caller
/// is its instructor or an admin. Returns the course so the caller does
/// not have to fetch it again.
pub async fn require_course_owner(
    pool: &PgPool,
    user: &CurrentUser,
    course_id: i64,
) -> Result<Course, AppError> {
    let course = catalog::get_course(pool, course_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

    if course.instructor_id != user.id && user.role != UserRole::Admin {
        return Err(AppError::AccessDenied(
            "Only the course instructor can manage this course".to_string(),
        ));
    }

    Ok(course)
}

/// Enrollment guard for student-facing content and progress reads.
/// Nothing is computed or returned before this passes.
pub async fn require_enrollment(
    pool: &PgPool,
    user_id: i64,
    course_id: i64,
) -> Result<(), AppError> {
    if enrollments::is_enrolled(pool, user_id, course_id).await? {
        Ok(())
    } else {
        Err(AppError::AccessDenied(
            "You are not enrolled in this course".to_string(),
        ))
    }
}

/// Content-visibility guard for course structure reads (section and
/// lesson listings): the owning instructor and admins see their course
/// without enrolling; everyone else must hold an active enrollment.
pub async fn require_course_access(
    pool: &PgPool,
    user: &CurrentUser,
    course_id: i64,
) -> Result<(), AppError> {
    let course = catalog::get_course(pool, course_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

    if course.instructor_id == user.id || user.role == UserRole::Admin {
        return Ok(());
    }

    require_enrollment(pool, user.id, course_id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: UserRole) -> CurrentUser {
        CurrentUser {
            id: 1,
            email: "test@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn admin_satisfies_every_role() {
        assert!(role_satisfies(UserRole::Admin, UserRole::Student));
        assert!(role_satisfies(UserRole::Admin, UserRole::Instructor));
        assert!(role_satisfies(UserRole::Admin, UserRole::Admin));
    }

    #[test]
    fn roles_do_not_cross() {
        assert!(!role_satisfies(UserRole::Student, UserRole::Instructor));
        assert!(!role_satisfies(UserRole::Instructor, UserRole::Admin));
        assert!(role_satisfies(UserRole::Student, UserRole::Student));
    }

    #[test]
    fn role_failure_is_forbidden_not_access_denied() {
        let err = require_role(&user(UserRole::Student), UserRole::Admin).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn instructor_guard_admits_instructor_and_admin() {
        assert!(require_instructor(&user(UserRole::Instructor)).is_ok());
        assert!(require_instructor(&user(UserRole::Admin)).is_ok());
        assert!(require_instructor(&user(UserRole::Student)).is_err());
    }
}
