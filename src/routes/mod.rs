pub mod courses;
pub mod enrollments;
pub mod health;
pub mod progress;
pub mod users;

use axum::{middleware, Router};

use crate::state::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new().nest("/api", api_routes(state))
}

/// API routes under /api prefix
fn api_routes(state: AppState) -> Router {
    // Public routes
    let public = Router::new().merge(health::routes());

    // Protected routes (require authentication)
    let protected = Router::new()
        .route("/auth/me", axum::routing::get(users::me))
        // Admin user management
        .route("/users", axum::routing::get(users::list_users))
        .route(
            "/users/:id/promote",
            axum::routing::post(users::promote_user),
        )
        // Course catalog and authoring
        .route(
            "/courses",
            axum::routing::post(courses::create_course).get(courses::list_courses),
        )
        .route(
            "/courses/:id/publish",
            axum::routing::post(courses::publish_course),
        )
        .route(
            "/courses/:id/archive",
            axum::routing::post(courses::archive_course),
        )
        .route(
            "/courses/:id/sections",
            axum::routing::post(courses::create_section).get(courses::list_sections),
        )
        .route(
            "/sections/:id/lessons",
            axum::routing::post(courses::create_lesson).get(courses::list_lessons),
        )
        // Enrollment
        .route(
            "/courses/:id/enroll",
            axum::routing::post(enrollments::enroll),
        )
        .route(
            "/enrollments",
            axum::routing::get(enrollments::my_enrollments),
        )
        .route(
            "/courses/:id/students",
            axum::routing::get(enrollments::course_students),
        )
        // Lesson progress
        .route(
            "/lessons/:id/complete",
            axum::routing::post(progress::complete_lesson),
        )
        .route(
            "/lessons/:id/status",
            axum::routing::put(progress::set_lesson_status)
                .get(progress::get_lesson_status),
        )
        // Progress aggregates
        .route(
            "/courses/:id/progress",
            axum::routing::get(progress::course_progress),
        )
        .route(
            "/courses/:id/sections/:section_id/progress",
            axum::routing::get(progress::section_progress),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            crate::auth::middleware::auth_required,
        ));

    public.merge(protected).with_state(state)
}
