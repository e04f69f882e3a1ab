// Ledger and tracker invariants that only the database can enforce:
// enrollment uniqueness under races, idempotent completion upserts,
// aggregate counts, and role-constrained promotion.
//
// These run against a live Postgres and skip when DATABASE_URL is not
// set, so the default test run stays self-contained.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use campus_api::db::{self, catalog, enrollments, progress, users};
use campus_api::errors::AppError;
use campus_api::models::{CourseStatus, LessonStatus, UserRole};
use sqlx::PgPool;

static SEQ: AtomicU32 = AtomicU32::new(0);

async fn try_pool() -> Option<PgPool> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("DATABASE_URL not set; skipping database test");
            return None;
        }
    };

    let pool = db::create_pool(&url, 5)
        .await
        .expect("Failed to connect to test database");
    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to apply migrations");

    Some(pool)
}

fn unique_email(tag: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .subsec_nanos();
    let n = SEQ.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}-{}-{}@example.com", tag, std::process::id(), nanos, n)
}

async fn seed_user(pool: &PgPool, role: UserRole) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (email, full_name, role) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(unique_email("test"))
    .bind("Test User")
    .bind(role)
    .fetch_one(pool)
    .await
    .expect("Failed to seed user")
}

async fn seed_published_course(pool: &PgPool) -> i64 {
    let instructor_id = seed_user(pool, UserRole::Instructor).await;
    let course = catalog::create_course(pool, instructor_id, "Test Course", None)
        .await
        .expect("Failed to create course");
    catalog::set_course_status(pool, course.id, CourseStatus::Published)
        .await
        .expect("Failed to publish course");
    course.id
}

async fn seed_lesson(pool: &PgPool, course_id: i64) -> i64 {
    let section = catalog::create_section(pool, course_id, "Section", None)
        .await
        .expect("Failed to create section");
    catalog::create_lesson(pool, section.id, "Lesson", None)
        .await
        .expect("Failed to create lesson")
        .id
}

#[tokio::test]
async fn second_enroll_reports_already_enrolled() {
    let Some(pool) = try_pool().await else { return };

    let student = seed_user(&pool, UserRole::Student).await;
    let course = seed_published_course(&pool).await;

    enrollments::enroll(&pool, student, course)
        .await
        .expect("First enroll should succeed");

    let second = enrollments::enroll(&pool, student, course).await;
    assert!(matches!(second, Err(AppError::AlreadyEnrolled)));

    let active: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM enrollments WHERE user_id = $1 AND course_id = $2 AND status = 'active'",
    )
    .bind(student)
    .bind(course)
    .fetch_one(&pool)
    .await
    .expect("Failed to count enrollments");
    assert_eq!(active, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_enrolls_have_one_winner() {
    let Some(pool) = try_pool().await else { return };

    let student = seed_user(&pool, UserRole::Student).await;
    let course = seed_published_course(&pool).await;

    let p1 = pool.clone();
    let p2 = pool.clone();
    let (a, b) = tokio::join!(
        tokio::spawn(async move { enrollments::enroll(&p1, student, course).await }),
        tokio::spawn(async move { enrollments::enroll(&p2, student, course).await }),
    );
    let results = [a.expect("task panicked"), b.expect("task panicked")];

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "exactly one enroll must win the race");
    assert!(
        results
            .iter()
            .any(|r| matches!(r, Err(AppError::AlreadyEnrolled))),
        "the loser must observe AlreadyEnrolled, not a raw storage error"
    );

    let rows: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM enrollments WHERE user_id = $1 AND course_id = $2")
            .bind(student)
            .bind(course)
            .fetch_one(&pool)
            .await
            .expect("Failed to count enrollments");
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn repeated_completion_keeps_one_row() {
    let Some(pool) = try_pool().await else { return };

    let student = seed_user(&pool, UserRole::Student).await;
    let course = seed_published_course(&pool).await;
    let lesson = seed_lesson(&pool, course).await;

    for _ in 0..3 {
        progress::mark_completed(&pool, student, lesson)
            .await
            .expect("Completion should be idempotent");
    }

    let rows: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM lesson_progress WHERE user_id = $1 AND lesson_id = $2",
    )
    .bind(student)
    .bind(lesson)
    .fetch_one(&pool)
    .await
    .expect("Failed to count progress rows");
    assert_eq!(rows, 1);

    let status = progress::get_status(&pool, student, lesson)
        .await
        .expect("Failed to read status");
    assert_eq!(status, LessonStatus::Completed);
}

#[tokio::test]
async fn aggregates_count_per_scope() {
    let Some(pool) = try_pool().await else { return };

    let student = seed_user(&pool, UserRole::Student).await;
    let course = seed_published_course(&pool).await;

    // Two sections: s1 with two lessons, s2 with one.
    let s1 = catalog::create_section(&pool, course, "S1", None)
        .await
        .expect("Failed to create section");
    let s2 = catalog::create_section(&pool, course, "S2", None)
        .await
        .expect("Failed to create section");
    let l1 = catalog::create_lesson(&pool, s1.id, "L1", None)
        .await
        .expect("Failed to create lesson");
    catalog::create_lesson(&pool, s1.id, "L2", None)
        .await
        .expect("Failed to create lesson");
    let l3 = catalog::create_lesson(&pool, s2.id, "L3", None)
        .await
        .expect("Failed to create lesson");

    enrollments::enroll(&pool, student, course)
        .await
        .expect("Failed to enroll");

    progress::mark_completed(&pool, student, l1.id)
        .await
        .expect("Failed to complete lesson");
    progress::mark_completed(&pool, student, l3.id)
        .await
        .expect("Failed to complete lesson");

    // Course-wide: 2 of 3, floor to 66.
    let summary = progress::course_progress(&pool, student, course)
        .await
        .expect("Failed to compute course progress");
    assert_eq!(summary.total_lessons, 3);
    assert_eq!(summary.completed_lessons, 2);
    assert_eq!(summary.percentage, 66);

    // s1 stays at 50 regardless of s2's completion.
    let summary = progress::section_progress(&pool, student, s1.id)
        .await
        .expect("Failed to compute section progress");
    assert_eq!(summary.total_lessons, 2);
    assert_eq!(summary.completed_lessons, 1);
    assert_eq!(summary.percentage, 50);
}

#[tokio::test]
async fn promotion_upgrades_students_only() {
    let Some(pool) = try_pool().await else { return };

    let student = seed_user(&pool, UserRole::Student).await;
    let promoted = users::promote_to_instructor(&pool, student)
        .await
        .expect("Promotion query failed")
        .expect("Student should be promotable");
    assert_eq!(promoted.role, UserRole::Instructor);

    // An admin target is never rewritten.
    let admin = seed_user(&pool, UserRole::Admin).await;
    let result = users::promote_to_instructor(&pool, admin)
        .await
        .expect("Promotion query failed");
    assert!(result.is_none());

    let role: UserRole = sqlx::query_scalar("SELECT role FROM users WHERE id = $1")
        .bind(admin)
        .fetch_one(&pool)
        .await
        .expect("Failed to read role");
    assert_eq!(role, UserRole::Admin);
}
