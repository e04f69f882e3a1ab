use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "lesson_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LessonStatus {
    NotStarted,
    InProgress,
    Completed,
}

/// Per-user completion state for a single lesson. At most one row per
/// (user_id, lesson_id); writes go through an atomic upsert.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LessonProgress {
    pub id: i64,
    pub user_id: i64,
    pub lesson_id: i64,
    pub status: LessonStatus,
    pub last_accessed_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: LessonStatus,
}

#[derive(Debug, Serialize)]
pub struct LessonStatusResponse {
    pub lesson_id: i64,
    pub status: LessonStatus,
}

/// Derived completion aggregate over a set of lessons, course- or
/// section-scoped. Never stored; computed on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressSummary {
    pub total_lessons: i64,
    pub completed_lessons: i64,
    pub percentage: i64,
}

impl ProgressSummary {
    /// Integer floor percentage: 1 of 3 lessons is 33, never 34. An
    /// empty lesson set is 0 percent, not a division error.
    pub fn new(total_lessons: i64, completed_lessons: i64) -> Self {
        let percentage = if total_lessons == 0 {
            0
        } else {
            completed_lessons * 100 / total_lessons
        };
        Self {
            total_lessons,
            completed_lessons,
            percentage,
        }
    }
}
