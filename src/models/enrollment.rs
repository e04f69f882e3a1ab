use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "enrollment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    Active,
    Cancelled,
}

/// One row in the enrollment ledger. At most one row exists per
/// (user_id, course_id) pair; the database unique constraint is the
/// backstop for concurrent enrolls.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Enrollment {
    pub id: i64,
    pub user_id: i64,
    pub course_id: i64,
    pub status: EnrollmentStatus,
    pub enrolled_at: DateTime<Utc>,
}

/// Enrollment joined to the user directory, for instructor analytics.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EnrolledStudent {
    pub user_id: i64,
    pub email: String,
    pub full_name: String,
    pub enrolled_at: DateTime<Utc>,
}
