pub mod course;
pub mod enrollment;
pub mod progress;
pub mod user;

pub use course::{
    Course, CourseStatus, CreateCourseRequest, CreateLessonRequest, CreateSectionRequest, Lesson,
    Section,
};
pub use enrollment::{EnrolledStudent, Enrollment, EnrollmentStatus};
pub use progress::{
    LessonProgress, LessonStatus, LessonStatusResponse, ProgressSummary, SetStatusRequest,
};
pub use user::{CurrentUser, User, UserResponse, UserRole};
