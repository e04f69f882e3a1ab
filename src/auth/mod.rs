pub mod authz;
pub mod jwt;
pub mod middleware;

pub use authz::{require_admin, require_course_owner, require_enrollment, require_instructor, require_role};
pub use jwt::JwtClaims;
