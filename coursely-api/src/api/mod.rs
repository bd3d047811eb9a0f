//! HTTP API handlers for coursely-api

pub mod auth;
pub mod courses;
pub mod enrollments;
pub mod health;
pub mod middleware;
pub mod reviews;

pub use auth::{change_password, login, me, signup, update_profile};
pub use courses::{
    course_stats, create_course, delete_course, get_course, instructor_courses, list_courses,
    other_courses, update_course,
};
pub use enrollments::{enroll, my_enrollments};
pub use health::{get_build_info, health_routes};
pub use middleware::{require_session, CurrentUser};
pub use reviews::{course_rating, course_reviews, my_review, submit_review};
