//! Course catalog endpoints
//!
//! Listing and detail routes are public; create/update/delete require an
//! instructor session, with updates and deletes limited to the owning
//! instructor or an admin.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::json;
use tracing::info;

use crate::aggregate::{self, CourseStats};
use crate::api::middleware::CurrentUser;
use crate::db::courses::{self, CourseInput, CourseWithInstructor};
use crate::error::{ApiError, ApiResult};
use crate::AppState;
use coursely_common::db::models::{Course, Role, User};

/// GET /api/courses
///
/// Full catalog with instructor display fields, newest first.
pub async fn list_courses(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<CourseWithInstructor>>> {
    let courses = courses::list_courses(&state.db).await?;
    Ok(Json(courses))
}

/// GET /api/courses/:id
///
/// **Errors:**
/// - 404: unknown course
pub async fn get_course(
    State(state): State<AppState>,
    Path(guid): Path<String>,
) -> ApiResult<Json<CourseWithInstructor>> {
    let course = courses::get_course_with_instructor(&state.db, &guid)
        .await?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    Ok(Json(course))
}

/// GET /api/courses/:id/stats
///
/// Recomputes review statistics from the stored reviews and returns them.
///
/// **Errors:**
/// - 404: unknown course
pub async fn course_stats(
    State(state): State<AppState>,
    Path(guid): Path<String>,
) -> ApiResult<Json<CourseStats>> {
    courses::require_course(&state.db, &guid).await?;
    let stats = aggregate::recompute(&state.db, &guid).await?;

    Ok(Json(stats))
}

/// POST /api/courses
///
/// **Request:** course fields; only `title` is required
/// **Response:** 201 with the created course
///
/// **Errors:**
/// - 400: missing or blank title
/// - 403: caller is not an instructor
pub async fn create_course(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<CourseInput>,
) -> ApiResult<(StatusCode, Json<Course>)> {
    if user.role != Role::Instructor {
        return Err(ApiError::Forbidden(
            "Only instructors can create courses".to_string(),
        ));
    }

    let course = courses::create_course(&state.db, &user.guid, &payload).await?;

    info!("Course created: {} by {}", course.guid, user.email);

    Ok((StatusCode::CREATED, Json(course)))
}

/// PUT /api/courses/:id
///
/// Partial update; only the fields present in the payload change.
///
/// **Errors:**
/// - 400: blank title
/// - 403: caller is neither the owning instructor nor an admin
/// - 404: unknown course
pub async fn update_course(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(guid): Path<String>,
    Json(payload): Json<CourseInput>,
) -> ApiResult<Json<Course>> {
    let course = courses::require_course(&state.db, &guid).await?;
    ensure_owner_or_admin(&course, &user, "update")?;

    let updated = courses::update_course(&state.db, &guid, &payload).await?;

    Ok(Json(updated))
}

/// DELETE /api/courses/:id
///
/// Removes the course along with its reviews and enrollments (cascade).
///
/// **Errors:**
/// - 403: caller is neither the owning instructor nor an admin
/// - 404: unknown course
pub async fn delete_course(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(guid): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let course = courses::require_course(&state.db, &guid).await?;
    ensure_owner_or_admin(&course, &user, "delete")?;

    courses::delete_course(&state.db, &guid).await?;

    info!("Course deleted: {} by {}", guid, user.email);

    Ok(Json(json!({ "message": "Course deleted successfully" })))
}

/// GET /api/courses/instructor-courses
///
/// Courses taught by the authenticated instructor.
///
/// **Errors:**
/// - 403: caller is not an instructor
/// - 404: instructor has no courses yet
pub async fn instructor_courses(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<Course>>> {
    if user.role != Role::Instructor {
        return Err(ApiError::Forbidden(
            "Only instructors can list their courses".to_string(),
        ));
    }

    let courses = courses::list_by_instructor(&state.db, &user.guid).await?;
    if courses.is_empty() {
        return Err(ApiError::NotFound("No courses found".to_string()));
    }

    Ok(Json(courses))
}

/// GET /api/courses/other-courses
///
/// Catalog minus the caller's own courses; for instructors browsing what
/// their colleagues teach.
pub async fn other_courses(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<CourseWithInstructor>>> {
    let courses = courses::list_other_courses(&state.db, &user.guid).await?;
    Ok(Json(courses))
}

fn ensure_owner_or_admin(course: &Course, user: &User, action: &str) -> Result<(), ApiError> {
    let owns = course.instructor_guid.as_deref() == Some(user.guid.as_str());
    if owns || user.role == Role::Admin {
        Ok(())
    } else {
        Err(ApiError::Forbidden(format!(
            "Not authorized to {} this course",
            action
        )))
    }
}
