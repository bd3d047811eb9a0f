//! Enrollment endpoints
//!
//! Students enroll themselves; a duplicate enrollment is reported as 400
//! rather than creating a second row.

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::api::middleware::CurrentUser;
use crate::db::courses;
use crate::db::enrollments::{self, EnrollmentWithCourse};
use crate::error::{ApiError, ApiResult};
use crate::AppState;
use coursely_common::db::models::Role;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollRequest {
    pub course_id: Option<String>,
}

/// POST /api/enrollments/enroll
///
/// **Request:** `{"courseId": "..."}`
/// **Response:** 201 with `{"message": "...", "enrollment": {...}}`
///
/// **Errors:**
/// - 400: missing course id, or already enrolled
/// - 403: caller is not a student
/// - 404: unknown course
pub async fn enroll(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<EnrollRequest>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    if user.role != Role::Student {
        return Err(ApiError::Forbidden(
            "Only students can enroll in courses".to_string(),
        ));
    }

    let course_guid = match payload.course_id.as_deref().map(str::trim) {
        Some(guid) if !guid.is_empty() => guid.to_string(),
        _ => return Err(ApiError::BadRequest("Course id is required".to_string())),
    };

    courses::require_course(&state.db, &course_guid).await?;

    let enrollment = enrollments::enroll(&state.db, &user.guid, &course_guid).await?;

    info!("Student {} enrolled in course {}", user.email, course_guid);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Enrolled successfully",
            "enrollment": enrollment,
        })),
    ))
}

/// GET /api/enrollments
///
/// The caller's enrollments, each with its course embedded.
pub async fn my_enrollments(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<EnrollmentWithCourse>>> {
    let enrollments = enrollments::list_by_user_with_courses(&state.db, &user.guid).await?;
    Ok(Json(enrollments))
}
