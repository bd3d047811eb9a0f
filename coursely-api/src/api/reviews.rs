//! Review endpoints
//!
//! Submission runs the full validate/score/persist/aggregate workflow.
//! The response status distinguishes a first submission (201) from a
//! revision of an existing review (200).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::json;
use tracing::info;

use crate::aggregate;
use crate::api::middleware::CurrentUser;
use crate::db::courses;
use crate::db::reviews::{self, ReviewWithAuthor};
use crate::error::{ApiError, ApiResult};
use crate::workflow::{self, SubmissionRequest};
use crate::AppState;
use coursely_common::db::models::Role;

/// POST /api/reviews/submit
///
/// **Request:** `{"courseId": "...", "rating": 1..5, "comment": "..."}`
/// **Response:** 201 (new) or 200 (revised) with
/// `{"message": "...", "review": {...}, "sentimentScore": n}`
///
/// **Errors:**
/// - 400: missing course id, missing or out-of-range rating, blank comment
/// - 403: caller is not a student
/// - 404: unknown course
pub async fn submit_review(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<SubmissionRequest>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    if user.role != Role::Student {
        return Err(ApiError::Forbidden(
            "Only students can submit reviews".to_string(),
        ));
    }

    let outcome =
        workflow::submit_review(&state.db, state.scorer.as_ref(), &user.guid, &payload).await?;

    let (status, message) = if outcome.created {
        (StatusCode::CREATED, "Review submitted successfully")
    } else {
        (StatusCode::OK, "Review updated successfully")
    };

    info!(
        "Review {} for course {} by {} (sentiment {})",
        if outcome.created { "created" } else { "updated" },
        outcome.review.course_guid,
        user.email,
        outcome.sentiment_score
    );

    Ok((
        status,
        Json(json!({
            "message": message,
            "review": outcome.review,
            "sentimentScore": outcome.sentiment_score,
        })),
    ))
}

/// GET /api/reviews/course/:id
///
/// All reviews for a course with author display fields, newest first.
///
/// **Errors:**
/// - 404: unknown course
pub async fn course_reviews(
    State(state): State<AppState>,
    Path(guid): Path<String>,
) -> ApiResult<Json<Vec<ReviewWithAuthor>>> {
    courses::require_course(&state.db, &guid).await?;
    let reviews = reviews::list_by_course_with_authors(&state.db, &guid).await?;

    Ok(Json(reviews))
}

/// GET /api/reviews/course/:id/rating
///
/// The course's current average rating, recomputed from stored reviews.
///
/// **Errors:**
/// - 404: unknown course
pub async fn course_rating(
    State(state): State<AppState>,
    Path(guid): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    courses::require_course(&state.db, &guid).await?;
    let stats = aggregate::recompute(&state.db, &guid).await?;

    Ok(Json(json!({ "averageRating": stats.average_rating })))
}

/// GET /api/reviews/course/:id/mine
///
/// Whether the authenticated user has reviewed the course, and the review
/// itself if so. An unknown course simply reports `hasReviewed: false`.
pub async fn my_review(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(guid): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let review = reviews::find_by_course_and_student(&state.db, &guid, &user.guid).await?;

    Ok(Json(json!({
        "hasReviewed": review.is_some(),
        "review": review,
    })))
}
