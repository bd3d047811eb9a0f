//! Review submission workflow
//!
//! The single write path for reviews. Each submission runs strictly
//! Validate -> Score -> Persist -> Aggregate; nothing is written when
//! validation rejects, and a failure after the review write leaves a stale
//! course aggregate that the next successful submission's full recompute
//! corrects. Concurrent submissions to the same course are not serialized;
//! the last recompute wins and is consistent with the review set it read.

use coursely_common::db::models::Review;
use coursely_common::{Error, Result};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::aggregate::{self, MAX_RATING, MIN_RATING};
use crate::db::{courses, reviews};
use crate::sentiment::TextScorer;

/// Submission fields as received from the client
///
/// Everything is optional at this level; the workflow's validation step is
/// the authority on what must be present.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    pub course_id: Option<String>,
    pub rating: Option<i64>,
    pub comment: Option<String>,
}

/// Result of a completed submission
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    /// The stored review, as persisted
    pub review: Review,
    /// True when this submission inserted a new review (HTTP 201),
    /// false when it replaced an existing one (HTTP 200)
    pub created: bool,
    /// The sentiment score derived from the comment
    pub sentiment_score: i64,
}

/// Submit a review on behalf of a student
///
/// `student_guid` is the resolved acting identity; role enforcement happens
/// at the HTTP layer before this is called.
pub async fn submit_review(
    pool: &SqlitePool,
    scorer: &dyn TextScorer,
    student_guid: &str,
    request: &SubmissionRequest,
) -> Result<SubmissionOutcome> {
    // Validate: reject before any state is written
    let course_guid = request
        .course_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| Error::InvalidInput("Course id is required".to_string()))?;

    let rating = request
        .rating
        .ok_or_else(|| Error::InvalidInput("Rating is required".to_string()))?;
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(Error::InvalidInput("Rating must be between 1 and 5".to_string()));
    }

    let comment = request
        .comment
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| Error::InvalidInput("Comment cannot be empty".to_string()))?;

    courses::require_course(pool, course_guid).await?;

    // Score
    let sentiment_score = scorer.score(comment);

    // Persist
    let (review, created) =
        reviews::upsert_review(pool, course_guid, student_guid, rating, comment, sentiment_score)
            .await?;

    // Aggregate: full recompute written back onto the course row
    let stats = aggregate::recompute(pool, course_guid).await?;
    courses::update_course_aggregates(
        pool,
        course_guid,
        stats.average_rating,
        stats.average_sentiment,
    )
    .await?;

    debug!(
        course = course_guid,
        student = student_guid,
        created,
        sentiment = sentiment_score,
        average_rating = stats.average_rating,
        "Review submission complete"
    );

    Ok(SubmissionOutcome {
        review,
        created,
        sentiment_score,
    })
}
