//! Review store
//!
//! At most one review exists per (course, student) pair; a resubmission
//! replaces rating/comment/sentiment in place and keeps the original guid
//! and created_at. Callers receive a `created` flag distinguishing insert
//! from update, which drives 201 vs 200 at the HTTP layer.

use coursely_common::db::models::Review;
use coursely_common::{Error, Result};
use serde::Serialize;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Review author fields embedded in course review listings
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    pub guid: String,
    pub name: String,
    pub email: String,
    pub profile_image: Option<String>,
}

/// Review plus its author's display fields
#[derive(Debug, Clone, Serialize)]
pub struct ReviewWithAuthor {
    #[serde(flatten)]
    pub review: Review,
    pub student: AuthorSummary,
}

/// Insert or update the review for (course, student)
///
/// Returns the stored review and whether it was newly created. The guid and
/// created_at of an existing row are never touched; only rating, comment,
/// sentiment and updated_at change. The conflict target makes concurrent
/// first submissions from the same student safe: one inserts, the other
/// updates.
pub async fn upsert_review(
    pool: &SqlitePool,
    course_guid: &str,
    student_guid: &str,
    rating: i64,
    comment: &str,
    sentiment: i64,
) -> Result<(Review, bool)> {
    let existing: Option<String> =
        sqlx::query_scalar("SELECT guid FROM reviews WHERE course_guid = ? AND student_guid = ?")
            .bind(course_guid)
            .bind(student_guid)
            .fetch_optional(pool)
            .await?;

    let created = existing.is_none();
    let guid = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO reviews (guid, course_guid, student_guid, rating, comment, sentiment)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(course_guid, student_guid) DO UPDATE SET
            rating = excluded.rating,
            comment = excluded.comment,
            sentiment = excluded.sentiment,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(&guid)
    .bind(course_guid)
    .bind(student_guid)
    .bind(rating)
    .bind(comment)
    .bind(sentiment)
    .execute(pool)
    .await?;

    let review = find_by_course_and_student(pool, course_guid, student_guid)
        .await?
        .ok_or_else(|| Error::Internal("Review missing after upsert".to_string()))?;

    Ok((review, created))
}

/// All reviews for a course; ordering is not significant to aggregation
pub async fn list_by_course(pool: &SqlitePool, course_guid: &str) -> Result<Vec<Review>> {
    let rows = sqlx::query(
        r#"
        SELECT guid, course_guid, student_guid, rating, comment, sentiment,
               created_at, updated_at
        FROM reviews
        WHERE course_guid = ?
        "#,
    )
    .bind(course_guid)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(review_from_row).collect())
}

/// The review a specific student left on a course, if any
pub async fn find_by_course_and_student(
    pool: &SqlitePool,
    course_guid: &str,
    student_guid: &str,
) -> Result<Option<Review>> {
    let row = sqlx::query(
        r#"
        SELECT guid, course_guid, student_guid, rating, comment, sentiment,
               created_at, updated_at
        FROM reviews
        WHERE course_guid = ? AND student_guid = ?
        "#,
    )
    .bind(course_guid)
    .bind(student_guid)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(review_from_row))
}

/// Reviews for a course joined with author display fields, newest first
pub async fn list_by_course_with_authors(
    pool: &SqlitePool,
    course_guid: &str,
) -> Result<Vec<ReviewWithAuthor>> {
    let rows = sqlx::query(
        r#"
        SELECT r.guid, r.course_guid, r.student_guid, r.rating, r.comment, r.sentiment,
               r.created_at, r.updated_at,
               u.name AS student_name, u.email AS student_email,
               u.profile_image AS student_profile_image
        FROM reviews r
        JOIN users u ON u.guid = r.student_guid
        WHERE r.course_guid = ?
        ORDER BY r.created_at DESC
        "#,
    )
    .bind(course_guid)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let student = AuthorSummary {
                guid: row.get("student_guid"),
                name: row.get("student_name"),
                email: row.get("student_email"),
                profile_image: row.get("student_profile_image"),
            };
            ReviewWithAuthor {
                review: review_from_row(row),
                student,
            }
        })
        .collect())
}

fn review_from_row(row: sqlx::sqlite::SqliteRow) -> Review {
    Review {
        guid: row.get("guid"),
        course_guid: row.get("course_guid"),
        student_guid: row.get("student_guid"),
        rating: row.get("rating"),
        comment: row.get("comment"),
        sentiment: row.get("sentiment"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
