//! Enrollment database operations

use coursely_common::db::models::{Course, Enrollment};
use coursely_common::{Error, Result};
use serde::Serialize;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Enrollment plus the enrolled course
#[derive(Debug, Clone, Serialize)]
pub struct EnrollmentWithCourse {
    #[serde(flatten)]
    pub enrollment: Enrollment,
    pub course: Course,
}

/// Enroll a user in a course
///
/// A second enrollment for the same (user, course) pair reports
/// "Already enrolled in this course".
pub async fn enroll(pool: &SqlitePool, user_guid: &str, course_guid: &str) -> Result<Enrollment> {
    let existing = find_by_user_and_course(pool, user_guid, course_guid).await?;
    if existing.is_some() {
        return Err(Error::Conflict("Already enrolled in this course".to_string()));
    }

    let guid = Uuid::new_v4().to_string();

    sqlx::query("INSERT INTO enrollments (guid, user_guid, course_guid) VALUES (?, ?, ?)")
        .bind(&guid)
        .bind(user_guid)
        .bind(course_guid)
        .execute(pool)
        .await?;

    find_by_user_and_course(pool, user_guid, course_guid)
        .await?
        .ok_or_else(|| Error::Internal("Enrollment missing after insert".to_string()))
}

/// The enrollment linking a user to a course, if any
pub async fn find_by_user_and_course(
    pool: &SqlitePool,
    user_guid: &str,
    course_guid: &str,
) -> Result<Option<Enrollment>> {
    let row = sqlx::query(
        r#"
        SELECT guid, user_guid, course_guid, progress, completed, created_at
        FROM enrollments
        WHERE user_guid = ? AND course_guid = ?
        "#,
    )
    .bind(user_guid)
    .bind(course_guid)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(enrollment_from_row))
}

/// A user's enrollments with each enrolled course embedded, newest first
pub async fn list_by_user_with_courses(
    pool: &SqlitePool,
    user_guid: &str,
) -> Result<Vec<EnrollmentWithCourse>> {
    let rows = sqlx::query(
        r#"
        SELECT e.guid, e.user_guid, e.course_guid, e.progress, e.completed, e.created_at,
               c.guid AS c_guid, c.title, c.description, c.department, c.difficulty,
               c.instructor_guid, c.average_rating, c.average_sentiment,
               c.prerequisites, c.tags, c.video_url, c.image_url,
               c.created_at AS c_created_at, c.updated_at AS c_updated_at
        FROM enrollments e
        JOIN courses c ON c.guid = e.course_guid
        WHERE e.user_guid = ?
        ORDER BY e.created_at DESC
        "#,
    )
    .bind(user_guid)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| {
            let enrollment = enrollment_from_row_prefixed(&row);
            let course = course_from_joined_row(&row)?;
            Ok(EnrollmentWithCourse { enrollment, course })
        })
        .collect()
}

fn enrollment_from_row(row: sqlx::sqlite::SqliteRow) -> Enrollment {
    enrollment_from_row_prefixed(&row)
}

fn enrollment_from_row_prefixed(row: &sqlx::sqlite::SqliteRow) -> Enrollment {
    let completed: i64 = row.get("completed");
    Enrollment {
        guid: row.get("guid"),
        user_guid: row.get("user_guid"),
        course_guid: row.get("course_guid"),
        progress: row.get("progress"),
        completed: completed != 0,
        created_at: row.get("created_at"),
    }
}

/// Course columns from the join, with aliased names where they collide with
/// enrollment columns
fn course_from_joined_row(row: &sqlx::sqlite::SqliteRow) -> Result<Course> {
    let prerequisites: String = row.get("prerequisites");
    let tags: String = row.get("tags");

    Ok(Course {
        guid: row.get("c_guid"),
        title: row.get("title"),
        description: row.get("description"),
        department: row.get("department"),
        difficulty: row.get("difficulty"),
        instructor_guid: row.get("instructor_guid"),
        average_rating: row.get("average_rating"),
        average_sentiment: row.get("average_sentiment"),
        prerequisites: serde_json::from_str(&prerequisites)
            .map_err(|e| Error::Internal(format!("Failed to parse list field: {}", e)))?,
        tags: serde_json::from_str(&tags)
            .map_err(|e| Error::Internal(format!("Failed to parse list field: {}", e)))?,
        video_url: row.get("video_url"),
        image_url: row.get("image_url"),
        created_at: row.get("c_created_at"),
        updated_at: row.get("c_updated_at"),
    })
}
