//! Course database operations
//!
//! Courses carry two derived cache fields, `average_rating` and
//! `average_sentiment`, written only through [`update_course_aggregates`]
//! after the aggregation engine has recomputed them from the review set.

use coursely_common::db::models::Course;
use coursely_common::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Client-supplied course fields for create and update
///
/// On create, `title` is required; on update, `None` fields keep their
/// current value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub department: Option<String>,
    pub difficulty: Option<String>,
    pub prerequisites: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub video_url: Option<String>,
    pub image_url: Option<String>,
}

/// Instructor fields embedded in course listings
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructorSummary {
    pub guid: String,
    pub name: String,
    pub email: String,
    pub profile_image: Option<String>,
}

/// Course plus its instructor's display fields
#[derive(Debug, Clone, Serialize)]
pub struct CourseWithInstructor {
    #[serde(flatten)]
    pub course: Course,
    pub instructor: Option<InstructorSummary>,
}

/// Create a course owned by an instructor
pub async fn create_course(
    pool: &SqlitePool,
    instructor_guid: &str,
    input: &CourseInput,
) -> Result<Course> {
    let title = input
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| Error::InvalidInput("Course title is required".to_string()))?;

    let guid = Uuid::new_v4().to_string();
    let prerequisites = encode_list(input.prerequisites.as_deref())?;
    let tags = encode_list(input.tags.as_deref())?;

    sqlx::query(
        r#"
        INSERT INTO courses (
            guid, title, description, department, difficulty,
            instructor_guid, prerequisites, tags, video_url, image_url
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&guid)
    .bind(title)
    .bind(&input.description)
    .bind(&input.department)
    .bind(&input.difficulty)
    .bind(instructor_guid)
    .bind(&prerequisites)
    .bind(&tags)
    .bind(&input.video_url)
    .bind(&input.image_url)
    .execute(pool)
    .await?;

    require_course(pool, &guid).await
}

/// Look up a course by guid
pub async fn get_course(pool: &SqlitePool, guid: &str) -> Result<Option<Course>> {
    let row = sqlx::query(
        r#"
        SELECT guid, title, description, department, difficulty, instructor_guid,
               average_rating, average_sentiment, prerequisites, tags,
               video_url, image_url, created_at, updated_at
        FROM courses
        WHERE guid = ?
        "#,
    )
    .bind(guid)
    .fetch_optional(pool)
    .await?;

    row.map(course_from_row).transpose()
}

/// Look up a course, failing with "Course not found" when absent
pub async fn require_course(pool: &SqlitePool, guid: &str) -> Result<Course> {
    get_course(pool, guid)
        .await?
        .ok_or_else(|| Error::NotFound("Course not found".to_string()))
}

/// Look up a course with instructor display fields
pub async fn get_course_with_instructor(
    pool: &SqlitePool,
    guid: &str,
) -> Result<Option<CourseWithInstructor>> {
    let row = sqlx::query(&format!("{COURSE_WITH_INSTRUCTOR_SELECT} WHERE c.guid = ?"))
        .bind(guid)
        .fetch_optional(pool)
        .await?;

    row.map(course_with_instructor_from_row).transpose()
}

/// All courses with instructor display fields, newest first
pub async fn list_courses(pool: &SqlitePool) -> Result<Vec<CourseWithInstructor>> {
    let rows = sqlx::query(&format!(
        "{COURSE_WITH_INSTRUCTOR_SELECT} ORDER BY c.created_at DESC"
    ))
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(course_with_instructor_from_row).collect()
}

/// Courses owned by one instructor, newest first
pub async fn list_by_instructor(pool: &SqlitePool, instructor_guid: &str) -> Result<Vec<Course>> {
    let rows = sqlx::query(
        r#"
        SELECT guid, title, description, department, difficulty, instructor_guid,
               average_rating, average_sentiment, prerequisites, tags,
               video_url, image_url, created_at, updated_at
        FROM courses
        WHERE instructor_guid = ?
        ORDER BY created_at DESC
        "#,
    )
    .bind(instructor_guid)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(course_from_row).collect()
}

/// Courses not owned by the given user (browse view for instructors)
pub async fn list_other_courses(
    pool: &SqlitePool,
    user_guid: &str,
) -> Result<Vec<CourseWithInstructor>> {
    let rows = sqlx::query(&format!(
        "{COURSE_WITH_INSTRUCTOR_SELECT} \
         WHERE c.instructor_guid IS NULL OR c.instructor_guid != ? \
         ORDER BY c.created_at DESC"
    ))
    .bind(user_guid)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(course_with_instructor_from_row).collect()
}

/// Update course fields; `None` fields keep their current value
pub async fn update_course(pool: &SqlitePool, guid: &str, input: &CourseInput) -> Result<Course> {
    if let Some(title) = &input.title {
        if title.trim().is_empty() {
            return Err(Error::InvalidInput("Course title cannot be empty".to_string()));
        }
    }

    let prerequisites = input
        .prerequisites
        .as_deref()
        .map(|list| encode_list(Some(list)))
        .transpose()?;
    let tags = input.tags.as_deref().map(|list| encode_list(Some(list))).transpose()?;

    let result = sqlx::query(
        r#"
        UPDATE courses
        SET title = COALESCE(?, title),
            description = COALESCE(?, description),
            department = COALESCE(?, department),
            difficulty = COALESCE(?, difficulty),
            prerequisites = COALESCE(?, prerequisites),
            tags = COALESCE(?, tags),
            video_url = COALESCE(?, video_url),
            image_url = COALESCE(?, image_url),
            updated_at = CURRENT_TIMESTAMP
        WHERE guid = ?
        "#,
    )
    .bind(input.title.as_deref().map(str::trim))
    .bind(&input.description)
    .bind(&input.department)
    .bind(&input.difficulty)
    .bind(&prerequisites)
    .bind(&tags)
    .bind(&input.video_url)
    .bind(&input.image_url)
    .bind(guid)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound("Course not found".to_string()));
    }

    require_course(pool, guid).await
}

/// Delete a course; enrollments and reviews cascade
pub async fn delete_course(pool: &SqlitePool, guid: &str) -> Result<()> {
    let result = sqlx::query("DELETE FROM courses WHERE guid = ?")
        .bind(guid)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound("Course not found".to_string()));
    }

    Ok(())
}

/// Write recomputed aggregate fields back onto the course row
///
/// The only write path for `average_rating`/`average_sentiment`.
pub async fn update_course_aggregates(
    pool: &SqlitePool,
    guid: &str,
    average_rating: f64,
    average_sentiment: f64,
) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE courses
        SET average_rating = ?, average_sentiment = ?, updated_at = CURRENT_TIMESTAMP
        WHERE guid = ?
        "#,
    )
    .bind(average_rating)
    .bind(average_sentiment)
    .bind(guid)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound("Course not found".to_string()));
    }

    Ok(())
}

const COURSE_WITH_INSTRUCTOR_SELECT: &str = r#"
    SELECT c.guid, c.title, c.description, c.department, c.difficulty, c.instructor_guid,
           c.average_rating, c.average_sentiment, c.prerequisites, c.tags,
           c.video_url, c.image_url, c.created_at, c.updated_at,
           u.guid AS instructor_row_guid, u.name AS instructor_name,
           u.email AS instructor_email, u.profile_image AS instructor_profile_image
    FROM courses c
    LEFT JOIN users u ON u.guid = c.instructor_guid
"#;

pub(crate) fn course_from_row(row: sqlx::sqlite::SqliteRow) -> Result<Course> {
    let prerequisites: String = row.get("prerequisites");
    let tags: String = row.get("tags");

    Ok(Course {
        guid: row.get("guid"),
        title: row.get("title"),
        description: row.get("description"),
        department: row.get("department"),
        difficulty: row.get("difficulty"),
        instructor_guid: row.get("instructor_guid"),
        average_rating: row.get("average_rating"),
        average_sentiment: row.get("average_sentiment"),
        prerequisites: decode_list(&prerequisites)?,
        tags: decode_list(&tags)?,
        video_url: row.get("video_url"),
        image_url: row.get("image_url"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn course_with_instructor_from_row(row: sqlx::sqlite::SqliteRow) -> Result<CourseWithInstructor> {
    let instructor_guid: Option<String> = row.get("instructor_row_guid");
    let instructor = instructor_guid.map(|guid| InstructorSummary {
        guid,
        name: row.get("instructor_name"),
        email: row.get("instructor_email"),
        profile_image: row.get("instructor_profile_image"),
    });

    Ok(CourseWithInstructor {
        course: course_from_row(row)?,
        instructor,
    })
}

/// JSON-encode a string list column; absent lists encode as `[]`
fn encode_list(list: Option<&[String]>) -> Result<String> {
    serde_json::to_string(list.unwrap_or(&[]))
        .map_err(|e| Error::Internal(format!("Failed to serialize list field: {}", e)))
}

fn decode_list(raw: &str) -> Result<Vec<String>> {
    serde_json::from_str(raw)
        .map_err(|e| Error::Internal(format!("Failed to parse list field: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::db::users::create_user;
    use coursely_common::db::models::Role;

    async fn seed_instructor(pool: &SqlitePool) -> String {
        create_user(pool, "Prof. Lovelace", "prof@example.com", "pw", Role::Instructor)
            .await
            .unwrap()
            .guid
    }

    #[tokio::test]
    async fn test_create_and_get_course() {
        let pool = test_pool().await;
        let instructor = seed_instructor(&pool).await;

        let input = CourseInput {
            title: Some("Algorithms".to_string()),
            description: Some("Sorting and searching".to_string()),
            tags: Some(vec!["cs".to_string(), "theory".to_string()]),
            ..Default::default()
        };

        let course = create_course(&pool, &instructor, &input).await.unwrap();
        assert_eq!(course.title, "Algorithms");
        assert_eq!(course.tags, vec!["cs", "theory"]);
        assert_eq!(course.prerequisites, Vec::<String>::new());
        assert_eq!(course.average_rating, 0.0);
        assert_eq!(course.average_sentiment, 0.0);

        let fetched = get_course(&pool, &course.guid).await.unwrap().unwrap();
        assert_eq!(fetched.guid, course.guid);
        assert_eq!(fetched.instructor_guid.as_deref(), Some(instructor.as_str()));
    }

    #[tokio::test]
    async fn test_create_requires_title() {
        let pool = test_pool().await;
        let instructor = seed_instructor(&pool).await;

        let missing = create_course(&pool, &instructor, &CourseInput::default()).await;
        assert!(matches!(missing, Err(Error::InvalidInput(_))));

        let blank = create_course(
            &pool,
            &instructor,
            &CourseInput {
                title: Some("   ".to_string()),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(blank, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_update_preserves_unset_fields() {
        let pool = test_pool().await;
        let instructor = seed_instructor(&pool).await;

        let course = create_course(
            &pool,
            &instructor,
            &CourseInput {
                title: Some("Databases".to_string()),
                department: Some("CS".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let updated = update_course(
            &pool,
            &course.guid,
            &CourseInput {
                description: Some("Relational systems".to_string()),
                tags: Some(vec!["sql".to_string()]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.title, "Databases");
        assert_eq!(updated.department.as_deref(), Some("CS"));
        assert_eq!(updated.description.as_deref(), Some("Relational systems"));
        assert_eq!(updated.tags, vec!["sql"]);
    }

    #[tokio::test]
    async fn test_list_other_courses_excludes_own() {
        let pool = test_pool().await;
        let mine = seed_instructor(&pool).await;
        let other = create_user(&pool, "Prof. Other", "other@example.com", "pw", Role::Instructor)
            .await
            .unwrap()
            .guid;

        create_course(
            &pool,
            &mine,
            &CourseInput {
                title: Some("My Course".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        create_course(
            &pool,
            &other,
            &CourseInput {
                title: Some("Their Course".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let others = list_other_courses(&pool, &mine).await.unwrap();
        assert_eq!(others.len(), 1);
        assert_eq!(others[0].course.title, "Their Course");
        assert_eq!(others[0].instructor.as_ref().unwrap().name, "Prof. Other");

        let all = list_courses(&pool).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_course() {
        let pool = test_pool().await;
        let instructor = seed_instructor(&pool).await;

        let course = create_course(
            &pool,
            &instructor,
            &CourseInput {
                title: Some("Ephemeral".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        delete_course(&pool, &course.guid).await.unwrap();
        assert!(get_course(&pool, &course.guid).await.unwrap().is_none());

        let again = delete_course(&pool, &course.guid).await;
        assert!(matches!(again, Err(Error::NotFound(_))));
    }
}
