//! Tests for database initialization and schema constraints
//!
//! Covers automatic creation on first run, idempotent re-initialization,
//! default settings seeding, and the uniqueness/range constraints the review
//! pipeline relies on.

use coursely_common::db::init::{init_database, load_setting_i64};
use std::path::PathBuf;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let test_db = format!("/tmp/coursely-test-db-{}.db", std::process::id());
    let db_path = PathBuf::from(&test_db);

    // Ensure database doesn't exist
    let _ = std::fs::remove_file(&db_path);

    let result = init_database(&db_path).await;

    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");

    // Cleanup
    let _ = std::fs::remove_file(&db_path);
}

#[tokio::test]
async fn test_database_opens_existing() {
    let test_db = format!("/tmp/coursely-test-db-existing-{}.db", std::process::id());
    let db_path = PathBuf::from(&test_db);

    let _ = std::fs::remove_file(&db_path);

    // Create database first time
    let pool1 = init_database(&db_path).await;
    assert!(pool1.is_ok());

    // Open database second time (should succeed)
    let pool2 = init_database(&db_path).await;
    assert!(pool2.is_ok(), "Failed to open existing database: {:?}", pool2.err());

    // Cleanup
    drop(pool1);
    drop(pool2);
    let _ = std::fs::remove_file(&db_path);
}

#[tokio::test]
async fn test_default_settings_initialized() {
    let test_db = format!("/tmp/coursely-test-db-settings-{}.db", std::process::id());
    let db_path = PathBuf::from(&test_db);

    let _ = std::fs::remove_file(&db_path);

    let pool = init_database(&db_path).await.unwrap();

    let timeout: Option<String> =
        sqlx::query_scalar("SELECT value FROM settings WHERE key = 'session_timeout_seconds'")
            .fetch_optional(&pool)
            .await
            .unwrap();

    assert!(timeout.is_some(), "session_timeout_seconds setting not initialized");
    assert_eq!(timeout.unwrap(), "691200", "session_timeout_seconds has wrong default value");

    // Cleanup
    drop(pool);
    let _ = std::fs::remove_file(&db_path);
}

#[tokio::test]
async fn test_idempotent_initialization() {
    let test_db = format!("/tmp/coursely-test-db-idempotent-{}.db", std::process::id());
    let db_path = PathBuf::from(&test_db);

    let _ = std::fs::remove_file(&db_path);

    let pool1 = init_database(&db_path).await.unwrap();

    let count1: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM settings")
        .fetch_one(&pool1)
        .await
        .unwrap();

    drop(pool1);

    // Initialize database second time (should not error)
    let pool2 = init_database(&db_path).await.unwrap();

    let count2: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM settings")
        .fetch_one(&pool2)
        .await
        .unwrap();

    assert_eq!(count1, count2, "Settings count changed on second initialization");

    // Cleanup
    drop(pool2);
    let _ = std::fs::remove_file(&db_path);
}

#[tokio::test]
async fn test_null_setting_reset_to_default() {
    let test_db = format!("/tmp/coursely-test-db-null-{}.db", std::process::id());
    let db_path = PathBuf::from(&test_db);

    let _ = std::fs::remove_file(&db_path);

    let pool = init_database(&db_path).await.unwrap();

    // Manually set a setting to NULL
    sqlx::query("UPDATE settings SET value = NULL WHERE key = 'session_timeout_seconds'")
        .execute(&pool)
        .await
        .unwrap();

    drop(pool);

    // Re-initialize database (should reset NULL to default)
    let pool2 = init_database(&db_path).await.unwrap();

    let value: Option<String> =
        sqlx::query_scalar("SELECT value FROM settings WHERE key = 'session_timeout_seconds'")
            .fetch_one(&pool2)
            .await
            .unwrap();

    assert!(value.is_some(), "NULL value was not reset to default");
    assert_eq!(value.unwrap(), "691200", "NULL value was not reset to correct default");

    // Cleanup
    drop(pool2);
    let _ = std::fs::remove_file(&db_path);
}

#[tokio::test]
async fn test_load_setting_i64_fallback() {
    let test_db = format!("/tmp/coursely-test-db-load-{}.db", std::process::id());
    let db_path = PathBuf::from(&test_db);

    let _ = std::fs::remove_file(&db_path);

    let pool = init_database(&db_path).await.unwrap();

    let timeout = load_setting_i64(&pool, "session_timeout_seconds", 3600).await.unwrap();
    assert_eq!(timeout, 691200);

    // Missing key falls back to the supplied default
    let missing = load_setting_i64(&pool, "no_such_setting", 42).await.unwrap();
    assert_eq!(missing, 42);

    // Unparseable value falls back too
    sqlx::query("UPDATE settings SET value = 'soon' WHERE key = 'session_timeout_seconds'")
        .execute(&pool)
        .await
        .unwrap();
    let garbled = load_setting_i64(&pool, "session_timeout_seconds", 3600).await.unwrap();
    assert_eq!(garbled, 3600);

    // Cleanup
    drop(pool);
    let _ = std::fs::remove_file(&db_path);
}

#[tokio::test]
async fn test_foreign_keys_enabled() {
    let test_db = format!("/tmp/coursely-test-db-fk-{}.db", std::process::id());
    let db_path = PathBuf::from(&test_db);

    let _ = std::fs::remove_file(&db_path);

    let pool = init_database(&db_path).await.unwrap();

    let fk_enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
        .fetch_one(&pool)
        .await
        .unwrap();

    assert_eq!(fk_enabled, 1, "Foreign keys should be enabled");

    // Cleanup
    drop(pool);
    let _ = std::fs::remove_file(&db_path);
}

#[tokio::test]
async fn test_busy_timeout_set() {
    let test_db = format!("/tmp/coursely-test-db-timeout-{}.db", std::process::id());
    let db_path = PathBuf::from(&test_db);

    let _ = std::fs::remove_file(&db_path);

    let pool = init_database(&db_path).await.unwrap();

    let timeout: i64 = sqlx::query_scalar("PRAGMA busy_timeout")
        .fetch_one(&pool)
        .await
        .unwrap();

    assert_eq!(timeout, 5000, "Busy timeout should be 5000ms");

    // Cleanup
    drop(pool);
    let _ = std::fs::remove_file(&db_path);
}

/// Seed one student and one course so review/enrollment rows satisfy their
/// foreign keys.
async fn seed_student_and_course(pool: &sqlx::SqlitePool) {
    sqlx::query(
        "INSERT INTO users (guid, name, email, password_hash, password_salt) \
         VALUES ('u-1', 'Student One', 'student1@example.com', 'h', 's')",
    )
    .execute(pool)
    .await
    .unwrap();

    sqlx::query("INSERT INTO courses (guid, title) VALUES ('c-1', 'Intro to Databases')")
        .execute(pool)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_second_review_for_same_pair_rejected() {
    let test_db = format!("/tmp/coursely-test-db-review-unique-{}.db", std::process::id());
    let db_path = PathBuf::from(&test_db);

    let _ = std::fs::remove_file(&db_path);

    let pool = init_database(&db_path).await.unwrap();
    seed_student_and_course(&pool).await;

    sqlx::query(
        "INSERT INTO reviews (guid, course_guid, student_guid, rating, comment, sentiment) \
         VALUES ('r-1', 'c-1', 'u-1', 5, 'great', 1)",
    )
    .execute(&pool)
    .await
    .unwrap();

    // A second bare INSERT for the same (course, student) must violate the
    // unique constraint; the store layer upserts instead.
    let dup = sqlx::query(
        "INSERT INTO reviews (guid, course_guid, student_guid, rating, comment, sentiment) \
         VALUES ('r-2', 'c-1', 'u-1', 1, 'bad', -1)",
    )
    .execute(&pool)
    .await;

    assert!(dup.is_err(), "Duplicate (course, student) review was not rejected");

    // Cleanup
    drop(pool);
    let _ = std::fs::remove_file(&db_path);
}

#[tokio::test]
async fn test_duplicate_enrollment_rejected() {
    let test_db = format!("/tmp/coursely-test-db-enroll-unique-{}.db", std::process::id());
    let db_path = PathBuf::from(&test_db);

    let _ = std::fs::remove_file(&db_path);

    let pool = init_database(&db_path).await.unwrap();
    seed_student_and_course(&pool).await;

    sqlx::query("INSERT INTO enrollments (guid, user_guid, course_guid) VALUES ('e-1', 'u-1', 'c-1')")
        .execute(&pool)
        .await
        .unwrap();

    let dup = sqlx::query(
        "INSERT INTO enrollments (guid, user_guid, course_guid) VALUES ('e-2', 'u-1', 'c-1')",
    )
    .execute(&pool)
    .await;

    assert!(dup.is_err(), "Duplicate enrollment was not rejected");

    // Cleanup
    drop(pool);
    let _ = std::fs::remove_file(&db_path);
}

#[tokio::test]
async fn test_out_of_range_rating_rejected() {
    let test_db = format!("/tmp/coursely-test-db-rating-{}.db", std::process::id());
    let db_path = PathBuf::from(&test_db);

    let _ = std::fs::remove_file(&db_path);

    let pool = init_database(&db_path).await.unwrap();
    seed_student_and_course(&pool).await;

    for bad_rating in [0, 6] {
        let result = sqlx::query(
            "INSERT INTO reviews (guid, course_guid, student_guid, rating, comment, sentiment) \
             VALUES ('r-bad', 'c-1', 'u-1', ?, 'ok', 0)",
        )
        .bind(bad_rating)
        .execute(&pool)
        .await;

        assert!(result.is_err(), "Rating {} should violate the range check", bad_rating);
    }

    // Cleanup
    drop(pool);
    let _ = std::fs::remove_file(&db_path);
}

#[tokio::test]
async fn test_course_delete_cascades_to_reviews() {
    let test_db = format!("/tmp/coursely-test-db-cascade-{}.db", std::process::id());
    let db_path = PathBuf::from(&test_db);

    let _ = std::fs::remove_file(&db_path);

    let pool = init_database(&db_path).await.unwrap();
    seed_student_and_course(&pool).await;

    sqlx::query(
        "INSERT INTO reviews (guid, course_guid, student_guid, rating, comment, sentiment) \
         VALUES ('r-1', 'c-1', 'u-1', 4, 'solid', 1)",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query("INSERT INTO enrollments (guid, user_guid, course_guid) VALUES ('e-1', 'u-1', 'c-1')")
        .execute(&pool)
        .await
        .unwrap();

    sqlx::query("DELETE FROM courses WHERE guid = 'c-1'")
        .execute(&pool)
        .await
        .unwrap();

    let reviews: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews")
        .fetch_one(&pool)
        .await
        .unwrap();
    let enrollments: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM enrollments")
        .fetch_one(&pool)
        .await
        .unwrap();

    assert_eq!(reviews, 0, "Reviews were not cascade-deleted with the course");
    assert_eq!(enrollments, 0, "Enrollments were not cascade-deleted with the course");

    // Cleanup
    drop(pool);
    let _ = std::fs::remove_file(&db_path);
}
