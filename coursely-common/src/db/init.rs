//! Database initialization
//!
//! Creates the SQLite database on first run and brings the schema up to date
//! on every start. All DDL is idempotent (`CREATE TABLE IF NOT EXISTS`), so
//! calling [`init_database`] repeatedly is safe.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::{info, warn};

/// Initialize database connection pool and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use sqlite options to create database if it doesn't exist
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await?;

    // WAL mode allows concurrent readers while a submission writes
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    create_schema(&pool).await?;
    init_default_settings(&pool).await?;

    Ok(pool)
}

/// Create all tables and indexes (idempotent — safe to call multiple times)
///
/// Exposed separately from [`init_database`] so tests can apply the schema
/// to an in-memory pool.
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_users_table(pool).await?;
    create_sessions_table(pool).await?;
    create_courses_table(pool).await?;
    create_enrollments_table(pool).await?;
    create_reviews_table(pool).await?;
    create_settings_table(pool).await?;

    Ok(())
}

/// Create the users table
///
/// Roles: students submit reviews and enroll, instructors publish courses,
/// admins may delete any course.
pub async fn create_users_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            guid TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            password_salt TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'student' CHECK (role IN ('student', 'instructor', 'admin')),
            profile_image TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the sessions table
///
/// One row per issued bearer token; `expires_at` is RFC 3339 and checked on
/// every lookup.
pub async fn create_sessions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            token TEXT PRIMARY KEY,
            user_guid TEXT NOT NULL REFERENCES users(guid) ON DELETE CASCADE,
            expires_at TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_guid)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the courses table
///
/// `average_rating` and `average_sentiment` are derived cache fields, written
/// only by the aggregation engine after a review submission. They must always
/// equal a full recompute over the course's reviews (0 when there are none).
pub async fn create_courses_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS courses (
            guid TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT,
            department TEXT,
            difficulty TEXT,
            instructor_guid TEXT REFERENCES users(guid) ON DELETE SET NULL,
            average_rating REAL NOT NULL DEFAULT 0,
            average_sentiment REAL NOT NULL DEFAULT 0,
            prerequisites TEXT NOT NULL DEFAULT '[]',
            tags TEXT NOT NULL DEFAULT '[]',
            video_url TEXT,
            image_url TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            CHECK (length(trim(title)) > 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_courses_instructor ON courses(instructor_guid)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the enrollments table
///
/// The UNIQUE constraint prevents double enrollment; violations surface to
/// the client as "Already enrolled in this course".
pub async fn create_enrollments_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS enrollments (
            guid TEXT PRIMARY KEY,
            user_guid TEXT NOT NULL REFERENCES users(guid) ON DELETE CASCADE,
            course_guid TEXT NOT NULL REFERENCES courses(guid) ON DELETE CASCADE,
            progress REAL NOT NULL DEFAULT 0,
            completed INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (user_guid, course_guid),
            CHECK (progress >= 0.0 AND progress <= 100.0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_enrollments_user ON enrollments(user_guid)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_enrollments_course ON enrollments(course_guid)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the reviews table
///
/// At most one review per (course, student): a resubmission updates the
/// existing row in place. `sentiment` is derived from `comment` by the
/// sentiment scorer and recomputed whenever the comment changes.
pub async fn create_reviews_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reviews (
            guid TEXT PRIMARY KEY,
            course_guid TEXT NOT NULL REFERENCES courses(guid) ON DELETE CASCADE,
            student_guid TEXT NOT NULL REFERENCES users(guid) ON DELETE CASCADE,
            rating INTEGER NOT NULL CHECK (rating >= 1 AND rating <= 5),
            comment TEXT NOT NULL CHECK (length(trim(comment)) > 0),
            sentiment INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (course_guid, student_guid)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_reviews_course ON reviews(course_guid)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_reviews_student ON reviews(student_guid)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the settings table
///
/// Stores application configuration key-value pairs.
pub async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Initialize or update default settings
///
/// Ensures all required settings exist with default values, and resets NULL
/// values back to their defaults.
pub async fn init_default_settings(pool: &SqlitePool) -> Result<()> {
    // Session lifetime: 8 days
    ensure_setting(pool, "session_timeout_seconds", "691200").await?;

    info!("Default settings initialized");
    Ok(())
}

/// Read an integer setting, falling back to a default when missing or invalid
pub async fn load_setting_i64(pool: &SqlitePool, key: &str, default: i64) -> Result<i64> {
    let value: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?
        .flatten();

    Ok(value.and_then(|v| v.parse().ok()).unwrap_or(default))
}

/// Ensure a setting exists with the specified default value
///
/// If the setting doesn't exist, it will be created with the default.
/// If the setting exists but has a NULL value, it will be reset to the default.
async fn ensure_setting(pool: &SqlitePool, key: &str, default_value: &str) -> Result<()> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM settings WHERE key = ?)")
        .bind(key)
        .fetch_one(pool)
        .await?;

    if !exists {
        // INSERT OR IGNORE handles concurrent initialization races
        sqlx::query("INSERT OR IGNORE INTO settings (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(default_value)
            .execute(pool)
            .await?;

        info!("Initialized setting '{}' with default value: {}", key, default_value);
        return Ok(());
    }

    let value: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_one(pool)
        .await?;

    if value.is_none() {
        sqlx::query("UPDATE settings SET value = ? WHERE key = ?")
            .bind(default_value)
            .bind(key)
            .execute(pool)
            .await?;

        warn!("Setting '{}' was NULL, reset to default: {}", key, default_value);
    }

    Ok(())
}
