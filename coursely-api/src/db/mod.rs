//! Database operations for coursely-api
//!
//! One module per entity. All functions take a `&SqlitePool` and return
//! `coursely_common::Result`; store-level failures propagate unwrapped.

pub mod courses;
pub mod enrollments;
pub mod reviews;
pub mod sessions;
pub mod users;

/// In-memory pool with the full schema applied, for store-level tests.
///
/// A single connection is required: every pooled connection to
/// `sqlite::memory:` would otherwise get its own private database.
#[cfg(test)]
pub(crate) async fn test_pool() -> sqlx::SqlitePool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory database");

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await
        .expect("enable foreign keys");

    coursely_common::db::init::create_schema(&pool)
        .await
        .expect("schema");

    pool
}
