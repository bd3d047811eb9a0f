//! Session database operations
//!
//! Bearer tokens are opaque random hex strings stored server-side, one row
//! per token. Expired rows are deleted when a lookup hits them.

use coursely_common::auth::{generate_session_token, session_expired, session_expiry};
use coursely_common::db::models::Session;
use coursely_common::Result;
use sqlx::{Row, SqlitePool};

/// Create a session for a user with the given time-to-live
pub async fn create_session(pool: &SqlitePool, user_guid: &str, ttl_seconds: i64) -> Result<Session> {
    let token = generate_session_token();
    let expires_at = session_expiry(ttl_seconds);

    sqlx::query("INSERT INTO sessions (token, user_guid, expires_at) VALUES (?, ?, ?)")
        .bind(&token)
        .bind(user_guid)
        .bind(&expires_at)
        .execute(pool)
        .await?;

    Ok(Session {
        token,
        user_guid: user_guid.to_string(),
        expires_at,
    })
}

/// Look up a session, treating expired sessions as absent
///
/// An expired row found here is deleted before returning `None`.
pub async fn find_valid_session(pool: &SqlitePool, token: &str) -> Result<Option<Session>> {
    let row = sqlx::query("SELECT token, user_guid, expires_at FROM sessions WHERE token = ?")
        .bind(token)
        .fetch_optional(pool)
        .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let session = Session {
        token: row.get("token"),
        user_guid: row.get("user_guid"),
        expires_at: row.get("expires_at"),
    };

    if session_expired(&session.expires_at) {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(pool)
            .await?;
        return Ok(None);
    }

    Ok(Some(session))
}
