//! User database operations

use coursely_common::auth::{generate_salt, hash_password};
use coursely_common::db::models::{Role, User};
use coursely_common::{Error, Result};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Create a new user, hashing the password with a fresh salt
///
/// Duplicate email reports "User already exists", the message clients show
/// on the signup form.
pub async fn create_user(
    pool: &SqlitePool,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
) -> Result<User> {
    let existing: Option<String> = sqlx::query_scalar("SELECT guid FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    if existing.is_some() {
        return Err(Error::Conflict("User already exists".to_string()));
    }

    let guid = Uuid::new_v4().to_string();
    let salt = generate_salt();
    let hash = hash_password(password, &salt);

    sqlx::query(
        r#"
        INSERT INTO users (guid, name, email, password_hash, password_salt, role)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&guid)
    .bind(name)
    .bind(email)
    .bind(&hash)
    .bind(&salt)
    .bind(role.as_str())
    .execute(pool)
    .await?;

    find_by_guid(pool, &guid)
        .await?
        .ok_or_else(|| Error::Internal("User missing after insert".to_string()))
}

/// Look up a user by email (login path)
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>> {
    let row = sqlx::query(
        r#"
        SELECT guid, name, email, password_hash, password_salt, role, profile_image, created_at
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    row.map(user_from_row).transpose()
}

/// Look up a user by guid
pub async fn find_by_guid(pool: &SqlitePool, guid: &str) -> Result<Option<User>> {
    let row = sqlx::query(
        r#"
        SELECT guid, name, email, password_hash, password_salt, role, profile_image, created_at
        FROM users
        WHERE guid = ?
        "#,
    )
    .bind(guid)
    .fetch_optional(pool)
    .await?;

    row.map(user_from_row).transpose()
}

/// Update name/email/profile image; `None` fields keep their current value
pub async fn update_profile(
    pool: &SqlitePool,
    guid: &str,
    name: Option<&str>,
    email: Option<&str>,
    profile_image: Option<&str>,
) -> Result<User> {
    if let Some(new_email) = email {
        let taken: Option<String> =
            sqlx::query_scalar("SELECT guid FROM users WHERE email = ? AND guid != ?")
                .bind(new_email)
                .bind(guid)
                .fetch_optional(pool)
                .await?;
        if taken.is_some() {
            return Err(Error::Conflict("Email already in use".to_string()));
        }
    }

    sqlx::query(
        r#"
        UPDATE users
        SET name = COALESCE(?, name),
            email = COALESCE(?, email),
            profile_image = COALESCE(?, profile_image),
            updated_at = CURRENT_TIMESTAMP
        WHERE guid = ?
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(profile_image)
    .bind(guid)
    .execute(pool)
    .await?;

    find_by_guid(pool, guid)
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))
}

/// Replace the password hash and salt (change-password path)
pub async fn update_password(pool: &SqlitePool, guid: &str, new_password: &str) -> Result<()> {
    let salt = generate_salt();
    let hash = hash_password(new_password, &salt);

    let result = sqlx::query(
        r#"
        UPDATE users
        SET password_hash = ?, password_salt = ?, updated_at = CURRENT_TIMESTAMP
        WHERE guid = ?
        "#,
    )
    .bind(&hash)
    .bind(&salt)
    .bind(guid)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound("User not found".to_string()));
    }

    Ok(())
}

/// Map a users row onto the model, parsing the role column
pub(crate) fn user_from_row(row: sqlx::sqlite::SqliteRow) -> Result<User> {
    let role_str: String = row.get("role");
    let role: Role = role_str.parse()?;

    Ok(User {
        guid: row.get("guid"),
        name: row.get("name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        password_salt: row.get("password_salt"),
        role,
        profile_image: row.get("profile_image"),
        created_at: row.get("created_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use coursely_common::auth::verify_password;

    #[tokio::test]
    async fn test_create_and_find_user() {
        let pool = test_pool().await;

        let user = create_user(&pool, "Ada", "ada@example.com", "hunter2", Role::Student)
            .await
            .unwrap();
        assert_eq!(user.name, "Ada");
        assert_eq!(user.role, Role::Student);
        assert!(verify_password("hunter2", &user.password_salt, &user.password_hash));

        let by_email = find_by_email(&pool, "ada@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.guid, user.guid);

        let missing = find_by_email(&pool, "nobody@example.com").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let pool = test_pool().await;

        create_user(&pool, "Ada", "ada@example.com", "hunter2", Role::Student)
            .await
            .unwrap();
        let dup = create_user(&pool, "Imposter", "ada@example.com", "x", Role::Student).await;

        assert!(matches!(dup, Err(Error::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_profile_partial() {
        let pool = test_pool().await;

        let user = create_user(&pool, "Ada", "ada@example.com", "hunter2", Role::Instructor)
            .await
            .unwrap();

        let updated = update_profile(&pool, &user.guid, Some("Ada L."), None, Some("/img/ada.png"))
            .await
            .unwrap();
        assert_eq!(updated.name, "Ada L.");
        assert_eq!(updated.email, "ada@example.com");
        assert_eq!(updated.profile_image.as_deref(), Some("/img/ada.png"));
    }

    #[tokio::test]
    async fn test_update_password_rotates_salt() {
        let pool = test_pool().await;

        let user = create_user(&pool, "Ada", "ada@example.com", "hunter2", Role::Student)
            .await
            .unwrap();

        update_password(&pool, &user.guid, "correct horse").await.unwrap();

        let reloaded = find_by_guid(&pool, &user.guid).await.unwrap().unwrap();
        assert_ne!(reloaded.password_salt, user.password_salt);
        assert!(verify_password("correct horse", &reloaded.password_salt, &reloaded.password_hash));
        assert!(!verify_password("hunter2", &reloaded.password_salt, &reloaded.password_hash));
    }
}
