//! Authentication and profile endpoints
//!
//! Signup and login issue opaque session tokens stored in the sessions
//! table. Token lifetime comes from the `session_timeout_seconds` setting.

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::middleware::CurrentUser;
use crate::db::{sessions, users};
use crate::error::{ApiError, ApiResult};
use crate::AppState;
use coursely_common::auth::verify_password;
use coursely_common::db::load_setting_i64;
use coursely_common::db::models::{Role, UserProfile};

/// Fallback session lifetime when the settings row is unreadable (8 days)
const DEFAULT_SESSION_TTL_SECONDS: i64 = 691_200;

/// Minimum accepted password length
const MIN_PASSWORD_LEN: usize = 6;

/// Signup request payload
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// "student" (default) or "instructor"; admin accounts are provisioned
    /// out of band, never via signup
    pub role: Option<String>,
}

/// Login request payload
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Issued token plus the public view of the account
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

/// Profile update request payload; absent or blank fields keep their
/// current value
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub profile_image: Option<String>,
}

/// Password change request payload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /api/auth/signup
///
/// **Request:** `{"name": "...", "email": "...", "password": "...", "role": "student"}`
/// **Response:** 201 with `{"token": "...", "user": {...}}`
///
/// **Errors:**
/// - 400: missing name/email/password, malformed email, short password,
///   unknown or admin role, email already registered
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let name = required_field(payload.name.as_deref(), "Name is required")?;
    let email = required_field(payload.email.as_deref(), "Email is required")?;
    let password = payload.password.as_deref().unwrap_or("");

    if !email.contains('@') {
        return Err(ApiError::BadRequest("Invalid email address".to_string()));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    let role = match payload.role.as_deref() {
        None => Role::Student,
        Some(raw) => {
            let role: Role = raw.trim().parse()?;
            if role == Role::Admin {
                return Err(ApiError::BadRequest(
                    "Role must be student or instructor".to_string(),
                ));
            }
            role
        }
    };

    let user = users::create_user(&state.db, &name, &email, password, role).await?;
    let token = issue_session(&state, &user.guid).await?;

    info!("New {} account created: {}", user.role, user.email);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

/// POST /api/auth/login
///
/// **Request:** `{"email": "...", "password": "..."}`
/// **Response:** `{"token": "...", "user": {...}}`
///
/// **Errors:**
/// - 400: unknown email ("User not found") or wrong password
///   ("Invalid password")
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let email = required_field(payload.email.as_deref(), "Email is required")?;
    let password = payload.password.as_deref().unwrap_or("");

    let user = users::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::BadRequest("User not found".to_string()))?;

    if !verify_password(password, &user.password_salt, &user.password_hash) {
        return Err(ApiError::BadRequest("Invalid password".to_string()));
    }

    let token = issue_session(&state, &user.guid).await?;

    info!("User logged in: {}", user.email);

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// GET /api/auth/me
///
/// Returns the profile of the authenticated user.
pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<UserProfile> {
    Json(user.into())
}

/// PUT /api/auth/update
///
/// Partial profile update; only the fields present in the payload change.
///
/// **Errors:**
/// - 400: malformed email, or email already used by another account
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<Json<UserProfile>> {
    let name = normalized(payload.name.as_deref());
    let email = normalized(payload.email.as_deref());
    let profile_image = normalized(payload.profile_image.as_deref());

    if let Some(email) = email {
        if !email.contains('@') {
            return Err(ApiError::BadRequest("Invalid email address".to_string()));
        }
    }

    let updated = users::update_profile(&state.db, &user.guid, name, email, profile_image).await?;

    Ok(Json(updated.into()))
}

/// POST /api/auth/change-password
///
/// **Errors:**
/// - 400: current password does not match, or new password too short
pub async fn change_password(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<ChangePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let current = payload.current_password.as_deref().unwrap_or("");
    let new_password = payload.new_password.as_deref().unwrap_or("");

    if !verify_password(current, &user.password_salt, &user.password_hash) {
        return Err(ApiError::BadRequest(
            "Current password is incorrect".to_string(),
        ));
    }
    if new_password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    users::update_password(&state.db, &user.guid, new_password).await?;

    info!("Password changed for {}", user.email);

    Ok(Json(MessageResponse {
        message: "Password updated successfully".to_string(),
    }))
}

fn required_field(value: Option<&str>, message: &str) -> Result<String, ApiError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ApiError::BadRequest(message.to_string())),
    }
}

/// Collapses absent and blank-after-trim values to `None`
fn normalized(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

async fn issue_session(state: &AppState, user_guid: &str) -> Result<String, ApiError> {
    let ttl = load_setting_i64(
        &state.db,
        "session_timeout_seconds",
        DEFAULT_SESSION_TTL_SECONDS,
    )
    .await?;
    let session = sessions::create_session(&state.db, user_guid, ttl).await?;
    Ok(session.token)
}
