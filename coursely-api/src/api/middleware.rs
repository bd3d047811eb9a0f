//! Session authentication middleware
//!
//! Protected routes require an `Authorization: Bearer <token>` header
//! carrying an unexpired session token. The matching user is loaded once
//! here and handed to handlers through request extensions.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::db::{sessions, users};
use crate::error::ApiError;
use crate::AppState;
use coursely_common::db::models::User;

/// The authenticated user for the current request.
///
/// Inserted by [`require_session`]; handlers extract it with
/// `Extension(CurrentUser(user))`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Resolves the bearer token to a user, or rejects with 401.
///
/// Expired sessions are purged on lookup, so a stale token fails here
/// rather than lingering in the sessions table.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&request)
        .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;

    let session = sessions::find_valid_session(&state.db, &token)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Session expired or unknown".to_string()))?;

    let user = users::find_by_guid(&state.db, &session.user_guid)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Session user no longer exists".to_string()))?;

    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}

fn bearer_token(request: &Request) -> Option<String> {
    let header = request.headers().get(AUTHORIZATION)?.to_str().ok()?;
    header
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}
