//! Database models
//!
//! Row shapes as read back from SQLite. Timestamps are kept as the string
//! form SQLite stores (`CURRENT_TIMESTAMP` for created/updated columns,
//! RFC 3339 for session expiry) and passed through to the API unparsed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User role
///
/// Students enroll and submit reviews, instructors publish courses, admins
/// may additionally delete any course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Instructor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Instructor => "instructor",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "instructor" => Ok(Role::Instructor),
            "admin" => Ok(Role::Admin),
            other => Err(crate::Error::InvalidInput(format!("Unknown role: {}", other))),
        }
    }
}

/// Full user row, including credential fields
///
/// Never serialized to clients — responses use [`UserProfile`].
#[derive(Debug, Clone)]
pub struct User {
    pub guid: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub password_salt: String,
    pub role: Role,
    pub profile_image: Option<String>,
    pub created_at: String,
}

/// Client-facing view of a user, with credential fields stripped
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub guid: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub profile_image: Option<String>,
    pub created_at: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        UserProfile {
            guid: user.guid,
            name: user.name,
            email: user.email,
            role: user.role,
            profile_image: user.profile_image,
            created_at: user.created_at,
        }
    }
}

/// Course row
///
/// `average_rating` and `average_sentiment` are derived cache fields owned by
/// the aggregation engine — always a full recompute over the course's
/// reviews, never patched incrementally.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub guid: String,
    pub title: String,
    pub description: Option<String>,
    pub department: Option<String>,
    pub difficulty: Option<String>,
    pub instructor_guid: Option<String>,
    pub average_rating: f64,
    pub average_sentiment: f64,
    pub prerequisites: Vec<String>,
    pub tags: Vec<String>,
    pub video_url: Option<String>,
    pub image_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Enrollment row — one per (user, course) pair
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub guid: String,
    pub user_guid: String,
    pub course_guid: String,
    pub progress: f64,
    pub completed: bool,
    pub created_at: String,
}

/// Review row — at most one per (course, student) pair
///
/// `sentiment` is the integer polarity score derived from `comment`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub guid: String,
    pub course_guid: String,
    pub student_guid: String,
    pub rating: i64,
    pub comment: String,
    pub sentiment: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Session row backing a bearer token
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user_guid: String,
    pub expires_at: String,
}
