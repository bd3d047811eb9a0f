//! coursely-api library - course review backend
//!
//! HTTP service exposing the course catalog, enrollment, and the review
//! submission pipeline (validation, sentiment scoring, persistence, and
//! aggregate recomputation).

use std::sync::Arc;

use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;

pub mod aggregate;
pub mod api;
pub mod db;
pub mod error;
pub mod sentiment;
pub mod workflow;

pub use error::{ApiError, ApiResult};

use sentiment::{LexiconScorer, TextScorer};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Comment scorer used by the review submission workflow
    pub scorer: Arc<dyn TextScorer>,
}

impl AppState {
    /// Create application state with the default lexicon scorer
    pub fn new(db: SqlitePool) -> Self {
        Self {
            db,
            scorer: Arc::new(LexiconScorer),
        }
    }

    /// Create application state with a caller-supplied scorer
    pub fn with_scorer(db: SqlitePool, scorer: Arc<dyn TextScorer>) -> Self {
        Self { db, scorer }
    }
}

/// Build application router
///
/// Protected routes require a bearer session token; catalog reads, review
/// reads, signup/login, and health stay public.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post, put};

    // Protected routes (require a valid session)
    let protected = Router::new()
        .route("/api/auth/me", get(api::me))
        .route("/api/auth/update", put(api::update_profile))
        .route("/api/auth/change-password", post(api::change_password))
        .route("/api/courses", post(api::create_course))
        .route("/api/courses/instructor-courses", get(api::instructor_courses))
        .route("/api/courses/other-courses", get(api::other_courses))
        .route(
            "/api/courses/:id",
            put(api::update_course).delete(api::delete_course),
        )
        .route("/api/enrollments/enroll", post(api::enroll))
        .route("/api/enrollments", get(api::my_enrollments))
        .route("/api/reviews/submit", post(api::submit_review))
        .route("/api/reviews/course/:id/mine", get(api::my_review))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::require_session,
        ));

    // Public routes (no authentication)
    let public = Router::new()
        .route("/api/auth/signup", post(api::signup))
        .route("/api/auth/login", post(api::login))
        .route("/api/courses", get(api::list_courses))
        .route("/api/courses/:id", get(api::get_course))
        .route("/api/courses/:id/stats", get(api::course_stats))
        .route("/api/reviews/course/:id", get(api::course_reviews))
        .route("/api/reviews/course/:id/rating", get(api::course_rating))
        .route("/build_info", get(api::get_build_info))
        .merge(api::health_routes());

    // Combine routers
    Router::new()
        .merge(protected)
        .merge(public)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
